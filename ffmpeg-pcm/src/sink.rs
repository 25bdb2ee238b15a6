use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::traits::OutputSink;

/// Writes samples as raw native-endian 32-bit floats.
pub struct RawFileSink<W: Write> {
    writer: BufWriter<W>,
    samples: u64,
}

impl RawFileSink<File> {
    pub fn create(path: &Path) -> std::io::Result<Self> {
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write> RawFileSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            samples: 0,
        }
    }

    pub fn samples_written(&self) -> u64 {
        self.samples
    }

    /// Flushes buffered samples and hands back the underlying writer.
    pub fn finish(self) -> std::io::Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }
}

impl<W: Write> OutputSink for RawFileSink<W> {
    fn write(&mut self, samples: &[f32]) -> std::io::Result<()> {
        for sample in samples {
            self.writer.write_all(&sample.to_ne_bytes())?;
        }
        self.samples += samples.len() as u64;
        Ok(())
    }
}
