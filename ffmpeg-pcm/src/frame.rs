use bytes::Bytes;

use crate::format::{FormatError, SampleFormat};

/// One decoded audio frame with its own copy of the sample planes.
#[derive(Clone, Debug)]
pub struct AudioFrame {
    format: SampleFormat,
    samples: usize,
    rate: u32,
    pts: Option<i64>,
    planes: Vec<Bytes>,
}

impl AudioFrame {
    pub fn new(format: SampleFormat, samples: usize, planes: Vec<Bytes>) -> Self {
        Self {
            format,
            samples,
            rate: 0,
            pts: None,
            planes,
        }
    }

    pub fn with_rate(mut self, rate: u32) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_pts(mut self, pts: Option<i64>) -> Self {
        self.pts = pts;
        self
    }

    pub fn format(&self) -> &SampleFormat {
        &self.format
    }

    /// Samples per channel (`nb_samples`).
    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn rate(&self) -> u32 {
        self.rate
    }

    pub fn pts(&self) -> Option<i64> {
        self.pts
    }

    pub fn planes(&self) -> &[Bytes] {
        &self.planes
    }

    /// Number of normalized values this frame extracts to.
    pub fn value_count(&self) -> usize {
        self.samples * self.format.channels() as usize
    }
}

impl TryFrom<&ffmpeg_next::frame::Audio> for AudioFrame {
    type Error = FormatError;

    fn try_from(frame: &ffmpeg_next::frame::Audio) -> Result<Self, Self::Error> {
        let format = SampleFormat::from_ffmpeg(frame.format(), frame.channels())?;
        let samples = frame.samples();
        let needed = format.plane_len(samples);

        // Audio frames only set linesize[0]; every plane has that size. Planes
        // beyond the eight `data` slots are only reachable via extended_data.
        let planes = unsafe {
            let ptr = frame.as_ptr();
            let line = (*ptr).linesize[0].max(0) as usize;
            let len = needed.min(line);
            (0..format.planes())
                .map(|plane| {
                    let data = if (*ptr).extended_data.is_null() {
                        std::ptr::null()
                    } else {
                        *(*ptr).extended_data.add(plane) as *const u8
                    };
                    if data.is_null() || len == 0 {
                        Bytes::new()
                    } else {
                        Bytes::copy_from_slice(std::slice::from_raw_parts(data, len))
                    }
                })
                .collect()
        };

        Ok(AudioFrame::new(format, samples, planes)
            .with_rate(frame.rate())
            .with_pts(frame.pts()))
    }
}
