use std::path::{Path, PathBuf};

pub const USAGE: &str = "usage: pcm-extract <input> [output] [--native-format]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Ask the decoder for the packed variant of its native sample format.
    pub prefer_packed: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            prefer_packed: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    input: PathBuf,
    output: PathBuf,
    decode: DecodeOptions,
}

impl ExtractConfig {
    /// Output defaults to `<input>.raw`.
    pub fn new(input: &Path) -> Self {
        let mut output = input.as_os_str().to_owned();
        output.push(".raw");
        Self {
            input: input.to_path_buf(),
            output: PathBuf::from(output),
            decode: DecodeOptions::default(),
        }
    }

    pub fn with_output(mut self, output: &Path) -> Self {
        self.output = output.to_path_buf();
        self
    }

    pub fn with_decode(mut self, decode: DecodeOptions) -> Self {
        self.decode = decode;
        self
    }

    /// Parses command line arguments, program name excluded.
    pub fn from_args<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut positional = Vec::new();
        let mut decode = DecodeOptions::default();
        for arg in args {
            match arg.as_str() {
                "--native-format" => decode.prefer_packed = false,
                flag if flag.starts_with('-') => {
                    anyhow::bail!("unknown option {}\n{}", flag, USAGE)
                }
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let input = positional
            .next()
            .ok_or_else(|| anyhow::anyhow!("missing input file\n{}", USAGE))?;
        let mut config = Self::new(Path::new(&input)).with_decode(decode);
        if let Some(output) = positional.next() {
            config = config.with_output(Path::new(&output));
        }
        if let Some(extra) = positional.next() {
            anyhow::bail!("unexpected argument {}\n{}", extra, USAGE);
        }
        Ok(config)
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn decode(&self) -> &DecodeOptions {
        &self.decode
    }
}
