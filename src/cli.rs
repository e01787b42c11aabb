use std::path::{Path, PathBuf};
use serde::Deserialize;
use thiserror::Error;

use clap::{Parser, Subcommand};

use arcio::sanitize::is_invalid_filename_char;
use arcio::ArcioError;

#[derive(Parser)]
#[command(name = "arcio")]
#[command(about = "Inspect and carve archive header fields and entry payloads")]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Decode a packed date/time pair
    DecodeTime {
        /// Packed date field, decimal or 0x hex
        #[arg(value_parser = parse_u16)]
        date: u16,
        /// Packed time field, decimal or 0x hex
        #[arg(value_parser = parse_u16)]
        time: u16,
    },

    /// Pack an RFC 3339 timestamp as local time
    EncodeTime {
        timestamp: String,
    },

    /// Convert seconds since the unix epoch to a UTC timestamp
    UnixTime {
        #[arg(allow_negative_numbers = true)]
        seconds: i64,
    },

    /// Replace characters that can't appear in a filename
    Sanitize {
        name: String,
    },

    /// Reverse the byte order of a 32-bit value
    Swap {
        #[arg(value_parser = parse_u32)]
        value: u32,
    },

    /// Copy a byte range of a file (or `-` for stdin) to another file
    Extract {
        input: PathBuf,
        output: PathBuf,

        /// Bytes to skip before copying
        #[arg(short, long, default_value_t = 0, value_parser = parse_u64)]
        offset: u64,

        /// Most bytes to copy, defaults to everything left
        #[arg(short, long, value_parser = parse_u64)]
        length: Option<u64>,

        /// Run on the async runtime, Ctrl-C cancels
        #[arg(long = "async")]
        use_async: bool,
    },
}

fn parse_u64(s: &str) -> Result<u64, String> {
    let res = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse::<u64>(),
    };
    res.map_err(|e| format!("{}: {}", s, e))
}

fn parse_u16(s: &str) -> Result<u16, String> {
    u16::try_from(parse_u64(s)?).map_err(|_| format!("{} does not fit in 16 bits", s))
}

fn parse_u32(s: &str) -> Result<u32, String> {
    u32::try_from(parse_u64(s)?).map_err(|_| format!("{} does not fit in 32 bits", s))
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    Arcio(#[from] ArcioError),
    #[error("config: {0}")]
    Config(#[from] toml::de::Error),
    #[error("timestamp: {0}")]
    Parse(#[from] time::error::Parse),
    #[error("timestamp: {0}")]
    Format(#[from] time::error::Format),
}

// Configuration
#[derive(Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub chunk_size: usize,
    pub placeholder: char,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            chunk_size: arcio::DEFAULT_CHUNK_SIZE,
            placeholder: arcio::sanitize::PLACEHOLDER,
        }
    }
}

impl Config {
    pub fn from_toml(s: &str) -> Result<Self, CliError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        match path {
            None => Ok(Config::default()),
            Some(p) => Config::from_toml(&std::fs::read_to_string(p)?),
        }
    }

    fn validate(&self) -> Result<(), ArcioError> {
        if self.chunk_size == 0 {
            return Err(ArcioError::InvalidArgument("chunk_size must be non-zero".into()));
        }
        if is_invalid_filename_char(self.placeholder) {
            return Err(ArcioError::InvalidArgument(format!(
                "placeholder {:?} is not a valid filename character",
                self.placeholder
            )));
        }
        Ok(())
    }
}
