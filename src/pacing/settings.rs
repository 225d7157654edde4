use serde::{Deserialize, Serialize};

use crate::error::{GlanceError, Result};

/// How tokens are grouped and laid out while reading
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReadingMode {
    /// One word at a time
    #[default]
    Single,
    /// `chunk_size` words at a time
    Chunk,
    /// The current word highlighted inside its line
    Flow,
    /// The current word highlighted inside a page of text
    Classic,
}

/// Validated pacing parameters handed to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingSettings {
    pub wpm: u32,
    pub mode: ReadingMode,
    pub chunk_size: usize,
}

impl Default for ReadingSettings {
    fn default() -> Self {
        Self {
            wpm: 300,
            mode: ReadingMode::Single,
            chunk_size: 3,
        }
    }
}

impl ReadingSettings {
    pub fn new(wpm: u32, mode: ReadingMode, chunk_size: usize) -> Result<Self> {
        let settings = Self {
            wpm,
            mode,
            chunk_size,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.wpm == 0 {
            return Err(GlanceError::InvalidConfiguration(
                "wpm must be greater than zero".to_string(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(GlanceError::InvalidConfiguration(
                "chunk size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of tokens one advance moves forward
    pub fn step(&self) -> usize {
        match self.mode {
            ReadingMode::Chunk => self.chunk_size,
            _ => 1,
        }
    }
}
