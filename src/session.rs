use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// Metrics of one completed play run, as emitted by the pacing controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSummary {
    pub wpm: u32,
    pub words_read: usize,
    pub duration_secs: f64,
}

/// A finished reading session kept in an item's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub date: DateTime<Utc>,
    pub wpm: u32,
    /// Seconds
    pub duration: f64,
    pub words_read: usize,
}

impl SessionRecord {
    pub fn from_summary(summary: &SessionSummary, date: DateTime<Utc>) -> Self {
        Self {
            date,
            wpm: summary.wpm,
            duration: summary.duration_secs,
            words_read: summary.words_read,
        }
    }

    /// Words per minute actually achieved, including punctuation pauses
    pub fn effective_wpm(&self) -> f64 {
        if self.duration > 0.0 {
            self.words_read as f64 / (self.duration / 60.0)
        } else {
            0.0
        }
    }
}

/// Sink for completed sessions
pub trait SessionRecorder {
    fn record(&mut self, item_id: Option<Uuid>, record: &SessionRecord) -> Result<()>;
}
