// Spaced repetition for saved vocabulary. Proficiency stays within 0..=5.

use std::collections::VecDeque;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use log::debug;
use time_humanize::HumanTime;

use crate::error::{GlanceError, Result};
use crate::library::VocabularyEntry;

pub const MAX_PROFICIENCY: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Rating {
    Hard,
    Good,
    Easy,
}

impl Rating {
    pub const ALL: [Rating; 3] = [Rating::Hard, Rating::Good, Rating::Easy];

    pub fn interval_minutes(self) -> i64 {
        match self {
            Rating::Hard => 10,
            Rating::Good => 1_440,
            Rating::Easy => 4_320,
        }
    }

    pub fn proficiency_delta(self) -> i16 {
        match self {
            Rating::Hard => -1,
            Rating::Good => 1,
            Rating::Easy => 2,
        }
    }
}

impl FromStr for Rating {
    type Err = GlanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hard" => Ok(Rating::Hard),
            "good" => Ok(Rating::Good),
            "easy" => Ok(Rating::Easy),
            other => Err(GlanceError::InvalidArgument(format!(
                "unknown review rating {other:?}"
            ))),
        }
    }
}

/// Apply a review grade at `now`, returning the updated entry for the caller
/// to persist.
pub fn grade(entry: &VocabularyEntry, rating: Rating, now: DateTime<Utc>) -> VocabularyEntry {
    let proficiency = (entry.proficiency as i16 + rating.proficiency_delta())
        .clamp(0, MAX_PROFICIENCY as i16) as u8;
    let next_review = now + Duration::minutes(rating.interval_minutes());
    debug!(
        "graded {:?} {rating}: proficiency {} -> {proficiency}",
        entry.word, entry.proficiency
    );

    VocabularyEntry {
        proficiency,
        next_review,
        ..entry.clone()
    }
}

/// Grade with a rating given by name. Unknown names leave the entry untouched.
pub fn grade_named(
    entry: &VocabularyEntry,
    rating: &str,
    now: DateTime<Utc>,
) -> Result<VocabularyEntry> {
    let rating = rating.parse::<Rating>()?;
    Ok(grade(entry, rating, now))
}

/// Entries due at `now`, most recently saved first.
pub fn due_queue(entries: &[VocabularyEntry], now: DateTime<Utc>) -> Vec<VocabularyEntry> {
    let mut due: Vec<VocabularyEntry> = entries
        .iter()
        .filter(|entry| entry.is_due(now))
        .cloned()
        .collect();
    due.sort_by(|a, b| b.date.cmp(&a.date));
    due
}

/// Number of entries at each proficiency level, index = level
pub fn mastery_breakdown(entries: &[VocabularyEntry]) -> [usize; MAX_PROFICIENCY as usize + 1] {
    let mut levels = [0; MAX_PROFICIENCY as usize + 1];
    for entry in entries {
        levels[entry.proficiency.min(MAX_PROFICIENCY) as usize] += 1;
    }
    levels
}

/// The interval each rating would schedule, for labelling review buttons
pub fn preview_intervals() -> [(Rating, i64); 3] {
    Rating::ALL.map(|r| (r, r.interval_minutes()))
}

/// Short label for an interval: `10m`, `1d`, `3d`
pub fn format_interval(minutes: i64) -> String {
    if minutes < 60 {
        format!("{minutes}m")
    } else if minutes < 1_440 {
        format!("{}h", minutes / 60)
    } else {
        format!("{}d", minutes / 1_440)
    }
}

/// Human phrase for when an entry is next due, e.g. "in 3 days"
pub fn describe_next_review(entry: &VocabularyEntry, now: DateTime<Utc>) -> String {
    if entry.is_due(now) {
        return "now".to_string();
    }
    let secs = (entry.next_review - now).num_seconds().max(0) as u64;
    let until = std::time::Duration::from_secs(secs);
    HumanTime::from(until).to_string()
}

/// Walks a due queue one entry at a time.
///
/// Entries are graded here but persisting them is left to the caller.
#[derive(Debug, Clone, Default)]
pub struct ReviewSession {
    queue: VecDeque<VocabularyEntry>,
    reviewed: usize,
}

impl ReviewSession {
    pub fn new(entries: &[VocabularyEntry], now: DateTime<Utc>) -> Self {
        Self {
            queue: due_queue(entries, now).into(),
            reviewed: 0,
        }
    }

    pub fn current(&self) -> Option<&VocabularyEntry> {
        self.queue.front()
    }

    /// Grade the current entry and move on. Returns the graded entry.
    pub fn answer(&mut self, rating: Rating, now: DateTime<Utc>) -> Option<VocabularyEntry> {
        let entry = self.queue.pop_front()?;
        self.reviewed += 1;
        Some(grade(&entry, rating, now))
    }

    /// Move the current entry to the back of the queue without grading it
    pub fn skip(&mut self) {
        if let Some(entry) = self.queue.pop_front() {
            self.queue.push_back(entry);
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn reviewed(&self) -> usize {
        self.reviewed
    }

    pub fn is_done(&self) -> bool {
        self.queue.is_empty()
    }
}
