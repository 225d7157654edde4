use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::session::SessionRecord;

/// A word saved while reading, scheduled for review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyEntry {
    pub id: Uuid,
    pub word: String,
    pub definition: String,
    #[serde(default)]
    pub examples: Vec<String>,
    /// When the entry was saved
    pub date: DateTime<Utc>,
    /// Mastery level, 0 (new) to 5
    #[serde(default)]
    pub proficiency: u8,
    pub next_review: DateTime<Utc>,
}

impl VocabularyEntry {
    /// A fresh entry is due immediately.
    pub fn new(
        word: String,
        definition: String,
        examples: Vec<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            word,
            definition,
            examples,
            date: now,
            proficiency: 0,
            next_review: now,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }
}

/// A text in the library together with its reading history and saved words
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryItem {
    pub id: Uuid,
    pub title: String,
    /// File the content was imported from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    pub content: String,
    pub added_at: DateTime<Utc>,
    #[serde(default)]
    pub last_position: usize,
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
    #[serde(default)]
    pub vocabulary: Vec<VocabularyEntry>,
}

impl LibraryItem {
    pub fn new(title: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            source: None,
            content,
            added_at: Utc::now(),
            last_position: 0,
            sessions: Vec::new(),
            vocabulary: Vec::new(),
        }
    }

    pub fn from_file(title: String, source: PathBuf, content: String) -> Self {
        let mut item = Self::new(title, content);
        item.source = Some(source);
        item
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    /// Fraction of the text read so far, from the saved position
    pub fn progress(&self) -> f64 {
        match self.word_count() {
            0 => 0.0,
            n if self.last_position + 1 >= n => 1.0,
            n => self.last_position as f64 / n as f64,
        }
    }

    pub fn last_session(&self) -> Option<&SessionRecord> {
        self.sessions.iter().max_by_key(|s| s.date)
    }
}
