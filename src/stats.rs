use chrono::{DateTime, Local, NaiveDate, Utc};
use itertools::Itertools;
use log::info;
use rusqlite::{params, Connection};
use serde::Serialize;
use std::path::Path;
use uuid::Uuid;

use crate::app_dirs::AppDirs;
use crate::error::{GlanceError, Result};
use crate::session::{SessionRecord, SessionRecorder};
use crate::time_series::TimeSeriesPoint;
use crate::util::{mean, std_dev};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS reading_sessions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        item_id TEXT,
        date TEXT NOT NULL,
        wpm INTEGER NOT NULL,
        duration_secs REAL NOT NULL,
        words_read INTEGER NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    );
    CREATE INDEX IF NOT EXISTS idx_reading_sessions_date ON reading_sessions(date);
"#;

/// Aggregate view over all recorded sessions
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReadingSummary {
    pub sessions: usize,
    pub total_words: usize,
    pub total_secs: f64,
    pub average_wpm: f64,
    pub wpm_std_dev: f64,
}

/// One exported row of the session log
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    date: String,
    item_id: &'a str,
    wpm: u32,
    duration_secs: String,
    words_read: usize,
}

/// Database of completed reading sessions
#[derive(Debug)]
pub struct ReadingStatsDb {
    conn: Connection,
}

impl ReadingStatsDb {
    /// Open (or create) the database at the default location
    pub fn new() -> Result<Self> {
        let db_path = AppDirs::db_path().ok_or(GlanceError::NoStateDir)?;
        Self::open(db_path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(ReadingStatsDb { conn })
    }

    pub fn record_session(&self, item_id: Option<Uuid>, record: &SessionRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO reading_sessions (item_id, date, wpm, duration_secs, words_read)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                item_id.map(|id| id.to_string()),
                record.date.to_rfc3339(),
                record.wpm,
                record.duration,
                record.words_read as i64,
            ],
        )?;
        info!(
            "recorded session: {} words at {} wpm",
            record.words_read, record.wpm
        );
        Ok(())
    }

    /// Most recent sessions first
    pub fn recent_sessions(&self, limit: usize) -> Result<Vec<(Option<Uuid>, SessionRecord)>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT item_id, date, wpm, duration_secs, words_read
            FROM reading_sessions
            ORDER BY date DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map([limit as i64], |row| {
            let item_id: Option<String> = row.get(0)?;
            let date_str: String = row.get(1)?;
            let date = DateTime::parse_from_rfc3339(&date_str)
                .map_err(|_| invalid_date_column())?
                .with_timezone(&Utc);
            let words_read: i64 = row.get(4)?;

            Ok((
                item_id.and_then(|id| Uuid::parse_str(&id).ok()),
                SessionRecord {
                    date,
                    wpm: row.get(2)?,
                    duration: row.get(3)?,
                    words_read: words_read.max(0) as usize,
                },
            ))
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row?);
        }
        Ok(sessions)
    }

    fn all_sessions(&self) -> Result<Vec<SessionRecord>> {
        Ok(self
            .recent_sessions(usize::MAX >> 1)?
            .into_iter()
            .map(|(_, record)| record)
            .collect())
    }

    pub fn summary(&self) -> Result<ReadingSummary> {
        let sessions = self.all_sessions()?;
        let wpms: Vec<f64> = sessions.iter().map(|s| s.wpm as f64).collect();

        Ok(ReadingSummary {
            sessions: sessions.len(),
            total_words: sessions.iter().map(|s| s.words_read).sum(),
            total_secs: sessions.iter().map(|s| s.duration).sum(),
            average_wpm: mean(&wpms).unwrap_or(0.0),
            wpm_std_dev: std_dev(&wpms).unwrap_or(0.0),
        })
    }

    /// Chosen wpm per session in chronological order, indexed from 1
    pub fn wpm_history(&self) -> Result<Vec<TimeSeriesPoint>> {
        let mut sessions = self.all_sessions()?;
        sessions.reverse();
        Ok(sessions
            .iter()
            .enumerate()
            .map(|(i, s)| TimeSeriesPoint::new((i + 1) as f64, s.wpm as f64))
            .collect())
    }

    /// Distinct local calendar days with at least one session, ascending
    pub fn session_days(&self) -> Result<Vec<NaiveDate>> {
        Ok(self
            .all_sessions()?
            .iter()
            .map(|s| s.date.with_timezone(&Local).date_naive())
            .sorted()
            .dedup()
            .collect())
    }

    pub fn streak(&self, today: NaiveDate) -> Result<u32> {
        Ok(reading_streak(&self.session_days()?, today))
    }

    /// Write every session to a CSV file, oldest first
    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let mut sessions = self.recent_sessions(usize::MAX >> 1)?;
        sessions.reverse();

        let mut writer = csv::Writer::from_path(path)?;
        for (item_id, record) in &sessions {
            let item_id = item_id.map(|id| id.to_string()).unwrap_or_default();
            writer.serialize(CsvRow {
                date: record.date.with_timezone(&Local).format("%c").to_string(),
                item_id: &item_id,
                wpm: record.wpm,
                duration_secs: format!("{:.2}", record.duration),
                words_read: record.words_read,
            })?;
        }
        writer.flush()?;
        Ok(sessions.len())
    }

    /// Clear all statistics (for testing or reset purposes)
    pub fn clear_all(&self) -> Result<()> {
        self.conn.execute("DELETE FROM reading_sessions", [])?;
        Ok(())
    }
}

impl SessionRecorder for ReadingStatsDb {
    fn record(&mut self, item_id: Option<Uuid>, record: &SessionRecord) -> Result<()> {
        self.record_session(item_id, record)
    }
}

fn invalid_date_column() -> rusqlite::Error {
    rusqlite::Error::InvalidColumnType(1, "date".to_string(), rusqlite::types::Type::Text)
}

/// Consecutive reading days ending today.
///
/// A day without a session breaks the streak, and so does today: if nothing
/// was read today the streak is 0.
pub fn reading_streak(days: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = today;
    while days.contains(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}
