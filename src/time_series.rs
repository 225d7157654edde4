use crate::session::SessionRecord;

/// One point of a wpm-over-sessions chart; `t` is the session number
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesPoint {
    pub t: f64,
    pub wpm: f64,
}

impl TimeSeriesPoint {
    pub fn new(t: f64, wpm: f64) -> Self {
        Self { t, wpm }
    }

    /// Effective wpm of each session in chronological order, numbered from 1
    pub fn from_sessions(sessions: &[SessionRecord]) -> Vec<Self> {
        let mut ordered: Vec<&SessionRecord> = sessions.iter().collect();
        ordered.sort_by_key(|s| s.date);
        ordered
            .iter()
            .zip(1..)
            .map(|(s, n)| Self::new(n as f64, s.effective_wpm().round()))
            .collect()
    }
}

impl From<TimeSeriesPoint> for (f64, f64) {
    fn from(p: TimeSeriesPoint) -> Self {
        (p.t, p.wpm)
    }
}
