use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use super::settings::ReadingSettings;
use super::timer::{AdvanceTimer, Clock, SystemClock};
use super::timing::{delay_ms, remaining_ms};
use crate::error::Result;
use crate::session::SessionSummary;
use crate::tokenizer::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Idle,
    Playing,
    Paused,
    /// Inspection pause entered from hover/key; no auto-advance
    ContextView,
    Finished,
}

/// Notifications produced by controller commands, in emission order
#[derive(Debug, Clone, PartialEq)]
pub enum PacingEvent {
    PositionChanged(usize),
    SessionEnded(SessionSummary),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PacingState {
    pub position: usize,
    pub play_state: PlayState,
    pub settings: ReadingSettings,
    pub started_at: Option<DateTime<Utc>>,
}

/// Owns playback position and timing for one token stream.
///
/// Every command that leaves or re-enters `Playing` cancels the advance
/// timer before arming it again, so at most one tick is ever pending.
#[derive(Debug)]
pub struct PacingController<C: Clock = SystemClock> {
    tokens: Vec<Token>,
    state: PacingState,
    timer: AdvanceTimer,
    /// Whether leaving the context view resumes playback
    resume_playing: bool,
    clock: C,
}

impl PacingController<SystemClock> {
    pub fn new(tokens: Vec<Token>, settings: ReadingSettings) -> Result<Self> {
        Self::with_clock(tokens, settings, SystemClock)
    }
}

impl<C: Clock> PacingController<C> {
    pub fn with_clock(tokens: Vec<Token>, settings: ReadingSettings, clock: C) -> Result<Self> {
        settings.validate()?;
        let play_state = if tokens.is_empty() {
            PlayState::Finished
        } else {
            PlayState::Idle
        };

        Ok(Self {
            tokens,
            state: PacingState {
                position: 0,
                play_state,
                settings,
                started_at: None,
            },
            timer: AdvanceTimer::new(),
            resume_playing: false,
            clock,
        })
    }

    /// Start from a saved position instead of the first token
    pub fn at_position(mut self, position: usize) -> Self {
        if !self.tokens.is_empty() {
            self.state.position = position.min(self.last_index());
        }
        self
    }

    pub fn state(&self) -> &PacingState {
        &self.state
    }

    pub fn play_state(&self) -> PlayState {
        self.state.play_state
    }

    pub fn position(&self) -> usize {
        self.state.position
    }

    pub fn settings(&self) -> &ReadingSettings {
        &self.state.settings
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_finished(&self) -> bool {
        self.state.play_state == PlayState::Finished
    }

    pub fn has_pending_tick(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.state.position)
    }

    /// Tokens shown together at the current position
    pub fn current_chunk(&self) -> &[Token] {
        if self.tokens.is_empty() {
            return &[];
        }
        let start = self.state.position;
        let end = (start + self.state.settings.step()).min(self.tokens.len());
        &self.tokens[start..end]
    }

    /// Fraction of the text already shown, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        match self.tokens.len() {
            0 => 1.0,
            _ if self.is_finished() => 1.0,
            n => self.state.position as f64 / n as f64,
        }
    }

    /// Reading time left at the current settings, in milliseconds
    pub fn remaining_ms(&self) -> f64 {
        if self.is_finished() {
            return 0.0;
        }
        remaining_ms(&self.state.settings, &self.tokens, self.state.position)
    }

    /// Replace the pacing parameters. Invalid settings are rejected and the
    /// previous ones stay in effect. A pending tick keeps its deadline.
    pub fn apply_settings(&mut self, settings: ReadingSettings) -> Result<()> {
        if let Err(e) = settings.validate() {
            warn!("rejected reading settings {settings:?}: {e}");
            return Err(e);
        }
        debug!("applying reading settings {settings:?}");
        self.state.settings = settings;
        Ok(())
    }

    pub fn start(&mut self) {
        match self.state.play_state {
            PlayState::Idle | PlayState::Paused => {
                if self.state.started_at.is_none() {
                    self.state.started_at = Some(self.clock.now());
                }
                self.enter_playing();
            }
            _ => {}
        }
    }

    pub fn pause(&mut self) {
        match self.state.play_state {
            PlayState::Playing | PlayState::ContextView => {
                self.timer.cancel();
                self.resume_playing = false;
                self.state.play_state = PlayState::Paused;
                debug!("paused at {}", self.state.position);
            }
            _ => {}
        }
    }

    pub fn resume(&mut self) {
        if self.state.play_state == PlayState::Paused {
            self.enter_playing();
        }
    }

    pub fn toggle(&mut self) {
        match self.state.play_state {
            PlayState::Idle => self.start(),
            PlayState::Playing => self.pause(),
            PlayState::Paused => self.resume(),
            PlayState::ContextView => self.exit_context(),
            PlayState::Finished => {}
        }
    }

    pub fn enter_context(&mut self) {
        match self.state.play_state {
            PlayState::Playing | PlayState::Paused => {
                self.resume_playing = self.state.play_state == PlayState::Playing;
                self.timer.cancel();
                self.state.play_state = PlayState::ContextView;
                debug!("context view at {}", self.state.position);
            }
            _ => {}
        }
    }

    pub fn exit_context(&mut self) {
        if self.state.play_state != PlayState::ContextView {
            return;
        }
        if std::mem::take(&mut self.resume_playing) {
            self.enter_playing();
        } else {
            self.state.play_state = PlayState::Paused;
        }
    }

    /// Jump to `index`, clamped to the token range.
    pub fn seek(&mut self, index: usize) -> Option<PacingEvent> {
        if self.tokens.is_empty() || self.is_finished() {
            return None;
        }
        self.timer.cancel();
        self.state.position = index.min(self.last_index());
        if self.state.play_state == PlayState::Playing {
            self.arm_for_current();
        }
        Some(PacingEvent::PositionChanged(self.state.position))
    }

    /// Seek by whole steps relative to the current position
    pub fn seek_by(&mut self, steps: isize) -> Option<PacingEvent> {
        let delta = steps.unsigned_abs() * self.state.settings.step();
        let target = if steps < 0 {
            self.state.position.saturating_sub(delta)
        } else {
            self.state.position.saturating_add(delta)
        };
        self.seek(target)
    }

    /// Fire the pending tick if its deadline has passed.
    pub fn poll(&mut self) -> Option<PacingEvent> {
        if self.state.play_state != PlayState::Playing {
            return None;
        }
        if self.timer.fire_if_due(self.clock.now()) {
            self.advance()
        } else {
            None
        }
    }

    /// Advance immediately, as if the pending timer had fired.
    pub fn tick(&mut self) -> Option<PacingEvent> {
        if self.state.play_state != PlayState::Playing {
            return None;
        }
        self.timer.cancel();
        self.advance()
    }

    /// Back to the first token, ready for a new run
    pub fn reset(&mut self) {
        self.timer.cancel();
        self.resume_playing = false;
        self.state.position = 0;
        self.state.started_at = None;
        self.state.play_state = if self.tokens.is_empty() {
            PlayState::Finished
        } else {
            PlayState::Idle
        };
    }

    fn advance(&mut self) -> Option<PacingEvent> {
        let last = self.last_index();
        if self.state.position >= last {
            return Some(self.finish());
        }

        let next = self.state.position + self.state.settings.step();
        self.state.position = next.min(last);
        self.arm_for_current();
        Some(PacingEvent::PositionChanged(self.state.position))
    }

    fn finish(&mut self) -> PacingEvent {
        self.timer.cancel();
        self.state.play_state = PlayState::Finished;

        let now = self.clock.now();
        let duration_secs = self
            .state
            .started_at
            .map(|started| (now - started).num_milliseconds() as f64 / 1000.0)
            .unwrap_or(0.0);
        let summary = SessionSummary {
            wpm: self.state.settings.wpm,
            words_read: self.tokens.len(),
            duration_secs,
        };
        info!(
            "session finished: {} words at {} wpm in {:.1}s",
            summary.words_read, summary.wpm, summary.duration_secs
        );
        PacingEvent::SessionEnded(summary)
    }

    fn enter_playing(&mut self) {
        self.state.play_state = PlayState::Playing;
        self.arm_for_current();
    }

    fn arm_for_current(&mut self) {
        self.timer.cancel();
        let Some(token) = self.tokens.get(self.state.position) else {
            return;
        };
        let delay = delay_ms(&self.state.settings, token);
        self.timer.arm(self.clock.now(), delay);
        debug!("armed tick for {} in {delay:.1}ms", self.state.position);
    }

    fn last_index(&self) -> usize {
        self.tokens.len().saturating_sub(1)
    }
}
