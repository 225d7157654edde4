use ratatui::Frame;

use super::{ReaderWidget, ResultsWidget, ReviewWidget};
use crate::{Activity, App, AppState};

/// A UI Screen boundary: responsible for rendering the current app state
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Reader screen - the word display while playing, paused or inspecting context
pub struct ReadingScreen;

impl Screen for ReadingScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        if let Activity::Reading(view) = &app.activity {
            let widget = ReaderWidget {
                view,
                config: &app.config,
                status: app.status.as_deref(),
            };
            f.render_widget(widget, f.area());
        }
    }
}

/// Results screen - shown once a session ends
pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        if let Activity::Reading(view) = &app.activity {
            f.render_widget(ResultsWidget { view }, f.area());
        }
    }
}

pub struct ReviewScreen;

impl Screen for ReviewScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        if let Activity::Review(view) = &app.activity {
            let widget = ReviewWidget {
                view,
                status: app.status.as_deref(),
            };
            f.render_widget(widget, f.area());
        }
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Reading => Box::new(ReadingScreen),
        AppState::Results => Box::new(ResultsScreen),
        AppState::Review => Box::new(ReviewScreen),
    }
}
