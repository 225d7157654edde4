// Library surface for the reader binary, headless hosts and integration tests.
// Terminal rendering stays in the binary.
pub mod app_dirs;
pub mod config;
pub mod emphasis;
pub mod error;
pub mod library;
pub mod orp;
pub mod pacing;
pub mod retention;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod time_series;
pub mod tokenizer;
pub mod util;

pub use error::{GlanceError, Result};
