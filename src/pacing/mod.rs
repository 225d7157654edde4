pub mod controller;
pub mod settings;
pub mod timer;
pub mod timing;

// Re-export the main types for convenience
pub use controller::{PacingController, PacingEvent, PacingState, PlayState};
pub use settings::{ReadingMode, ReadingSettings};
pub use timer::{AdvanceTimer, Clock, ManualClock, SystemClock};
pub use timing::delay_ms;
