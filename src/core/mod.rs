//! Core utilities and common types for the quorum gate.

pub mod clock;
pub mod error;
pub mod telemetry;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use telemetry::init_tracing;
pub use types::*;
