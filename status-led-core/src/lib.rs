//! Status LED Core - Platform-agnostic State Machine and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! GPIO-Zugriff und Timer werden über Traits ([`OutputDriver`], [`TimerService`])
//! von außen bereitgestellt.

#![no_std]

// Muss zuerst kommen, damit die Logging-Makros in allen Modulen sichtbar sind
#[macro_use]
mod fmt;

pub mod default;
pub mod status_led;
pub mod timer;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use default::StatusLedCell;
pub use status_led::StatusLed;
pub use traits::{LedError, OutputDriver, TimerService};
pub use types::{Level, LedStatus, Pattern, Pin, TimerId, TimerKind};

pub use fugit::MicrosDurationU64;
