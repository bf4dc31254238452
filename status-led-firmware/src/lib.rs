// Library-Root: Hardware-Anbindung und Default-Instanz der Status-LED
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von status-led-core
pub use status_led_core::{
    LedError, Level, Pattern, Pin, StatusLed, StatusLedCell, TimerId, TimerKind,
};

use crate::config::{STATUS_LED_DEFAULT_GPIO, STATUS_LED_DEFAULT_LEVEL};
use crate::hal::{EmbassyTimerService, GpioOutputDriver};

// ============================================================================
// Default Status-LED
// ============================================================================

/// Status-LED mit esp-hal GPIO und embassy Timern
pub type DefaultStatusLed = StatusLed<GpioOutputDriver, EmbassyTimerService>;

/// Prozessweite Default-LED
///
/// Die Timer-Dispatch-Tasks melden alle Abläufe an diese Instanz.
pub static DEFAULT_STATUS_LED: StatusLedCell<GpioOutputDriver, EmbassyTimerService> =
    StatusLedCell::new();

/// Erstellt die Default-LED auf dem konfigurierten Pin (Initialize-Once)
///
/// Weitere Aufrufe liefern dieselbe Instanz.
pub fn create_default() -> Result<&'static DefaultStatusLed, LedError> {
    DEFAULT_STATUS_LED.init(
        Pin::new(STATUS_LED_DEFAULT_GPIO),
        STATUS_LED_DEFAULT_LEVEL,
        GpioOutputDriver::new(),
        EmbassyTimerService::new(),
    )
}
