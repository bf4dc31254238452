//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für GPIO- und Timer-Zugriff
//! ohne konkrete Implementierung.

use core::fmt;

use fugit::MicrosDurationU64;

use crate::types::{Level, Pin, TimerId};

/// Fehler-Typ für Status-LED Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    /// Ungültiger Pin oder bereits gelöschtes Device
    InvalidArgument,
    /// Kein Speicher/Timer-Slot mehr frei
    OutOfMemory,
    /// GPIO oder Timer-Service meldet einen Hardware-Fehler
    HardwareFault,
    /// Timer lief nicht (beim Stoppen kein echter Fehler)
    NotRunning,
}

impl fmt::Display for LedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LedError::InvalidArgument => "invalid argument",
            LedError::OutOfMemory => "out of memory",
            LedError::HardwareFault => "hardware fault",
            LedError::NotRunning => "timer not running",
        })
    }
}

/// Trait für GPIO-Ausgänge
///
/// # Implementierungen
/// - **Production:** GpioOutputDriver (esp-hal `Output`)
/// - **Testing:** MockOutputDriver (in-memory Mock)
pub trait OutputDriver: Send {
    /// Prüft ob der Pin als Ausgang benutzt werden darf
    fn is_output_capable(&self, pin: Pin) -> bool;

    /// Konfiguriert den Pin als Ausgang
    fn configure_as_output(&mut self, pin: Pin) -> Result<(), LedError>;

    /// Setzt den physikalischen Pegel
    fn set_level(&mut self, pin: Pin, level: Level) -> Result<(), LedError>;

    /// Gibt den Pin frei (zurück in den unkonfigurierten Zustand)
    fn release(&mut self, pin: Pin) -> Result<(), LedError>;
}

/// Trait für den Timer-Service
///
/// Ein Timer wird mit einer [`TimerId`] (besitzendes Device + Kind) angelegt.
/// Läuft er ab, ruft der Dispatch-Kontext des Service
/// [`StatusLed::on_timer_expired`] mit genau dieser Id auf. Teilen sich mehrere
/// Devices einen Service, muss der Service anhand von `TimerId::owner` an das
/// richtige Device zustellen.
///
/// Der Callback darf nie synchron aus `start_*`/`stop`/`delete` heraus
/// erfolgen, nur aus dem eigenen Dispatch-Kontext.
///
/// `stop()` auf einem Timer der nicht läuft liefert
/// `Err(LedError::NotRunning)`; der Aufrufer behandelt das als Erfolg.
///
/// [`StatusLed::on_timer_expired`]: crate::StatusLed::on_timer_expired
pub trait TimerService: Send {
    /// Handle auf einen angelegten Timer
    type Handle: Copy + Send;

    fn create_timer(&mut self, id: TimerId) -> Result<Self::Handle, LedError>;

    /// Startet den Timer periodisch, der erste Ablauf erfolgt nach `period`
    fn start_periodic(
        &mut self,
        timer: Self::Handle,
        period: MicrosDurationU64,
    ) -> Result<(), LedError>;

    /// Startet den Timer einmalig
    fn start_once(&mut self, timer: Self::Handle, delay: MicrosDurationU64)
    -> Result<(), LedError>;

    fn stop(&mut self, timer: Self::Handle) -> Result<(), LedError>;

    /// Löscht den Timer; danach kein weiterer Callback
    fn delete(&mut self, timer: Self::Handle) -> Result<(), LedError>;
}
