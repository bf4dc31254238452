//! Core Types für die Status-LED
//!
//! Datenstrukturen ohne Hardware-Dependencies

use core::ops::Not;

use fugit::MicrosDurationU64;

/// GPIO-Nummer des Ausgangs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin(u8);

impl Pin {
    pub const fn new(number: u8) -> Self {
        Self(number)
    }

    pub const fn number(self) -> u8 {
        self.0
    }
}

impl From<u8> for Pin {
    fn from(number: u8) -> Self {
        Self(number)
    }
}

/// Physikalischer Pegel am Ausgang
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// Pegel aus einem Bit (0 = Low, 1 = High), andere Werte sind ungültig
    pub const fn from_bit(bit: u8) -> Option<Self> {
        match bit {
            0 => Some(Level::Low),
            1 => Some(Level::High),
            _ => None,
        }
    }

    pub const fn as_bit(self) -> u8 {
        match self {
            Level::Low => 0,
            Level::High => 1,
        }
    }
}

impl Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

/// Welcher der beiden internen Timer abgelaufen ist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerKind {
    /// Periodischer Timer, invertiert den logischen Zustand
    Blink,
    /// One-Shot Timer, setzt den Endzustand und beendet das Blinken
    Deadline,
}

/// Kontext eines Timers: besitzendes Device (über seinen Pin) und Kind
///
/// Der Timer-Service bekommt ihn bei `create_timer` und liefert ihn beim
/// Ablauf unverändert an [`StatusLed::on_timer_expired`] zurück.
///
/// [`StatusLed::on_timer_expired`]: crate::StatusLed::on_timer_expired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerId {
    pub owner: Pin,
    pub kind: TimerKind,
}

impl TimerId {
    pub const fn new(owner: Pin, kind: TimerKind) -> Self {
        Self { owner, kind }
    }
}

/// Ein Übergangs-Request: Blink-Intervall, Startzustand, Timeout und Endzustand
///
/// `interval_ms == 0` bedeutet kein Blinken, `timeout_ms == 0` keine Deadline.
///
/// # Beispiele
///
/// ```
/// # use status_led_core::Pattern;
/// let pattern = Pattern::blink_for(200, true, 1000, false);
/// assert!(!pattern.is_static());
/// assert!(Pattern::steady(true).is_static());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pattern {
    pub interval_ms: u32,
    pub initial_state: bool,
    pub timeout_ms: u32,
    pub final_state: bool,
}

impl Pattern {
    /// Statischer Zustand ohne Timer
    pub const fn steady(state: bool) -> Self {
        Self::blink_for(0, state, 0, state)
    }

    /// Endloses Blinken, ein voller An/Aus-Zyklus dauert `interval_ms`
    pub const fn blink(interval_ms: u32, initial_state: bool) -> Self {
        Self::blink_for(interval_ms, initial_state, 0, initial_state)
    }

    pub const fn blink_for(
        interval_ms: u32,
        initial_state: bool,
        timeout_ms: u32,
        final_state: bool,
    ) -> Self {
        Self {
            interval_ms,
            initial_state,
            timeout_ms,
            final_state,
        }
    }

    /// Weder Blinken noch Deadline
    pub const fn is_static(&self) -> bool {
        self.interval_ms == 0 && self.timeout_ms == 0
    }

    /// Periode des Blink-Timers: halbes Intervall, da pro Zyklus einmal an und einmal aus
    pub fn blink_period(&self) -> Option<MicrosDurationU64> {
        (self.interval_ms > 0)
            .then(|| MicrosDurationU64::micros(u64::from(self.interval_ms) * 1000 / 2))
    }

    pub fn deadline(&self) -> Option<MicrosDurationU64> {
        (self.timeout_ms > 0).then(|| MicrosDurationU64::millis(u64::from(self.timeout_ms)))
    }
}

/// Momentaufnahme des Device-Zustands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedStatus {
    /// Logischer Zustand (an/aus), unabhängig von der Polarität
    pub state: bool,
    pub active: bool,
    pub blinking: bool,
    pub deadline_pending: bool,
}
