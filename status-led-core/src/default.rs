//! Default-Instanz: eine prozessweite Status-LED mit Initialize-Once Semantik
//!
//! Dünne Schicht über [`StatusLed::create`], gedacht für ein `static`:
//!
//! ```ignore
//! static DEFAULT_STATUS_LED: StatusLedCell<GpioOutputDriver, EmbassyTimerService> =
//!     StatusLedCell::new();
//!
//! let led = DEFAULT_STATUS_LED.init(Pin::new(8), Level::High, driver, timers)?;
//! led.set_state(true)?;
//! ```

use core::cell::Cell;

use critical_section::Mutex;
use static_cell::StaticCell;

use crate::status_led::StatusLed;
use crate::traits::{LedError, OutputDriver, TimerService};
use crate::types::{Level, Pin};

pub struct StatusLedCell<O: OutputDriver + 'static, S: TimerService + 'static> {
    storage: StaticCell<StatusLed<O, S>>,
    instance: Mutex<Cell<Option<&'static StatusLed<O, S>>>>,
}

impl<O: OutputDriver + 'static, S: TimerService + 'static> StatusLedCell<O, S> {
    pub const fn new() -> Self {
        Self {
            storage: StaticCell::new(),
            instance: Mutex::new(Cell::new(None)),
        }
    }

    /// Erstellt die Default-LED beim ersten Aufruf
    ///
    /// Spätere Aufrufe liefern die bestehende Instanz; `driver` und `timers`
    /// werden dann verworfen. Schlägt `create` fehl, bleibt die Zelle leer und
    /// ein weiterer Versuch ist möglich.
    pub fn init(
        &'static self,
        pin: Pin,
        on_level: Level,
        driver: O,
        timers: S,
    ) -> Result<&'static StatusLed<O, S>, LedError> {
        critical_section::with(|cs| {
            let instance = self.instance.borrow(cs);
            if let Some(led) = instance.get() {
                return Ok(led);
            }

            let led = StatusLed::create(pin, on_level, driver, timers)?;
            let led: &'static StatusLed<O, S> =
                self.storage.try_init(led).ok_or(LedError::OutOfMemory)?;
            instance.set(Some(led));
            Ok(led)
        })
    }

    pub fn get(&self) -> Option<&'static StatusLed<O, S>> {
        critical_section::with(|cs| self.instance.borrow(cs).get())
    }
}

impl<O: OutputDriver + 'static, S: TimerService + 'static> Default for StatusLedCell<O, S> {
    fn default() -> Self {
        Self::new()
    }
}
