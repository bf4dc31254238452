// GPIO Output Driver
//
// Implementiert den OutputDriver-Trait aus status-led-core mit esp-hal `Output`.
// Pins werden zur Laufzeit über ihre Nummer angesprochen.

use esp_hal::gpio::{AnyPin, Output, OutputConfig};
use status_led_core::{LedError, Level, OutputDriver, Pin};

use crate::config::{GPIO_COUNT, MAX_OUTPUT_GPIO};

/// Konvertiert den Core-Pegel in den esp-hal Pegel
fn to_hal_level(level: Level) -> esp_hal::gpio::Level {
    match level {
        Level::Low => esp_hal::gpio::Level::Low,
        Level::High => esp_hal::gpio::Level::High,
    }
}

/// esp-hal GPIO Driver
///
/// Hält pro konfiguriertem Pin einen `Output`. Freigeben droppt den `Output`,
/// damit ist der Pin wieder unkonfiguriert.
pub struct GpioOutputDriver {
    outputs: [Option<Output<'static>>; GPIO_COUNT],
}

impl GpioOutputDriver {
    pub fn new() -> Self {
        Self {
            outputs: [const { None }; GPIO_COUNT],
        }
    }

    fn output(&mut self, pin: Pin) -> Result<&mut Output<'static>, LedError> {
        self.outputs
            .get_mut(usize::from(pin.number()))
            .and_then(Option::as_mut)
            .ok_or(LedError::InvalidArgument)
    }
}

impl Default for GpioOutputDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputDriver for GpioOutputDriver {
    fn is_output_capable(&self, pin: Pin) -> bool {
        pin.number() <= MAX_OUTPUT_GPIO
    }

    fn configure_as_output(&mut self, pin: Pin) -> Result<(), LedError> {
        if !self.is_output_capable(pin) {
            return Err(LedError::InvalidArgument);
        }

        // SAFETY: Der Pin ist <= MAX_OUTPUT_GPIO (kein Flash-Pin) und wird nur
        // von diesem Driver benutzt; ein bereits konfigurierter Output wird
        // vorher gedroppt.
        let any_pin = unsafe { AnyPin::steal(pin.number()) };
        let slot = &mut self.outputs[usize::from(pin.number())];
        *slot = None;
        *slot = Some(Output::new(
            any_pin,
            esp_hal::gpio::Level::Low,
            OutputConfig::default(),
        ));
        Ok(())
    }

    fn set_level(&mut self, pin: Pin, level: Level) -> Result<(), LedError> {
        self.output(pin)?.set_level(to_hal_level(level));
        Ok(())
    }

    fn release(&mut self, pin: Pin) -> Result<(), LedError> {
        match self.outputs.get_mut(usize::from(pin.number())) {
            Some(slot) => {
                *slot = None;
                Ok(())
            }
            None => Err(LedError::InvalidArgument),
        }
    }
}
