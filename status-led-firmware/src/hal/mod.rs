// Hardware Abstraction Layer (HAL) Module
//
// Implementiert die Traits aus status-led-core für den ESP32-C6.

pub mod gpio_output;
pub mod timer_service;

pub use gpio_output::GpioOutputDriver;
pub use timer_service::{EmbassyTimerService, TIMER_SLOTS, TimerAction, TimerCommand, TimerSlot};
