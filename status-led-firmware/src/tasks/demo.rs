// Demo Task - führt alle Modi der Status-LED nacheinander vor
use defmt::{error, info};
use embassy_time::{Duration, Timer};
use status_led_core::LedError;

use crate::DefaultStatusLed;
use crate::config::{DEMO_PATTERN_MS, DEMO_STEP_MS};

async fn delay_ms(ms: u64) {
    Timer::after(Duration::from_millis(ms)).await;
}

/// Demo-Ablauf: manuell, blinken, blinken mit Timeout, Timeout ohne Blinken, toggeln
///
/// Bricht beim ersten Fehler ab und gibt ihn zurück.
pub async fn demo_sequence(led: &DefaultStatusLed) -> Result<(), LedError> {
    defmt::assert!(!led.is_active());

    info!("Manual");
    led.set_state(true)?;
    delay_ms(DEMO_STEP_MS).await;
    led.set_state(false)?;
    delay_ms(DEMO_STEP_MS).await;

    info!("Blinking");
    led.set_interval(200, true)?;
    delay_ms(DEMO_PATTERN_MS).await;
    led.set_interval(40, true)?;
    delay_ms(DEMO_PATTERN_MS).await;

    led.set_state(false)?;
    delay_ms(500).await;

    info!("Timeout");
    led.set_interval_for(200, true, 4000, true)?;
    // Absichtlich kürzer als der Timeout: der nächste Aufruf verwirft die Deadline
    delay_ms(200).await;

    led.set_interval_for(200, true, 1000, true)?;
    defmt::assert!(led.is_active());
    delay_ms(DEMO_PATTERN_MS).await;
    defmt::assert!(!led.is_active());

    led.set_interval_for(40, true, 1000, false)?;
    delay_ms(DEMO_PATTERN_MS).await;

    info!("Timeout without blinking");
    led.set_interval_for(0, true, 1000, false)?;
    defmt::assert!(led.is_active());
    delay_ms(DEMO_PATTERN_MS).await;
    defmt::assert!(!led.is_active());

    info!("Toggle");
    led.toggle_state()?; // aus -> an
    defmt::assert!(!led.is_active());
    delay_ms(DEMO_STEP_MS).await;
    led.toggle_state()?; // an -> aus
    defmt::assert!(!led.is_active());

    info!("Cleanup");
    led.destroy()
}

/// Demo Task - Embassy Task für die Default-LED
#[embassy_executor::task]
pub async fn demo_task(led: &'static DefaultStatusLed) {
    match demo_sequence(led).await {
        Ok(()) => info!("Demo finished"),
        Err(e) => error!("Demo failed: {}", e),
    }
}
