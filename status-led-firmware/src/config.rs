// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
#![allow(dead_code)]

use status_led_core::Level;

// ============================================================================
// Default Status-LED
// ============================================================================

/// GPIO-Pin der Default Status-LED
/// Wird zur Build-Zeit aus der Environment Variable STATUS_LED_DEFAULT_GPIO geladen
/// (build.rs setzt 8 als Default, siehe .env.example)
pub const STATUS_LED_DEFAULT_GPIO: u8 = parse_u8(env!("STATUS_LED_DEFAULT_GPIO"));

/// Pegel für "an" (1 = Active-High, 0 = Active-Low)
/// Wird zur Build-Zeit aus der Environment Variable STATUS_LED_DEFAULT_ON geladen
pub const STATUS_LED_DEFAULT_ON: u8 = parse_u8(env!("STATUS_LED_DEFAULT_ON"));

/// Pegel für "an" als `Level`; Werte außer 0 und 1 brechen den Build ab
pub const STATUS_LED_DEFAULT_LEVEL: Level = match Level::from_bit(STATUS_LED_DEFAULT_ON) {
    Some(level) => level,
    None => panic!("STATUS_LED_DEFAULT_ON muss 0 oder 1 sein"),
};

/// Anzahl GPIOs auf dem ESP32-C6 (GPIO0 - GPIO30)
pub const GPIO_COUNT: usize = 31;

/// Höchster frei nutzbarer Ausgangs-Pin
/// GPIO24 - GPIO30 hängen am SPI-Flash
pub const MAX_OUTPUT_GPIO: u8 = 23;

// ============================================================================
// Timer Konfiguration
// ============================================================================

/// Anzahl Timer-Slots (je ein Dispatch-Task)
/// Eine LED braucht 2: Blink + Deadline
pub const TIMER_SLOT_COUNT: usize = 2;

// ============================================================================
// Demo Konfiguration
// ============================================================================

/// Wartezeit zwischen manuellen Zuständen in Millisekunden
pub const DEMO_STEP_MS: u64 = 1000;

/// Beobachtungszeit pro Blink-Muster in Millisekunden
pub const DEMO_PATTERN_MS: u64 = 2000;

/// Compile-Time Parser für numerische Environment Variablen
const fn parse_u8(value: &str) -> u8 {
    let bytes = value.as_bytes();
    assert!(!bytes.is_empty(), "leere Zahl in Environment Variable");

    let mut result: u8 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i];
        assert!(digit.is_ascii_digit(), "keine Zahl in Environment Variable");
        result = result * 10 + (digit - b'0');
        i += 1;
    }
    result
}
