//! Gemeinsame Mocks für die Integration Tests
//!
//! - `MockOutputDriver`: zeichnet Konfiguration und Pegel pro Pin auf
//! - `SimTimerService`: Timer-Service mit virtueller Uhr; `advance()` spielt
//!   die Abläufe in zeitlicher Reihenfolge gegen ein oder mehrere `StatusLed`
//!   ab, zugestellt anhand von `TimerId::owner`

#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use status_led_core::{
    LedError, Level, MicrosDurationU64, OutputDriver, Pin, StatusLed, TimerId, TimerService,
};

/// Höchster Pin der als Ausgang gilt (wie ESP32-C6 ohne Flash-Pins)
pub const MAX_OUTPUT_PIN: u8 = 23;

// ============================================================================
// Mock Output Driver
// ============================================================================

#[derive(Default)]
pub struct OutputLog {
    pub configured: Vec<Pin>,
    pub released: Vec<Pin>,
    pub writes: Vec<(Pin, Level)>,
    pub fail_configure: bool,
    pub fail_next_set_level: bool,
    pub fail_release: bool,
}

#[derive(Clone, Default)]
pub struct MockOutputDriver {
    log: Arc<Mutex<OutputLog>>,
}

impl MockOutputDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> MutexGuard<'_, OutputLog> {
        self.log.lock().unwrap()
    }

    /// Zuletzt geschriebener Pegel auf `pin`
    pub fn level(&self, pin: Pin) -> Option<Level> {
        self.log()
            .writes
            .iter()
            .rev()
            .find(|(p, _)| *p == pin)
            .map(|(_, level)| *level)
    }

    pub fn write_count(&self) -> usize {
        self.log().writes.len()
    }

    /// Alle Pegel die ab Index `from` geschrieben wurden
    pub fn writes_since(&self, from: usize) -> Vec<Level> {
        self.log().writes[from..]
            .iter()
            .map(|(_, level)| *level)
            .collect()
    }
}

impl OutputDriver for MockOutputDriver {
    fn is_output_capable(&self, pin: Pin) -> bool {
        pin.number() <= MAX_OUTPUT_PIN
    }

    fn configure_as_output(&mut self, pin: Pin) -> Result<(), LedError> {
        let mut log = self.log();
        if log.fail_configure {
            return Err(LedError::HardwareFault);
        }
        log.configured.push(pin);
        Ok(())
    }

    fn set_level(&mut self, pin: Pin, level: Level) -> Result<(), LedError> {
        let mut log = self.log();
        if log.fail_next_set_level {
            log.fail_next_set_level = false;
            return Err(LedError::HardwareFault);
        }
        log.writes.push((pin, level));
        Ok(())
    }

    fn release(&mut self, pin: Pin) -> Result<(), LedError> {
        let mut log = self.log();
        log.released.push(pin);
        if log.fail_release {
            return Err(LedError::HardwareFault);
        }
        Ok(())
    }
}

// ============================================================================
// Simulierter Timer Service (virtuelle Uhr in Mikrosekunden)
// ============================================================================

struct SimTimer {
    id: TimerId,
    deleted: bool,
    due_us: Option<u64>,
    period_us: Option<u64>,
}

#[derive(Default)]
pub struct SimClock {
    pub now_us: u64,
    timers: Vec<SimTimer>,
    pub fail_create: bool,
    pub fail_start: bool,
    pub fail_stop: bool,
    pub fail_delete: bool,
}

impl SimClock {
    fn timer(&mut self, handle: usize) -> Result<&mut SimTimer, LedError> {
        match self.timers.get_mut(handle) {
            Some(timer) if !timer.deleted => Ok(timer),
            _ => Err(LedError::InvalidArgument),
        }
    }

    fn start(&mut self, handle: usize, delay_us: u64, periodic: bool) -> Result<(), LedError> {
        if self.fail_start {
            return Err(LedError::HardwareFault);
        }
        let now = self.now_us;
        let timer = self.timer(handle)?;
        timer.due_us = Some(now + delay_us);
        timer.period_us = periodic.then_some(delay_us);
        Ok(())
    }

    /// Nächster fälliger Timer bis `until_us`; Uhr springt auf dessen Zeitpunkt
    fn pop_expired(&mut self, until_us: u64) -> Option<TimerId> {
        let (index, due) = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| !timer.deleted)
            .filter_map(|(index, timer)| timer.due_us.map(|due| (index, due)))
            .filter(|(_, due)| *due <= until_us)
            .min_by_key(|(index, due)| (*due, *index))?;

        self.now_us = due;
        let timer = &mut self.timers[index];
        timer.due_us = timer.period_us.map(|period| due + period);
        Some(timer.id)
    }
}

#[derive(Clone, Default)]
pub struct SimTimerService {
    clock: Arc<Mutex<SimClock>>,
}

impl SimTimerService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clock(&self) -> MutexGuard<'_, SimClock> {
        self.clock.lock().unwrap()
    }

    pub fn now_ms(&self) -> u64 {
        self.clock().now_us / 1000
    }

    /// Anzahl jemals angelegter Timer
    pub fn created(&self) -> usize {
        self.clock().timers.len()
    }

    /// Angelegte und noch nicht gelöschte Timer
    pub fn live(&self) -> usize {
        self.clock().timers.iter().filter(|t| !t.deleted).count()
    }

    /// Laufende Timer
    pub fn armed(&self) -> usize {
        self.clock()
            .timers
            .iter()
            .filter(|t| !t.deleted && t.due_us.is_some())
            .count()
    }

    /// Lässt `ms` Millisekunden vergehen und liefert alle Abläufe an `led`
    pub fn advance<O: OutputDriver>(&self, led: &StatusLed<O, SimTimerService>, ms: u64) {
        self.advance_all(&[led], ms);
    }

    /// Wie `advance()`, aber für mehrere Devices an einem gemeinsamen Service
    ///
    /// Jeder Ablauf geht nur an das Device, dessen Pin `TimerId::owner` ist.
    /// Der Lock auf die Uhr wird vor jedem Callback freigegeben, da der
    /// Callback selbst wieder Timer stoppt.
    pub fn advance_all<O: OutputDriver>(&self, leds: &[&StatusLed<O, SimTimerService>], ms: u64) {
        let until_us = self.clock().now_us + ms * 1000;
        loop {
            let expired = self.clock().pop_expired(until_us);
            let Some(id) = expired else {
                break;
            };
            if let Some(led) = leds.iter().find(|led| led.pin() == id.owner) {
                led.on_timer_expired(id);
            }
        }
        self.clock().now_us = until_us;
    }
}

impl TimerService for SimTimerService {
    type Handle = usize;

    fn create_timer(&mut self, id: TimerId) -> Result<usize, LedError> {
        let mut clock = self.clock();
        if clock.fail_create {
            return Err(LedError::OutOfMemory);
        }
        clock.timers.push(SimTimer {
            id,
            deleted: false,
            due_us: None,
            period_us: None,
        });
        Ok(clock.timers.len() - 1)
    }

    fn start_periodic(&mut self, timer: usize, period: MicrosDurationU64) -> Result<(), LedError> {
        self.clock().start(timer, period.ticks(), true)
    }

    fn start_once(&mut self, timer: usize, delay: MicrosDurationU64) -> Result<(), LedError> {
        self.clock().start(timer, delay.ticks(), false)
    }

    fn stop(&mut self, timer: usize) -> Result<(), LedError> {
        let mut clock = self.clock();
        if clock.fail_stop {
            return Err(LedError::HardwareFault);
        }
        let timer = clock.timer(timer)?;
        match timer.due_us.take() {
            Some(_) => Ok(()),
            None => Err(LedError::NotRunning),
        }
    }

    fn delete(&mut self, timer: usize) -> Result<(), LedError> {
        let mut clock = self.clock();
        if clock.fail_delete {
            return Err(LedError::HardwareFault);
        }
        let timer = clock.timer(timer)?;
        timer.deleted = true;
        timer.due_us = None;
        Ok(())
    }
}

// ============================================================================
// Helper
// ============================================================================

pub const LED_PIN: Pin = Pin::new(8);

pub type TestLed = StatusLed<MockOutputDriver, SimTimerService>;

/// Active-High LED auf `LED_PIN`
pub fn setup() -> (TestLed, MockOutputDriver, SimTimerService) {
    setup_with(LED_PIN, Level::High)
}

pub fn setup_with(pin: Pin, on_level: Level) -> (TestLed, MockOutputDriver, SimTimerService) {
    let driver = MockOutputDriver::new();
    let timers = SimTimerService::new();
    let led = StatusLed::create(pin, on_level, driver.clone(), timers.clone()).unwrap();
    (led, driver, timers)
}
