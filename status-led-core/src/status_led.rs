//! Status-LED State Machine
//!
//! Ein [`StatusLed`] koordiniert zwei Timer (Blink + Deadline) gegen einen
//! gemeinsamen, veränderlichen Zustand:
//! - **Aufrufer-Kontext:** `set_*`, `toggle_state`, `destroy`
//! - **Timer-Kontext:** [`StatusLed::on_timer_expired`]
//!
//! Alle Mutationen laufen in `critical_section::with`, auch die komplette
//! Stop/Set/Rearm-Sequenz eines Übergangs. Nur `is_active` wird ohne
//! Critical Section aus einem `AtomicBool` gelesen.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};

use critical_section::Mutex;

use crate::timer::OwnedTimer;
use crate::traits::{LedError, OutputDriver, TimerService};
use crate::types::{Level, LedStatus, Pattern, Pin, TimerId, TimerKind};

/// Eine Status-LED an einem GPIO-Ausgang
///
/// # Beispiel
///
/// ```ignore
/// let led = StatusLed::create(Pin::new(8), Level::Low, driver, timers)?;
/// led.set_interval_for(200, true, 1000, false)?; // 1 s blinken, dann aus
/// ```
pub struct StatusLed<O: OutputDriver, S: TimerService> {
    pin: Pin,
    on_level: Level,
    /// Gecachter Liveness-Status, am Ende jedes Übergangs/Callbacks gesetzt
    active: AtomicBool,
    /// `None` nach `destroy()`
    inner: Mutex<RefCell<Option<Inner<O, S>>>>,
}

struct Inner<O, S: TimerService> {
    driver: O,
    timers: S,
    state: bool,
    final_state: bool,
    blink: OwnedTimer<S::Handle>,
    deadline: Option<OwnedTimer<S::Handle>>,
}

impl<O: OutputDriver, S: TimerService> Inner<O, S> {
    fn is_armed(&self) -> bool {
        self.blink.is_armed() || self.deadline.as_ref().is_some_and(OwnedTimer::is_armed)
    }

    fn drive(&mut self, pin: Pin, on_level: Level) -> Result<(), LedError> {
        let level = if self.state { on_level } else { !on_level };
        self.driver.set_level(pin, level)
    }

    fn apply(&mut self, pin: Pin, on_level: Level, pattern: Pattern) -> Result<(), LedError> {
        self.blink.stop(&mut self.timers)?;
        if let Some(deadline) = self.deadline.as_mut().filter(|timer| timer.is_armed()) {
            deadline.stop(&mut self.timers)?;
        }

        // Zustand immer vor dem Rearm schreiben
        self.state = pattern.initial_state;
        self.drive(pin, on_level)?;
        self.final_state = pattern.final_state;

        if let Some(delay) = pattern.deadline() {
            if self.deadline.is_none() {
                let id = TimerId::new(pin, TimerKind::Deadline);
                self.deadline = Some(OwnedTimer::create(&mut self.timers, id)?);
            }
            if let Some(deadline) = self.deadline.as_mut() {
                deadline.start_once(&mut self.timers, delay)?;
            }
        }

        if let Some(period) = pattern.blink_period() {
            self.blink.start_periodic(&mut self.timers, period)?;
        }

        Ok(())
    }

    fn on_blink(&mut self, pin: Pin, on_level: Level) {
        if !self.blink.is_armed() {
            debug!("stale blink expiry on pin {}", pin);
            return;
        }

        self.state = !self.state;
        if let Err(err) = self.drive(pin, on_level) {
            warn!("blink: failed to drive pin {}: {}", pin, err);
        }
    }

    fn on_deadline(&mut self, pin: Pin, on_level: Level) {
        match self.deadline.as_mut() {
            Some(deadline) if deadline.is_armed() => deadline.disarm(),
            _ => {
                debug!("stale deadline expiry on pin {}", pin);
                return;
            }
        }

        // Deadline gewinnt immer: Blinken beenden, auch wenn das Stoppen scheitert
        if let Err(err) = self.blink.stop(&mut self.timers) {
            warn!("deadline: failed to stop blink timer on pin {}: {}", pin, err);
            self.blink.disarm();
        }

        self.state = self.final_state;
        if let Err(err) = self.drive(pin, on_level) {
            warn!("deadline: failed to drive pin {}: {}", pin, err);
        }
    }
}

impl<O: OutputDriver, S: TimerService> StatusLed<O, S> {
    /// Erstellt ein Device: Pin als Ausgang, Off-Pegel setzen, Blink-Timer anlegen
    ///
    /// `on_level` ist der Pegel für "an"; "aus" ist immer das Komplement.
    ///
    /// # Fehlerbehandlung
    /// - `LedError::InvalidArgument` wenn der Pin kein Ausgang sein kann
    /// - sonst der erste Fehler von Driver oder Timer-Service; der Pin wird
    ///   vorher wieder freigegeben
    pub fn create(pin: Pin, on_level: Level, mut driver: O, mut timers: S) -> Result<Self, LedError> {
        if !driver.is_output_capable(pin) {
            return Err(LedError::InvalidArgument);
        }

        let blink = match Self::prepare(pin, on_level, &mut driver, &mut timers) {
            Ok(blink) => blink,
            Err(err) => {
                if let Err(release_err) = driver.release(pin) {
                    warn!("failed to release pin {}: {}", pin, release_err);
                }
                return Err(err);
            }
        };

        info!("initialized on pin {}", pin);

        Ok(Self {
            pin,
            on_level,
            active: AtomicBool::new(false),
            inner: Mutex::new(RefCell::new(Some(Inner {
                driver,
                timers,
                state: false,
                final_state: false,
                blink,
                deadline: None,
            }))),
        })
    }

    fn prepare(
        pin: Pin,
        on_level: Level,
        driver: &mut O,
        timers: &mut S,
    ) -> Result<OwnedTimer<S::Handle>, LedError> {
        driver.configure_as_output(pin)?;
        driver.set_level(pin, !on_level)?;
        OwnedTimer::create(timers, TimerId::new(pin, TimerKind::Blink))
    }

    pub fn pin(&self) -> Pin {
        self.pin
    }

    pub fn on_level(&self) -> Level {
        self.on_level
    }

    pub fn off_level(&self) -> Level {
        !self.on_level
    }

    /// Einheitlicher Übergang: alle anderen `set_*` bauen darauf auf
    ///
    /// - `interval_ms > 0`: blinken, ein voller Zyklus dauert `interval_ms`
    /// - `timeout_ms > 0`: nach `timeout_ms` Blinken beenden und `final_state` setzen
    /// - beides 0: statischer Zustand `initial_state`
    ///
    /// Der Ausgang zeigt bei Rückkehr immer `initial_state`. Laufende Timer
    /// (inkl. einer noch offenen Deadline) werden vorher gestoppt.
    pub fn set_interval_for(
        &self,
        interval_ms: u32,
        initial_state: bool,
        timeout_ms: u32,
        final_state: bool,
    ) -> Result<(), LedError> {
        self.set_pattern(Pattern::blink_for(
            interval_ms,
            initial_state,
            timeout_ms,
            final_state,
        ))
    }

    pub fn set_interval(&self, interval_ms: u32, initial_state: bool) -> Result<(), LedError> {
        self.set_pattern(Pattern::blink(interval_ms, initial_state))
    }

    pub fn set_state(&self, state: bool) -> Result<(), LedError> {
        self.set_pattern(Pattern::steady(state))
    }

    /// Invertiert den aktuellen logischen Zustand (statischer Übergang)
    pub fn toggle_state(&self) -> Result<(), LedError> {
        self.transition(|current| Pattern::steady(!current))
    }

    pub fn set_pattern(&self, pattern: Pattern) -> Result<(), LedError> {
        self.transition(|_| pattern)
    }

    fn transition(&self, make: impl FnOnce(bool) -> Pattern) -> Result<(), LedError> {
        let result = critical_section::with(|cs| {
            let mut slot = self.inner.borrow_ref_mut(cs);
            let Some(inner) = slot.as_mut() else {
                return Err(LedError::InvalidArgument);
            };

            let pattern = make(inner.state);
            let result = inner.apply(self.pin, self.on_level, pattern);
            self.active.store(inner.is_armed(), Ordering::Release);
            result.map(|()| pattern)
        });

        match result {
            Ok(pattern) => {
                info!(
                    "set interval {} ms on pin {} with state {}",
                    pattern.interval_ms,
                    self.pin,
                    if pattern.initial_state { "on" } else { "off" }
                );
                Ok(())
            }
            Err(err) => {
                warn!("transition on pin {} failed: {}", self.pin, err);
                Err(err)
            }
        }
    }

    /// Callback-Einstieg für den Dispatch-Kontext des Timer-Service
    ///
    /// Ignoriert werden Abläufe von Timern eines anderen Devices, eines nicht
    /// (mehr) gestarteten Timers und Abläufe nach `destroy()`.
    pub fn on_timer_expired(&self, id: TimerId) {
        if id.owner != self.pin {
            debug!("ignoring expiry for pin {} on pin {}", id.owner, self.pin);
            return;
        }

        critical_section::with(|cs| {
            let mut slot = self.inner.borrow_ref_mut(cs);
            let Some(inner) = slot.as_mut() else {
                return;
            };

            match id.kind {
                TimerKind::Blink => inner.on_blink(self.pin, self.on_level),
                TimerKind::Deadline => inner.on_deadline(self.pin, self.on_level),
            }
            self.active.store(inner.is_armed(), Ordering::Release);
        });
    }

    /// `true` solange Blink- oder Deadline-Timer läuft
    ///
    /// Liest nur den gecachten Wert (keine Critical Section), kann also mit
    /// einem gleichzeitig laufenden Übergang racen.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Aktueller logischer Zustand, `None` nach `destroy()`
    pub fn state(&self) -> Option<bool> {
        critical_section::with(|cs| self.inner.borrow_ref(cs).as_ref().map(|inner| inner.state))
    }

    pub fn status(&self) -> Option<LedStatus> {
        critical_section::with(|cs| {
            self.inner.borrow_ref(cs).as_ref().map(|inner| LedStatus {
                state: inner.state,
                active: inner.is_armed(),
                blinking: inner.blink.is_armed(),
                deadline_pending: inner.deadline.as_ref().is_some_and(OwnedTimer::is_armed),
            })
        })
    }

    /// Stoppt und löscht beide Timer und gibt den Pin frei
    ///
    /// Idempotent: ein zweiter Aufruf ist ein No-op und liefert `Ok(())`.
    /// Alle Freigaben werden durchgeführt; zurückgegeben wird der erste
    /// Fehler beim Löschen der Timer.
    pub fn destroy(&self) -> Result<(), LedError> {
        let taken = critical_section::with(|cs| {
            self.active.store(false, Ordering::Release);
            self.inner.borrow_ref_mut(cs).take()
        });
        let Some(inner) = taken else {
            return Ok(());
        };

        // Ab hier sehen späte Callbacks `None`; Timer-Service ohne Critical Section aufrufen
        let Inner {
            mut driver,
            mut timers,
            blink,
            deadline,
            ..
        } = inner;

        let mut result = blink.release(&mut timers);
        if let Some(deadline) = deadline {
            result = result.and(deadline.release(&mut timers));
        }

        if let Err(err) = driver.release(self.pin) {
            warn!("failed to release pin {}: {}", self.pin, err);
        }

        info!("deleted on pin {}", self.pin);
        result
    }
}

impl<O: OutputDriver, S: TimerService> Drop for StatusLed<O, S> {
    fn drop(&mut self) {
        if let Err(err) = self.destroy() {
            warn!("destroy on drop failed for pin {}: {}", self.pin, err);
        }
    }
}
