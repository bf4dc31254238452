// Timer Service auf Basis von embassy-time
//
// Jeder Timer ist ein statischer Slot, den ein eigener Dispatch-Task
// (tasks::timer_dispatch) bedient. Kommandos laufen über ein Signal,
// ein Generation-Counter verwirft Abläufe die gegen stop()/restart verloren haben.
// Jeder Slot merkt sich die TimerId (Owner-Pin + Kind) aus create_timer().

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Duration;
use fugit::MicrosDurationU64;
use status_led_core::{LedError, Pin, TimerId, TimerKind, TimerService};

use crate::config::TIMER_SLOT_COUNT;

/// Was der Dispatch-Task tun soll
#[derive(Clone, Copy)]
pub enum TimerAction {
    Periodic(Duration),
    Once(Duration),
    Stop,
}

/// Kommando an einen Dispatch-Task, mit Generation des Slots zum Sendezeitpunkt
#[derive(Clone, Copy)]
pub struct TimerCommand {
    pub action: TimerAction,
    pub generation: u32,
}

/// Ein Timer-Slot
pub struct TimerSlot {
    allocated: AtomicBool,
    running: AtomicBool,
    owner: AtomicU8,
    kind: AtomicU8,
    generation: AtomicU32,
    command: Signal<CriticalSectionRawMutex, TimerCommand>,
}

impl TimerSlot {
    const fn new() -> Self {
        Self {
            allocated: AtomicBool::new(false),
            running: AtomicBool::new(false),
            owner: AtomicU8::new(0),
            kind: AtomicU8::new(0),
            generation: AtomicU32::new(0),
            command: Signal::new(),
        }
    }

    /// Die bei `create_timer` übergebene Id
    pub fn id(&self) -> TimerId {
        let kind = match self.kind.load(Ordering::Relaxed) {
            0 => TimerKind::Blink,
            _ => TimerKind::Deadline,
        };
        TimerId::new(Pin::new(self.owner.load(Ordering::Relaxed)), kind)
    }

    /// Wartet auf das nächste Kommando
    pub async fn next_command(&self) -> TimerCommand {
        self.command.wait().await
    }

    /// Prüft ob ein Ablauf noch gültig ist; One-Shot Timer gelten danach als gestoppt
    ///
    /// Muss innerhalb einer Critical Section aufgerufen werden.
    pub fn claim_expiry(&self, generation: u32, periodic: bool) -> bool {
        if self.generation.load(Ordering::Acquire) != generation
            || !self.running.load(Ordering::Acquire)
        {
            return false;
        }
        if !periodic {
            self.running.store(false, Ordering::Release);
        }
        true
    }

    fn send(&self, action: TimerAction) {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel).wrapping_add(1);
        self.command.signal(TimerCommand { action, generation });
    }
}

/// Alle Timer-Slots der Firmware
pub static TIMER_SLOTS: [TimerSlot; TIMER_SLOT_COUNT] = [const { TimerSlot::new() }; TIMER_SLOT_COUNT];

fn to_embassy(duration: MicrosDurationU64) -> Duration {
    Duration::from_micros(duration.ticks())
}

/// TimerService-Implementierung über die statischen Slots
///
/// Nur `create_default()` legt einen Service an: die Dispatch-Tasks stellen
/// an die Default-LED zu, und deren zwei Timer belegen alle Slots.
pub struct EmbassyTimerService {
    _private: (),
}

impl EmbassyTimerService {
    pub(crate) fn new() -> Self {
        Self { _private: () }
    }

    fn slot(&self, timer: usize) -> Result<&'static TimerSlot, LedError> {
        match TIMER_SLOTS.get(timer) {
            Some(slot) if slot.allocated.load(Ordering::Acquire) => Ok(slot),
            _ => Err(LedError::InvalidArgument),
        }
    }

    fn start(&mut self, timer: usize, action: TimerAction) -> Result<(), LedError> {
        let slot = self.slot(timer)?;
        critical_section::with(|_| {
            slot.running.store(true, Ordering::Release);
            slot.send(action);
        });
        Ok(())
    }
}

impl TimerService for EmbassyTimerService {
    type Handle = usize;

    fn create_timer(&mut self, id: TimerId) -> Result<usize, LedError> {
        let index = TIMER_SLOTS
            .iter()
            .position(|slot| {
                slot.allocated
                    .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok()
            })
            .ok_or(LedError::OutOfMemory)?;

        let slot = &TIMER_SLOTS[index];
        let kind = match id.kind {
            TimerKind::Blink => 0,
            TimerKind::Deadline => 1,
        };
        slot.owner.store(id.owner.number(), Ordering::Relaxed);
        slot.kind.store(kind, Ordering::Relaxed);
        slot.running.store(false, Ordering::Release);
        Ok(index)
    }

    fn start_periodic(&mut self, timer: usize, period: MicrosDurationU64) -> Result<(), LedError> {
        self.start(timer, TimerAction::Periodic(to_embassy(period)))
    }

    fn start_once(&mut self, timer: usize, delay: MicrosDurationU64) -> Result<(), LedError> {
        self.start(timer, TimerAction::Once(to_embassy(delay)))
    }

    fn stop(&mut self, timer: usize) -> Result<(), LedError> {
        let slot = self.slot(timer)?;
        critical_section::with(|_| {
            // Generation immer erhöhen, damit auch ein bereits laufender Ablauf verfällt
            slot.send(TimerAction::Stop);
            if slot.running.swap(false, Ordering::AcqRel) {
                Ok(())
            } else {
                Err(LedError::NotRunning)
            }
        })
    }

    fn delete(&mut self, timer: usize) -> Result<(), LedError> {
        match self.stop(timer) {
            Ok(()) | Err(LedError::NotRunning) => {}
            Err(err) => return Err(err),
        }
        TIMER_SLOTS[timer].allocated.store(false, Ordering::Release);
        Ok(())
    }
}
