//! Timer-Lebenszyklus
//!
//! [`OwnedTimer`] kapselt ein Handle des [`TimerService`] zusammen mit dem
//! Armed-Status, den die State Machine für `is_active` braucht.

use fugit::MicrosDurationU64;

use crate::traits::{LedError, TimerService};
use crate::types::TimerId;

/// Ein vom Device besessener Timer
#[derive(Debug)]
pub struct OwnedTimer<H> {
    handle: H,
    armed: bool,
}

impl<H: Copy> OwnedTimer<H> {
    /// Legt einen neuen (gestoppten) Timer beim Service an
    pub fn create<S>(timers: &mut S, id: TimerId) -> Result<Self, LedError>
    where
        S: TimerService<Handle = H>,
    {
        let handle = timers.create_timer(id)?;
        Ok(Self {
            handle,
            armed: false,
        })
    }

    pub fn handle(&self) -> H {
        self.handle
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn start_periodic<S>(
        &mut self,
        timers: &mut S,
        period: MicrosDurationU64,
    ) -> Result<(), LedError>
    where
        S: TimerService<Handle = H>,
    {
        timers.start_periodic(self.handle, period)?;
        self.armed = true;
        Ok(())
    }

    pub fn start_once<S>(&mut self, timers: &mut S, delay: MicrosDurationU64) -> Result<(), LedError>
    where
        S: TimerService<Handle = H>,
    {
        timers.start_once(self.handle, delay)?;
        self.armed = true;
        Ok(())
    }

    /// Stoppt den Timer; `NotRunning` zählt als Erfolg
    ///
    /// Bei einem echten Fehler bleibt der Armed-Status unverändert.
    pub fn stop<S>(&mut self, timers: &mut S) -> Result<(), LedError>
    where
        S: TimerService<Handle = H>,
    {
        match timers.stop(self.handle) {
            Ok(()) | Err(LedError::NotRunning) => {
                self.armed = false;
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Markiert den Timer als abgelaufen, ohne den Service zu fragen
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Stoppt (best effort) und löscht den Timer
    pub fn release<S>(mut self, timers: &mut S) -> Result<(), LedError>
    where
        S: TimerService<Handle = H>,
    {
        if let Err(err) = self.stop(timers) {
            warn!("stopping timer before delete failed: {}", err);
        }
        timers.delete(self.handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Pin, TimerKind};

    const BLINK: TimerId = TimerId::new(Pin::new(8), TimerKind::Blink);
    const DEADLINE: TimerId = TimerId::new(Pin::new(8), TimerKind::Deadline);

    /// Minimaler Service: ein einziger Timer, Fehler per Flag
    #[derive(Default)]
    struct SingleTimer {
        running: bool,
        deleted: bool,
        fail_stop: bool,
        fail_delete: bool,
        stop_calls: usize,
    }

    impl TimerService for SingleTimer {
        type Handle = u8;

        fn create_timer(&mut self, _id: TimerId) -> Result<u8, LedError> {
            Ok(0)
        }

        fn start_periodic(&mut self, _: u8, _: MicrosDurationU64) -> Result<(), LedError> {
            self.running = true;
            Ok(())
        }

        fn start_once(&mut self, _: u8, _: MicrosDurationU64) -> Result<(), LedError> {
            self.running = true;
            Ok(())
        }

        fn stop(&mut self, _: u8) -> Result<(), LedError> {
            self.stop_calls += 1;
            if self.fail_stop {
                return Err(LedError::HardwareFault);
            }
            if !self.running {
                return Err(LedError::NotRunning);
            }
            self.running = false;
            Ok(())
        }

        fn delete(&mut self, _: u8) -> Result<(), LedError> {
            if self.fail_delete {
                return Err(LedError::HardwareFault);
            }
            self.deleted = true;
            Ok(())
        }
    }

    #[test]
    fn test_new_timer_is_not_armed() {
        let mut service = SingleTimer::default();
        let timer = OwnedTimer::create(&mut service, BLINK).unwrap();
        assert!(!timer.is_armed());
        assert_eq!(timer.handle(), 0);
    }

    #[test]
    fn test_start_arms_and_stop_disarms() {
        let mut service = SingleTimer::default();
        let mut timer = OwnedTimer::create(&mut service, BLINK).unwrap();

        timer
            .start_periodic(&mut service, MicrosDurationU64::millis(100))
            .unwrap();
        assert!(timer.is_armed());
        assert!(service.running);

        timer.stop(&mut service).unwrap();
        assert!(!timer.is_armed());
        assert!(!service.running);
    }

    #[test]
    fn test_stop_idle_timer_is_ok() {
        let mut service = SingleTimer::default();
        let mut timer = OwnedTimer::create(&mut service, DEADLINE).unwrap();

        assert_eq!(timer.stop(&mut service), Ok(()));
        assert_eq!(timer.stop(&mut service), Ok(()));
        assert_eq!(service.stop_calls, 2);
    }

    #[test]
    fn test_stop_hardware_fault_is_propagated() {
        let mut service = SingleTimer::default();
        let mut timer = OwnedTimer::create(&mut service, DEADLINE).unwrap();
        timer
            .start_once(&mut service, MicrosDurationU64::millis(5))
            .unwrap();

        service.fail_stop = true;
        assert_eq!(timer.stop(&mut service), Err(LedError::HardwareFault));
        assert!(timer.is_armed());
    }

    #[test]
    fn test_release_ignores_stop_failure() {
        let mut service = SingleTimer::default();
        let timer = OwnedTimer::create(&mut service, BLINK).unwrap();
        service.fail_stop = true;

        assert_eq!(timer.release(&mut service), Ok(()));
        assert!(service.deleted);
    }

    #[test]
    fn test_release_propagates_delete_failure() {
        let mut service = SingleTimer::default();
        let timer = OwnedTimer::create(&mut service, BLINK).unwrap();
        service.fail_delete = true;

        assert_eq!(timer.release(&mut service), Err(LedError::HardwareFault));
    }
}
