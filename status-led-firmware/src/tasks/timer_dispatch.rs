// Timer Dispatch Task - Ausführungskontext der Timer-Callbacks
use defmt::debug;
use embassy_futures::select::{Either, select};
use embassy_time::{Ticker, Timer};

use crate::DEFAULT_STATUS_LED;
use crate::config::TIMER_SLOT_COUNT;
use crate::hal::{TIMER_SLOTS, TimerAction, TimerCommand, TimerSlot};

/// Meldet einen Ablauf an das Device, dem der Timer gehört
///
/// Prüfung und Callback laufen in derselben Critical Section, damit ein
/// gleichzeitiges stop() den Callback sicher verhindert. Einziges Device der
/// Firmware ist die Default-LED; Timer eines anderen Owner-Pins werden verworfen.
fn dispatch_expiry(slot: &TimerSlot, generation: u32, periodic: bool) {
    critical_section::with(|_| {
        if !slot.claim_expiry(generation, periodic) {
            debug!("dropping stale timer expiry");
            return;
        }
        let id = slot.id();
        match DEFAULT_STATUS_LED.get() {
            Some(led) if led.pin() == id.owner => led.on_timer_expired(id),
            _ => debug!("no device for timer on pin {}", id.owner),
        }
    });
}

/// Führt ein Kommando aus, bis es abgelaufen ist oder ein neues Kommando kommt
///
/// Gibt das unterbrechende Kommando zurück.
async fn run_command(slot: &TimerSlot, command: TimerCommand) -> Option<TimerCommand> {
    match command.action {
        TimerAction::Stop => None,
        TimerAction::Once(delay) => match select(Timer::after(delay), slot.next_command()).await {
            Either::First(()) => {
                dispatch_expiry(slot, command.generation, false);
                None
            }
            Either::Second(next) => Some(next),
        },
        TimerAction::Periodic(period) => {
            let mut ticker = Ticker::every(period);
            loop {
                match select(ticker.next(), slot.next_command()).await {
                    Either::First(()) => dispatch_expiry(slot, command.generation, true),
                    Either::Second(next) => return Some(next),
                }
            }
        }
    }
}

/// Timer Dispatch Task - ein Task pro Timer-Slot
///
/// # Parameter
/// - `index`: Index in `TIMER_SLOTS`
#[embassy_executor::task(pool_size = TIMER_SLOT_COUNT)]
pub async fn timer_dispatch_task(index: usize) {
    let slot = &TIMER_SLOTS[index];
    let mut pending = None;

    loop {
        let command = match pending.take() {
            Some(command) => command,
            None => slot.next_command().await,
        };
        pending = run_command(slot, command).await;
    }
}
