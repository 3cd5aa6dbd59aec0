//! Deferred work, modeled as a priority queue of `(fire_at_tick, payload)`
//! drained by the tick loop (§9 Design Notes). Each `TimerId` is a
//! cancellable handle; a component dropping/cancelling its handle is the
//! only way a scheduled timer stops firing — this is the fix for the
//! "timer leak" contract in §7.
//!
//! Time is tracked in ticks, not wall-clock, so that tests can drive the
//! scheduler deterministically via explicit `advance_tick()` calls instead
//! of real sleeps.

use crate::constants::TICK_DT_S;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

struct Timer<T> {
    id: TimerId,
    fire_at_tick: u64,
    payload: T,
}

pub struct Scheduler<T> {
    next_id: u64,
    current_tick: u64,
    pending: Vec<Timer<T>>,
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Scheduler<T> {
        Scheduler {
            next_id: 0,
            current_tick: 0,
            pending: Vec::new(),
        }
    }

    fn ms_to_ticks(delay_ms: u64) -> u64 {
        let ticks = (delay_ms as f64 / 1000.0) / TICK_DT_S;
        ticks.ceil().max(1.0) as u64
    }

    pub fn schedule_after_ms(&mut self, delay_ms: u64, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Timer {
            id,
            fire_at_tick: self.current_tick + Self::ms_to_ticks(delay_ms),
            payload,
        });
        id
    }

    pub fn cancel(&mut self, id: TimerId) {
        self.pending.retain(|t| t.id != id);
    }

    /// Cancel every pending timer. Used when a component loses a shared
    /// precondition (e.g. power off) and must drop all of its deferred work.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Advance by one tick and return the payloads of any timers that fired.
    pub fn advance_tick(&mut self) -> Vec<T> {
        self.current_tick += 1;
        let tick = self.current_tick;
        let mut fired = Vec::new();
        self.pending.retain(|t| {
            if t.fire_at_tick <= tick {
                fired.push(t.payload.clone());
                false
            } else {
                true
            }
        });
        fired
    }
}

impl<T: Clone> Default for Scheduler<T> {
    fn default() -> Self {
        Scheduler::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_after_delay_not_before() {
        let mut s: Scheduler<&'static str> = Scheduler::new();
        s.schedule_after_ms(100, "fire");
        // 100ms at 60Hz ~= 6 ticks
        for _ in 0..5 {
            assert!(s.advance_tick().is_empty());
        }
        let fired = s.advance_tick();
        assert_eq!(fired, vec!["fire"]);
    }

    #[test]
    fn cancel_prevents_firing() {
        let mut s: Scheduler<&'static str> = Scheduler::new();
        let id = s.schedule_after_ms(50, "fire");
        s.cancel(id);
        for _ in 0..10 {
            assert!(s.advance_tick().is_empty());
        }
    }

    #[test]
    fn cancel_all_clears_pending() {
        let mut s: Scheduler<u32> = Scheduler::new();
        s.schedule_after_ms(50, 1);
        s.schedule_after_ms(60, 2);
        s.cancel_all();
        assert!(!s.has_pending());
    }
}
