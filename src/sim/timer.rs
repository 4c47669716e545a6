/// Deferred-action scheduler for pacing delays.
///
/// The vault's success feedback is shown first; the crew log opens a
/// beat later. That beat is a scheduled action, not a sleeping thread:
/// the main loop polls `fire_due` with the current Instant every frame,
/// and tests drive the same API with hand-built Instants. Queued
/// actions survive stage navigation (they are never auto-cancelled),
/// which is benign because `advance_to` is idempotent.

use std::time::Instant;

use crate::domain::stage::StageId;

/// What a timer does when it fires.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Deferred {
    Unlock(StageId),
}

/// Handle for cancelling a scheduled action.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TimerId(u64);

struct Pending {
    id: TimerId,
    due: Instant,
    action: Deferred,
}

pub struct Scheduler {
    pending: Vec<Pending>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler { pending: Vec::new(), next_id: 0 }
    }

    /// Queue `action` to fire once `due` has passed.
    pub fn schedule(&mut self, due: Instant, action: Deferred) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending { id, due, action });
        id
    }

    /// Drop a pending action. Returns false if it already fired.
    #[allow(dead_code)]
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    /// Remove and return every action whose deadline has passed,
    /// earliest first.
    pub fn fire_due(&mut self, now: Instant) -> Vec<Deferred> {
        let mut due: Vec<Pending> = Vec::new();
        let mut rest: Vec<Pending> = Vec::new();
        for p in self.pending.drain(..) {
            if p.due <= now { due.push(p) } else { rest.push(p) }
        }
        self.pending = rest;
        due.sort_by_key(|p| p.due);
        due.into_iter().map(|p| p.action).collect()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn fires_only_after_deadline() {
        let t0 = Instant::now();
        let mut s = Scheduler::new();
        s.schedule(t0 + Duration::from_millis(700), Deferred::Unlock(StageId::CrewLog));

        assert!(s.fire_due(t0).is_empty());
        assert!(s.fire_due(t0 + Duration::from_millis(699)).is_empty());
        assert_eq!(
            s.fire_due(t0 + Duration::from_millis(700)),
            vec![Deferred::Unlock(StageId::CrewLog)],
        );
        assert!(s.is_empty());
    }

    #[test]
    fn fires_in_deadline_order() {
        let t0 = Instant::now();
        let mut s = Scheduler::new();
        s.schedule(t0 + Duration::from_millis(500), Deferred::Unlock(StageId::Console));
        s.schedule(t0 + Duration::from_millis(100), Deferred::Unlock(StageId::CrewLog));

        assert_eq!(
            s.fire_due(t0 + Duration::from_secs(1)),
            vec![
                Deferred::Unlock(StageId::CrewLog),
                Deferred::Unlock(StageId::Console),
            ],
        );
    }

    #[test]
    fn cancel_prevents_firing() {
        let t0 = Instant::now();
        let mut s = Scheduler::new();
        let id = s.schedule(t0, Deferred::Unlock(StageId::CrewLog));

        assert!(s.cancel(id));
        assert!(s.fire_due(t0 + Duration::from_secs(1)).is_empty());
        assert!(!s.cancel(id));
    }

    #[test]
    fn duplicate_actions_all_fire() {
        // Re-submitting the riddle inside the delay window queues a
        // second unlock; both fire and both are harmless.
        let t0 = Instant::now();
        let mut s = Scheduler::new();
        s.schedule(t0, Deferred::Unlock(StageId::CrewLog));
        s.schedule(t0, Deferred::Unlock(StageId::CrewLog));
        assert_eq!(s.fire_due(t0).len(), 2);
    }
}
