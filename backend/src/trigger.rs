use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Armed,
    Cooldown(Instant),
}

/// Cooldown-gated fire decision. At most one fire per cooldown window;
/// re-arming is purely time-gated and independent of targeting.
#[derive(Debug)]
pub struct Trigger {
    state: TriggerState,
    cooldown: Duration,
}

impl Trigger {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            state: TriggerState::Armed,
            cooldown,
        }
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    /// Advances the state machine one cycle and returns the fire
    /// decision for this cycle.
    pub fn poll(&mut self, on_target: bool, now: Instant) -> bool {
        if let TriggerState::Cooldown(deadline) = self.state {
            if now >= deadline {
                self.state = TriggerState::Armed;
            }
        }
        match self.state {
            TriggerState::Armed if on_target => {
                self.state = TriggerState::Cooldown(now + self.cooldown);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COOLDOWN: Duration = Duration::from_millis(1000);

    #[test]
    fn fires_once_then_cools_down() {
        let mut trigger = Trigger::new(COOLDOWN);
        let t0 = Instant::now();
        assert!(trigger.poll(true, t0));
        assert_eq!(trigger.state(), TriggerState::Cooldown(t0 + COOLDOWN));
        assert!(!trigger.poll(true, t0 + Duration::from_millis(100)));
        assert!(!trigger.poll(true, t0 + Duration::from_millis(999)));
    }

    #[test]
    fn does_not_fire_off_target() {
        let mut trigger = Trigger::new(COOLDOWN);
        assert!(!trigger.poll(false, Instant::now()));
        assert_eq!(trigger.state(), TriggerState::Armed);
    }

    #[test]
    fn rearms_at_the_deadline_regardless_of_targeting() {
        let mut trigger = Trigger::new(COOLDOWN);
        let t0 = Instant::now();
        assert!(trigger.poll(true, t0));

        // Off-target polls past the deadline still re-arm.
        assert!(!trigger.poll(false, t0 + COOLDOWN));
        assert_eq!(trigger.state(), TriggerState::Armed);

        assert!(trigger.poll(true, t0 + COOLDOWN + Duration::from_millis(1)));
    }

    #[test]
    fn sustained_on_target_fires_at_most_once_per_window() {
        let mut trigger = Trigger::new(COOLDOWN);
        let t0 = Instant::now();
        let step = Duration::from_millis(100);
        let total = Duration::from_millis(3000);

        let mut fires = 0;
        let mut elapsed = Duration::ZERO;
        while elapsed <= total {
            if trigger.poll(true, t0 + elapsed) {
                fires += 1;
            }
            elapsed += step;
        }
        // floor(total / cooldown) + 1
        assert_eq!(fires, 4);
    }
}
