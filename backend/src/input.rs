/// Discrete user actions recognized by the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CycleForward,
    CycleBackward,
    Home,
    Quit,
}

pub const KEY_CYCLE_FORWARD: u8 = b'n';
pub const KEY_CYCLE_BACKWARD: u8 = b'p';
pub const KEY_HOME: u8 = b'h';
pub const KEY_QUIT: u8 = b'q';

const BINDINGS: [(u8, Action); 4] = [
    (KEY_CYCLE_FORWARD, Action::CycleForward),
    (KEY_CYCLE_BACKWARD, Action::CycleBackward),
    (KEY_HOME, Action::Home),
    (KEY_QUIT, Action::Quit),
];

/// Turns the raw per-cycle key state into at most one discrete action,
/// firing only on the press edge. A key reported again on consecutive
/// polls stays silent until a poll observes it released.
#[derive(Debug, Default)]
pub struct KeyEdges {
    held: [bool; BINDINGS.len()],
}

impl KeyEdges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll(&mut self, raw: Option<u8>) -> Option<Action> {
        let mut action = None;
        for (slot, (key, bound)) in BINDINGS.iter().enumerate() {
            let pressed = raw == Some(*key);
            if pressed && !self.held[slot] {
                action = Some(*bound);
            }
            self.held[slot] = pressed;
        }
        action
    }
}
