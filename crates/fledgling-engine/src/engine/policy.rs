use std::{cell::Cell, fmt, rc::Rc};

/// Number of components in the sensory vector.
pub const SENSOR_COUNT: usize = 4;

/// Per-agent observation handed to a policy once per tick.
///
/// The gate-relative components are shared by every agent within a
/// tick; `y` is the observing agent's own vertical position. The array
/// layout of [`Self::to_array`] is `[y, gate_distance, gate_top,
/// gate_bottom]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensoryInput {
    /// Observing agent's vertical position.
    pub y: f32,
    /// Horizontal distance from the agent to the nearest uncleared pipe.
    pub gate_distance: f32,
    /// Bottom edge of that pipe's upper half.
    pub gate_top: f32,
    /// Top edge of that pipe's lower half.
    pub gate_bottom: f32,
}

impl SensoryInput {
    #[must_use]
    pub const fn to_array(self) -> [f32; SENSOR_COUNT] {
        [self.y, self.gate_distance, self.gate_top, self.gate_bottom]
    }
}

/// The decision capability every controller implements.
///
/// Human input and evolved networks alike reduce to one question per
/// tick: jump or don't. The simulation step queries the policy exactly
/// once per agent per tick and never branches on the controller kind.
pub trait JumpPolicy: fmt::Debug {
    /// Decides whether the agent jumps this tick.
    fn decide(&mut self, senses: &SensoryInput) -> bool;
}

/// Shared handle latching a jump press between ticks.
///
/// The control surface presses it when the jump trigger fires; the
/// paired [`InputPolicy`] consumes the latch on its next decision, so
/// presses are edge-triggered and never repeat.
#[derive(Debug, Clone, Default)]
pub struct JumpSignal(Rc<Cell<bool>>);

impl JumpSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latches a press until the next decision consumes it.
    pub fn press(&self) {
        self.0.set(true);
    }

    fn take(&self) -> bool {
        self.0.replace(false)
    }
}

/// Single-agent policy: ignores the senses and replays latched input.
#[derive(Debug, Clone)]
pub struct InputPolicy {
    signal: JumpSignal,
}

impl InputPolicy {
    #[must_use]
    pub fn new(signal: JumpSignal) -> Self {
        Self { signal }
    }
}

impl JumpPolicy for InputPolicy {
    fn decide(&mut self, _senses: &SensoryInput) -> bool {
        self.signal.take()
    }
}
