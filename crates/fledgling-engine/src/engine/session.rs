use std::ops::ControlFlow;

use rand::Rng as _;
use rand_pcg::Pcg32;

use crate::core::{
    bird::Bird,
    pipe::Pipe,
    playfield::TICK_SECONDS,
};

use super::{
    backdrop::Backdrop,
    pipe_stream::{GateBounds, PipeStream, StreamSeed},
    policy::{JumpPolicy, JumpSignal, SensoryInput},
};

/// Discrete control triggers fed in from the external input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// Begin a round from the menu.
    Start,
    /// Jump request; doubles as `Start` while the menu is showing.
    Flap,
    /// Return to the menu after a round ended.
    Reset,
    /// Leave the session entirely.
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Menu,
    Playing,
    GameOver,
}

/// Single-agent arcade session.
///
/// Owns the session state machine and the per-tick update. Rendering
/// and input devices stay outside, talking to it through
/// [`ControlEvent`]s, the [`JumpSignal`], and the read-only accessors.
#[derive(Debug)]
pub struct GameSession {
    state: SessionState,
    bird: Option<Bird>,
    stream: PipeStream,
    backdrop: Backdrop,
    bounds: GateBounds,
    rng: Pcg32,
    jump_signal: JumpSignal,
}

impl GameSession {
    /// Creates a menu-state session with a random seed.
    #[must_use]
    pub fn new(bounds: GateBounds) -> Self {
        Self::with_seed(rand::rng().random(), bounds)
    }

    /// Like [`Self::new`], but reproducible: every start re-seeds the
    /// stream from a session-level generator, so restarted rounds get
    /// fresh layouts while the whole session replays identically for
    /// the same seed.
    #[must_use]
    pub fn with_seed(seed: StreamSeed, bounds: GateBounds) -> Self {
        let mut rng = seed.rng();
        let stream_seed = rng.random();
        Self {
            state: SessionState::Menu,
            bird: None,
            stream: PipeStream::with_seed(stream_seed, bounds),
            backdrop: Backdrop::new(),
            bounds,
            rng,
            jump_signal: JumpSignal::new(),
        }
    }

    /// Feeds one control trigger into the state machine.
    ///
    /// Returns [`ControlFlow::Break`] on the quit trigger; every other
    /// event leaves the caller's loop running.
    pub fn handle_control(&mut self, event: ControlEvent) -> ControlFlow<()> {
        match (&self.state, event) {
            (SessionState::Menu, ControlEvent::Start | ControlEvent::Flap) => self.start(),
            (SessionState::Playing, ControlEvent::Flap) => self.jump_signal.press(),
            (SessionState::GameOver, ControlEvent::Reset) => self.state = SessionState::Menu,
            (_, ControlEvent::Quit) => return ControlFlow::Break(()),
            _ => {}
        }
        ControlFlow::Continue(())
    }

    /// Re-creates the agent and the obstacle stream and enters play.
    fn start(&mut self) {
        let stream_seed = self.rng.random();
        self.stream = PipeStream::with_seed(stream_seed, self.bounds);
        self.bird = Some(Bird::new());
        self.state = SessionState::Playing;
    }

    /// Advances the session by one tick.
    ///
    /// The policy is queried once per tick with the current sensory
    /// vector; the arcade [`super::InputPolicy`] ignores the vector and
    /// consumes the latched jump press. A death mid-tick finishes the
    /// tick and takes effect at the next tick boundary, keeping each
    /// tick atomic.
    pub fn tick(&mut self, policy: &mut dyn JumpPolicy) {
        match self.state {
            SessionState::Menu => self.backdrop.advance(),
            SessionState::Playing => self.tick_playing(policy),
            SessionState::GameOver => {}
        }
    }

    fn tick_playing(&mut self, policy: &mut dyn JumpPolicy) {
        self.stream.advance();
        self.backdrop.advance();

        let bird = self
            .bird
            .as_mut()
            .expect("playing session always has an agent");

        if bird.is_out_of_bounds() {
            self.state = SessionState::GameOver;
        }

        let hitbox = bird.hitbox();
        for pipe in self.stream.pipes_mut() {
            if pipe.hits(&hitbox) {
                self.state = SessionState::GameOver;
            }
            if !pipe.is_cleared() && hitbox.x > pipe.trailing_edge() {
                bird.record_clear();
                pipe.mark_cleared();
            }
        }

        bird.advance(TICK_SECONDS);

        let gate = self.stream.nearest_uncleared();
        let senses = SensoryInput {
            y: bird.y(),
            gate_distance: gate.x() - bird.x(),
            gate_top: gate.gate_top(),
            gate_bottom: gate.gate_bottom(),
        };
        if policy.decide(&senses) {
            bird.jump();
        }
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Latch handle the control surface shares with the input policy.
    #[must_use]
    pub fn jump_signal(&self) -> JumpSignal {
        self.jump_signal.clone()
    }

    #[must_use]
    pub fn bird(&self) -> Option<&Bird> {
        self.bird.as_ref()
    }

    /// Pipes cleared in the current (or just-ended) round.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.bird.as_ref().map_or(0, Bird::score)
    }

    pub fn pipes(&self) -> impl Iterator<Item = &Pipe> {
        self.stream.pipes()
    }

    #[must_use]
    pub fn backdrop(&self) -> &Backdrop {
        &self.backdrop
    }
}
