use crate::{
    EmptyRosterError,
    core::{bird::Bird, playfield::TICK_SECONDS},
};

use super::{
    backdrop::Backdrop,
    pipe_stream::PipeStream,
    policy::{JumpPolicy, SensoryInput},
};

/// Fitness awarded for clearing a pipe.
pub const CLEAR_REWARD: f32 = 20.0;
/// Fitness granted to each survivor every tick.
pub const SURVIVAL_REWARD: f32 = 0.1;
/// Fitness charged for dying to a pipe.
pub const COLLISION_PENALTY: f32 = -10.0;
/// Fitness charged for leaving the vertical playfield bounds.
pub const OUT_OF_BOUNDS_PENALTY: f32 = -10.0;

/// Stable key pairing an agent with its externally owned fitness slot.
///
/// Assigned from the roster position at cohort creation and carried by
/// the agent record from then on, so pruning never disturbs the
/// correspondence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenomeId(usize);

impl GenomeId {
    /// Slot index in the external accumulator.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Externally owned per-agent fitness accumulator.
///
/// The optimizer initializes one slot per genome to zero before a round
/// starts; the cohort only ever applies deltas.
pub trait FitnessSink {
    /// Applies a fitness delta to one genome's accumulator.
    fn adjust(&mut self, genome: GenomeId, delta: f32);
}

/// One evaluated agent: the bird, its decision policy, and its fitness
/// key, removed from the cohort as a single unit.
#[derive(Debug)]
pub struct Contender {
    bird: Bird,
    policy: Box<dyn JumpPolicy>,
    genome: GenomeId,
}

impl Contender {
    #[must_use]
    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    #[must_use]
    pub fn genome(&self) -> GenomeId {
        self.genome
    }
}

/// Whether the evaluation round continues after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum StepOutcome {
    /// At least one agent is still alive.
    Running,
    /// The active set emptied; the round is over and the caller (the
    /// external optimizer) moves on to the next one.
    Extinct,
}

/// A population of agents evaluated together in one shared world.
///
/// Every tick all agents face the same obstacle stream; each is queried
/// through its own policy, and deaths, clears, and survival become
/// fitness deltas on the external accumulator.
#[derive(Debug)]
pub struct Cohort {
    contenders: Vec<Contender>,
    stream: PipeStream,
    backdrop: Backdrop,
    ticks: u64,
}

impl Cohort {
    /// Builds a cohort with one fresh agent per policy.
    ///
    /// Genome ids are assigned by roster position, matching the slot
    /// layout the external optimizer used when zeroing its accumulator.
    pub fn new(
        stream: PipeStream,
        policies: impl IntoIterator<Item = Box<dyn JumpPolicy>>,
    ) -> Result<Self, EmptyRosterError> {
        let contenders: Vec<_> = policies
            .into_iter()
            .enumerate()
            .map(|(index, policy)| Contender {
                bird: Bird::new(),
                policy,
                genome: GenomeId(index),
            })
            .collect();
        if contenders.is_empty() {
            return Err(EmptyRosterError);
        }
        Ok(Self {
            contenders,
            stream,
            backdrop: Backdrop::new(),
            ticks: 0,
        })
    }

    /// Advances the shared world by one tick.
    ///
    /// Order within the tick: scroll, sense, resolve deaths and clears,
    /// prune, then physics and decisions for the survivors. Clear
    /// conditions are evaluated for every agent against the pre-commit
    /// flag, so simultaneous passes all score while the flag still
    /// flips once.
    pub fn step(&mut self, fitness: &mut dyn FitnessSink) -> StepOutcome {
        if self.contenders.is_empty() {
            return StepOutcome::Extinct;
        }
        self.ticks += 1;

        self.stream.advance();
        self.backdrop.advance();

        let view = self.gate_view();

        for contender in &mut self.contenders {
            if contender.bird.is_out_of_bounds() {
                fitness.adjust(contender.genome, OUT_OF_BOUNDS_PENALTY);
                contender.bird.kill();
            }
        }

        for pipe in self.stream.pipes_mut() {
            let mut passed = false;
            for contender in &mut self.contenders {
                if pipe.hits(&contender.bird.hitbox()) {
                    fitness.adjust(contender.genome, COLLISION_PENALTY);
                    contender.bird.kill();
                }
                if !pipe.is_cleared() && contender.bird.x() > pipe.trailing_edge() {
                    contender.bird.record_clear();
                    fitness.adjust(contender.genome, CLEAR_REWARD);
                    passed = true;
                }
            }
            if passed {
                pipe.mark_cleared();
            }
        }

        // Each record carries its own policy and genome key, so pruning
        // cannot misalign survivors with their fitness slots.
        self.contenders
            .retain(|contender| contender.bird.is_alive());

        for contender in &mut self.contenders {
            contender.bird.advance(TICK_SECONDS);
            fitness.adjust(contender.genome, SURVIVAL_REWARD);
            let senses = view.observe(contender.bird.y());
            if contender.policy.decide(&senses) {
                contender.bird.jump();
            }
        }

        if self.contenders.is_empty() {
            StepOutcome::Extinct
        } else {
            StepOutcome::Running
        }
    }

    fn gate_view(&self) -> GateView {
        let lead = &self
            .contenders
            .first()
            .expect("stepping an empty cohort is rejected at the tick boundary")
            .bird;
        let gate = self.stream.nearest_uncleared();
        GateView {
            distance: gate.x() - lead.x(),
            top: gate.gate_top(),
            bottom: gate.gate_bottom(),
        }
    }

    /// Completed ticks.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.contenders.len()
    }

    /// Surviving agents, for the external render sink.
    pub fn contenders(&self) -> impl Iterator<Item = &Contender> {
        self.contenders.iter()
    }

    #[must_use]
    pub fn stream(&self) -> &PipeStream {
        &self.stream
    }

    #[must_use]
    pub fn backdrop(&self) -> &Backdrop {
        &self.backdrop
    }
}

/// Gate-relative sensory components, computed once per tick from the
/// lead agent and shared by the whole cohort.
#[derive(Debug, Clone, Copy)]
struct GateView {
    distance: f32,
    top: f32,
    bottom: f32,
}

impl GateView {
    fn observe(self, y: f32) -> SensoryInput {
        SensoryInput {
            y,
            gate_distance: self.distance,
            gate_top: self.top,
            gate_bottom: self.bottom,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg32;

    use crate::core::pipe::Pipe;
    use crate::engine::pipe_stream::{GateBounds, StreamSeed};

    use super::*;

    #[derive(Debug)]
    struct NeverJump;

    impl JumpPolicy for NeverJump {
        fn decide(&mut self, _senses: &SensoryInput) -> bool {
            false
        }
    }

    #[derive(Debug)]
    struct AlwaysJump;

    impl JumpPolicy for AlwaysJump {
        fn decide(&mut self, _senses: &SensoryInput) -> bool {
            true
        }
    }

    /// Jumps on every `period`-th decision; period 25 roughly hovers.
    #[derive(Debug)]
    struct JumpEvery {
        period: u32,
        elapsed: u32,
    }

    impl JumpEvery {
        fn new(period: u32) -> Self {
            Self { period, elapsed: 0 }
        }
    }

    impl JumpPolicy for JumpEvery {
        fn decide(&mut self, _senses: &SensoryInput) -> bool {
            self.elapsed += 1;
            self.elapsed % self.period == 0
        }
    }

    #[derive(Debug)]
    struct Ledger(Vec<f32>);

    impl Ledger {
        fn new(genomes: usize) -> Self {
            Self(vec![0.0; genomes])
        }
    }

    impl FitnessSink for Ledger {
        fn adjust(&mut self, genome: GenomeId, delta: f32) {
            self.0[genome.index()] += delta;
        }
    }

    fn seeded_stream() -> PipeStream {
        let seed: StreamSeed = Pcg32::seed_from_u64(3).random();
        PipeStream::with_seed(seed, GateBounds::TRAINING)
    }

    fn approx(value: f32, expected: f32) -> bool {
        (value - expected).abs() < 1e-3
    }

    #[test]
    fn empty_roster_is_rejected() {
        assert!(Cohort::new(seeded_stream(), Vec::new()).is_err());
    }

    #[test]
    fn survivors_accrue_the_per_tick_reward() {
        let policies: Vec<Box<dyn JumpPolicy>> = vec![Box::new(JumpEvery::new(25))];
        let mut cohort = Cohort::new(seeded_stream(), policies).unwrap();
        let mut ledger = Ledger::new(1);

        for _ in 0..30 {
            assert!(cohort.step(&mut ledger).is_running());
        }
        assert_eq!(cohort.ticks(), 30);
        assert!(approx(ledger.0[0], 3.0));
    }

    #[test]
    fn pruning_preserves_the_genome_pairing() {
        // The climber exits the top around tick 56, the faller exits the
        // bottom around tick 41, and the hoverer outlives both. No pipe
        // reaches the agents' x before tick 93.
        let policies: Vec<Box<dyn JumpPolicy>> = vec![
            Box::new(AlwaysJump),
            Box::new(NeverJump),
            Box::new(JumpEvery::new(25)),
        ];
        let mut cohort = Cohort::new(seeded_stream(), policies).unwrap();
        let mut ledger = Ledger::new(3);

        for _ in 0..90 {
            cohort.step(&mut ledger);
        }

        assert_eq!(cohort.alive_count(), 1);
        let survivor = cohort.contenders().next().unwrap();
        assert_eq!(survivor.genome().index(), 2);

        // Dead genomes keep their own penalized totals.
        assert!(ledger.0[0] < 0.0);
        assert!(ledger.0[1] < 0.0);
        assert!(approx(ledger.0[2], 9.0));
    }

    #[test]
    fn extinction_is_reported_with_an_empty_active_set() {
        let policies: Vec<Box<dyn JumpPolicy>> =
            vec![Box::new(NeverJump), Box::new(NeverJump)];
        let mut cohort = Cohort::new(seeded_stream(), policies).unwrap();
        let mut ledger = Ledger::new(2);

        let mut extinct = false;
        for _ in 0..100 {
            if cohort.step(&mut ledger).is_extinct() {
                extinct = true;
                break;
            }
        }
        assert!(extinct);
        assert_eq!(cohort.alive_count(), 0);
        for fitness in &ledger.0 {
            assert!(*fitness < 0.0);
        }

        // The boundary check keeps reporting extinction without work.
        let ticks = cohort.ticks();
        assert!(cohort.step(&mut ledger).is_extinct());
        assert_eq!(cohort.ticks(), ticks);
    }

    #[test]
    fn pipe_collision_penalizes_and_kills() {
        // A pipe straddling the agents' x whose lower half covers the
        // start height: death on the first step, before any physics.
        let stream = PipeStream::from_pipes(
            GateBounds::TRAINING,
            vec![Pipe::new(100.0, 200.0)],
        );
        let policies: Vec<Box<dyn JumpPolicy>> = vec![Box::new(NeverJump)];
        let mut cohort = Cohort::new(stream, policies).unwrap();
        let mut ledger = Ledger::new(1);

        assert!(cohort.step(&mut ledger).is_extinct());
        assert_eq!(ledger.0[0], COLLISION_PENALTY);
    }

    #[test]
    fn simultaneous_passes_all_score_and_the_flag_flips_once() {
        // After one scroll the pipe's trailing edge lands at 99, just
        // behind the agents at x = 100, so both pass on the same tick.
        let stream = PipeStream::from_pipes(
            GateBounds::TRAINING,
            vec![Pipe::new(-46.0, 300.0)],
        );
        let policies: Vec<Box<dyn JumpPolicy>> =
            vec![Box::new(NeverJump), Box::new(NeverJump)];
        let mut cohort = Cohort::new(stream, policies).unwrap();
        let mut ledger = Ledger::new(2);

        assert!(cohort.step(&mut ledger).is_running());

        for contender in cohort.contenders() {
            assert_eq!(contender.bird().score(), 1);
        }
        assert!(approx(ledger.0[0], CLEAR_REWARD + SURVIVAL_REWARD));
        assert!(approx(ledger.0[1], CLEAR_REWARD + SURVIVAL_REWARD));

        let cleared: Vec<_> = cohort.stream().pipes().map(Pipe::is_cleared).collect();
        assert_eq!(cleared, vec![true, false]);
    }

    #[test]
    fn out_of_bounds_penalty_applies_once() {
        let policies: Vec<Box<dyn JumpPolicy>> = vec![Box::new(NeverJump)];
        let mut cohort = Cohort::new(seeded_stream(), policies).unwrap();
        let mut ledger = Ledger::new(1);

        let mut survived_ticks = 0;
        while cohort.step(&mut ledger).is_running() {
            survived_ticks = cohort.ticks();
            assert!(survived_ticks < 100);
        }

        #[expect(clippy::cast_precision_loss)]
        let expected = SURVIVAL_REWARD * survived_ticks as f32 + OUT_OF_BOUNDS_PENALTY;
        assert!(approx(ledger.0[0], expected));
    }
}
