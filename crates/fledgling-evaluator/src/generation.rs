use fledgling_engine::{
    Cohort, EmptyRosterError, FitnessSink, GenomeId, JumpPolicy, PipeStream,
};
use fledgling_stats::DescriptiveStats;

/// Per-genome fitness accumulator for one evaluation round.
///
/// Slots start at zero and line up with the roster order handed to the
/// cohort, so deltas stay attributable after agents die and are pruned.
#[derive(Debug, Clone)]
pub struct FitnessLedger {
    scores: Vec<f32>,
}

impl FitnessLedger {
    #[must_use]
    pub fn new(genomes: usize) -> Self {
        Self {
            scores: vec![0.0; genomes],
        }
    }

    #[must_use]
    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    #[must_use]
    pub fn into_scores(self) -> Vec<f32> {
        self.scores
    }
}

impl FitnessSink for FitnessLedger {
    fn adjust(&mut self, genome: GenomeId, delta: f32) {
        self.scores[genome.index()] += delta;
    }
}

/// Outcome of one evaluated round.
#[derive(Debug, Clone)]
pub struct GenerationRun {
    fitness: Vec<f32>,
    ticks: u64,
    survivors: usize,
    best_score: u32,
}

impl GenerationRun {
    /// Final fitness per genome, in roster order.
    #[must_use]
    pub fn fitness(&self) -> &[f32] {
        &self.fitness
    }

    /// Ticks the round lasted before extinction or the budget.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Agents still alive when the round ended.
    #[must_use]
    pub const fn survivors(&self) -> usize {
        self.survivors
    }

    /// Highest pipe count among the agents alive at the end.
    #[must_use]
    pub const fn best_score(&self) -> u32 {
        self.best_score
    }

    /// Summary statistics over the per-genome fitness.
    #[must_use]
    pub fn fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.fitness.iter().copied())
    }
}

/// Plays evaluation rounds under a tick budget.
///
/// The budget guards against a policy that has mastered the stream and
/// would otherwise keep the round alive forever.
#[derive(Debug, Clone, Copy)]
pub struct GenerationEvaluator {
    tick_limit: u64,
}

impl GenerationEvaluator {
    #[must_use]
    pub const fn new(tick_limit: u64) -> Self {
        Self { tick_limit }
    }

    /// Plays one round: every policy controls one agent in the shared
    /// stream until the cohort goes extinct or the budget runs out.
    pub fn evaluate(
        &self,
        stream: PipeStream,
        policies: Vec<Box<dyn JumpPolicy>>,
    ) -> Result<GenerationRun, EmptyRosterError> {
        let mut ledger = FitnessLedger::new(policies.len());
        let mut cohort = Cohort::new(stream, policies)?;
        for _ in 0..self.tick_limit {
            if cohort.step(&mut ledger).is_extinct() {
                break;
            }
        }
        let best_score = cohort
            .contenders()
            .map(|contender| contender.bird().score())
            .max()
            .unwrap_or(0);
        Ok(GenerationRun {
            fitness: ledger.into_scores(),
            ticks: cohort.ticks(),
            survivors: cohort.alive_count(),
            best_score,
        })
    }
}
