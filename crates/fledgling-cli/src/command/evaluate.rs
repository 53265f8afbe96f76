use std::path::PathBuf;

use fledgling_engine::{GateBounds, JumpPolicy, PipeStream, SENSOR_COUNT, StreamSeed};
use fledgling_evaluator::{FeedForward, GenerationEvaluator, NetworkPolicy};
use fledgling_stats::DescriptiveStats;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::util;

/// Default tick budget: five simulated minutes at 30 ticks/s.
const DEFAULT_TICK_LIMIT: u64 = 9_000;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Number of candidate policies per round
    #[arg(long, default_value_t = 50)]
    population: usize,
    /// Evaluation rounds, each on a fresh stream layout
    #[arg(long, default_value_t = 10)]
    rounds: u32,
    /// Tick budget per round
    #[arg(long, default_value_t = DEFAULT_TICK_LIMIT)]
    tick_limit: u64,
    /// Hidden layer width of the candidate networks
    #[arg(long, default_value_t = 4)]
    hidden: usize,
    /// Seed for reproducible layouts and weights
    #[arg(long)]
    seed: Option<u64>,
    /// Report output path (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct EvaluationReport {
    rounds: Vec<RoundSummary>,
    best: Option<BestCandidate>,
}

#[derive(Debug, Serialize)]
struct RoundSummary {
    round: u32,
    stream_seed: StreamSeed,
    ticks: u64,
    survivors: usize,
    best_score: u32,
    fitness: FitnessSummary,
}

#[derive(Debug, Serialize)]
struct FitnessSummary {
    min: f32,
    max: f32,
    mean: f32,
    median: f32,
    std_dev: f32,
}

impl From<DescriptiveStats> for FitnessSummary {
    fn from(stats: DescriptiveStats) -> Self {
        Self {
            min: stats.min,
            max: stats.max,
            mean: stats.mean,
            median: stats.median,
            std_dev: stats.std_dev,
        }
    }
}

#[derive(Debug, Serialize)]
struct BestCandidate {
    round: u32,
    fitness: f32,
    network: FeedForward,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let EvaluateArg {
        population,
        rounds,
        tick_limit,
        hidden,
        seed,
        output,
    } = arg;
    anyhow::ensure!(*population > 0, "population must be at least 1");

    let mut rng = match seed {
        Some(seed) => Pcg32::seed_from_u64(*seed),
        None => Pcg32::from_rng(&mut rand::rng()),
    };
    let evaluator = GenerationEvaluator::new(*tick_limit);

    let mut summaries = Vec::new();
    let mut best: Option<BestCandidate> = None;
    for round in 0..*rounds {
        let stream_seed: StreamSeed = rng.random();
        let stream = PipeStream::with_seed(stream_seed, GateBounds::TRAINING);

        let networks = (0..*population)
            .map(|_| FeedForward::random(&mut rng, &[SENSOR_COUNT, *hidden, 1]))
            .collect::<Result<Vec<_>, _>>()?;
        let policies = networks
            .iter()
            .map(|network| Box::new(NetworkPolicy::new(network.clone())) as Box<dyn JumpPolicy>)
            .collect();

        let run = evaluator.evaluate(stream, policies)?;
        let stats = run.fitness_stats().expect("roster is non-empty");

        eprintln!(
            "Round #{round}: {} survivors after {} ticks, best score {}, fitness mean {:.2} / max {:.2}",
            run.survivors(),
            run.ticks(),
            run.best_score(),
            stats.mean,
            stats.max,
        );

        if let Some((index, &fitness)) = run
            .fitness()
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            && best.as_ref().is_none_or(|current| fitness > current.fitness)
        {
            best = Some(BestCandidate {
                round,
                fitness,
                network: networks[index].clone(),
            });
        }

        summaries.push(RoundSummary {
            round,
            stream_seed,
            ticks: run.ticks(),
            survivors: run.survivors(),
            best_score: run.best_score(),
            fitness: stats.into(),
        });
    }

    let report = EvaluationReport {
        rounds: summaries,
        best,
    };
    util::save_json(&report, output.as_deref())
}
