use fledgling_engine::{JumpPolicy, SENSOR_COUNT, SensoryInput};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Decision threshold above which the network output means "jump".
pub const JUMP_THRESHOLD: f32 = 0.5;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TopologyError {
    #[display("a network needs at least an input and an output layer")]
    TooFewLayers,
    #[display("layer widths must be non-zero")]
    EmptyLayer,
}

/// One fully-connected layer: `outputs × inputs` weights plus a bias
/// per output, row-major.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Layer {
    inputs: usize,
    weights: Vec<f32>,
    biases: Vec<f32>,
}

impl Layer {
    fn random<R>(rng: &mut R, inputs: usize, outputs: usize) -> Self
    where
        R: Rng + ?Sized,
    {
        let weights = (0..inputs * outputs)
            .map(|_| rng.random_range(-1.0..=1.0))
            .collect();
        let biases = (0..outputs).map(|_| rng.random_range(-1.0..=1.0)).collect();
        Self {
            inputs,
            weights,
            biases,
        }
    }

    fn forward(&self, input: &[f32]) -> Vec<f32> {
        assert_eq!(input.len(), self.inputs, "input width must match the layer");
        self.weights
            .chunks_exact(self.inputs)
            .zip(&self.biases)
            .map(|(row, bias)| {
                let sum = row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>();
                logistic(sum + bias)
            })
            .collect()
    }
}

/// Logistic activation, squashing into (0, 1).
fn logistic(value: f32) -> f32 {
    1.0 / (1.0 + (-value).exp())
}

/// A fully-connected feed-forward network with logistic activations.
///
/// The weights are the genome. How they are produced (crossover,
/// mutation, speciation) belongs to the external optimizer; this type
/// only evaluates them, and serde-roundtrips so the optimizer can
/// persist them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedForward {
    layers: Vec<Layer>,
}

impl FeedForward {
    /// Builds a randomly initialized network for the given layer
    /// widths, e.g. `[4, 4, 1]` for four sensors, one hidden layer of
    /// four, and a single output.
    pub fn random<R>(rng: &mut R, widths: &[usize]) -> Result<Self, TopologyError>
    where
        R: Rng + ?Sized,
    {
        if widths.len() < 2 {
            return Err(TopologyError::TooFewLayers);
        }
        if widths.contains(&0) {
            return Err(TopologyError::EmptyLayer);
        }
        let layers = widths
            .windows(2)
            .map(|pair| Layer::random(rng, pair[0], pair[1]))
            .collect();
        Ok(Self { layers })
    }

    /// Evaluates the network on one input vector.
    ///
    /// # Panics
    ///
    /// Panics if `input` does not match the first layer's width.
    #[must_use]
    pub fn activate(&self, input: &[f32]) -> Vec<f32> {
        self.layers
            .iter()
            .fold(input.to_vec(), |acc, layer| layer.forward(&acc))
    }
}

/// Policy adapter for evolved networks: forwards the sensory vector and
/// thresholds the first output at [`JUMP_THRESHOLD`].
#[derive(Debug, Clone)]
pub struct NetworkPolicy {
    network: FeedForward,
}

impl NetworkPolicy {
    #[must_use]
    pub const fn new(network: FeedForward) -> Self {
        Self { network }
    }

    /// Random sensors-to-decision network with one hidden layer.
    pub fn random<R>(rng: &mut R, hidden: usize) -> Result<Self, TopologyError>
    where
        R: Rng + ?Sized,
    {
        Ok(Self::new(FeedForward::random(
            rng,
            &[SENSOR_COUNT, hidden, 1],
        )?))
    }

    #[must_use]
    pub const fn network(&self) -> &FeedForward {
        &self.network
    }
}

impl JumpPolicy for NetworkPolicy {
    fn decide(&mut self, senses: &SensoryInput) -> bool {
        self.network.activate(&senses.to_array())[0] > JUMP_THRESHOLD
    }
}
