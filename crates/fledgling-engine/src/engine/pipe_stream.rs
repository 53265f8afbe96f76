use std::{collections::VecDeque, fmt::Write as _};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::pipe::Pipe;

/// X coordinate newly spawned pipes start at, just beyond the right
/// playfield boundary.
pub const SPAWN_X: f32 = 610.0;
/// When the newest pipe scrolls to or past this x, the next pipe
/// spawns. The margin is wide enough that an uncleared pipe always
/// exists ahead of the agents.
pub const SPAWN_TRIGGER_X: f32 = 250.0;

/// Inclusive range the gate top is drawn from at spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateBounds {
    pub min: f32,
    pub max: f32,
}

impl GateBounds {
    /// Full range used by the arcade (human-controlled) session.
    pub const ARCADE: Self = Self {
        min: 100.0,
        max: 550.0,
    };

    /// Narrower range used when evaluating policies, bounding the
    /// difficulty a policy has to learn.
    pub const TRAINING: Self = Self {
        min: 200.0,
        max: 600.0,
    };
}

/// Seed for deterministic gate generation.
///
/// A 128-bit seed for the stream's random number generator. The same
/// seed reproduces the same pipe layout, enabling replayable rounds and
/// deterministic tests. Serializes as a 32-character hex string.
#[derive(Debug, Clone, Copy)]
pub struct StreamSeed([u8; 16]);

impl StreamSeed {
    pub(crate) fn rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

impl Serialize for StreamSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{num:032x}").unwrap();
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for StreamSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        let num = u128::from_str_radix(&hex_str, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid hex: {hex_str} ({e})")))?;
        Ok(Self(num.to_be_bytes()))
    }
}

/// Allows generating random `StreamSeed` values with `rng.random()`.
impl Distribution<StreamSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> StreamSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        StreamSeed(seed)
    }
}

/// The ordered sequence of active pipes.
///
/// Pipes are kept in spawn order, which is also x order since every
/// pipe scrolls at the same speed. Each [`Self::advance`] spawns a pipe
/// when the newest one has reached the trigger threshold, scrolls the
/// whole stream, and reaps pipes that left the playfield.
///
/// Invariants: the stream is never empty, and it always holds an
/// uncleared pipe — the spawn trigger fires long before the last
/// uncleared pipe could scroll past the agents.
#[derive(Debug, Clone)]
pub struct PipeStream {
    rng: Pcg32,
    bounds: GateBounds,
    pipes: VecDeque<Pipe>,
}

impl PipeStream {
    /// Creates a stream with a random seed and spawns the first pipe.
    ///
    /// For deterministic layouts use [`Self::with_seed`].
    #[must_use]
    pub fn new(bounds: GateBounds) -> Self {
        Self::with_seed(rand::rng().random(), bounds)
    }

    /// Like [`Self::new`], but with a specific seed for deterministic
    /// gate generation.
    #[must_use]
    pub fn with_seed(seed: StreamSeed, bounds: GateBounds) -> Self {
        let mut this = Self {
            rng: seed.rng(),
            bounds,
            pipes: VecDeque::new(),
        };
        this.spawn();
        this
    }

    fn spawn(&mut self) {
        let gate_top = self.rng.random_range(self.bounds.min..=self.bounds.max);
        self.pipes.push_back(Pipe::new(SPAWN_X, gate_top));
    }

    /// Advances the stream one tick: spawn, scroll, reap.
    ///
    /// The spawn trigger is tested against pre-scroll positions, so a
    /// pipe spawned this tick scrolls along with the rest.
    pub fn advance(&mut self) {
        if self.newest().x() <= SPAWN_TRIGGER_X {
            self.spawn();
        }
        for pipe in &mut self.pipes {
            pipe.advance();
        }
        self.pipes.retain(|pipe| !pipe.is_offscreen());
    }

    fn newest(&self) -> &Pipe {
        self.pipes
            .back()
            .expect("stream is never empty: spawning precedes reaping")
    }

    /// Returns the closest pipe no agent has cleared yet, the one the
    /// sensory vector is built from.
    ///
    /// # Panics
    ///
    /// Panics if every active pipe is cleared. The spawn trigger keeps
    /// an uncleared pipe ahead of the agents by construction, so this is
    /// a programming defect, not a runtime condition.
    #[must_use]
    pub fn nearest_uncleared(&self) -> &Pipe {
        self.pipes
            .iter()
            .find(|pipe| !pipe.is_cleared())
            .expect("stream should always hold an uncleared pipe")
    }

    /// Active pipes in spawn order.
    pub fn pipes(&self) -> impl Iterator<Item = &Pipe> {
        self.pipes.iter()
    }

    pub(crate) fn pipes_mut(&mut self) -> impl Iterator<Item = &mut Pipe> {
        self.pipes.iter_mut()
    }

    #[cfg(test)]
    pub(crate) fn from_pipes(bounds: GateBounds, pipes: Vec<Pipe>) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(0),
            bounds,
            pipes: pipes.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed_from_bytes(bytes: [u8; 16]) -> StreamSeed {
        StreamSeed(bytes)
    }

    fn test_stream() -> PipeStream {
        PipeStream::with_seed(seed_from_bytes([7; 16]), GateBounds::TRAINING)
    }

    #[test]
    fn starts_with_one_pipe_at_spawn_x() {
        let stream = test_stream();
        let pipes: Vec<_> = stream.pipes().collect();
        assert_eq!(pipes.len(), 1);
        assert_eq!(pipes[0].x(), SPAWN_X);
    }

    #[test]
    fn next_pipe_spawns_at_the_trigger_threshold() {
        let mut stream = test_stream();
        // 72 ticks bring the first pipe from 610 down to exactly 250.
        for _ in 0..72 {
            stream.advance();
        }
        assert_eq!(stream.pipes().count(), 1);
        assert_eq!(stream.pipes().next().unwrap().x(), SPAWN_TRIGGER_X);

        stream.advance();
        assert_eq!(stream.pipes().count(), 2);
    }

    #[test]
    fn pipes_reap_exactly_when_the_trailing_edge_exits() {
        let mut stream = test_stream();
        let first_gate = stream.pipes().next().unwrap().gate_top();

        // ceil((610 + 150) / 5) = 152 ticks to remove the first pipe.
        for _ in 0..151 {
            stream.advance();
        }
        let front = stream.pipes().next().unwrap();
        assert_eq!(front.gate_top(), first_gate);
        assert_eq!(front.x(), 610.0 - 5.0 * 151.0);

        stream.advance();
        let front = stream.pipes().next().unwrap();
        // The survivor is the second pipe, spawned on tick 73.
        assert_eq!(front.x(), 610.0 - 5.0 * (152.0 - 72.0));
        assert_eq!(stream.pipes().count(), 2);
    }

    #[test]
    fn gates_respect_the_bounds() {
        let mut stream = test_stream();
        for _ in 0..1_000 {
            stream.advance();
            for pipe in stream.pipes() {
                assert!(pipe.gate_top() >= GateBounds::TRAINING.min);
                assert!(pipe.gate_top() <= GateBounds::TRAINING.max);
            }
        }
    }

    #[test]
    fn same_seed_reproduces_the_layout() {
        let seed = seed_from_bytes([42; 16]);
        let mut a = PipeStream::with_seed(seed, GateBounds::ARCADE);
        let mut b = PipeStream::with_seed(seed, GateBounds::ARCADE);
        for _ in 0..500 {
            a.advance();
            b.advance();
        }
        let gates_a: Vec<_> = a.pipes().map(Pipe::gate_top).collect();
        let gates_b: Vec<_> = b.pipes().map(Pipe::gate_top).collect();
        assert!(!gates_a.is_empty());
        assert_eq!(gates_a, gates_b);
    }

    #[test]
    fn nearest_uncleared_skips_cleared_pipes() {
        let mut stream = PipeStream::from_pipes(
            GateBounds::ARCADE,
            vec![Pipe::new(-100.0, 300.0), Pipe::new(260.0, 400.0)],
        );
        stream.pipes_mut().next().unwrap().mark_cleared();
        assert_eq!(stream.nearest_uncleared().x(), 260.0);
    }

    #[test]
    #[should_panic(expected = "uncleared pipe")]
    fn exhausted_stream_is_a_defect() {
        let mut stream =
            PipeStream::from_pipes(GateBounds::ARCADE, vec![Pipe::new(-100.0, 300.0)]);
        stream.pipes_mut().next().unwrap().mark_cleared();
        let _ = stream.nearest_uncleared();
    }

    mod seed_serialization {
        use super::*;

        #[test]
        fn roundtrip_preserves_the_seed() {
            let seed: StreamSeed = rand::rng().random();
            let serialized = serde_json::to_string(&seed).unwrap();
            let deserialized: StreamSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(seed.0, deserialized.0);
        }

        #[test]
        fn format_is_a_32_char_hex_string() {
            let seed = seed_from_bytes([0u8; 16]);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"00000000000000000000000000000000\"");
        }

        #[test]
        fn bytes_serialize_big_endian() {
            let seed = seed_from_bytes([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76,
                0x54, 0x32, 0x10,
            ]);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");
        }

        #[test]
        fn wrong_length_is_rejected() {
            let too_short = "\"0123456789abcdef\"";
            assert!(serde_json::from_str::<StreamSeed>(too_short).is_err());
            let too_long = "\"0123456789abcdef0123456789abcdef0\"";
            assert!(serde_json::from_str::<StreamSeed>(too_long).is_err());
        }

        #[test]
        fn non_hex_characters_are_rejected() {
            let json = "\"zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz\"";
            let result = serde_json::from_str::<StreamSeed>(json);
            assert!(result.unwrap_err().to_string().contains("invalid hex"));
        }

        #[test]
        fn deserialized_seed_reproduces_gate_generation() {
            let original: StreamSeed = rand::rng().random();
            let serialized = serde_json::to_string(&original).unwrap();
            let restored: StreamSeed = serde_json::from_str(&serialized).unwrap();

            let mut a = PipeStream::with_seed(original, GateBounds::TRAINING);
            let mut b = PipeStream::with_seed(restored, GateBounds::TRAINING);
            for _ in 0..300 {
                a.advance();
                b.advance();
            }
            let gates_a: Vec<_> = a.pipes().map(Pipe::gate_top).collect();
            let gates_b: Vec<_> = b.pipes().map(Pipe::gate_top).collect();
            assert_eq!(gates_a, gates_b);
        }
    }
}
