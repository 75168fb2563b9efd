//! Workload Generation
//!
//! Produces randomized operation descriptors from the fixed vocabulary.
//! Each worker owns its own generator, so streams never contend and a
//! seeded run is reproducible per worker.

use crate::op::{OpKind, OperationDescriptor};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Value ranges the generator draws from.
#[derive(Debug, Clone)]
pub struct WorkloadSpec {
    /// Keys and member names are suffixed with `1..=key_range`.
    pub key_range: u32,
    /// Scores are drawn from `1..=score_range`.
    pub score_range: u32,
    /// Inclusive bounds for PEXPIRE TTLs, in milliseconds.
    pub ttl_ms: (u64, u64),
    /// Fixed ZQUERY limit. The store requires it to be even.
    pub query_limit: u32,
}

impl Default for WorkloadSpec {
    fn default() -> Self {
        Self {
            key_range: 100,
            score_range: 100,
            ttl_ms: (1000, 5000),
            query_limit: 4,
        }
    }
}

/// Randomized source of operations. One per worker.
///
/// Generation is a pure function of the RNG state: no side effects, no
/// shared state.
pub struct WorkloadGenerator {
    spec: WorkloadSpec,
    rng: SmallRng,
}

impl WorkloadGenerator {
    /// Generator with a deterministic stream derived from `seed`.
    pub fn seeded(spec: WorkloadSpec, seed: u64) -> Self {
        Self {
            spec,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from OS entropy.
    pub fn from_entropy(spec: WorkloadSpec) -> Self {
        Self {
            spec,
            rng: SmallRng::from_entropy(),
        }
    }

    /// Draw the next operation. Kind selection is uniform over the
    /// vocabulary; every argument is an independent draw.
    pub fn next_op(&mut self) -> OperationDescriptor {
        let kind = OpKind::ALL[self.rng.gen_range(0..OpKind::ALL.len())];
        let args = match kind {
            OpKind::Get | OpKind::Set | OpKind::Del | OpKind::Pttl => vec![self.key()],
            OpKind::Pexpire => vec![self.key(), self.ttl_ms()],
            OpKind::Zadd => vec![self.key(), self.score(), self.name()],
            OpKind::Zrem | OpKind::Zscore => vec![self.key(), self.name()],
            OpKind::Zquery => vec![
                self.key(),
                self.score(),
                self.name(),
                self.rng.gen_range(0..=5u32).to_string(),
                self.spec.query_limit.to_string(),
            ],
        };
        OperationDescriptor { kind, args }
    }

    fn key(&mut self) -> String {
        format!("key{}", self.rng.gen_range(1..=self.spec.key_range))
    }

    // Member names share the key range.
    fn name(&mut self) -> String {
        format!("name{}", self.rng.gen_range(1..=self.spec.key_range))
    }

    fn score(&mut self) -> String {
        self.rng.gen_range(1..=self.spec.score_range).to_string()
    }

    fn ttl_ms(&mut self) -> String {
        let (lo, hi) = self.spec.ttl_ms;
        self.rng.gen_range(lo..=hi).to_string()
    }
}
