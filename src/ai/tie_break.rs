use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses the fallback column a search node keeps when no candidate
/// strictly improves on the initial bound.
pub trait TieBreak {
    /// `columns` is never empty.
    fn choose(&mut self, columns: &[usize]) -> usize;
}

/// Uniform random choice.
pub struct RandomTieBreak {
    rng: StdRng,
}

impl RandomTieBreak {
    pub fn new() -> Self {
        RandomTieBreak {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible sequence of choices.
    pub fn seeded(seed: u64) -> Self {
        RandomTieBreak {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomTieBreak {
    fn default() -> Self {
        Self::new()
    }
}

impl TieBreak for RandomTieBreak {
    fn choose(&mut self, columns: &[usize]) -> usize {
        let idx = self.rng.random_range(0..columns.len());
        columns[idx]
    }
}

/// Deterministic policy: always the leftmost candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstColumn;

impl TieBreak for FirstColumn {
    fn choose(&mut self, columns: &[usize]) -> usize {
        columns[0]
    }
}
