pub mod pseudo;

pub use pseudo::PseudoRng;

/// Source of uniform draws on `[0, 1)`.
///
/// Every simulated path owns its own source; nothing in this crate shares one
/// across paths.
pub trait Rng: Send {
    fn uniform(&mut self) -> f64;
}

/// How the per-path streams of a run are seeded.
///
/// With a seed every path gets the ChaCha stream `stream_id(path, factor)` of
/// that seed, so runs are reproducible and paths never overlap. Without a seed
/// each stream is drawn from OS entropy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamSeeder {
    seed: Option<u64>,
}

impl StreamSeeder {
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }

    /// Independent stream for one risk factor of one path.
    pub fn stream(&self, path_idx: usize, factor_idx: usize) -> PseudoRng {
        match self.seed {
            Some(seed) => PseudoRng::from_stream(seed, stream_id(path_idx, factor_idx)),
            None => PseudoRng::new(),
        }
    }
}

/// Two factor slots per path: even ids drive the discount rate, odd ids the
/// floating index.
#[inline]
pub fn stream_id(path_idx: usize, factor_idx: usize) -> u64 {
    (path_idx as u64) * 2 + factor_idx as u64
}
