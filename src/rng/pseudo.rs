use crate::rng::Rng;
use rand::{Rng as RandRng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

// --- Pseudo RNG ---

pub struct PseudoRng {
    rng: ChaCha8Rng,
}

impl PseudoRng {
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_os_rng(),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Same seed, distinct ChaCha stream: sequences for different `stream`
    /// values do not overlap.
    pub fn from_stream(seed: u64, stream: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        Self { rng }
    }
}

impl Default for PseudoRng {
    fn default() -> Self {
        Self::new()
    }
}

impl Rng for PseudoRng {
    #[inline]
    fn uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

// Lets `rand_distr` distributions draw straight from the same stream.
impl RngCore for PseudoRng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    #[inline]
    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.rng.fill_bytes(dst)
    }
}
