//! Per-signal smooth (Perlin-like) noise generator, seeded per `signal_id`
//! so that replays with the same scenario are reproducible (§9 Design Notes).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};

const SEGMENT_TICKS: u32 = 30;

/// A 1D value-noise generator: holds a previous and next random keyframe and
/// cosine-interpolates between them, re-rolling the next keyframe every
/// `SEGMENT_TICKS`. Output stays in `[-1, 1]`.
pub struct SmoothNoise {
    rng: StdRng,
    prev: f64,
    next: f64,
    tick_in_segment: u32,
}

impl SmoothNoise {
    /// Derive a deterministic seed from the signal id's bytes so that two
    /// satellites never share a generator and replays reproduce identically.
    pub fn for_signal_id(signal_id: &str) -> SmoothNoise {
        let mut seed: u64 = 0xcbf29ce484222325;
        for b in signal_id.bytes() {
            seed ^= b as u64;
            seed = seed.wrapping_mul(0x100000001b3);
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let dist = Uniform::new_inclusive(-1.0, 1.0);
        let prev = dist.sample(&mut rng);
        let next = dist.sample(&mut rng);
        SmoothNoise {
            rng,
            prev,
            next,
            tick_in_segment: 0,
        }
    }

    /// Advance one tick and return the current smoothed sample in `[-1, 1]`.
    pub fn sample(&mut self) -> f64 {
        let t = self.tick_in_segment as f64 / SEGMENT_TICKS as f64;
        let smooth_t = 0.5 - 0.5 * (std::f64::consts::PI * t).cos();
        let value = self.prev + (self.next - self.prev) * smooth_t;

        self.tick_in_segment += 1;
        if self.tick_in_segment >= SEGMENT_TICKS {
            self.tick_in_segment = 0;
            self.prev = self.next;
            let dist = Uniform::new_inclusive(-1.0, 1.0);
            self.next = dist.sample(&mut self.rng);
        }
        value
    }
}

/// Uniform draw in `[0, 1)`, used by the per-tick random cache for rain
/// fade / scintillation / health walk draws.
pub fn unit_rand(rng: &mut StdRng) -> f64 {
    rng.gen_range(0.0..1.0)
}
