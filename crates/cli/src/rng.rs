// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Random number generation for sampling steps.

use rand::SeedableRng;
use rand::rngs::StdRng;

/// A seeded generator when `seed` is given, otherwise one seeded from the OS.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            tracing::debug!("using fixed RNG seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    }
}
