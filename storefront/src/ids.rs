//! Random identifiers.

use rand::Rng;
use storefront_core::environment::IdGenerator;

/// Uniformly random ids from the thread-local generator
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_below(&self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..bound)
    }
}
