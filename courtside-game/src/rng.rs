//! Injectable random source for the simulation.
//!
//! A bundle holds one stream per simulation domain so that, for a fixed user
//! seed, adding draws to one domain never shifts the other.
use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use sha2::Sha256;
use std::cell::{RefCell, RefMut};

/// Deterministic bundle of RNG streams segregated by simulation domain.
#[derive(Debug, Clone)]
pub struct RngBundle {
    seed: u64,
    selection: RefCell<CountingRng<SmallRng>>,
    possession: RefCell<CountingRng<SmallRng>>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        let selection = CountingRng::new(derive_stream_seed(seed, b"selection"));
        let possession = CountingRng::new(derive_stream_seed(seed, b"possession"));
        Self {
            seed,
            selection: RefCell::new(selection),
            possession: RefCell::new(possession),
        }
    }

    /// Production wiring: seed from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        let seed = SmallRng::from_entropy().next_u64();
        Self::from_user_seed(seed)
    }

    /// Seed the bundle was built from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Stream used to pick attackers, defenders and assisters.
    #[must_use]
    pub fn selection(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.selection.borrow_mut()
    }

    /// Stream used by the possession simulator.
    #[must_use]
    pub fn possession(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.possession.borrow_mut()
    }

    /// Total draws across both streams.
    #[must_use]
    pub fn draws(&self) -> u64 {
        self.selection
            .borrow()
            .draws()
            .saturating_add(self.possession.borrow().draws())
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    // HMAC accepts keys of any length, so the fallback branch is unreachable in practice.
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed ^ u64::from_le_bytes(tag_bytes(domain_tag));
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

fn tag_bytes(tag: &[u8]) -> [u8; 8] {
    let mut out = [0_u8; 8];
    for (slot, byte) in out.iter_mut().zip(tag) {
        *slot = *byte;
    }
    out
}
