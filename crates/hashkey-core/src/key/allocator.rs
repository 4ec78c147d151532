//! Unique retrieval key allocation over a bounded key space.
//!
//! `KeyAllocator` draws candidates uniformly at random from `0..key_space`
//! and marks the winner as in use. The membership check and the mark happen
//! under one lock acquisition, so two callers can never be handed the same
//! slot. Keys are never released.
//!
//! Random draws are capped at `max_attempts`. When every draw collides the
//! allocator walks the space from the last candidate and takes the first free
//! slot, so allocation only fails once the whole space is in use.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use hashkey_types::digest::RetrievalKey;
use hashkey_types::error::AllocationError;

#[derive(Debug)]
struct AllocatorState {
    in_use: HashSet<u32>,
    rng: StdRng,
}

/// Issues retrieval keys that have not been handed out before.
#[derive(Debug)]
pub struct KeyAllocator {
    key_space: u32,
    max_attempts: u32,
    state: Mutex<AllocatorState>,
}

impl KeyAllocator {
    /// Create an allocator over `0..key_space` seeded from OS entropy.
    pub fn new(key_space: u32, max_attempts: u32) -> Self {
        Self::with_rng(key_space, max_attempts, StdRng::from_entropy())
    }

    /// Create an allocator with a caller-supplied generator.
    pub fn with_rng(key_space: u32, max_attempts: u32, rng: StdRng) -> Self {
        Self {
            key_space,
            max_attempts: max_attempts.max(1),
            state: Mutex::new(AllocatorState {
                in_use: HashSet::new(),
                rng,
            }),
        }
    }

    /// Issue a fresh key and record it as in use.
    ///
    /// Returns `AllocationError::KeySpaceExhausted` once every slot in the
    /// key space has been issued.
    pub fn allocate(&self) -> Result<RetrievalKey, AllocationError> {
        let exhausted = AllocationError::KeySpaceExhausted {
            key_space: self.key_space,
        };
        if self.key_space == 0 {
            return Err(exhausted);
        }

        let mut state = self.lock();
        if state.in_use.len() as u64 >= u64::from(self.key_space) {
            tracing::warn!(key_space = self.key_space, "retrieval key space exhausted");
            return Err(exhausted);
        }

        let mut candidate = 0;
        for attempt in 1..=self.max_attempts {
            candidate = state.rng.gen_range(0..self.key_space);
            if state.in_use.insert(candidate) {
                tracing::debug!(key = candidate, attempt, "allocated retrieval key");
                return Ok(RetrievalKey::from_slot(candidate));
            }
        }

        let key_space = u64::from(self.key_space);
        let free = (1..key_space)
            .map(|offset| ((u64::from(candidate) + offset) % key_space) as u32)
            .find(|slot| !state.in_use.contains(slot));

        match free {
            Some(slot) => {
                state.in_use.insert(slot);
                tracing::debug!(
                    key = slot,
                    attempts = self.max_attempts,
                    "allocated retrieval key by linear scan"
                );
                Ok(RetrievalKey::from_slot(slot))
            }
            None => Err(exhausted),
        }
    }

    /// Whether `key` has been issued by this allocator.
    pub fn is_allocated(&self, key: &RetrievalKey) -> bool {
        match key.slot() {
            Some(slot) if slot < self.key_space && key.as_str() == slot.to_string() => {
                self.lock().in_use.contains(&slot)
            }
            _ => false,
        }
    }

    /// Number of keys issued so far.
    pub fn allocated(&self) -> usize {
        self.lock().in_use.len()
    }

    pub fn key_space(&self) -> u32 {
        self.key_space
    }

    // Nothing inside the critical section panics, so a poisoned lock still
    // holds a consistent set.
    fn lock(&self) -> MutexGuard<'_, AllocatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
