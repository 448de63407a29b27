//! Fixed-capacity history of a pool's cumulative prices.
//!
//! Slots are written at `cursor % MAX_OBSERVATIONS`. Until the ring is full
//! the vector simply grows; afterwards each write replaces the oldest entry,
//! which is always the one at the current cursor slot.

use soroban_sdk::{contracttype, Env, Vec, U256};

pub const MAX_OBSERVATIONS: u32 = 24;
/// Minimum spacing, in seconds, between two recorded observations.
pub const MIN_UPDATE_DELAY: u64 = 300;
/// Default averaging window for `get_price`.
pub const PERIOD: u64 = 86_400;
pub const PRICE_STALENESS_THRESHOLD: u64 = 7_200;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Observation {
    pub timestamp: u64,
    pub price_0_cumulative: U256,
    pub price_1_cumulative: U256,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ObservationRing {
    pub observations: Vec<Observation>,
    /// Total number of writes, never reset.
    pub cursor: u32,
    pub last_update: u64,
}

impl ObservationRing {
    pub fn new(env: &Env) -> Self {
        ObservationRing { observations: Vec::new(env), cursor: 0, last_update: 0 }
    }

    pub fn len(&self) -> u32 {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Slot the next observation goes to.
    pub fn current_index(&self) -> u32 {
        self.cursor % MAX_OBSERVATIONS
    }

    pub fn is_due(&self, now: u64) -> bool {
        self.is_empty() || now.saturating_sub(self.last_update) >= MIN_UPDATE_DELAY
    }

    pub fn record(&mut self, observation: Observation) {
        let slot = self.current_index();
        self.last_update = observation.timestamp;
        if slot < self.observations.len() {
            self.observations.set(slot, observation);
        } else {
            self.observations.push_back(observation);
        }
        self.cursor += 1;
    }

    pub fn newest(&self) -> Option<Observation> {
        if self.is_empty() {
            return None;
        }
        self.observations.get((self.cursor - 1) % MAX_OBSERVATIONS)
    }

    pub fn oldest(&self) -> Option<Observation> {
        if self.len() < MAX_OBSERVATIONS {
            self.observations.get(0)
        } else {
            self.observations.get(self.current_index())
        }
    }

    /// Entries from oldest to newest.
    pub fn chronological(&self, env: &Env) -> Vec<Observation> {
        let len = self.len();
        let start = if len < MAX_OBSERVATIONS { 0 } else { self.current_index() };
        let mut ordered = Vec::new(env);
        for offset in 0..len {
            if let Some(observation) = self.observations.get((start + offset) % len) {
                ordered.push_back(observation);
            }
        }
        ordered
    }

    /// The entry recorded strictly before `now` whose timestamp is closest
    /// to `target`. On equal distance the older entry wins.
    pub fn closest_to(&self, target: u64, now: u64) -> Option<Observation> {
        let mut best: Option<Observation> = None;
        for observation in self.observations.iter() {
            if observation.timestamp >= now {
                continue;
            }
            let distance = observation.timestamp.abs_diff(target);
            let better = match &best {
                None => true,
                Some(current) => {
                    let current_distance = current.timestamp.abs_diff(target);
                    distance < current_distance
                        || (distance == current_distance && observation.timestamp < current.timestamp)
                }
            };
            if better {
                best = Some(observation);
            }
        }
        best
    }
}
