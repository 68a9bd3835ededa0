//! Accumulator for table keys claimed during a run
//!
//! Instructions are identified by their position in the sorted input, not by source
//! id: two documents in different directories can share a file stem.

use std::collections::HashMap;

/// Outcome of offering a key to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// The key is new, or already belongs to the same instruction.
    Fresh,
    /// Another instruction holds the key but the policy allowed a second entry.
    Shared { previous: usize },
    /// Another instruction holds the key; the offered entry must be dropped.
    Rejected { owner: usize },
}

/// Maps each lower-cased table key to the instruction that last claimed it.
#[derive(Debug, Default, Clone)]
pub struct KeyLedger {
    owners: HashMap<String, usize>,
}

impl KeyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer `key` on behalf of instruction `claimant`. `allow_shared` is the
    /// disambiguation policy's verdict for that instruction.
    pub fn claim(&mut self, key: &str, claimant: usize, allow_shared: bool) -> Claim {
        match self.owners.get_mut(key) {
            Some(owner) if *owner == claimant => Claim::Fresh,
            Some(owner) if allow_shared => Claim::Shared {
                previous: std::mem::replace(owner, claimant),
            },
            Some(owner) => Claim::Rejected { owner: *owner },
            None => {
                self.owners.insert(key.to_string(), claimant);
                Claim::Fresh
            }
        }
    }
}
