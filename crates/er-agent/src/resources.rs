//! Multiset of equipment held by the agent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use er_core::{DisasterKind, ResourceKind};

/// Counted resource holdings.  Iteration order is the `ResourceKind`
/// declaration order, so snapshots serialise deterministically.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceBag {
    counts: BTreeMap<ResourceKind, u32>,
}

impl ResourceBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: ResourceKind) {
        *self.counts.entry(kind).or_insert(0) += 1;
    }

    /// Remove one `kind`.  Returns `false` if none was held.
    pub fn take(&mut self, kind: ResourceKind) -> bool {
        match self.counts.get_mut(&kind) {
            Some(n) if *n > 1 => {
                *n -= 1;
                true
            }
            Some(_) => {
                self.counts.remove(&kind);
                true
            }
            None => false,
        }
    }

    /// Remove one item for a rescue in `disaster`: a preferred kind if one is
    /// held, otherwise the first kind in declaration order.
    pub fn take_for(&mut self, disaster: DisasterKind) -> Option<ResourceKind> {
        let kind = self
            .counts
            .keys()
            .copied()
            .find(|k| k.is_preferred_for(disaster))
            .or_else(|| self.counts.keys().next().copied())?;
        self.take(kind);
        Some(kind)
    }

    pub fn count(&self, kind: ResourceKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn has_preferred_for(&self, disaster: DisasterKind) -> bool {
        self.counts.keys().any(|k| k.is_preferred_for(disaster))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, u32)> + '_ {
        self.counts.iter().map(|(k, n)| (*k, *n))
    }
}

impl FromIterator<ResourceKind> for ResourceBag {
    fn from_iter<I: IntoIterator<Item = ResourceKind>>(iter: I) -> Self {
        let mut bag = ResourceBag::new();
        for kind in iter {
            bag.add(kind);
        }
        bag
    }
}
