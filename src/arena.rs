//! The gate arena (component B): a fixed-capacity dense store of every [`Gate`] the builder
//! will ever create, indexed by [`GateRef`].

use crate::gate::Gate;
use crate::refs::GateRef;

/// Owns every gate for the lifetime of a [`KeccakGateBuilder`](crate::builder::KeccakGateBuilder).
///
/// Allocated once at construction with room for exactly `maxRefs` gates; `nextRef` tracks how
/// much of it is in use. The arena never grows or shrinks after construction.
#[derive(Clone, Debug)]
pub struct GateArena {
    gates: Vec<Gate>,
}

impl GateArena {
    /// Allocates `max_refs` reset gates.
    pub fn new(max_refs: usize) -> Self {
        GateArena {
            gates: (0..max_refs).map(|_| Gate::new()).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.gates.len()
    }

    pub fn get(&self, r: GateRef) -> &Gate {
        &self.gates[r as usize]
    }

    pub fn get_mut(&mut self, r: GateRef) -> &mut Gate {
        &mut self.gates[r as usize]
    }

    /// Resets every gate in place, without changing capacity.
    pub fn reset_all(&mut self) {
        for g in self.gates.iter_mut() {
            g.reset();
        }
    }
}
