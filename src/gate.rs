//! The passive per-gate record (component A).

use crate::refs::{GateKind, GatePin, GateRef};

/// One three-operand Boolean gate: two operand pins feed one output bit.
///
/// `value` is the carry counter described in the builder module: the worst-case number of
/// 1-bits that could have contributed to this gate's output through an unbounded XOR chain.
/// `connectionsToA`/`connectionsToB` preserve insertion order, which the polynomial layout
/// builder later depends on when it rotates connection cycles.
#[derive(Clone, Debug)]
pub struct Gate {
    pub kind: GateKind,
    pub ref_a: GateRef,
    pub ref_b: GateRef,
    pub ref_r: GateRef,
    pub pin_a: GatePin,
    pub pin_b: GatePin,
    pub bit: [u8; 3],
    pub value: u64,
    pub max_value: u64,
    pub fan_out: u64,
    pub connections_to_a: Vec<GateRef>,
    pub connections_to_b: Vec<GateRef>,
}

impl Gate {
    /// A freshly reset gate: unbound, zero bits, zero carry.
    pub fn new() -> Self {
        Gate {
            kind: GateKind::Unknown,
            ref_a: 0,
            ref_b: 0,
            ref_r: 0,
            pin_a: GatePin::InputA,
            pin_b: GatePin::InputA,
            bit: [0; 3],
            value: 0,
            max_value: 0,
            fan_out: 0,
            connections_to_a: Vec::new(),
            connections_to_b: Vec::new(),
        }
    }

    /// Puts the gate back to its just-allocated state, as `resetBitsAndCounters` does for
    /// every slot in the arena.
    pub fn reset(&mut self) {
        self.kind = GateKind::Unknown;
        self.ref_a = 0;
        self.ref_b = 0;
        self.ref_r = 0;
        self.pin_a = GatePin::InputA;
        self.pin_b = GatePin::InputA;
        self.bit = [0; 3];
        self.value = 0;
        self.max_value = 0;
        self.fan_out = 0;
        self.connections_to_a.clear();
        self.connections_to_b.clear();
    }

    /// Reads the bit currently held at `pin`.
    pub fn bit(&self, pin: GatePin) -> u8 {
        self.bit[pin.index()]
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}
