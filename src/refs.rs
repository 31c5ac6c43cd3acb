//! Reference types and the fixed layout of the reserved region of the arena.
//!
//! A [`GateRef`] is a small integer index into the [`GateArena`](crate::arena::GateArena).
//! Two constants (`ZeroRef`, `OneRef`) and two 1600-wide ranges (`SinRef0.., SoutRef0..`) are
//! reserved at the bottom of the arena; everything from `FirstNextRef` up is handed out
//! dynamically by [`getFreeRef`](crate::builder::KeccakGateBuilder::get_free_ref).

use serde::{Deserialize, Serialize};

/// An index into the gate arena.
pub type GateRef = u64;

/// Width, in bits, of the Keccak-f[1600] state.
pub const STATE_WIDTH: usize = 1600;

/// Width, in bits, of the Keccak bitrate (`r = 1088` for the SHA3-256 parameterization).
pub const RATE_WIDTH: usize = 1088;

/// The gate that always evaluates to 0.
pub const ZERO_REF: GateRef = 0;
/// The gate that always evaluates to 1.
pub const ONE_REF: GateRef = 1;
/// First of 1600 contiguous refs holding the round's input state.
pub const SIN_REF_0: GateRef = 2;
/// First of 1600 contiguous refs holding the round's output state.
pub const SOUT_REF_0: GateRef = SIN_REF_0 + STATE_WIDTH as GateRef;
/// First ref handed out by [`getFreeRef`](crate::builder::KeccakGateBuilder::get_free_ref).
pub const FIRST_NEXT_REF: GateRef = SOUT_REF_0 + STATE_WIDTH as GateRef;

static_assertions::const_assert!(SIN_REF_0 > ONE_REF);
static_assertions::const_assert!(SOUT_REF_0 == SIN_REF_0 + STATE_WIDTH as GateRef);
static_assertions::const_assert!(FIRST_NEXT_REF == SOUT_REF_0 + STATE_WIDTH as GateRef);

/// Which of a gate's three bit slots is being read or written.
///
/// The discriminant values are fixed at `input_a=0, input_b=1, output=2` so the script
/// document's `pina`/`pinb` integers stay stable across reimplementations.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[repr(u8)]
pub enum GatePin {
    InputA = 0,
    InputB = 1,
    Output = 2,
}

impl GatePin {
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// The Boolean operation a gate performs.
///
/// `XorNorm` computes the same bit as `Xor` but resets the carry [`value`](crate::gate::Gate::value)
/// to 1; see the carry-aware demotion rule in [`crate::builder`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[repr(u8)]
pub enum GateKind {
    Unknown = 0,
    Xor = 1,
    AndNot = 2,
    XorNorm = 3,
}

impl GateKind {
    /// Name used in the script document and in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            GateKind::Xor => "xor",
            GateKind::AndNot => "andp",
            GateKind::XorNorm => "xorn",
            GateKind::Unknown => panic!("GateKind::as_str called on an unbound gate"),
        }
    }

    /// Integer encoding used by the `op` column of the polynomial document.
    pub fn ordinal(self) -> u8 {
        self as u8
    }
}
