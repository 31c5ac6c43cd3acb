//! Compiles the Keccak-f\[1600\] permutation into a flat, ordered gate script and a polynomial
//! witness layout, both consumable by a downstream zero-knowledge proof system.
//!
//! This crate is the gate arena, carry-aware operator insertion, connection/permutation
//! bookkeeping and polynomial layout core. It does not drive the Keccak permutation itself
//! (theta/rho/pi/chi/iota): callers issue [`builder::KeccakGateBuilder::op`] (and the `xor`,
//! `andp`, `xorn` wrappers) directly, the way an external Keccak driver would.

pub mod arena;
pub mod builder;
pub mod gate;
pub mod pols;
pub mod refs;
pub mod script;

pub use builder::KeccakGateBuilder;
pub use gate::Gate;
pub use refs::{GateKind, GatePin, GateRef};
