//! The polynomial layout builder (component G): tiles `numberOfSlots` copies of the circuit
//! across an evaluation domain of size `L = 2^k` and rotates every connection cycle into a
//! permutation identity.
//!
//! Phase 1 lays three pairwise-disjoint cosets of the order-`L` multiplicative subgroup
//! (labelled by `1`, `k1`, `k2`) into `(a, b, r)`, plus the gate kind into `op`. Phase 2 then
//! walks each tiled copy of the circuit and, for every gate, rotates the cycle
//! `R_i -> A_{t1} -> ... -> B_{u1} -> ... -> R_i` by one position — the construction that
//! encodes "every pin reading gate `i` equals gate `i`'s output" as a polynomial permutation
//! argument.
//!
//! This operates directly on a [`GateArena`] and an explicit `next_ref`, rather than on a full
//! [`KeccakGateBuilder`](crate::builder::KeccakGateBuilder): the layout only ever reads gate
//! kinds and connection lists, so it stays testable against small hand-built arenas without
//! paying for the builder's fixed 1600+1600-wide state reservation.

use plonky2_field::types::{Field, PrimeField};
use serde::Serialize;

use crate::arena::GateArena;
use crate::refs::GateRef;

/// Default evaluation domain parity.
pub const DEFAULT_PARITY: usize = 23;

/// First non-residue coset multiplier.
const K1: u64 = 2;
/// Second non-residue coset multiplier.
const K2: u64 = 3;

#[derive(Serialize)]
pub struct Pols {
    a: Vec<String>,
    b: Vec<String>,
    r: Vec<String>,
    op: Vec<u8>,
}

#[derive(Serialize)]
pub struct PolsDocument {
    pols: Pols,
}

/// Builds the `(a, b, r, op)` polynomials for the first `next_ref` gates of `arena`, tiled
/// across a domain of size `2^k`.
///
/// `k` must not exceed `F::TWO_ADICITY`, and `arena` must not be mutated again afterwards: phase
/// 2 reads `connectionsToA`/`connectionsToB` in their final, post-build order.
pub fn build<F: PrimeField>(arena: &GateArena, next_ref: GateRef, k: usize) -> PolsDocument {
    let length = 1usize << k;
    debug_assert_eq!(plonky2_util::log2_strict(length), k);
    let next_ref_usize = next_ref as usize;
    assert!(next_ref_usize > 0, "arena has no bound gates");
    let number_of_slots = length / next_ref_usize;

    let generator = F::primitive_root_of_unity(k);
    let k1 = F::from_canonical_u64(K1);
    let k2 = F::from_canonical_u64(K2);

    // Phase 1: default assignment into three disjoint cosets of <generator>.
    let mut pol_a = vec![F::ZERO; length];
    let mut pol_b = vec![F::ZERO; length];
    let mut pol_r = vec![F::ZERO; length];
    let mut pol_op = vec![0u8; length];

    let mut acc = F::ONE;
    for i in 0..length {
        acc *= generator;
        pol_a[i] = acc;
        pol_b[i] = acc * k1;
        pol_r[i] = acc * k2;
        pol_op[i] = arena.get((i % next_ref_usize) as GateRef).kind.ordinal();
    }

    // Phase 2: rotate every connection cycle, once per tiled slot.
    for slot in 0..number_of_slots {
        let offset = slot * next_ref_usize;
        for i in 0..next_ref_usize {
            let gate = arena.get(i as GateRef);
            let mut carry = pol_r[offset + i];
            for &t in &gate.connections_to_a {
                let t = offset + t as usize;
                let tmp = pol_a[t];
                pol_a[t] = carry;
                carry = tmp;
            }
            for &t in &gate.connections_to_b {
                let t = offset + t as usize;
                let tmp = pol_b[t];
                pol_b[t] = carry;
                carry = tmp;
            }
            pol_r[offset + i] = carry;
        }
    }

    PolsDocument {
        pols: Pols {
            a: pol_a.iter().map(|x| x.to_canonical_biguint().to_string()).collect(),
            b: pol_b.iter().map(|x| x.to_canonical_biguint().to_string()).collect(),
            r: pol_r.iter().map(|x| x.to_canonical_biguint().to_string()).collect(),
            op: pol_op,
        },
    }
}

impl PolsDocument {
    pub fn to_json_string(&self) -> anyhow::Result<String> {
        use anyhow::Context;
        serde_json::to_string(self).context("serializing polynomial layout to JSON")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use plonky2_field::goldilocks_field::GoldilocksField;

    use super::*;
    use crate::refs::GateKind;

    type F = GoldilocksField;

    /// A 4-gate arena: gates 0 and 1 are roots (no inputs of interest here, only their
    /// outgoing connections matter to phase 2); gate 2 reads gate 0 on pinA and gate 1 on
    /// pinB; gate 3 reads gate 2 on pinA and gate 1 on pinB.
    fn tiny_arena() -> GateArena {
        let mut arena = GateArena::new(4);
        for r in 0..4 {
            arena.get_mut(r).kind = GateKind::Xor;
        }
        arena.get_mut(0).connections_to_a.push(2);
        arena.get_mut(1).connections_to_b.push(2);
        arena.get_mut(2).connections_to_a.push(3);
        arena.get_mut(1).connections_to_b.push(3);
        arena
    }

    #[test]
    fn s6_rotation_round_trips_under_manual_inverse() {
        let arena = tiny_arena();
        let next_ref: GateRef = 4;
        let k = 3; // L = 8, numberOfSlots = 2.
        let length = 1usize << k;
        let number_of_slots = length / next_ref as usize;
        assert_eq!(number_of_slots, 2);

        // Recompute phase 1 directly, independent of `build`, to get a pre-permutation baseline.
        let generator = F::primitive_root_of_unity(k);
        let k1 = F::from_canonical_u64(K1);
        let k2 = F::from_canonical_u64(K2);
        let mut acc = F::ONE;
        let mut pre_a = vec![F::ZERO; length];
        let mut pre_b = vec![F::ZERO; length];
        let mut pre_r = vec![F::ZERO; length];
        for i in 0..length {
            acc *= generator;
            pre_a[i] = acc;
            pre_b[i] = acc * k1;
            pre_r[i] = acc * k2;
        }

        let doc = build::<F>(&arena, next_ref, k);
        let to_f = |s: &str| -> F { F::from_canonical_u64(s.parse::<u64>().unwrap()) };
        let mut post_a: Vec<F> = doc.pols.a.iter().map(|s| to_f(s)).collect();
        let mut post_b: Vec<F> = doc.pols.b.iter().map(|s| to_f(s)).collect();
        let mut post_r: Vec<F> = doc.pols.r.iter().map(|s| to_f(s)).collect();

        // Manually invert the rotation, slot by slot, gate by gate, in reverse connection order.
        for slot in 0..number_of_slots {
            let offset = slot * next_ref as usize;
            for i in (0..next_ref as usize).rev() {
                let gate = arena.get(i as GateRef);
                let mut carry = post_r[offset + i];
                for &t in gate.connections_to_b.iter().rev() {
                    let t = offset + t as usize;
                    let tmp = post_b[t];
                    post_b[t] = carry;
                    carry = tmp;
                }
                for &t in gate.connections_to_a.iter().rev() {
                    let t = offset + t as usize;
                    let tmp = post_a[t];
                    post_a[t] = carry;
                    carry = tmp;
                }
                post_r[offset + i] = carry;
            }
        }

        assert_eq!(post_a, pre_a);
        assert_eq!(post_b, pre_b);
        assert_eq!(post_r, pre_r);
    }

    #[test]
    fn s7_coset_disjointness() {
        let arena = tiny_arena();
        let doc = build::<F>(&arena, 4, 3);
        let a: HashSet<_> = doc.pols.a.iter().collect();
        let b_set: HashSet<_> = doc.pols.b.iter().collect();
        let r_set: HashSet<_> = doc.pols.r.iter().collect();
        assert!(a.is_disjoint(&b_set));
        assert!(a.is_disjoint(&r_set));
        assert!(b_set.is_disjoint(&r_set));
    }

    #[test]
    fn op_column_matches_gate_kind_modulo_next_ref() {
        let arena = tiny_arena();
        let next_ref: GateRef = 4;
        let doc = build::<F>(&arena, next_ref, 3);
        for (i, &op) in doc.pols.op.iter().enumerate() {
            let expected = arena.get((i % next_ref as usize) as GateRef).kind.ordinal();
            assert_eq!(op, expected);
        }
    }
}
