//! The operator insertion engine (component D) and sponge glue (component E), built on top of
//! the [`GateArena`] (component B) and the state reference tables (component C).
//!
//! [`KeccakGateBuilder`] owns all of the builder state described in the data model: the arena,
//! `SinRefs`/`SoutRefs`, `nextRef`, the three operation counters, `totalMaxValue`, and the
//! chronological `evals` log. It is write-once-then-serialize: once the Keccak driver has
//! emitted every gate it needs, [`crate::script`] and [`crate::pols`] read it without mutating
//! it further.

use log::debug;

use crate::arena::GateArena;
use crate::gate::Gate;
use crate::refs::{
    GateKind, GatePin, GateRef, FIRST_NEXT_REF, ONE_REF, RATE_WIDTH, SIN_REF_0, SOUT_REF_0,
    STATE_WIDTH, ZERO_REF,
};

/// A Keccak-f\[1600\] gate builder.
///
/// `max_refs` is a build-time sizing parameter (the arena never grows); `max_carry_bits` bounds
/// how deep an XOR chain may run before [`op`](Self::op) demotes it to a normalized XOR. Both
/// are exposed as constructor parameters, rather than compile-time constants, so tests can
/// exercise small arenas and tight carry bounds (see the `carry_demotion` test below).
pub struct KeccakGateBuilder {
    arena: GateArena,
    max_refs: usize,
    max_carry_bits: u32,
    sin_refs: Vec<GateRef>,
    sout_refs: Vec<GateRef>,
    next_ref: GateRef,
    xors: u64,
    andps: u64,
    xorns: u64,
    total_max_value: u64,
    evals: Vec<GateRef>,
}

impl KeccakGateBuilder {
    pub fn new(max_refs: usize, max_carry_bits: u32) -> Self {
        assert!(
            max_refs > FIRST_NEXT_REF as usize,
            "max_refs={max_refs} too small to hold the reserved region (needs > {FIRST_NEXT_REF})"
        );
        assert!(
            max_carry_bits < 63,
            "max_carry_bits={max_carry_bits} would overflow a u64 carry comparison"
        );
        let mut b = KeccakGateBuilder {
            arena: GateArena::new(max_refs),
            max_refs,
            max_carry_bits,
            sin_refs: vec![0; STATE_WIDTH],
            sout_refs: vec![0; STATE_WIDTH],
            next_ref: FIRST_NEXT_REF,
            xors: 0,
            andps: 0,
            xorns: 0,
            total_max_value: 1,
            evals: Vec::new(),
        };
        b.reset_bits_and_counters();
        b
    }

    /// Puts the arena, reference tables and counters back to their initial state. Called at
    /// construction and from
    /// [`copy_sout_to_sin_and_reset_refs`](Self::copy_sout_to_sin_and_reset_refs).
    fn reset_bits_and_counters(&mut self) {
        self.arena.reset_all();
        self.total_max_value = 1;
        for i in 0..STATE_WIDTH {
            self.sin_refs[i] = SIN_REF_0 + i as GateRef;
            self.sout_refs[i] = SOUT_REF_0 + i as GateRef;
        }
        self.next_ref = FIRST_NEXT_REF;
        self.xors = 0;
        self.andps = 0;
        self.xorns = 0;
        self.evals.clear();

        self.arena.get_mut(ZERO_REF).bit[GatePin::InputA.index()] = 0;
        self.arena.get_mut(ZERO_REF).bit[GatePin::InputB.index()] = 0;
        self.op(GateKind::Xor, ZERO_REF, GatePin::InputA, ZERO_REF, GatePin::InputB, ZERO_REF);

        self.arena.get_mut(ONE_REF).bit[GatePin::InputA.index()] = 1;
        self.arena.get_mut(ONE_REF).bit[GatePin::InputB.index()] = 0;
        self.op(GateKind::Xor, ONE_REF, GatePin::InputA, ONE_REF, GatePin::InputB, ONE_REF);

        debug!("arena reset: next_ref={}", self.next_ref);
    }

    /// The three-operand insertion primitive. Validates its preconditions (fatal on violation,
    /// as there is no recoverable outcome for a malformed circuit), demotes `Xor` to `XorNorm`
    /// on carry overflow, writes the gate, and updates fan-out/connection bookkeeping and the
    /// evaluation log.
    pub fn op(
        &mut self,
        kind: GateKind,
        ref_a: GateRef,
        pin_a: GatePin,
        ref_b: GateRef,
        pin_b: GatePin,
        ref_r: GateRef,
    ) {
        let max_ref = self.max_refs as GateRef;
        assert!(ref_a < max_ref, "OP: refA={ref_a} out of range (max_refs={max_ref})");
        assert!(ref_b < max_ref, "OP: refB={ref_b} out of range (max_refs={max_ref})");
        assert!(ref_r < max_ref, "OP: refR={ref_r} out of range (max_refs={max_ref})");
        assert!(
            self.arena.get(ref_a).bit(pin_a) <= 1,
            "OP: gate[{ref_a}].bit[{pin_a:?}] is non-binary"
        );
        assert!(
            self.arena.get(ref_b).bit(pin_b) <= 1,
            "OP: gate[{ref_b}].bit[{pin_b:?}] is non-binary"
        );
        assert!(
            self.arena.get(ref_r).bit(GatePin::Output) <= 1,
            "OP: gate[{ref_r}].bit[output] is non-binary"
        );
        assert!(
            ref_a == ref_r || ref_b == ref_r || self.arena.get(ref_r).kind == GateKind::Unknown,
            "OP: refusing to rebind already-bound gate {ref_r}"
        );
        assert!(
            matches!(kind, GateKind::Xor | GateKind::AndNot | GateKind::XorNorm),
            "OP: invalid gate kind {kind:?}"
        );

        let mut kind = kind;
        if kind == GateKind::Xor {
            let sum = self.arena.get(ref_a).value + self.arena.get(ref_b).value;
            if sum >= 1u64 << (self.max_carry_bits + 1) {
                kind = GateKind::XorNorm;
            }
        }

        let bit_a = self.arena.get(ref_a).bit(pin_a);
        let bit_b = self.arena.get(ref_b).bit(pin_b);
        let (output, value) = match kind {
            GateKind::Xor => (
                bit_a ^ bit_b,
                self.arena.get(ref_a).value + self.arena.get(ref_b).value,
            ),
            GateKind::XorNorm => (bit_a ^ bit_b, 1),
            GateKind::AndNot => ((1 - bit_a) & bit_b, 1),
            GateKind::Unknown => unreachable!("filtered out above"),
        };

        {
            let g = self.arena.get_mut(ref_r);
            g.kind = kind;
            g.ref_a = ref_a;
            g.ref_b = ref_b;
            g.ref_r = ref_r;
            g.pin_a = pin_a;
            g.pin_b = pin_b;
            g.bit[GatePin::Output.index()] = output;
            g.value = value;
            if kind == GateKind::Xor {
                g.max_value = g.max_value.max(value);
            }
        }

        match kind {
            GateKind::Xor => {
                self.xors += 1;
                self.total_max_value = self.total_max_value.max(self.arena.get(ref_r).max_value);
            }
            GateKind::AndNot => self.andps += 1,
            GateKind::XorNorm => self.xorns += 1,
            GateKind::Unknown => unreachable!("filtered out above"),
        }

        if ref_a != ref_r {
            self.arena.get_mut(ref_a).fan_out += 1;
            self.arena.get_mut(ref_a).connections_to_a.push(ref_r);
        }
        if ref_b != ref_r {
            self.arena.get_mut(ref_b).fan_out += 1;
            self.arena.get_mut(ref_b).connections_to_b.push(ref_r);
        }

        self.evals.push(ref_r);
    }

    /// `OP(XOR, ...)`.
    pub fn xor(&mut self, ref_a: GateRef, pin_a: GatePin, ref_b: GateRef, pin_b: GatePin, ref_r: GateRef) {
        self.op(GateKind::Xor, ref_a, pin_a, ref_b, pin_b, ref_r);
    }

    /// `OP(AND_NOT, ...)`, i.e. `r = (NOT a) AND b`.
    pub fn andp(&mut self, ref_a: GateRef, pin_a: GatePin, ref_b: GateRef, pin_b: GatePin, ref_r: GateRef) {
        self.op(GateKind::AndNot, ref_a, pin_a, ref_b, pin_b, ref_r);
    }

    /// `OP(XOR_NORM, ...)`.
    pub fn xorn(&mut self, ref_a: GateRef, pin_a: GatePin, ref_b: GateRef, pin_b: GatePin, ref_r: GateRef) {
        self.op(GateKind::XorNorm, ref_a, pin_a, ref_b, pin_b, ref_r);
    }

    /// Writes `rin` into the `input_b` pin of the first [`RATE_WIDTH`] input-state gates. Does
    /// not create any gates; [`mix_rin`](Self::mix_rin) does that.
    pub fn set_rin(&mut self, rin: &[u8; RATE_WIDTH]) {
        for (i, &bit) in rin.iter().enumerate() {
            debug_assert!(bit <= 1, "set_rin: bit {i} is non-binary");
            self.arena.get_mut(SIN_REF_0 + i as GateRef).bit[GatePin::InputB.index()] = bit;
        }
    }

    /// Folds the bitrate bits of `Rin` into the state in place, and re-stamps the capacity bits
    /// as bound gates so that every state position is a bound gate before the permutation runs.
    pub fn mix_rin(&mut self) {
        for i in 0..RATE_WIDTH {
            let r = SIN_REF_0 + i as GateRef;
            self.op(GateKind::Xor, r, GatePin::InputA, r, GatePin::InputB, r);
        }
        for i in RATE_WIDTH..STATE_WIDTH {
            let r = SIN_REF_0 + i as GateRef;
            self.op(GateKind::Xor, r, GatePin::InputA, ZERO_REF, GatePin::Output, r);
        }
    }

    /// Packs the first 256 bits at `SinRef0` (8 bits per output byte, LSB first) into `out`.
    pub fn get_output(&self, out: &mut [u8; 32]) {
        for (i, byte) in out.iter_mut().enumerate() {
            let mut acc = 0u8;
            for j in 0..8 {
                let bit = self.arena.get(SIN_REF_0 + (8 * i + j) as GateRef).bit(GatePin::InputA);
                acc |= bit << j;
            }
            *byte = acc;
        }
    }

    /// Hands out the next free arena slot.
    pub fn get_free_ref(&mut self) -> GateRef {
        assert!(
            self.next_ref < self.max_refs as GateRef,
            "arena exhausted: next_ref={} max_refs={}",
            self.next_ref,
            self.max_refs
        );
        let r = self.next_ref;
        self.next_ref += 1;
        r
    }

    /// `SinRefs := SoutRefs` (index copy only; no gates are created or read).
    pub fn copy_sout_refs_to_sin_refs(&mut self) {
        self.sin_refs.copy_from_slice(&self.sout_refs);
    }

    /// Reads the 1600 output bits named by `SoutRefs`, resets the arena, and writes those bits
    /// back into the fresh `SinRef0..` gates' `input_a` pin. The fresh gates are not re-bound by
    /// an `OP` call here; callers that need every state position to be a bound gate must call
    /// [`mix_rin`](Self::mix_rin) next, which rebinds them.
    pub fn copy_sout_to_sin_and_reset_refs(&mut self) {
        let mut local_sout = [0u8; STATE_WIDTH];
        for (i, slot) in local_sout.iter_mut().enumerate() {
            *slot = self.arena.get(self.sout_refs[i]).bit(GatePin::Output);
        }
        self.reset_bits_and_counters();
        for (i, &bit) in local_sout.iter().enumerate() {
            self.arena.get_mut(SIN_REF_0 + i as GateRef).bit[GatePin::InputA.index()] = bit;
        }
    }

    pub fn sin_refs(&self) -> &[GateRef] {
        &self.sin_refs
    }

    pub fn sout_refs(&self) -> &[GateRef] {
        &self.sout_refs
    }

    pub fn set_sout_ref(&mut self, i: usize, r: GateRef) {
        self.sout_refs[i] = r;
    }

    pub fn gate(&self, r: GateRef) -> &Gate {
        self.arena.get(r)
    }

    /// Exposes the underlying arena for the polynomial layout builder, which only needs gate
    /// kinds and connection lists and operates independently of the builder's reserved-region
    /// bookkeeping.
    pub fn arena(&self) -> &GateArena {
        &self.arena
    }

    pub fn next_ref(&self) -> GateRef {
        self.next_ref
    }

    pub fn max_refs(&self) -> usize {
        self.max_refs
    }

    pub fn max_carry_bits(&self) -> u32 {
        self.max_carry_bits
    }

    pub fn evals(&self) -> &[GateRef] {
        &self.evals
    }

    pub fn xors(&self) -> u64 {
        self.xors
    }

    pub fn andps(&self) -> u64 {
        self.andps
    }

    pub fn xorns(&self) -> u64 {
        self.xorns
    }

    pub fn total_max_value(&self) -> u64 {
        self.total_max_value
    }
}
