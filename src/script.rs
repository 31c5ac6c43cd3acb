//! The script serializer (component F): turns a built [`KeccakGateBuilder`] into the ordered
//! evaluation log, the full gate table with its wiring, and the run's counters.
//!
//! Runs after every gate is bound; never mutates the builder.

use std::io::Write;

use anyhow::Context;
use serde::Serialize;

use crate::builder::KeccakGateBuilder;
use crate::gate::Gate;
use crate::refs::GateRef;

#[derive(Serialize)]
pub struct Evaluation {
    op: &'static str,
    refa: GateRef,
    refb: GateRef,
    refr: GateRef,
    pina: u8,
    pinb: u8,
}

#[derive(Serialize)]
pub struct GateRecord {
    rindex: u64,
    refr: GateRef,
    refa: GateRef,
    refb: GateRef,
    pina: u8,
    pinb: u8,
    op: &'static str,
    #[serde(rename = "fanOut")]
    fan_out: u64,
    connections: String,
}

#[derive(Serialize)]
pub struct Script {
    evaluations: Vec<Evaluation>,
    gates: Vec<GateRecord>,
    #[serde(rename = "maxRef")]
    max_ref: GateRef,
    xors: u64,
    andps: u64,
    #[serde(rename = "maxValue")]
    max_value: u64,
}

/// Formats a gate's wiring as `A[..],A[..],...,B[..],...`: every `connectionsToA` entry, in
/// insertion order, followed by every `connectionsToB` entry, in insertion order.
fn format_connections(gate: &Gate) -> String {
    gate.connections_to_a
        .iter()
        .map(|t| format!("A[{t}]"))
        .chain(gate.connections_to_b.iter().map(|t| format!("B[{t}]")))
        .collect::<Vec<_>>()
        .join(",")
}

impl Script {
    /// Builds the script document from a builder whose gates are all bound. Unbound gates
    /// (`kind == Unknown`) have no string representation and panic in
    /// [`GateKind::as_str`](crate::refs::GateKind::as_str).
    pub fn build(b: &KeccakGateBuilder) -> Script {
        let evaluations = b
            .evals()
            .iter()
            .map(|&r| {
                let g = b.gate(r);
                Evaluation {
                    op: g.kind.as_str(),
                    refa: g.ref_a,
                    refb: g.ref_b,
                    refr: g.ref_r,
                    pina: g.pin_a.index() as u8,
                    pinb: g.pin_b.index() as u8,
                }
            })
            .collect();

        let gates = (0..b.next_ref())
            .map(|r| {
                let g = b.gate(r);
                GateRecord {
                    rindex: r,
                    refr: g.ref_r,
                    refa: g.ref_a,
                    refb: g.ref_b,
                    pina: g.pin_a.index() as u8,
                    pinb: g.pin_b.index() as u8,
                    op: g.kind.as_str(),
                    fan_out: g.fan_out,
                    connections: format_connections(g),
                }
            })
            .collect();

        Script {
            evaluations,
            gates,
            max_ref: b.next_ref() - 1,
            xors: b.xors(),
            andps: b.andps(),
            max_value: b.total_max_value(),
        }
    }

    pub fn write_json<W: Write>(&self, w: W) -> anyhow::Result<()> {
        serde_json::to_writer(w, self).context("serializing gate script to JSON")
    }

    pub fn to_json_string(&self) -> anyhow::Result<String> {
        serde_json::to_string(self).context("serializing gate script to JSON")
    }
}
