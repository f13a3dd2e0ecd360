//! rtlname - stable module naming for elaborated circuits
//!
//! A post-elaboration pass that assigns stable, collision-free names to
//! generated module definitions. Hardware generators emit many structurally
//! identical or near-identical modules whose auto-generated names are
//! fragile across unrelated source edits; this pass computes a deterministic
//! replacement name for each module that collides under a desired target
//! name, then rewrites every reference circuit-wide and records the renames
//! for downstream consumers.
//!
//! Per desired name, the cheapest strategy that yields unique names wins:
//! the desired name itself, then a port-shape hash, then a full-structure
//! hash, then a full-content hash. Hash-based names are pure functions of
//! name-erased module structure, so they survive edits that only touch
//! unrelated parts of the design.

pub mod canonicalize;
pub mod circuit;
pub mod error;
pub mod resolve;
pub mod rewrite;
pub mod strategy;

// Re-export main types
pub use circuit::{
    BinaryOp, Block, Circuit, DataType, ExtModule, Expression, Field, Module, Port, PortDirection,
    SourceInfo, Statement, UnaryOp,
};
pub use error::{Result, StabilizeError};
pub use resolve::{resolve_renames, DesiredNameRequest, StrategyOverride};
pub use rewrite::{apply_renames, RenameMap};
pub use strategy::{evaluate, NamingStrategy, FALLBACK_ORDER};

use tracing::debug;

/// Assign stable names and rewrite the circuit in place.
///
/// Resolves each desired-name collision group to the cheapest strategy that
/// disambiguates it (honoring per-module overrides), then substitutes the
/// new names at every definition, every instance site and the main
/// designator. Returns the rename record for later reference-tracking
/// passes.
///
/// Not guaranteed idempotent on its own output: re-running with the original
/// requests may collide with names assigned by the first run.
pub fn stabilize_module_names(
    circuit: &mut Circuit,
    requests: &[DesiredNameRequest],
    overrides: &[StrategyOverride],
) -> Result<RenameMap> {
    debug!(
        requests = requests.len(),
        overrides = overrides.len(),
        circuit = %circuit.name,
        "resolving stable module names"
    );
    let renames = resolve::resolve_renames(circuit, requests, overrides)?;
    debug!(renamed = renames.len(), "applying module renames");
    rewrite::apply_renames(circuit, &renames)
}
