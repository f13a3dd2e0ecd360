//! Request validation, collision grouping and strategy selection
//!
//! Turns the caller-supplied desired-name requests and strategy overrides
//! into one flat old-name to new-name mapping for the whole circuit. Every
//! violated precondition is fatal; a partial rename would leave the circuit
//! inconsistent.

use crate::circuit::Circuit;
use crate::error::{Result, StabilizeError};
use crate::strategy::{evaluate, NamingStrategy, FALLBACK_ORDER};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// "This module should be called `desired_name` if possible"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredNameRequest {
    /// Current module name
    pub module: String,
    /// Requested replacement name
    pub desired_name: String,
}

impl DesiredNameRequest {
    pub fn new(module: impl Into<String>, desired_name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            desired_name: desired_name.into(),
        }
    }
}

/// A hard per-module strategy request; at most one strategy per module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyOverride {
    /// Module the override applies to
    pub module: String,
    /// Strategy that must be used for the module's collision group
    pub strategy: NamingStrategy,
}

impl StrategyOverride {
    pub fn new(module: impl Into<String>, strategy: NamingStrategy) -> Self {
        Self {
            module: module.into(),
            strategy,
        }
    }
}

/// Resolve all requests into one flat rename mapping.
///
/// Identity assignments are dropped; the returned map contains exactly the
/// modules whose names change, keyed by old name in request order.
pub fn resolve_renames(
    circuit: &Circuit,
    requests: &[DesiredNameRequest],
    overrides: &[StrategyOverride],
) -> Result<IndexMap<String, String>> {
    let desired = validate_requests(circuit, requests)?;
    let overrides = collect_overrides(overrides)?;

    // Collision groups, keyed by desired name in request order
    let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
    for (module, desired_name) in &desired {
        groups
            .entry(desired_name.clone())
            .or_default()
            .push(module.clone());
    }

    let mut renames = IndexMap::new();
    // Which group claimed each module; group results must be key-disjoint
    let mut owner: IndexMap<String, String> = IndexMap::new();
    for (desired_name, members) in &groups {
        let assigned = resolve_group(circuit, desired_name, members, &overrides)?;
        for (module, new_name) in assigned {
            if let Some(first) = owner.insert(module.clone(), desired_name.clone()) {
                return Err(StabilizeError::DuplicateRequest {
                    module,
                    first,
                    second: desired_name.clone(),
                });
            }
            if module != new_name {
                renames.insert(module, new_name);
            }
        }
    }
    Ok(renames)
}

/// Validate requests down to one desired name per module.
///
/// Identical duplicate requests collapse; differing ones are fatal, as are
/// requests naming stubs or unknown modules.
fn validate_requests(
    circuit: &Circuit,
    requests: &[DesiredNameRequest],
) -> Result<IndexMap<String, String>> {
    let mut desired: IndexMap<String, String> = IndexMap::new();
    for request in requests {
        if circuit.is_ext_module(&request.module) {
            return Err(StabilizeError::ExternalModuleRequest {
                module: request.module.clone(),
            });
        }
        if circuit.find_module(&request.module).is_none() {
            return Err(StabilizeError::UnknownModule {
                module: request.module.clone(),
            });
        }
        match desired.get(&request.module) {
            Some(existing) if *existing != request.desired_name => {
                return Err(StabilizeError::DuplicateRequest {
                    module: request.module.clone(),
                    first: existing.clone(),
                    second: request.desired_name.clone(),
                });
            }
            _ => {
                desired.insert(request.module.clone(), request.desired_name.clone());
            }
        }
    }
    Ok(desired)
}

/// Collapse overrides to one strategy per module, rejecting conflicts
fn collect_overrides(overrides: &[StrategyOverride]) -> Result<IndexMap<String, NamingStrategy>> {
    let mut collected: IndexMap<String, NamingStrategy> = IndexMap::new();
    for over in overrides {
        match collected.get(&over.module) {
            Some(&existing) if existing != over.strategy => {
                return Err(StabilizeError::ConflictingOverrides {
                    module: over.module.clone(),
                    first: existing,
                    second: over.strategy,
                });
            }
            _ => {
                collected.insert(over.module.clone(), over.strategy);
            }
        }
    }
    Ok(collected)
}

/// Pick a strategy for one collision group and compute its assignment.
///
/// An override present on any member is a hard request: all member overrides
/// must agree, and the requested strategy must disambiguate. Without
/// overrides, strategies are tried in fallback order and the first that
/// disambiguates wins.
fn resolve_group(
    circuit: &Circuit,
    desired_name: &str,
    members: &[String],
    overrides: &IndexMap<String, NamingStrategy>,
) -> Result<IndexMap<String, String>> {
    let mut modules = Vec::with_capacity(members.len());
    for name in members {
        modules.push(
            circuit
                .find_module(name)
                .ok_or_else(|| StabilizeError::UnknownModule {
                    module: name.clone(),
                })?,
        );
    }

    let mut requested: Option<NamingStrategy> = None;
    for name in members {
        if let Some(&strategy) = overrides.get(name.as_str()) {
            match requested {
                Some(first) if first != strategy => {
                    return Err(StabilizeError::GroupOverrideMismatch {
                        desired_name: desired_name.to_string(),
                        module: name.clone(),
                        first,
                        second: strategy,
                    });
                }
                _ => requested = Some(strategy),
            }
        }
    }

    if let Some(strategy) = requested {
        debug!(desired = %desired_name, %strategy, "evaluating overridden strategy");
        return evaluate(strategy, desired_name, &modules).ok_or(
            StabilizeError::OverrideRejected {
                desired_name: desired_name.to_string(),
                strategy,
            },
        );
    }

    for strategy in FALLBACK_ORDER {
        if let Some(assigned) = evaluate(strategy, desired_name, &modules) {
            debug!(desired = %desired_name, %strategy, members = members.len(),
                   "strategy disambiguates group");
            return Ok(assigned);
        }
    }
    Err(StabilizeError::NoDisambiguation {
        desired_name: desired_name.to_string(),
    })
}
