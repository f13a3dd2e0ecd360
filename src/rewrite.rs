//! Whole-circuit rename application
//!
//! Applies a flat old-name to new-name mapping in one pass: module
//! definition names, every instance reference through nested scopes, and the
//! circuit's main designator. Produces the [`RenameMap`] record that later
//! passes use to translate references recorded against the pre-rename
//! circuit.

use crate::circuit::{Block, Circuit, Statement};
use crate::error::{Result, StabilizeError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Record of applied renames, scoped to one circuit.
///
/// Identity entries are omitted: a module absent from the map kept its name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenameMap {
    circuit: String,
    renames: IndexMap<String, String>,
}

impl RenameMap {
    /// Name of the circuit the renames apply to
    pub fn circuit(&self) -> &str {
        &self.circuit
    }

    /// New name recorded for an old module name, if it was renamed
    pub fn get(&self, old_name: &str) -> Option<&str> {
        self.renames.get(old_name).map(|s| s.as_str())
    }

    /// All (old, new) pairs in request order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.renames.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of renamed modules
    pub fn len(&self) -> usize {
        self.renames.len()
    }

    /// Whether no module was renamed
    pub fn is_empty(&self) -> bool {
        self.renames.is_empty()
    }
}

/// Apply the mapping to the circuit and emit the rename record.
///
/// After rewriting, all definition names (modules and stubs) must be
/// pairwise distinct; a collision means two desired-name groups incidentally
/// produced the same final string and is fatal.
pub fn apply_renames(
    circuit: &mut Circuit,
    renames: &IndexMap<String, String>,
) -> Result<RenameMap> {
    for module in &mut circuit.modules {
        if let Some(new_name) = renames.get(&module.name) {
            module.name = new_name.clone();
        }
        rewrite_block(&mut module.body, renames);
    }
    if let Some(new_main) = renames.get(&circuit.main) {
        circuit.main = new_main.clone();
    }

    let mut seen = HashSet::new();
    for name in circuit.definition_names() {
        if !seen.insert(name) {
            return Err(StabilizeError::GlobalNameCollision {
                name: name.to_string(),
            });
        }
    }

    Ok(RenameMap {
        circuit: circuit.name.clone(),
        renames: renames.clone(),
    })
}

fn rewrite_block(block: &mut Block, renames: &IndexMap<String, String>) {
    for stmt in &mut block.statements {
        match stmt {
            Statement::Instance { module, .. } => {
                if let Some(new_name) = renames.get(module.as_str()) {
                    *module = new_name.clone();
                }
            }
            Statement::Conditional {
                then_block,
                else_block,
                ..
            } => {
                rewrite_block(then_block, renames);
                if let Some(else_block) = else_block {
                    rewrite_block(else_block, renames);
                }
            }
            Statement::Block(inner) => rewrite_block(inner, renames),
            Statement::Wire { .. } | Statement::Register { .. } | Statement::Connect { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{Expression, Module, SourceInfo};

    fn instance(name: &str, module: &str) -> Statement {
        Statement::Instance {
            name: name.to_string(),
            module: module.to_string(),
            connections: IndexMap::new(),
            info: SourceInfo::None,
        }
    }

    fn renames(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    #[test]
    fn test_rewrites_instances_and_definitions() {
        let mut circuit = Circuit::new("test", "top");
        let mut top = Module::new("top");
        top.body.statements.push(instance("q", "queue_0"));
        circuit.add_module(top);
        circuit.add_module(Module::new("queue_0"));

        let map = apply_renames(&mut circuit, &renames(&[("queue_0", "Queue")])).unwrap();

        assert!(circuit.find_module("Queue").is_some());
        assert!(circuit.find_module("queue_0").is_none());
        match &circuit.find_module("top").unwrap().body.statements[0] {
            Statement::Instance { module, .. } => assert_eq!(module, "Queue"),
            other => panic!("expected instance, got {:?}", other),
        }
        assert_eq!(map.get("queue_0"), Some("Queue"));
        assert_eq!(map.circuit(), "test");
    }

    #[test]
    fn test_rewrites_nested_scopes() {
        let mut circuit = Circuit::new("test", "top");
        let mut top = Module::new("top");
        top.body.statements.push(Statement::Conditional {
            condition: Expression::Ref("en".to_string()),
            then_block: Block::new(vec![instance("a", "queue_0")]),
            else_block: Some(Block::new(vec![Statement::Block(Block::new(vec![
                instance("b", "queue_0"),
            ]))])),
            info: SourceInfo::None,
        });
        circuit.add_module(top);
        circuit.add_module(Module::new("queue_0"));

        apply_renames(&mut circuit, &renames(&[("queue_0", "Queue")])).unwrap();

        let top = circuit.find_module("top").unwrap();
        match &top.body.statements[0] {
            Statement::Conditional {
                then_block,
                else_block,
                ..
            } => {
                match &then_block.statements[0] {
                    Statement::Instance { module, .. } => assert_eq!(module, "Queue"),
                    other => panic!("expected instance, got {:?}", other),
                }
                match &else_block.as_ref().unwrap().statements[0] {
                    Statement::Block(inner) => match &inner.statements[0] {
                        Statement::Instance { module, .. } => assert_eq!(module, "Queue"),
                        other => panic!("expected instance, got {:?}", other),
                    },
                    other => panic!("expected block, got {:?}", other),
                }
            }
            other => panic!("expected conditional, got {:?}", other),
        }
    }

    #[test]
    fn test_rewrites_main_designator() {
        let mut circuit = Circuit::new("test", "core_0");
        circuit.add_module(Module::new("core_0"));

        apply_renames(&mut circuit, &renames(&[("core_0", "Core")])).unwrap();
        assert_eq!(circuit.main, "Core");
    }

    #[test]
    fn test_collision_with_existing_definition_is_fatal() {
        let mut circuit = Circuit::new("test", "top");
        circuit.add_module(Module::new("top"));
        circuit.add_module(Module::new("queue_0"));
        circuit.add_module(Module::new("Queue"));

        let err = apply_renames(&mut circuit, &renames(&[("queue_0", "Queue")])).unwrap_err();
        assert_eq!(
            err,
            StabilizeError::GlobalNameCollision {
                name: "Queue".to_string()
            }
        );
    }

    #[test]
    fn test_empty_mapping_is_a_no_op() {
        let mut circuit = Circuit::new("test", "top");
        circuit.add_module(Module::new("top"));
        let before = circuit.clone();

        let map = apply_renames(&mut circuit, &IndexMap::new()).unwrap();
        assert!(map.is_empty());
        assert_eq!(circuit, before);
    }
}
