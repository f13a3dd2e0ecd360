//! Structural canonicalization for hash-based naming strategies
//!
//! Produces name-erased / info-erased views of a module used purely as hash
//! inputs. Erasure is a pure structural fold: ports stay in declared order,
//! statements stay in declared order, so two structurally identical modules
//! always erase to identical values regardless of how they were built.
//!
//! Three erasure levels:
//! - [`erase_port_names`]: port and bundle field names blanked, info blanked,
//!   shapes kept (port-interface fingerprint)
//! - [`erase_all_names`]: every name in the module blanked, including the
//!   module's own name, instance names, referenced module names and
//!   expression references, plus all info (full-structure fingerprint)
//! - [`erase_info`]: only position metadata blanked, names kept
//!   (full-content fingerprint)

use crate::circuit::{Block, DataType, Expression, Field, Module, Port, SourceInfo, Statement};

/// Blank every port name and every bundle field name, and drop info.
///
/// Ground and vector types pass through unchanged apart from nested bundle
/// fields, since they carry no names of their own.
pub fn erase_port_names(ports: &[Port]) -> Vec<Port> {
    let eraser = Eraser { erase_names: true };
    ports.iter().map(|p| eraser.port(p)).collect()
}

/// Blank every name in the module (its own, ports, fields, statement-level
/// names, instance module references, expression references) and all info.
pub fn erase_all_names(module: &Module) -> Module {
    Eraser { erase_names: true }.module(module)
}

/// Blank only position metadata throughout ports and body, names intact.
pub fn erase_info(module: &Module) -> Module {
    Eraser { erase_names: false }.module(module)
}

/// One fold over every node kind; the only knob is whether names survive.
/// Info never survives: each erasure level feeds a hash, and positions are
/// never hash-relevant.
struct Eraser {
    erase_names: bool,
}

impl Eraser {
    fn name(&self, name: &str) -> String {
        if self.erase_names {
            String::new()
        } else {
            name.to_string()
        }
    }

    fn module(&self, module: &Module) -> Module {
        Module {
            name: self.name(&module.name),
            ports: module.ports.iter().map(|p| self.port(p)).collect(),
            body: self.block(&module.body),
            info: SourceInfo::None,
        }
    }

    fn port(&self, port: &Port) -> Port {
        Port {
            name: self.name(&port.name),
            direction: port.direction,
            ty: self.datatype(&port.ty),
            info: SourceInfo::None,
        }
    }

    fn datatype(&self, ty: &DataType) -> DataType {
        match ty {
            DataType::Ground { width } => DataType::Ground { width: *width },
            DataType::Vector { element, size } => DataType::Vector {
                element: Box::new(self.datatype(element)),
                size: *size,
            },
            DataType::Bundle { fields } => DataType::Bundle {
                fields: fields
                    .iter()
                    .map(|f| Field {
                        name: self.name(&f.name),
                        ty: self.datatype(&f.ty),
                    })
                    .collect(),
            },
        }
    }

    fn block(&self, block: &Block) -> Block {
        Block {
            statements: block.statements.iter().map(|s| self.statement(s)).collect(),
        }
    }

    fn statement(&self, stmt: &Statement) -> Statement {
        match stmt {
            Statement::Wire { name, ty, .. } => Statement::Wire {
                name: self.name(name),
                ty: self.datatype(ty),
                info: SourceInfo::None,
            },
            Statement::Register {
                name, ty, clock, ..
            } => Statement::Register {
                name: self.name(name),
                ty: self.datatype(ty),
                clock: self.expression(clock),
                info: SourceInfo::None,
            },
            Statement::Instance {
                name,
                module,
                connections,
                ..
            } => Statement::Instance {
                name: self.name(name),
                module: self.name(module),
                // Connection keys are port names of the instantiated module.
                // Blanking every key of a map would collapse its entries, so
                // erased keys become their position, preserving connection
                // count and order in the hash input.
                connections: if self.erase_names {
                    connections
                        .values()
                        .enumerate()
                        .map(|(i, e)| (i.to_string(), self.expression(e)))
                        .collect()
                } else {
                    connections
                        .iter()
                        .map(|(k, e)| (k.clone(), self.expression(e)))
                        .collect()
                },
                info: SourceInfo::None,
            },
            Statement::Connect { target, value, .. } => Statement::Connect {
                target: self.expression(target),
                value: self.expression(value),
                info: SourceInfo::None,
            },
            Statement::Conditional {
                condition,
                then_block,
                else_block,
                ..
            } => Statement::Conditional {
                condition: self.expression(condition),
                then_block: self.block(then_block),
                else_block: else_block.as_ref().map(|b| self.block(b)),
                info: SourceInfo::None,
            },
            Statement::Block(block) => Statement::Block(self.block(block)),
        }
    }

    fn expression(&self, expr: &Expression) -> Expression {
        match expr {
            Expression::Ref(name) => Expression::Ref(self.name(name)),
            Expression::SubField { base, field } => Expression::SubField {
                base: Box::new(self.expression(base)),
                field: self.name(field),
            },
            Expression::SubIndex { base, index } => Expression::SubIndex {
                base: Box::new(self.expression(base)),
                index: *index,
            },
            Expression::Literal { width, value } => Expression::Literal {
                width: *width,
                value: *value,
            },
            Expression::Binary { op, left, right } => Expression::Binary {
                op: *op,
                left: Box::new(self.expression(left)),
                right: Box::new(self.expression(right)),
            },
            Expression::Unary { op, operand } => Expression::Unary {
                op: *op,
                operand: Box::new(self.expression(operand)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::PortDirection;

    fn bundle_port(name: &str, field: &str) -> Port {
        Port {
            name: name.to_string(),
            direction: PortDirection::Input,
            ty: DataType::Bundle {
                fields: vec![Field {
                    name: field.to_string(),
                    ty: DataType::Ground { width: 8 },
                }],
            },
            info: SourceInfo::Span {
                file: "a.fir".to_string(),
                line: 3,
                col: 1,
            },
        }
    }

    #[test]
    fn test_port_erasure_ignores_names_and_info() {
        let a = erase_port_names(&[bundle_port("enq", "bits")]);
        let b = erase_port_names(&[bundle_port("deq", "data")]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_port_erasure_keeps_shape() {
        let wide = Port {
            name: String::new(),
            direction: PortDirection::Input,
            ty: DataType::Ground { width: 16 },
            info: SourceInfo::None,
        };
        let narrow = Port {
            ty: DataType::Ground { width: 8 },
            ..wide.clone()
        };
        assert_ne!(erase_port_names(&[wide]), erase_port_names(&[narrow]));
    }

    #[test]
    fn test_full_erasure_blank_all_names() {
        let mut module = Module::new("queue_0");
        module.ports.push(bundle_port("enq", "bits"));
        module.body.statements.push(Statement::Register {
            name: "r0".to_string(),
            ty: DataType::Ground { width: 8 },
            clock: Expression::Ref("clk".to_string()),
            info: SourceInfo::None,
        });

        let mut renamed = module.clone();
        renamed.name = "queue_1".to_string();
        renamed.ports = vec![bundle_port("deq", "data")];
        if let Statement::Register { name, clock, .. } = &mut renamed.body.statements[0] {
            *name = "r_other".to_string();
            *clock = Expression::Ref("clock".to_string());
        }

        assert_eq!(erase_all_names(&module), erase_all_names(&renamed));
    }

    #[test]
    fn test_full_erasure_distinguishes_structure() {
        let mut one_reg = Module::new("m");
        one_reg.body.statements.push(Statement::Wire {
            name: "w".to_string(),
            ty: DataType::Ground { width: 1 },
            info: SourceInfo::None,
        });
        let mut two_regs = one_reg.clone();
        two_regs.body.statements.push(Statement::Wire {
            name: "w2".to_string(),
            ty: DataType::Ground { width: 1 },
            info: SourceInfo::None,
        });

        assert_ne!(erase_all_names(&one_reg), erase_all_names(&two_regs));
    }

    #[test]
    fn test_info_erasure_keeps_names() {
        let mut module = Module::new("m");
        module.ports.push(bundle_port("enq", "bits"));
        module.info = SourceInfo::Span {
            file: "m.fir".to_string(),
            line: 1,
            col: 1,
        };

        let erased = erase_info(&module);
        assert_eq!(erased.name, "m");
        assert_eq!(erased.ports[0].name, "enq");
        assert_eq!(erased.info, SourceInfo::None);
        assert_eq!(erased.ports[0].info, SourceInfo::None);
    }

    #[test]
    fn test_erased_connection_keys_are_positional() {
        let mut module = Module::new("parent");
        let mut connections = indexmap::IndexMap::new();
        connections.insert("clk".to_string(), Expression::Ref("clk".to_string()));
        connections.insert("d".to_string(), Expression::Ref("w".to_string()));
        module.body.statements.push(Statement::Instance {
            name: "u0".to_string(),
            module: "child".to_string(),
            connections,
            info: SourceInfo::None,
        });

        let erased = erase_all_names(&module);
        match &erased.body.statements[0] {
            Statement::Instance {
                name,
                module,
                connections,
                ..
            } => {
                assert!(name.is_empty());
                assert!(module.is_empty());
                let keys: Vec<_> = connections.keys().cloned().collect();
                assert_eq!(keys, vec!["0", "1"]);
            }
            other => panic!("expected instance, got {:?}", other),
        }
    }
}
