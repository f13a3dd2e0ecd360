//! Circuit IR for the stable-naming pass
//!
//! This is the post-elaboration view of a design: a flat list of module
//! definitions plus external black-box stubs, with a designated main module.
//! Modules carry ports, a statement tree (which may instantiate other
//! modules by name), and source-position metadata that is never
//! semantically significant.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Top-level container for a post-elaboration design
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Circuit name
    pub name: String,
    /// Name of the main (top) module
    pub main: String,
    /// Module definitions, in elaboration order
    pub modules: Vec<Module>,
    /// External black-box stubs (opaque, never renamed)
    pub ext_modules: Vec<ExtModule>,
}

/// A hardware module definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Module name, unique within the circuit
    pub name: String,
    /// Ports in declared order
    pub ports: Vec<Port>,
    /// Module body
    pub body: Block,
    /// Source position
    pub info: SourceInfo,
}

/// An external module stub with an externally fixed name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtModule {
    /// Stub name, unique within the circuit
    pub name: String,
    /// Ports in declared order
    pub ports: Vec<Port>,
    /// Name of the external definition this stub binds to, if different
    pub defname: Option<String>,
    /// Source position
    pub info: SourceInfo,
}

/// Port of a module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// Port name
    pub name: String,
    /// Port direction
    pub direction: PortDirection,
    /// Port type
    pub ty: DataType,
    /// Source position
    pub info: SourceInfo,
}

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortDirection {
    Input,
    Output,
}

/// Data types carried by ports, wires and registers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    /// Scalar bit vector
    Ground { width: u32 },
    /// Homogeneous vector
    Vector { element: Box<DataType>, size: u32 },
    /// Aggregate with named fields
    Bundle { fields: Vec<Field> },
}

/// Named field inside a bundle type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name
    pub name: String,
    /// Field type
    pub ty: DataType,
}

/// Block of statements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Statements in declared order
    pub statements: Vec<Statement>,
}

/// Statement in a module body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// Wire declaration
    Wire {
        name: String,
        ty: DataType,
        info: SourceInfo,
    },
    /// Register declaration
    Register {
        name: String,
        ty: DataType,
        clock: Expression,
        info: SourceInfo,
    },
    /// Instance of another module, referenced by definition name
    Instance {
        name: String,
        module: String,
        connections: IndexMap<String, Expression>,
        info: SourceInfo,
    },
    /// Connection of a value to a target
    Connect {
        target: Expression,
        value: Expression,
        info: SourceInfo,
    },
    /// Conditional statement
    Conditional {
        condition: Expression,
        then_block: Block,
        else_block: Option<Block>,
        info: SourceInfo,
    },
    /// Nested block scope
    Block(Block),
}

/// Expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Reference to a named component (port, wire, register, instance)
    Ref(String),
    /// Field selection on an aggregate
    SubField {
        base: Box<Expression>,
        field: String,
    },
    /// Element selection on a vector
    SubIndex { base: Box<Expression>, index: u32 },
    /// Literal value
    Literal { width: u32, value: u64 },
    /// Binary operation
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// Unary operation
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    And,
    Or,
    Xor,
    Equal,
    NotEqual,
    Less,
    Greater,
    LeftShift,
    RightShift,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Negate,
    AndReduce,
    OrReduce,
    XorReduce,
}

/// Source position metadata, never semantically significant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceInfo {
    /// No position recorded
    #[default]
    None,
    /// File/line/column position
    Span { file: String, line: u32, col: u32 },
}

impl Circuit {
    /// Create a new empty circuit with the given main module name
    pub fn new(name: impl Into<String>, main: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            main: main.into(),
            modules: Vec::new(),
            ext_modules: Vec::new(),
        }
    }

    /// Add a module definition to the circuit
    pub fn add_module(&mut self, module: Module) {
        self.modules.push(module);
    }

    /// Add an external stub to the circuit
    pub fn add_ext_module(&mut self, ext: ExtModule) {
        self.ext_modules.push(ext);
    }

    /// Look up a module definition by name
    pub fn find_module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Whether the name refers to an external stub
    pub fn is_ext_module(&self, name: &str) -> bool {
        self.ext_modules.iter().any(|e| e.name == name)
    }

    /// Whether the name refers to any definition (module or stub)
    pub fn contains_definition(&self, name: &str) -> bool {
        self.find_module(name).is_some() || self.is_ext_module(name)
    }

    /// All definition names (modules then stubs), in declared order
    pub fn definition_names(&self) -> impl Iterator<Item = &str> {
        self.modules
            .iter()
            .map(|m| m.name.as_str())
            .chain(self.ext_modules.iter().map(|e| e.name.as_str()))
    }
}

impl Module {
    /// Create a new module with an empty body
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ports: Vec::new(),
            body: Block::default(),
            info: SourceInfo::None,
        }
    }
}

impl Block {
    /// Create a block from a statement list
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }
}
