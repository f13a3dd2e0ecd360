//! Error types for the stable-naming pass

use crate::strategy::NamingStrategy;
use thiserror::Error;

/// Result type for naming-pass operations
pub type Result<T> = std::result::Result<T, StabilizeError>;

/// Fatal precondition violations; none are locally recoverable, since a
/// partial rename would leave the circuit inconsistent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StabilizeError {
    /// A module was requested under two different desired names
    #[error("module '{module}' requested under two desired names: '{first}' and '{second}'")]
    DuplicateRequest {
        module: String,
        first: String,
        second: String,
    },

    /// Two override requests for the same module name different strategies
    #[error("conflicting strategy overrides for module '{module}': {first} and {second}")]
    ConflictingOverrides {
        module: String,
        first: NamingStrategy,
        second: NamingStrategy,
    },

    /// Overrides within one collision group name different strategies
    #[error("strategy overrides disagree for desired name '{desired_name}': module '{module}' requests {second} but the group already requested {first}")]
    GroupOverrideMismatch {
        desired_name: String,
        module: String,
        first: NamingStrategy,
        second: NamingStrategy,
    },

    /// An explicitly requested strategy failed to produce unique names
    #[error("requested strategy {strategy} does not disambiguate desired name '{desired_name}'")]
    OverrideRejected {
        desired_name: String,
        strategy: NamingStrategy,
    },

    /// Every fallback strategy collided: the modules are structurally
    /// indistinguishable and must be deduplicated upstream
    #[error("no naming strategy disambiguates desired name '{desired_name}': the colliding modules are structurally identical")]
    NoDisambiguation { desired_name: String },

    /// A naming request targeted an external black-box stub
    #[error("cannot rename external module '{module}': black-box names are externally fixed")]
    ExternalModuleRequest { module: String },

    /// A naming request targeted a module not present in the circuit
    #[error("naming request references unknown module '{module}'")]
    UnknownModule { module: String },

    /// Renaming produced two definitions with the same name
    #[error("renaming produced duplicate definition name '{name}'")]
    GlobalNameCollision { name: String },

    /// A strategy name from configuration did not parse
    #[error("unknown naming strategy '{name}'")]
    UnknownStrategy { name: String },
}
