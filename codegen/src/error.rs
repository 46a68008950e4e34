use paramspec_core::SchemaError;
use thiserror::Error;

/// Compilation failures. Any error aborts the whole compile; no partial
/// output is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    /// The schema or package failed its correctness checks.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// A parameter name would collide with a generated member.
    #[error("parameter '{param}' in schema '{schema}' collides with a generated member")]
    ReservedMember {
        /// Schema being compiled.
        schema: String,
        /// Offending parameter name.
        param: String,
    },
    /// Two schemas in one run map to the same module name.
    #[error("schemas '{first}' and '{second}' would both generate module '{module}'")]
    ModuleCollision {
        /// First schema claiming the module.
        first: String,
        /// Second schema claiming the module.
        second: String,
        /// Colliding module name.
        module: String,
    },
    /// Two schemas in one run map to the same accessor type name.
    #[error("schemas '{first}' and '{second}' would both generate type '{type_name}'")]
    TypeCollision {
        /// First schema claiming the type.
        first: String,
        /// Second schema claiming the type.
        second: String,
        /// Colliding type name.
        type_name: String,
    },
    /// The schema could not be serialized for embedding.
    #[error("failed to serialize schema '{schema}': {message}")]
    Serialize {
        /// Schema being compiled.
        schema: String,
        /// Serializer message.
        message: String,
    },
}
