//! Error handling for the transpiler
//!
//! Every failure carries the 1-based source line that raised it so the
//! caller can point at it. The core only returns errors; rendering them is
//! done by [`diagnostic`].

mod diagnostic;

use thiserror::Error;

use crate::compiler::Frame;

pub use diagnostic::{format_error, line_span, print_error};

/// Malformed block nesting
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralError {
    #[error("'case' statement outside of a 'switch'")]
    CaseOutsideSwitch,

    #[error("'default' statement outside of a 'switch'")]
    DefaultOutsideSwitch,

    #[error("'return' statement outside of a function")]
    ReturnOutsideFunction,

    #[error("'return' statement in a procedure")]
    ReturnInProcedure,

    #[error("'end' statement with no open block")]
    StackUnderflow,

    #[error("'{0}' block is never closed")]
    UnclosedBlock(Frame),
}

/// The main error type for compilation
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Error on line {line}: {kind}")]
    Structural { kind: StructuralError, line: usize },

    #[error("Error on line {line}: {message}")]
    Argument { message: String, line: usize },

    #[error("Error on line {line}: '{name}' is not a recognized variable type")]
    Type { name: String, line: usize },

    #[error("Error on line {line}: '{name}' is reserved for the program entry point")]
    ReservedName { name: String, line: usize },

    #[error("Error on line {line}: {message}")]
    FeatureDisabled { message: String, line: usize },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    /// Get the 1-based line associated with this error, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            CompileError::Structural { line, .. }
            | CompileError::Argument { line, .. }
            | CompileError::Type { line, .. }
            | CompileError::ReservedName { line, .. }
            | CompileError::FeatureDisabled { line, .. } => Some(*line),
            CompileError::Config { .. } | CompileError::Io(_) => None,
        }
    }

    /// Short category name used as the diagnostic title
    pub fn category(&self) -> &'static str {
        match self {
            CompileError::Structural { .. } => "Structural error",
            CompileError::Argument { .. } => "Argument error",
            CompileError::Type { .. } => "Type error",
            CompileError::ReservedName { .. } => "Reserved name",
            CompileError::FeatureDisabled { .. } => "Feature disabled",
            CompileError::Config { .. } => "Configuration error",
            CompileError::Io(_) => "IO error",
        }
    }

    /// Message without the line prefix
    pub fn detail(&self) -> String {
        match self {
            CompileError::Structural { kind, .. } => kind.to_string(),
            CompileError::Argument { message, .. }
            | CompileError::FeatureDisabled { message, .. }
            | CompileError::Config { message } => message.clone(),
            CompileError::Type { name, .. } => {
                format!("'{}' is not a recognized variable type", name)
            }
            CompileError::ReservedName { name, .. } => {
                format!("'{}' is reserved for the program entry point", name)
            }
            CompileError::Io(e) => e.to_string(),
        }
    }

    /// Create a structural error
    pub fn structural(kind: StructuralError, line: usize) -> Self {
        CompileError::Structural { kind, line }
    }

    /// Create an argument error
    pub fn argument(message: impl Into<String>, line: usize) -> Self {
        CompileError::Argument {
            message: message.into(),
            line,
        }
    }

    /// Create a type error for an unknown type keyword
    pub fn type_error(name: impl Into<String>, line: usize) -> Self {
        CompileError::Type {
            name: name.into(),
            line,
        }
    }

    pub fn reserved_name(name: impl Into<String>, line: usize) -> Self {
        CompileError::ReservedName {
            name: name.into(),
            line,
        }
    }

    pub fn feature_disabled(message: impl Into<String>, line: usize) -> Self {
        CompileError::FeatureDisabled {
            message: message.into(),
            line,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        CompileError::Config {
            message: message.into(),
        }
    }
}

/// Result type alias for compilation
pub type CompileResult<T> = Result<T, CompileError>;
