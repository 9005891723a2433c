//! The interpreter's error taxonomy and its mapping to process exit codes
//! (§6, §7).
//!
//! Every fallible operation in this crate returns `Result<_, InterpreterError>`.
//! There is no panic on a data-dependent path; `unwrap`/`expect` only appear
//! where a prior check already makes the `None`/`Err` arm unreachable.

use std::fmt;

/// One error per exit-code class the interpreter can report. `Internal` is
/// reserved for invariant violations this crate itself is responsible for
/// (a malformed `Program` that should have been rejected at load time), not
/// for malformed source programs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InterpreterError {
    /// 31: the XML source was not well-formed.
    XmlNotWellFormed(String),
    /// 32: the XML was well-formed but violates the program's structure
    /// (bad root element, missing/duplicate `order`, unknown opcode,
    /// wrong operand count or malformed operand attributes).
    XmlStructure(String),
    /// 52: use of an undefined label, redefinition of a variable, or other
    /// semantic error that isn't covered by a more specific class.
    Semantic(String),
    /// 53: operand type mismatch.
    TypeMismatch(String),
    /// 54: access to a variable that was never declared with DEFVAR.
    UndefinedVariable(String),
    /// 55: access to a frame that doesn't exist (no TF pushed, or use of
    /// an undeclared frame), or a PUSHFRAME/POPFRAME/RETURN/CALL stack
    /// discipline violation.
    FrameError(String),
    /// 56: read of a variable that was declared but never assigned a
    /// value (a DEFVAR'd variable still tagged `undef`), or of an empty
    /// data/call stack.
    MissingValue(String),
    /// 57: an operand value is out of the legal range for the operation
    /// (division by zero, an EXIT code outside 0..=49).
    OperandValue(String),
    /// 58: a string operation failed (index out of range, empty SETCHAR
    /// replacement).
    StringOp(String),
    /// 99: an internal error in the interpreter itself.
    Internal(String),
}

impl InterpreterError {
    pub fn xml_not_well_formed(msg: impl Into<String>) -> Self {
        InterpreterError::XmlNotWellFormed(msg.into())
    }

    pub fn xml_structure(msg: impl Into<String>) -> Self {
        InterpreterError::XmlStructure(msg.into())
    }

    pub fn semantic(msg: impl Into<String>) -> Self {
        InterpreterError::Semantic(msg.into())
    }

    pub fn type_mismatch(msg: impl Into<String>) -> Self {
        InterpreterError::TypeMismatch(msg.into())
    }

    pub fn undefined_variable(msg: impl Into<String>) -> Self {
        InterpreterError::UndefinedVariable(msg.into())
    }

    pub fn frame_error(msg: impl Into<String>) -> Self {
        InterpreterError::FrameError(msg.into())
    }

    pub fn missing_value(msg: impl Into<String>) -> Self {
        InterpreterError::MissingValue(msg.into())
    }

    pub fn operand_value(msg: impl Into<String>) -> Self {
        InterpreterError::OperandValue(msg.into())
    }

    pub fn string_op(msg: impl Into<String>) -> Self {
        InterpreterError::StringOp(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        InterpreterError::Internal(msg.into())
    }

    /// The process exit code this error maps to, per the interpreter's
    /// exit-code table.
    pub fn exit_code(&self) -> i32 {
        match self {
            InterpreterError::XmlNotWellFormed(_) => 31,
            InterpreterError::XmlStructure(_) => 32,
            InterpreterError::Semantic(_) => 52,
            InterpreterError::TypeMismatch(_) => 53,
            InterpreterError::UndefinedVariable(_) => 54,
            InterpreterError::FrameError(_) => 55,
            InterpreterError::MissingValue(_) => 56,
            InterpreterError::OperandValue(_) => 57,
            InterpreterError::StringOp(_) => 58,
            InterpreterError::Internal(_) => 99,
        }
    }
}

impl fmt::Display for InterpreterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (code, msg) = match self {
            InterpreterError::XmlNotWellFormed(m) => (31, m),
            InterpreterError::XmlStructure(m) => (32, m),
            InterpreterError::Semantic(m) => (52, m),
            InterpreterError::TypeMismatch(m) => (53, m),
            InterpreterError::UndefinedVariable(m) => (54, m),
            InterpreterError::FrameError(m) => (55, m),
            InterpreterError::MissingValue(m) => (56, m),
            InterpreterError::OperandValue(m) => (57, m),
            InterpreterError::StringOp(m) => (58, m),
            InterpreterError::Internal(m) => (99, m),
        };
        write!(f, "[{code}] {msg}")
    }
}

impl std::error::Error for InterpreterError {}
