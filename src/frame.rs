//! The three-level frame memory (GF/TF/LF) that backs variable storage
//! (§4.3).
//!
//! A [`Frame`] is a flat `name -> Value` table; redeclaring a name that's
//! already present is a semantic error, matching DEFVAR's contract. The
//! temporary frame is either absent or present as a single [`Frame`];
//! local frames form a stack pushed/popped by PUSHFRAME/POPFRAME, with
//! CALL/RETURN driving a separate call stack (see [`crate::callstack`]).

use std::collections::HashMap;

use crate::error::InterpreterError;
use crate::operand::{FrameScope, Var};
use crate::value::Value;

#[derive(Default)]
struct Frame {
    vars: HashMap<String, Value>,
}

impl Frame {
    fn declare(&mut self, name: &str) -> Result<(), InterpreterError> {
        if self.vars.contains_key(name) {
            return Err(InterpreterError::semantic(format!(
                "variable {name} is already declared in this frame"
            )));
        }
        self.vars.insert(name.to_string(), Value::Undef);
        Ok(())
    }

    fn get(&self, name: &str) -> Result<&Value, InterpreterError> {
        self.vars
            .get(name)
            .ok_or_else(|| InterpreterError::undefined_variable(format!("variable {name} was never declared")))
    }

    fn set(&mut self, name: &str, value: Value) -> Result<(), InterpreterError> {
        match self.vars.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(InterpreterError::undefined_variable(format!("variable {name} was never declared"))),
        }
    }
}

/// Owns the global frame (always present), the temporary frame (present
/// only between DEFFRAME and the next PUSHFRAME/reassignment), and the
/// stack of local frames pushed by PUSHFRAME.
#[derive(Default)]
pub struct FrameStore {
    global: Frame,
    temporary: Option<Frame>,
    locals: Vec<Frame>,
}

impl FrameStore {
    pub fn new() -> Self {
        Default::default()
    }

    /// DEFFRAME: replaces any existing temporary frame with a fresh, empty
    /// one. A temporary frame that was never pushed is simply discarded,
    /// matching the reference interpreter's semantics.
    pub fn create_temporary(&mut self) {
        self.temporary = Some(Frame::default());
    }

    /// PUSHFRAME: moves the temporary frame onto the local frame stack.
    /// Errors if there is no temporary frame to push.
    pub fn push_temporary_to_local(&mut self) -> Result<(), InterpreterError> {
        let frame = self
            .temporary
            .take()
            .ok_or_else(|| InterpreterError::frame_error("PUSHFRAME: no temporary frame is defined"))?;
        self.locals.push(frame);
        Ok(())
    }

    /// POPFRAME: moves the top local frame back into the temporary frame
    /// slot. Errors if the local frame stack is empty.
    pub fn pop_local_to_temporary(&mut self) -> Result<(), InterpreterError> {
        let frame = self
            .locals
            .pop()
            .ok_or_else(|| InterpreterError::frame_error("POPFRAME: no local frame is defined"))?;
        self.temporary = Some(frame);
        Ok(())
    }

    pub fn declare(&mut self, var: &Var) -> Result<(), InterpreterError> {
        self.frame_mut(var.scope)?.declare(&var.name)
    }

    pub fn get(&self, var: &Var) -> Result<&Value, InterpreterError> {
        self.frame(var.scope)?.get(&var.name)
    }

    pub fn set(&mut self, var: &Var, value: Value) -> Result<(), InterpreterError> {
        self.frame_mut(var.scope)?.set(&var.name, value)
    }

    fn frame(&self, scope: FrameScope) -> Result<&Frame, InterpreterError> {
        match scope {
            FrameScope::GF => Ok(&self.global),
            FrameScope::TF => self
                .temporary
                .as_ref()
                .ok_or_else(|| InterpreterError::frame_error("temporary frame is not defined")),
            FrameScope::LF => self
                .locals
                .last()
                .ok_or_else(|| InterpreterError::frame_error("no local frame is defined")),
        }
    }

    fn frame_mut(&mut self, scope: FrameScope) -> Result<&mut Frame, InterpreterError> {
        match scope {
            FrameScope::GF => Ok(&mut self.global),
            FrameScope::TF => self
                .temporary
                .as_mut()
                .ok_or_else(|| InterpreterError::frame_error("temporary frame is not defined")),
            FrameScope::LF => self
                .locals
                .last_mut()
                .ok_or_else(|| InterpreterError::frame_error("no local frame is defined")),
        }
    }

    /// Number of variables declared in the global frame. Used only by
    /// BREAK's diagnostic dump.
    pub fn global_var_count(&self) -> usize {
        self.global.vars.len()
    }

    /// Number of variables in the temporary frame, or `None` if it isn't
    /// currently defined.
    pub fn temporary_var_count(&self) -> Option<usize> {
        self.temporary.as_ref().map(|f| f.vars.len())
    }

    /// Depth of the local frame stack.
    pub fn local_frame_depth(&self) -> usize {
        self.locals.len()
    }

    /// Number of variables in the topmost local frame, or `None` if the
    /// local frame stack is empty.
    pub fn local_var_count(&self) -> Option<usize> {
        self.locals.last().map(|f| f.vars.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gf(name: &str) -> Var {
        Var::new(FrameScope::GF, name)
    }

    #[test]
    fn declared_variable_starts_undef() {
        let mut store = FrameStore::new();
        store.declare(&gf("x")).unwrap();
        assert_eq!(store.get(&gf("x")).unwrap(), &Value::Undef);
    }

    #[test]
    fn redeclaring_a_variable_is_a_semantic_error() {
        let mut store = FrameStore::new();
        store.declare(&gf("x")).unwrap();
        let err = store.declare(&gf("x")).unwrap_err();
        assert_eq!(err.exit_code(), 52);
    }

    #[test]
    fn reading_an_undeclared_variable_is_error_54() {
        let store = FrameStore::new();
        let err = store.get(&gf("x")).unwrap_err();
        assert_eq!(err.exit_code(), 54);
    }

    #[test]
    fn local_frame_stack_round_trips_through_temporary() {
        let mut store = FrameStore::new();
        store.create_temporary();
        store.declare(&Var::new(FrameScope::TF, "x")).unwrap();
        store.set(&Var::new(FrameScope::TF, "x"), Value::Int(1)).unwrap();
        store.push_temporary_to_local().unwrap();

        assert_eq!(store.get(&Var::new(FrameScope::LF, "x")).unwrap(), &Value::Int(1));

        store.pop_local_to_temporary().unwrap();
        assert_eq!(store.get(&Var::new(FrameScope::TF, "x")).unwrap(), &Value::Int(1));
    }

    #[test]
    fn popframe_without_a_local_frame_is_frame_error() {
        let mut store = FrameStore::new();
        let err = store.pop_local_to_temporary().unwrap_err();
        assert_eq!(err.exit_code(), 55);
    }

    #[test]
    fn accessing_local_frame_without_one_is_frame_error() {
        let store = FrameStore::new();
        let err = store.get(&Var::new(FrameScope::LF, "x")).unwrap_err();
        assert_eq!(err.exit_code(), 55);
    }
}
