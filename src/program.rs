//! Orders a flat instruction list by its `order` attribute and pre-scans
//! LABEL opcodes into a lookup table, per §4.5 / the "Program loader" row
//! of §2's component table.
//!
//! `loader` hands this constructor an unordered `Vec<Instruction>` decoded
//! straight off the XML tree; everything downstream (the executor, CALL/
//! JUMP target resolution) only ever sees the ordered, label-indexed form.

use std::collections::HashMap;

use crate::error::InterpreterError;
use crate::instruction::{Instruction, Opcode};

pub struct Program {
    instructions: Vec<Instruction>,
    labels: HashMap<String, usize>,
}

impl Program {
    /// Sorts by `order`, rejects a duplicate `order` (structural, 32), then
    /// builds the label table, rejecting a duplicate LABEL name (semantic,
    /// 52).
    pub fn new(mut instructions: Vec<Instruction>) -> Result<Self, InterpreterError> {
        instructions.sort_by_key(|i| i.order);
        for pair in instructions.windows(2) {
            if pair[0].order == pair[1].order {
                return Err(InterpreterError::xml_structure(format!(
                    "duplicate instruction order {}",
                    pair[0].order
                )));
            }
        }

        let mut labels = HashMap::new();
        for (index, instr) in instructions.iter().enumerate() {
            if instr.opcode != Opcode::Label {
                continue;
            }
            let name = instr
                .operands
                .first()
                .and_then(|op| op.as_label())
                .ok_or_else(|| InterpreterError::internal("LABEL instruction missing its label operand"))?
                .0
                .clone();
            if labels.insert(name.clone(), index).is_some() {
                return Err(InterpreterError::semantic(format!("label {name} is already defined")));
            }
        }

        Ok(Program { instructions, labels })
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, pc: usize) -> Option<&Instruction> {
        self.instructions.get(pc)
    }

    /// Resolves a label name to its instruction index. Unknown label is a
    /// semantic error (52), raised at the first CALL/JUMP that references
    /// it rather than at load time (§4.5: labels resolve lazily).
    pub fn resolve_label(&self, name: &str) -> Result<usize, InterpreterError> {
        self.labels
            .get(name)
            .copied()
            .ok_or_else(|| InterpreterError::semantic(format!("label {name} is not defined")))
    }
}
