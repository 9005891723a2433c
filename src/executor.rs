//! The dispatch loop: fetch-decode-execute over an already-loaded
//! [`Program`], one instruction at a time (§4.6).
//!
//! All state the interpreter ever mutates — frames, the two stacks, the
//! program counter — lives in one `Executor`; nothing here is a process
//! global. The executor only knows about [`InputLines`]/[`OutputChannel`]
//! as traits, never about a concrete file or stdio handle, so it can run
//! unchanged against captured buffers in tests.

use crate::callstack::CallStack;
use crate::datastack::DataStack;
use crate::error::InterpreterError;
use crate::frame::FrameStore;
use crate::instruction::{Instruction, Opcode, Operand};
use crate::io::{InputLines, OutputChannel};
use crate::operand::{Symb, Var};
use crate::program::Program;
use crate::value::{self, TypeTag, Value};

pub struct Executor<'p> {
    program: &'p Program,
    pc: usize,
    frames: FrameStore,
    data_stack: DataStack,
    call_stack: CallStack,
    input: Box<dyn InputLines + 'p>,
    stdout: Box<dyn OutputChannel + 'p>,
    stderr: Box<dyn OutputChannel + 'p>,
}

/// What a single dispatched instruction did to control flow.
enum Flow {
    /// Advance to `pc + 1` as usual.
    Next,
    /// A branch landed on a new `pc`; don't advance further.
    Jumped,
    /// EXIT: terminate with this process exit code.
    Exit(i32),
}

impl<'p> Executor<'p> {
    pub fn new(
        program: &'p Program,
        input: Box<dyn InputLines + 'p>,
        stdout: Box<dyn OutputChannel + 'p>,
        stderr: Box<dyn OutputChannel + 'p>,
    ) -> Self {
        Executor {
            program,
            pc: 0,
            frames: FrameStore::new(),
            data_stack: DataStack::new(),
            call_stack: CallStack::new(),
            input,
            stdout,
            stderr,
        }
    }

    /// Runs to completion. Returns the process exit code: `0` if the
    /// program counter ran off the end of the instruction list, or
    /// whatever EXIT set it to. An `Err` means a classified failure (§7 of the error taxonomy)
    /// that the caller must translate via [`InterpreterError::exit_code`].
    pub fn run(&mut self) -> Result<i32, InterpreterError> {
        loop {
            let Some(instr) = self.program.get(self.pc).cloned() else {
                return Ok(0);
            };

            tracing::trace!(order = instr.order, opcode = ?instr.opcode, pc = self.pc, "dispatch");

            match self.execute(&instr) {
                Ok(Flow::Next) => self.pc += 1,
                Ok(Flow::Jumped) => {}
                Ok(Flow::Exit(code)) => return Ok(code),
                Err(err) => {
                    tracing::warn!(order = instr.order, opcode = ?instr.opcode, error = %err, "instruction failed");
                    return Err(err);
                }
            }
        }
    }

    fn execute(&mut self, instr: &Instruction) -> Result<Flow, InterpreterError> {
        use Opcode::*;

        match instr.opcode {
            Move => {
                let dest = self.var_operand(instr, 0)?;
                let value = self.resolve(self.symb_operand(instr, 1)?)?;
                self.frames.set(&dest, value)?;
            }
            Createframe => {
                tracing::debug!("CREATEFRAME");
                self.frames.create_temporary();
            }
            Pushframe => {
                self.frames.push_temporary_to_local()?;
                tracing::debug!(depth = self.frames.local_frame_depth(), "PUSHFRAME");
            }
            Popframe => {
                self.frames.pop_local_to_temporary()?;
                tracing::debug!(depth = self.frames.local_frame_depth(), "POPFRAME");
            }
            Defvar => {
                let var = self.var_operand(instr, 0)?;
                self.frames.declare(&var)?;
            }
            Call => {
                let label = self.label_operand(instr, 0)?;
                let target = self.program.resolve_label(&label.0)?;
                self.call_stack.push(self.pc);
                self.pc = target;
                return Ok(Flow::Jumped);
            }
            Return => {
                let caller_pc = self.call_stack.pop()?;
                self.pc = caller_pc + 1;
                return Ok(Flow::Jumped);
            }
            Pushs => {
                let value = self.resolve(self.symb_operand(instr, 0)?)?;
                self.data_stack.push(value);
            }
            Pops => {
                let dest = self.var_operand(instr, 0)?;
                let value = self.data_stack.pop()?;
                self.frames.set(&dest, value)?;
            }
            Add => self.binary_register_op(instr, value::add)?,
            Sub => self.binary_register_op(instr, value::sub)?,
            Mul => self.binary_register_op(instr, value::mul)?,
            Idiv => self.binary_register_op(instr, value::idiv)?,
            Div => self.binary_register_op(instr, value::div)?,
            Lt => self.binary_register_op(instr, value::lt)?,
            Gt => self.binary_register_op(instr, value::gt)?,
            Eq => self.binary_register_op(instr, value::eq)?,
            And => self.binary_register_op(instr, value::and)?,
            Or => self.binary_register_op(instr, value::or)?,
            Not => self.unary_register_op(instr, value::not)?,
            Int2char => self.unary_register_op(instr, value::int2char)?,
            Stri2int => self.binary_register_op(instr, value::stri2int)?,
            Int2float => self.unary_register_op(instr, value::int2float)?,
            Float2int => self.unary_register_op(instr, value::float2int)?,
            Read => self.do_read(instr)?,
            Write => {
                let value = self.resolve(self.symb_operand(instr, 0)?)?;
                self.stdout.write_str(&value.display_form());
            }
            Concat => self.binary_register_op(instr, value::concat)?,
            Strlen => self.unary_register_op(instr, value::strlen)?,
            Getchar => self.binary_register_op(instr, value::getchar)?,
            Setchar => self.do_setchar(instr)?,
            Type => {
                let dest = self.var_operand(instr, 0)?;
                let raw = self.resolve_allow_undef(self.symb_operand(instr, 1)?)?;
                self.frames.set(&dest, value::type_name_of(&raw))?;
            }
            Label => {}
            Jump => {
                let label = self.label_operand(instr, 0)?;
                self.pc = self.program.resolve_label(&label.0)?;
                return Ok(Flow::Jumped);
            }
            Jumpifeq => {
                let label = self.label_operand(instr, 0)?;
                let target = self.program.resolve_label(&label.0)?;
                if self.jump_condition_register(instr)? {
                    self.pc = target;
                    return Ok(Flow::Jumped);
                }
            }
            Jumpifneq => {
                let label = self.label_operand(instr, 0)?;
                let target = self.program.resolve_label(&label.0)?;
                if !self.jump_condition_register(instr)? {
                    self.pc = target;
                    return Ok(Flow::Jumped);
                }
            }
            Jumpifeqs => {
                let label = self.label_operand(instr, 0)?;
                let target = self.program.resolve_label(&label.0)?;
                if self.jump_condition_stack()? {
                    self.pc = target;
                    return Ok(Flow::Jumped);
                }
            }
            Jumpifneqs => {
                let label = self.label_operand(instr, 0)?;
                let target = self.program.resolve_label(&label.0)?;
                if !self.jump_condition_stack()? {
                    self.pc = target;
                    return Ok(Flow::Jumped);
                }
            }
            Exit => {
                let value = self.resolve(self.symb_operand(instr, 0)?)?;
                let code = match value {
                    Value::Int(i) if (0..=49).contains(&i) => i as i32,
                    Value::Int(i) => {
                        return Err(InterpreterError::operand_value(format!(
                            "EXIT code {i} is out of the valid range 0..=49"
                        )))
                    }
                    other => {
                        return Err(InterpreterError::type_mismatch(format!(
                            "EXIT requires an int operand, got {:?}",
                            other.tag()
                        )))
                    }
                };
                return Ok(Flow::Exit(code));
            }
            Dprint => {
                let value = self.resolve(self.symb_operand(instr, 0)?)?;
                self.stderr.write_str(&value.display_form());
            }
            Break => {
                let dump = self.break_dump(instr.order);
                self.stderr.write_str(&dump);
            }
            Clears => self.data_stack.clear(),
            Adds => self.binary_stack_op(value::add)?,
            Subs => self.binary_stack_op(value::sub)?,
            Muls => self.binary_stack_op(value::mul)?,
            Idivs => self.binary_stack_op(value::idiv)?,
            Divs => self.binary_stack_op(value::div)?,
            Lts => self.binary_stack_op(value::lt)?,
            Gts => self.binary_stack_op(value::gt)?,
            Eqs => self.binary_stack_op(value::eq)?,
            Ands => self.binary_stack_op(value::and)?,
            Ors => self.binary_stack_op(value::or)?,
            Nots => self.unary_stack_op(value::not)?,
            Int2chars => self.unary_stack_op(value::int2char)?,
            Stri2ints => self.binary_stack_op(value::stri2int)?,
            Int2floats => self.unary_stack_op(value::int2float)?,
            Float2ints => self.unary_stack_op(value::float2int)?,
        }

        Ok(Flow::Next)
    }

    // -- operand access -----------------------------------------------

    fn var_operand(&self, instr: &Instruction, idx: usize) -> Result<Var, InterpreterError> {
        instr
            .operands
            .get(idx)
            .and_then(Operand::as_var)
            .cloned()
            .ok_or_else(|| InterpreterError::internal(format!("{:?}: missing variable operand {idx}", instr.opcode)))
    }

    fn symb_operand<'a>(&self, instr: &'a Instruction, idx: usize) -> Result<&'a Symb, InterpreterError> {
        instr
            .operands
            .get(idx)
            .and_then(Operand::as_symb)
            .ok_or_else(|| InterpreterError::internal(format!("{:?}: missing symb operand {idx}", instr.opcode)))
    }

    fn label_operand(&self, instr: &Instruction, idx: usize) -> Result<crate::operand::Label, InterpreterError> {
        instr
            .operands
            .get(idx)
            .and_then(Operand::as_label)
            .cloned()
            .ok_or_else(|| InterpreterError::internal(format!("{:?}: missing label operand {idx}", instr.opcode)))
    }

    fn type_operand(&self, instr: &Instruction, idx: usize) -> Result<TypeTag, InterpreterError> {
        instr
            .operands
            .get(idx)
            .and_then(Operand::as_type_tag)
            .ok_or_else(|| InterpreterError::internal(format!("{:?}: missing type operand {idx}", instr.opcode)))
    }

    /// Materializes a `Symb` to its `Value`, resolving through the frame
    /// store if it's a variable reference. Every consuming opcode but TYPE
    /// treats an `undef`-tagged result as a missing-value error (§4.1).
    fn resolve(&self, symb: &Symb) -> Result<Value, InterpreterError> {
        let value = self.resolve_allow_undef(symb)?;
        if value.tag() == TypeTag::Undef {
            let what = match symb {
                Symb::Variable(var) => var.to_string(),
                Symb::Literal(_) => "operand".to_string(),
            };
            return Err(InterpreterError::missing_value(format!("{what} has no value")));
        }
        Ok(value)
    }

    /// Like [`Self::resolve`], but lets an `undef`-tagged variable through
    /// unchanged. Only TYPE uses this: it reports `undef` itself rather
    /// than treating it as a missing value.
    fn resolve_allow_undef(&self, symb: &Symb) -> Result<Value, InterpreterError> {
        match symb {
            Symb::Literal(v) => Ok(v.clone()),
            Symb::Variable(var) => self.frames.get(var).map(|v| v.clone()),
        }
    }

    // -- opcode families ------------------------------------------------

    fn binary_register_op(
        &mut self,
        instr: &Instruction,
        op: fn(&Value, &Value) -> Result<Value, InterpreterError>,
    ) -> Result<(), InterpreterError> {
        let dest = self.var_operand(instr, 0)?;
        let a = self.resolve(self.symb_operand(instr, 1)?)?;
        let b = self.resolve(self.symb_operand(instr, 2)?)?;
        let result = op(&a, &b)?;
        self.frames.set(&dest, result)
    }

    fn unary_register_op(
        &mut self,
        instr: &Instruction,
        op: fn(&Value) -> Result<Value, InterpreterError>,
    ) -> Result<(), InterpreterError> {
        let dest = self.var_operand(instr, 0)?;
        let a = self.resolve(self.symb_operand(instr, 1)?)?;
        let result = op(&a)?;
        self.frames.set(&dest, result)
    }

    fn binary_stack_op(
        &mut self,
        op: fn(&Value, &Value) -> Result<Value, InterpreterError>,
    ) -> Result<(), InterpreterError> {
        let (below, top) = self.data_stack.pop_two()?;
        let result = op(&below, &top)?;
        self.data_stack.push(result);
        Ok(())
    }

    fn unary_stack_op(&mut self, op: fn(&Value) -> Result<Value, InterpreterError>) -> Result<(), InterpreterError> {
        let v = self.data_stack.pop()?;
        let result = op(&v)?;
        self.data_stack.push(result);
        Ok(())
    }

    fn jump_condition_register(&self, instr: &Instruction) -> Result<bool, InterpreterError> {
        let a = self.resolve(self.symb_operand(instr, 1)?)?;
        let b = self.resolve(self.symb_operand(instr, 2)?)?;
        match value::eq(&a, &b)? {
            Value::Bool(b) => Ok(b),
            _ => unreachable!("eq always returns a bool"),
        }
    }

    fn jump_condition_stack(&self) -> Result<bool, InterpreterError> {
        let (below, top) = self.data_stack.peek_top_two()?;
        match value::eq(below, top)? {
            Value::Bool(b) => Ok(b),
            _ => unreachable!("eq always returns a bool"),
        }
    }

    fn do_read(&mut self, instr: &Instruction) -> Result<(), InterpreterError> {
        let dest = self.var_operand(instr, 0)?;
        let type_tag = self.type_operand(instr, 1)?;

        let value = match self.input.next_line() {
            None => Value::Nil,
            Some(line) => match type_tag {
                TypeTag::Int => line.trim().parse::<i64>().map(Value::Int).unwrap_or(Value::Nil),
                TypeTag::Bool => Value::Bool(line.trim().eq_ignore_ascii_case("true")),
                TypeTag::Float => value::parse_hex_float(line.trim())
                    .map(Value::Float)
                    .ok_or_else(|| InterpreterError::type_mismatch(format!("could not parse {line:?} as a float")))?,
                TypeTag::String => Value::String(line),
                TypeTag::Nil | TypeTag::Undef => {
                    return Err(InterpreterError::internal("READ's type operand must be int/bool/float/string"))
                }
            },
        };
        self.frames.set(&dest, value)
    }

    fn do_setchar(&mut self, instr: &Instruction) -> Result<(), InterpreterError> {
        let dest = self.var_operand(instr, 0)?;
        let current = self.resolve(&Symb::Variable(dest.clone()))?;
        let idx = self.resolve(self.symb_operand(instr, 1)?)?;
        let replacement = self.resolve(self.symb_operand(instr, 2)?)?;
        let result = value::setchar(&current, &idx, &replacement)?;
        self.frames.set(&dest, result)
    }

    /// BREAK's diagnostic dump (implementation-defined; no stability
    /// contract). One line: current instruction, frame variable
    /// counts, and both stacks' depths.
    fn break_dump(&self, order: i64) -> String {
        let tf = self
            .frames
            .temporary_var_count()
            .map(|n| n.to_string())
            .unwrap_or_else(|| "none".to_string());
        let lf_top = self
            .frames
            .local_var_count()
            .map(|n| n.to_string())
            .unwrap_or_else(|| "none".to_string());
        format!(
            "BREAK at order={order} pc={pc} | GF vars={gf} TF vars={tf} LF depth={lf_depth} top_vars={lf_top} | data_stack depth={ds} | call_stack depth={cs}\n",
            pc = self.pc,
            gf = self.frames.global_var_count(),
            lf_depth = self.frames.local_frame_depth(),
            ds = self.data_stack.len(),
            cs = self.call_stack.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::{Instruction, Operand};
    use crate::operand::{FrameScope, Label, Var};
    use pretty_assertions::assert_eq;

    struct VecInput(Vec<String>);

    impl InputLines for VecInput {
        fn next_line(&mut self) -> Option<String> {
            if self.0.is_empty() {
                None
            } else {
                Some(self.0.remove(0))
            }
        }
    }

    fn gf(name: &str) -> Var {
        Var::new(FrameScope::GF, name)
    }

    fn run_program(instructions: Vec<Instruction>, input: Vec<&str>) -> (Result<i32, InterpreterError>, String, String) {
        let program = Program::new(instructions).unwrap();
        let mut stdout_buf = String::new();
        let mut stderr_buf = String::new();
        let code;
        {
            let input = Box::new(VecInput(input.into_iter().map(String::from).collect()));
            let stdout = Box::new(VecOut(&mut stdout_buf));
            let stderr = Box::new(VecOut(&mut stderr_buf));
            let mut executor = Executor::new(&program, input, stdout, stderr);
            code = executor.run();
        }
        (code, stdout_buf, stderr_buf)
    }

    struct VecOut<'a>(&'a mut String);
    impl<'a> OutputChannel for VecOut<'a> {
        fn write_str(&mut self, s: &str) {
            self.0.push_str(s);
        }
    }

    #[test]
    fn hello_world() {
        let instructions = vec![
            Instruction::new(1, Opcode::Defvar, vec![Operand::Var(gf("g"))]),
            Instruction::new(
                2,
                Opcode::Move,
                vec![Operand::Var(gf("g")), Operand::Symb(Symb::Literal(Value::String("Hello world".to_string())))],
            ),
            Instruction::new(3, Opcode::Write, vec![Operand::Symb(Symb::Variable(gf("g")))]),
            Instruction::new(4, Opcode::Exit, vec![Operand::Symb(Symb::Literal(Value::Int(0)))]),
        ];
        let (code, stdout, _) = run_program(instructions, vec![]);
        assert_eq!(code.unwrap(), 0);
        assert_eq!(stdout, "Hello world");
    }

    #[test]
    fn add_type_mismatch_is_exit_53() {
        let instructions = vec![
            Instruction::new(1, Opcode::Defvar, vec![Operand::Var(gf("r"))]),
            Instruction::new(
                2,
                Opcode::Add,
                vec![
                    Operand::Var(gf("r")),
                    Operand::Symb(Symb::Literal(Value::Int(1))),
                    Operand::Symb(Symb::Literal(Value::String("x".to_string()))),
                ],
            ),
        ];
        let (code, stdout, _) = run_program(instructions, vec![]);
        assert_eq!(code.unwrap_err().exit_code(), 53);
        assert_eq!(stdout, "");
    }

    #[test]
    fn call_and_return_around_label() {
        let instructions = vec![
            Instruction::new(1, Opcode::Label, vec![Operand::Label(Label("main".to_string()))]),
            Instruction::new(2, Opcode::Call, vec![Operand::Label(Label("sub".to_string()))]),
            Instruction::new(3, Opcode::Write, vec![Operand::Symb(Symb::Literal(Value::Int(2)))]),
            Instruction::new(4, Opcode::Exit, vec![Operand::Symb(Symb::Literal(Value::Int(0)))]),
            Instruction::new(5, Opcode::Label, vec![Operand::Label(Label("sub".to_string()))]),
            Instruction::new(6, Opcode::Write, vec![Operand::Symb(Symb::Literal(Value::Int(1)))]),
            Instruction::new(7, Opcode::Return, vec![]),
        ];
        let (code, stdout, _) = run_program(instructions, vec![]);
        assert_eq!(code.unwrap(), 0);
        assert_eq!(stdout, "12");
    }

    #[test]
    fn division_by_zero_is_exit_57() {
        let instructions = vec![
            Instruction::new(1, Opcode::Defvar, vec![Operand::Var(gf("r"))]),
            Instruction::new(
                2,
                Opcode::Idiv,
                vec![
                    Operand::Var(gf("r")),
                    Operand::Symb(Symb::Literal(Value::Int(1))),
                    Operand::Symb(Symb::Literal(Value::Int(0))),
                ],
            ),
        ];
        let (code, _, _) = run_program(instructions, vec![]);
        assert_eq!(code.unwrap_err().exit_code(), 57);
    }

    #[test]
    fn pops_on_empty_stack_is_exit_56() {
        let instructions = vec![
            Instruction::new(1, Opcode::Defvar, vec![Operand::Var(gf("r"))]),
            Instruction::new(2, Opcode::Pops, vec![Operand::Var(gf("r"))]),
        ];
        let (code, _, _) = run_program(instructions, vec![]);
        assert_eq!(code.unwrap_err().exit_code(), 56);
    }

    #[test]
    fn read_int_parse_failure_assigns_nil() {
        let instructions = vec![
            Instruction::new(1, Opcode::Defvar, vec![Operand::Var(gf("r"))]),
            Instruction::new(2, Opcode::Read, vec![Operand::Var(gf("r")), Operand::Type(TypeTag::Int)]),
            Instruction::new(3, Opcode::Write, vec![Operand::Symb(Symb::Variable(gf("r")))]),
            Instruction::new(4, Opcode::Exit, vec![Operand::Symb(Symb::Literal(Value::Int(0)))]),
        ];
        let (code, stdout, _) = run_program(instructions, vec!["not-a-number"]);
        assert_eq!(code.unwrap(), 0);
        assert_eq!(stdout, "");
    }

    #[test]
    fn frames_round_trip_through_push_and_pop() {
        let instructions = vec![
            Instruction::new(1, Opcode::Createframe, vec![]),
            Instruction::new(2, Opcode::Defvar, vec![Operand::Var(Var::new(FrameScope::TF, "a"))]),
            Instruction::new(3, Opcode::Pushframe, vec![]),
            Instruction::new(4, Opcode::Defvar, vec![Operand::Var(Var::new(FrameScope::LF, "a"))]),
            Instruction::new(5, Opcode::Popframe, vec![]),
            Instruction::new(6, Opcode::Defvar, vec![Operand::Var(Var::new(FrameScope::TF, "a"))]),
            Instruction::new(7, Opcode::Exit, vec![Operand::Symb(Symb::Literal(Value::Int(0)))]),
        ];
        let (code, _, _) = run_program(instructions, vec![]);
        assert_eq!(code.unwrap(), 0);
    }

    /// An undefined jump target is a semantic error (52) even when the
    /// condition would not have taken the branch: the label is resolved
    /// unconditionally, before the condition is ever evaluated.
    #[test]
    fn jumpifeq_to_undefined_label_is_semantic_error_even_when_not_taken() {
        let instructions = vec![Instruction::new(
            1,
            Opcode::Jumpifeq,
            vec![
                Operand::Label(Label("nope".to_string())),
                Operand::Symb(Symb::Literal(Value::Int(1))),
                Operand::Symb(Symb::Literal(Value::Int(2))),
            ],
        )];
        let (code, _, _) = run_program(instructions, vec![]);
        assert_eq!(code.unwrap_err().exit_code(), 52);
    }

    #[test]
    fn jumpifneq_to_undefined_label_is_semantic_error_even_when_not_taken() {
        let instructions = vec![Instruction::new(
            1,
            Opcode::Jumpifneq,
            vec![
                Operand::Label(Label("nope".to_string())),
                Operand::Symb(Symb::Literal(Value::Int(1))),
                Operand::Symb(Symb::Literal(Value::Int(1))),
            ],
        )];
        let (code, _, _) = run_program(instructions, vec![]);
        assert_eq!(code.unwrap_err().exit_code(), 52);
    }

    #[test]
    fn jumpifeqs_to_undefined_label_is_semantic_error_even_when_not_taken() {
        let instructions = vec![
            Instruction::new(1, Opcode::Pushs, vec![Operand::Symb(Symb::Literal(Value::Int(1)))]),
            Instruction::new(2, Opcode::Pushs, vec![Operand::Symb(Symb::Literal(Value::Int(2)))]),
            Instruction::new(3, Opcode::Jumpifeqs, vec![Operand::Label(Label("nope".to_string()))]),
        ];
        let (code, _, _) = run_program(instructions, vec![]);
        assert_eq!(code.unwrap_err().exit_code(), 52);
    }

    #[test]
    fn jumpifneqs_to_undefined_label_is_semantic_error_even_when_not_taken() {
        let instructions = vec![
            Instruction::new(1, Opcode::Pushs, vec![Operand::Symb(Symb::Literal(Value::Int(1)))]),
            Instruction::new(2, Opcode::Pushs, vec![Operand::Symb(Symb::Literal(Value::Int(1)))]),
            Instruction::new(3, Opcode::Jumpifneqs, vec![Operand::Label(Label("nope".to_string()))]),
        ];
        let (code, _, _) = run_program(instructions, vec![]);
        assert_eq!(code.unwrap_err().exit_code(), 52);
    }

    /// §7 precedence: semantic (52) before type mismatch (53). An
    /// undefined label paired with type-mismatched operands must surface
    /// the semantic error, not the type error `value::eq` would raise.
    #[test]
    fn jumpifeq_prefers_semantic_error_over_type_mismatch() {
        let instructions = vec![Instruction::new(
            1,
            Opcode::Jumpifeq,
            vec![
                Operand::Label(Label("nope".to_string())),
                Operand::Symb(Symb::Literal(Value::Int(1))),
                Operand::Symb(Symb::Literal(Value::String("x".to_string()))),
            ],
        )];
        let (code, _, _) = run_program(instructions, vec![]);
        assert_eq!(code.unwrap_err().exit_code(), 52);
    }
}
