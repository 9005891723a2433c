//! Full-pipeline tests: XML text through [`loader::load_program`] into an
//! [`ifjcode23::Executor`], exercising the end-to-end scenarios §8 of the
//! interpreter's spec names (hello world, a type mismatch, frame
//! round-tripping, CALL/RETURN across a label, division by zero, and an
//! empty-stack POPS). Unlike `ifjcode23::executor`'s own tests, which build
//! `Instruction`s by hand, these go through the XML decoder too.

use ifjcode23::io::{InputLines, OutputChannel};
use ifjcode23::Executor;
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

struct VecOut<'a>(&'a mut String);

impl<'a> OutputChannel for VecOut<'a> {
    fn write_str(&mut self, s: &str) {
        self.0.push_str(s);
    }
}

fn run(xml: &str, input: Vec<&str>) -> (Result<i32, ifjcode23::InterpreterError>, String, String) {
    let program = loader::load_program(xml).unwrap();
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

#[test]
fn hello_world() {
    let xml = r#"<program>
        <instruction order="1" opcode="DEFVAR"><arg1 type="var">GF@g</arg1></instruction>
        <instruction order="2" opcode="MOVE">
            <arg1 type="var">GF@g</arg1>
            <arg2 type="string">Hello\032world</arg2>
        </instruction>
        <instruction order="3" opcode="WRITE"><arg1 type="var">GF@g</arg1></instruction>
        <instruction order="4" opcode="EXIT"><arg1 type="int">0</arg1></instruction>
    </program>"#;
    let (code, stdout, _) = run(xml, vec![]);
    assert_eq!(code.unwrap(), 0);
    assert_eq!(stdout, "Hello world");
}

#[test]
fn arithmetic_type_mismatch_is_exit_53() {
    let xml = r#"<program>
        <instruction order="1" opcode="DEFVAR"><arg1 type="var">GF@r</arg1></instruction>
        <instruction order="2" opcode="ADD">
            <arg1 type="var">GF@r</arg1>
            <arg2 type="int">1</arg2>
            <arg3 type="string">x</arg3>
        </instruction>
    </program>"#;
    let (code, stdout, _) = run(xml, vec![]);
    assert_eq!(code.unwrap_err().exit_code(), 53);
    assert_eq!(stdout, "");
}

#[test]
fn frame_round_trip_allows_fresh_redeclaration() {
    let xml = r#"<program>
        <instruction order="1" opcode="CREATEFRAME"/>
        <instruction order="2" opcode="DEFVAR"><arg1 type="var">TF@a</arg1></instruction>
        <instruction order="3" opcode="PUSHFRAME"/>
        <instruction order="4" opcode="DEFVAR"><arg1 type="var">LF@a</arg1></instruction>
        <instruction order="5" opcode="POPFRAME"/>
        <instruction order="6" opcode="DEFVAR"><arg1 type="var">TF@a</arg1></instruction>
        <instruction order="7" opcode="EXIT"><arg1 type="int">0</arg1></instruction>
    </program>"#;
    let (code, _, _) = run(xml, vec![]);
    assert_eq!(code.unwrap(), 0);
}

#[test]
fn call_and_return_around_a_label() {
    let xml = r#"<program>
        <instruction order="1" opcode="LABEL"><arg1 type="label">main</arg1></instruction>
        <instruction order="2" opcode="CALL"><arg1 type="label">sub</arg1></instruction>
        <instruction order="3" opcode="WRITE"><arg1 type="int">2</arg1></instruction>
        <instruction order="4" opcode="EXIT"><arg1 type="int">0</arg1></instruction>
        <instruction order="5" opcode="LABEL"><arg1 type="label">sub</arg1></instruction>
        <instruction order="6" opcode="WRITE"><arg1 type="int">1</arg1></instruction>
        <instruction order="7" opcode="RETURN"/>
    </program>"#;
    let (code, stdout, _) = run(xml, vec![]);
    assert_eq!(code.unwrap(), 0);
    assert_eq!(stdout, "12");
}

#[test]
fn division_by_zero_is_exit_57() {
    let xml = r#"<program>
        <instruction order="1" opcode="DEFVAR"><arg1 type="var">GF@r</arg1></instruction>
        <instruction order="2" opcode="IDIV">
            <arg1 type="var">GF@r</arg1>
            <arg2 type="int">1</arg2>
            <arg3 type="int">0</arg3>
        </instruction>
    </program>"#;
    let (code, _, _) = run(xml, vec![]);
    assert_eq!(code.unwrap_err().exit_code(), 57);
}

#[test]
fn pops_on_empty_stack_is_exit_56() {
    let xml = r#"<program>
        <instruction order="1" opcode="DEFVAR"><arg1 type="var">GF@r</arg1></instruction>
        <instruction order="2" opcode="POPS"><arg1 type="var">GF@r</arg1></instruction>
    </program>"#;
    let (code, _, _) = run(xml, vec![]);
    assert_eq!(code.unwrap_err().exit_code(), 56);
}

#[test]
fn write_is_a_left_inverse_of_read_for_string_input() {
    let xml = r#"<program>
        <instruction order="1" opcode="DEFVAR"><arg1 type="var">GF@x</arg1></instruction>
        <instruction order="2" opcode="READ">
            <arg1 type="var">GF@x</arg1>
            <arg2 type="type">string</arg2>
        </instruction>
        <instruction order="3" opcode="WRITE"><arg1 type="var">GF@x</arg1></instruction>
        <instruction order="4" opcode="EXIT"><arg1 type="int">0</arg1></instruction>
    </program>"#;
    let (code, stdout, _) = run(xml, vec!["a plain line with no escapes in it"]);
    assert_eq!(code.unwrap(), 0);
    assert_eq!(stdout, "a plain line with no escapes in it");
}

#[test]
fn read_past_end_of_input_assigns_nil() {
    let xml = r#"<program>
        <instruction order="1" opcode="DEFVAR"><arg1 type="var">GF@x</arg1></instruction>
        <instruction order="2" opcode="READ">
            <arg1 type="var">GF@x</arg1>
            <arg2 type="type">string</arg2>
        </instruction>
        <instruction order="3" opcode="WRITE"><arg1 type="var">GF@x</arg1></instruction>
        <instruction order="4" opcode="EXIT"><arg1 type="int">0</arg1></instruction>
    </program>"#;
    let (code, stdout, _) = run(xml, vec![]);
    assert_eq!(code.unwrap(), 0);
    assert_eq!(stdout, "");
}
