//! Decodes an IFJcode23 XML program into an [`ifjcode23::Program`].
//!
//! This is the only crate that knows XML exists. It walks a
//! [`quick_xml::Reader`] directly rather than deserializing through
//! `serde`: the element shape is two fixed levels (`program` >
//! `instruction` > `arg1`/`arg2`/`arg3`) and doesn't benefit from a
//! derived mapping, and every XML issue it can hit must be classified
//! precisely — well-formedness (31) versus structural validity (32) — a
//! distinction a generic deserializer would blur.

use std::collections::HashMap;
use std::str::FromStr;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use ifjcode23::error::InterpreterError;
use ifjcode23::instruction::{Instruction, Opcode, Operand};
use ifjcode23::operand::{FrameScope, Label, Symb, Var};
use ifjcode23::program::Program;
use ifjcode23::value::{self, TypeTag, Value};


/// Decodes the full XML document into an ordered, label-indexed
/// [`Program`], ready for [`ifjcode23::Executor`].
pub fn load_program(xml: &str) -> Result<Program, InterpreterError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text = true;

    let mut instructions = Vec::new();
    let mut saw_root = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| InterpreterError::xml_not_well_formed(e.to_string()))?;
        match event {
            Event::Eof => break,
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Text(ref t) => {
                if !t.iter().all(u8::is_ascii_whitespace) {
                    return Err(InterpreterError::xml_structure("unexpected character data"));
                }
            }
            Event::Start(ref tag) if tag.name().as_ref() == b"program" => {
                if saw_root {
                    return Err(InterpreterError::xml_structure("nested <program> element"));
                }
                saw_root = true;
            }
            Event::End(ref tag) if tag.name().as_ref() == b"program" => {}
            Event::Start(ref tag) if tag.name().as_ref() == b"instruction" => {
                require_root(saw_root)?;
                let (order, opcode) = instruction_header(tag)?;
                let args = collect_args(&mut reader)?;
                instructions.push(decode_instruction(order, opcode, args)?);
            }
            Event::Empty(ref tag) if tag.name().as_ref() == b"instruction" => {
                require_root(saw_root)?;
                let (order, opcode) = instruction_header(tag)?;
                instructions.push(decode_instruction(order, opcode, HashMap::new())?);
            }
            Event::Start(ref tag) => {
                return Err(InterpreterError::xml_structure(format!(
                    "unexpected element <{}>",
                    String::from_utf8_lossy(tag.name().as_ref())
                )));
            }
            _ => {}
        }
    }

    if !saw_root {
        return Err(InterpreterError::xml_structure("missing <program> root element"));
    }

    tracing::debug!(instruction_count = instructions.len(), "decoded instructions from XML");
    let program = Program::new(instructions)?;
    tracing::debug!(len = program.len(), "program ready for execution");
    Ok(program)
}

fn require_root(saw_root: bool) -> Result<(), InterpreterError> {
    if saw_root {
        Ok(())
    } else {
        Err(InterpreterError::xml_structure("<instruction> outside <program>"))
    }
}

fn instruction_header(tag: &BytesStart) -> Result<(i64, Opcode), InterpreterError> {
    let order_attr = read_attr(tag, "order")?;
    let order: i64 = order_attr
        .trim()
        .parse()
        .map_err(|_| InterpreterError::xml_structure(format!("invalid order value {order_attr:?}")))?;
    if order <= 0 {
        return Err(InterpreterError::xml_structure(format!(
            "order must be a positive integer, got {order}"
        )));
    }

    let opcode_attr = read_attr(tag, "opcode")?;
    let opcode = Opcode::from_str(&opcode_attr)
        .map_err(|_| InterpreterError::xml_structure(format!("unknown opcode {opcode_attr:?}")))?;

    Ok((order, opcode))
}

/// Reads every `argN` child of the currently-open `<instruction>` element,
/// up to its matching `</instruction>`. Returns `position -> (type, text)`;
/// callers rebind by position, since source order of `arg1`/`arg2`/`arg3`
/// is not guaranteed (§6).
fn collect_args(reader: &mut Reader<&[u8]>) -> Result<HashMap<u32, (String, String)>, InterpreterError> {
    let mut args = HashMap::new();
    loop {
        let event = reader
            .read_event()
            .map_err(|e| InterpreterError::xml_not_well_formed(e.to_string()))?;
        match event {
            Event::End(ref tag) if tag.name().as_ref() == b"instruction" => break,
            Event::Eof => {
                return Err(InterpreterError::xml_not_well_formed(
                    "unexpected end of document inside <instruction>",
                ))
            }
            Event::Empty(ref tag) => {
                let pos = arg_position(tag.name().as_ref())?;
                let type_attr = read_attr(tag, "type")?;
                args.insert(pos, (type_attr, String::new()));
            }
            Event::Start(ref tag) => {
                let name = tag.name().as_ref().to_vec();
                let pos = arg_position(&name)?;
                let type_attr = read_attr(tag, "type")?;
                let text = read_text_until_end(reader, &name)?;
                args.insert(pos, (type_attr, text));
            }
            Event::Text(ref t) => {
                if !t.iter().all(u8::is_ascii_whitespace) {
                    return Err(InterpreterError::xml_structure("unexpected character data inside <instruction>"));
                }
            }
            _ => {}
        }
    }
    Ok(args)
}

fn read_text_until_end(reader: &mut Reader<&[u8]>, tag_name: &[u8]) -> Result<String, InterpreterError> {
    let mut text = String::new();
    loop {
        let event = reader
            .read_event()
            .map_err(|e| InterpreterError::xml_not_well_formed(e.to_string()))?;
        match event {
            Event::Text(t) => {
                let decoded = t
                    .unescape()
                    .map_err(|e| InterpreterError::xml_not_well_formed(e.to_string()))?;
                text.push_str(&decoded);
            }
            Event::CData(t) => {
                text.push_str(&String::from_utf8_lossy(&t.into_inner()));
            }
            Event::End(ref tag) if tag.name().as_ref() == tag_name => break,
            Event::Eof => return Err(InterpreterError::xml_not_well_formed("unexpected end of document")),
            Event::Start(_) => {
                return Err(InterpreterError::xml_structure("operand element must not contain child elements"))
            }
            _ => {}
        }
    }
    Ok(text)
}

fn arg_position(name: &[u8]) -> Result<u32, InterpreterError> {
    match name {
        b"arg1" => Ok(1),
        b"arg2" => Ok(2),
        b"arg3" => Ok(3),
        other => Err(InterpreterError::xml_structure(format!(
            "unexpected operand element <{}>",
            String::from_utf8_lossy(other)
        ))),
    }
}

fn read_attr(tag: &BytesStart, key: &str) -> Result<String, InterpreterError> {
    for attr in tag.attributes() {
        let attr = attr.map_err(|e| InterpreterError::xml_not_well_formed(e.to_string()))?;
        if attr.key.as_ref() == key.as_bytes() {
            return attr
                .unescape_value()
                .map(|v| v.into_owned())
                .map_err(|e| InterpreterError::xml_not_well_formed(e.to_string()));
        }
    }
    Err(InterpreterError::xml_structure(format!("missing required attribute \"{key}\"")))
}

/// The operand kind a given opcode position expects, per §6's arity table.
/// `Symb` accepts either a variable reference or a literal; the
/// other three are fixed to one wire `type` attribute value.
#[derive(Clone, Copy)]
enum OperandKind {
    Var,
    Symb,
    Label,
    Type,
}

fn operand_kinds(opcode: Opcode) -> &'static [OperandKind] {
    use OperandKind::*;
    use Opcode::*;
    match opcode {
        Createframe | Pushframe | Popframe | Return | Break | Clears | Adds | Subs | Muls
        | Idivs | Divs | Lts | Gts | Eqs | Ands | Ors | Nots | Int2chars | Stri2ints
        | Int2floats | Float2ints => &[],
        Defvar | Pops => &[Var],
        Call | Jump | Label => &[Label],
        Pushs | Write | Exit | Dprint => &[Symb],
        Jumpifeqs | Jumpifneqs => &[Label],
        Not | Int2char | Int2float | Float2int | Strlen | Type => &[Var, Symb],
        Move => &[Var, Symb],
        Read => &[Var, Type],
        Add | Sub | Mul | Idiv | Div | Lt | Gt | Eq | And | Or | Stri2int | Concat | Getchar
        | Setchar => &[Var, Symb, Symb],
        Jumpifeq | Jumpifneq => &[Label, Symb, Symb],
    }
}

fn decode_instruction(order: i64, opcode: Opcode, args: HashMap<u32, (String, String)>) -> Result<Instruction, InterpreterError> {
    let kinds = operand_kinds(opcode);

    if args.len() > kinds.len() {
        return Err(InterpreterError::xml_structure(format!("{opcode:?} has more operands than it accepts")));
    }

    let mut operands = Vec::with_capacity(kinds.len());
    for (i, kind) in kinds.iter().enumerate() {
        let pos = (i + 1) as u32;
        let (type_attr, text) = args
            .get(&pos)
            .ok_or_else(|| InterpreterError::xml_structure(format!("{opcode:?} is missing operand arg{pos}")))?;
        operands.push(decode_operand(opcode, pos, *kind, type_attr, text)?);
    }

    Ok(Instruction::new(order, opcode, operands))
}

fn decode_operand(
    opcode: Opcode,
    pos: u32,
    kind: OperandKind,
    type_attr: &str,
    text: &str,
) -> Result<Operand, InterpreterError> {
    match kind {
        OperandKind::Var => {
            expect_type_attr(opcode, pos, type_attr, "var")?;
            Ok(Operand::Var(parse_var(text)?))
        }
        OperandKind::Label => {
            expect_type_attr(opcode, pos, type_attr, "label")?;
            Ok(Operand::Label(Label(parse_label(text)?)))
        }
        OperandKind::Type => {
            expect_type_attr(opcode, pos, type_attr, "type")?;
            let tag = TypeTag::from_str(text)
                .map_err(|_| InterpreterError::xml_structure(format!("invalid type name {text:?}")))?;
            Ok(Operand::Type(tag))
        }
        OperandKind::Symb => {
            if type_attr == "var" {
                Ok(Operand::Symb(Symb::Variable(parse_var(text)?)))
            } else {
                Ok(Operand::Symb(Symb::Literal(parse_literal(type_attr, text)?)))
            }
        }
    }
}

fn expect_type_attr(opcode: Opcode, pos: u32, actual: &str, expected: &str) -> Result<(), InterpreterError> {
    if actual == expected {
        Ok(())
    } else {
        Err(InterpreterError::xml_structure(format!(
            "{opcode:?} arg{pos} must have type=\"{expected}\", got {actual:?}"
        )))
    }
}

/// `(GF|LF|TF)@<ident>`, matching the reference grammar
/// `^(GF|LF|TF)@[a-zA-Z_\-$&%*!?][\w\-$&%*!?]*$` exactly.
fn parse_var(text: &str) -> Result<Var, InterpreterError> {
    let (scope_str, name) = text
        .split_once('@')
        .ok_or_else(|| InterpreterError::xml_structure(format!("invalid variable reference {text:?}")))?;
    let scope = FrameScope::from_str(scope_str)
        .map_err(|_| InterpreterError::xml_structure(format!("invalid frame scope {scope_str:?}")))?;
    validate_identifier(name)?;
    Ok(Var::new(scope, name))
}

fn parse_label(text: &str) -> Result<String, InterpreterError> {
    validate_identifier(text)?;
    Ok(text.to_string())
}

fn validate_identifier(name: &str) -> Result<(), InterpreterError> {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if is_identifier_start(c) => {}
        _ => return Err(InterpreterError::xml_structure(format!("invalid identifier {name:?}"))),
    }
    if !chars.all(is_identifier_continue) {
        return Err(InterpreterError::xml_structure(format!("invalid identifier {name:?}")));
    }
    Ok(())
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || "_-$&%*!?".contains(c)
}

fn is_identifier_continue(c: char) -> bool {
    c.is_alphanumeric() || "_-$&%*!?".contains(c)
}

fn parse_literal(type_attr: &str, text: &str) -> Result<Value, InterpreterError> {
    match type_attr {
        "int" => text
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| InterpreterError::xml_structure(format!("invalid int literal {text:?}"))),
        "float" => value::parse_hex_float(text.trim())
            .map(Value::Float)
            .ok_or_else(|| InterpreterError::xml_structure(format!("invalid float literal {text:?}"))),
        "bool" => match text.trim() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            other => Err(InterpreterError::xml_structure(format!("invalid bool literal {other:?}"))),
        },
        "string" => Ok(Value::String(text.to_string())),
        "nil" => {
            if text.trim() == "nil" {
                Ok(Value::Nil)
            } else {
                Err(InterpreterError::xml_structure(format!("invalid nil literal {text:?}")))
            }
        }
        other => Err(InterpreterError::xml_structure(format!("unknown operand type {other:?}"))),
    }
}
