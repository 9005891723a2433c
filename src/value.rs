//! The typed value model: [`TypeTag`], [`Value`] and the operator semantics
//! defined over them (§4.1).

use util_derive::EnumFromStr;

use crate::error::InterpreterError;

/// One of the six value kinds the abstract machine knows about.
///
/// `Undef` is never the tag of a literal read from the program; it is the
/// tag a [`Variable`](crate::frame::Variable) holds after `DEFVAR` and
/// before its first assignment.
#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumFromStr)]
pub enum TypeTag {
    Int,
    Float,
    String,
    Bool,
    Nil,
    Undef,
}

impl TypeTag {
    /// The name TYPE reports for this tag, or `None` for `Undef` (TYPE
    /// represents an undefined value as the empty string, not as a type
    /// name).
    pub fn type_name(self) -> Option<&'static str> {
        match self {
            TypeTag::Int => Some("int"),
            TypeTag::Float => Some("float"),
            TypeTag::String => Some("string"),
            TypeTag::Bool => Some("bool"),
            TypeTag::Nil => Some("nil"),
            TypeTag::Undef => None,
        }
    }
}

/// A typed value: a [`TypeTag`] paired with the payload the tag promises.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Nil,
    Undef,
}

impl Value {
    pub fn tag(&self) -> TypeTag {
        match self {
            Value::Int(_) => TypeTag::Int,
            Value::Float(_) => TypeTag::Float,
            Value::String(_) => TypeTag::String,
            Value::Bool(_) => TypeTag::Bool,
            Value::Nil => TypeTag::Nil,
            Value::Undef => TypeTag::Undef,
        }
    }

    /// Replaces `\ddd` three-digit decimal escapes with the code point they
    /// denote. Idempotent: a string with no remaining `\ddd` runs is
    /// returned unchanged by a second call.
    pub fn de_escape(s: &str) -> String {
        let bytes = s.as_bytes();
        let mut out = String::with_capacity(s.len());
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'\\' && i + 3 < bytes.len() && bytes[i + 1..i + 4].iter().all(u8::is_ascii_digit) {
                let code: u32 = s[i + 1..i + 4].parse().unwrap();
                if let Some(c) = char::from_u32(code) {
                    out.push(c);
                    i += 4;
                    continue;
                }
            }
            // Safe: we only skip ahead inside an ASCII `\ddd` run above, so
            // stepping one `char` at a time elsewhere stays on a boundary.
            let ch = s[i..].chars().next().unwrap();
            out.push(ch);
            i += ch.len_utf8();
        }
        out
    }

    /// The de-escaped string payload, for operators that must consume
    /// string content (CONCAT, comparisons, WRITE, ...). Panics if `self`
    /// isn't a string; callers are expected to have type-checked already.
    fn de_escaped_str(&self) -> String {
        match self {
            Value::String(s) => Value::de_escape(s),
            _ => unreachable!("de_escaped_str called on a non-string value"),
        }
    }

    /// Canonical textual form used by WRITE/DPRINT: de-escaped for strings,
    /// `"true"`/`"false"` for bool, hex-float for float, empty for
    /// nil/undef, decimal for int.
    pub fn display_form(&self) -> String {
        match self {
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format_hex_float(*f),
            Value::String(_) => self.de_escaped_str(),
            Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            Value::Nil | Value::Undef => String::new(),
        }
    }
}

/// Renders a float the way Python's `float.hex` does: this interpreter's
/// wire format for float literals, preserved on output so READ/WRITE
/// round-trip exactly.
pub fn format_hex_float(f: f64) -> String {
    if f == 0.0 {
        return if f.is_sign_negative() { "-0x0.0p+0".to_string() } else { "0x0.0p+0".to_string() };
    }
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f < 0.0 { "-inf".to_string() } else { "inf".to_string() };
    }

    let bits = f.to_bits();
    let sign = if (bits >> 63) & 1 == 1 { "-" } else { "" };
    let raw_exp = ((bits >> 52) & 0x7ff) as i64;
    let mantissa = bits & 0x000f_ffff_ffff_ffff;

    let (lead, exp) = if raw_exp == 0 {
        (0u64, -1022i64)
    } else {
        (1u64, raw_exp - 1023)
    };

    let mantissa_hex = format!("{:013x}", mantissa);

    format!("{sign}0x{lead}.{mantissa_hex}p{exp:+}")
}

/// Parses the hex-float wire form produced by [`format_hex_float`] (and by
/// any conforming XML producer), e.g. `0x1.8p+3`.
pub fn parse_hex_float(s: &str) -> Option<f64> {
    let s = s.trim();
    let (sign, rest) = match s.strip_prefix('-') {
        Some(r) => (-1.0, r),
        None => (1.0, s.strip_prefix('+').unwrap_or(s)),
    };
    let rest = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X"))?;
    let (mantissa_part, exp_part) = rest.split_once(['p', 'P'])?;
    let exp: i32 = exp_part.parse().ok()?;

    let (int_part, frac_part) = match mantissa_part.split_once('.') {
        Some((i, f)) => (i, f),
        None => (mantissa_part, ""),
    };

    let int_val = if int_part.is_empty() {
        0u64
    } else {
        u64::from_str_radix(int_part, 16).ok()?
    };

    let mut frac_val = 0f64;
    let mut scale = 1f64 / 16.0;
    for c in frac_part.chars() {
        let digit = c.to_digit(16)? as f64;
        frac_val += digit * scale;
        scale /= 16.0;
    }

    let mantissa = int_val as f64 + frac_val;
    Some(sign * mantissa * 2f64.powi(exp))
}

macro_rules! numeric_binop {
    ($name:ident, $op:tt, $opname:literal) => {
        pub fn $name(a: &Value, b: &Value) -> Result<Value, InterpreterError> {
            match (a, b) {
                (Value::Int(x), Value::Int(y)) => Ok(Value::Int(x $op y)),
                (Value::Float(x), Value::Float(y)) => Ok(Value::Float(x $op y)),
                _ => Err(InterpreterError::type_mismatch(format!(
                    "{} requires two operands of the same numeric type, got {:?} and {:?}",
                    $opname, a.tag(), b.tag()
                ))),
            }
        }
    };
}

numeric_binop!(add, +, "ADD");
numeric_binop!(sub, -, "SUB");
numeric_binop!(mul, *, "MUL");

pub fn idiv(a: &Value, b: &Value) -> Result<Value, InterpreterError> {
    match (a, b) {
        (Value::Int(_), Value::Int(0)) => Err(InterpreterError::operand_value("division by zero")),
        (Value::Int(x), Value::Int(y)) => Ok(Value::Int(x / y)),
        _ => Err(InterpreterError::type_mismatch(format!(
            "IDIV requires two int operands, got {:?} and {:?}",
            a.tag(),
            b.tag()
        ))),
    }
}

pub fn div(a: &Value, b: &Value) -> Result<Value, InterpreterError> {
    match (a, b) {
        (Value::Float(_), Value::Float(y)) if *y == 0.0 => {
            Err(InterpreterError::operand_value("division by zero"))
        }
        (Value::Float(x), Value::Float(y)) => Ok(Value::Float(x / y)),
        (Value::Int(_), Value::Int(_)) => Err(InterpreterError::type_mismatch(
            "DIV requires float operands; use IDIV for integers",
        )),
        _ => Err(InterpreterError::type_mismatch(format!(
            "DIV requires two float operands, got {:?} and {:?}",
            a.tag(),
            b.tag()
        ))),
    }
}

fn numeric_cmp(a: &Value, b: &Value, op_name: &str) -> Result<std::cmp::Ordering, InterpreterError> {
    if a.tag() == TypeTag::Nil || b.tag() == TypeTag::Nil {
        return Err(InterpreterError::type_mismatch(format!("{op_name} does not support nil")));
    }
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(x.cmp(y)),
        (Value::Float(x), Value::Float(y)) => {
            x.partial_cmp(y).ok_or_else(|| InterpreterError::type_mismatch(format!("{op_name}: unordered float comparison")))
        }
        (Value::Bool(x), Value::Bool(y)) => Ok(x.cmp(y)),
        (Value::String(_), Value::String(_)) => Ok(a.de_escaped_str().cmp(&b.de_escaped_str())),
        _ => Err(InterpreterError::type_mismatch(format!(
            "{op_name} requires two operands of the same type, got {:?} and {:?}",
            a.tag(),
            b.tag()
        ))),
    }
}

pub fn lt(a: &Value, b: &Value) -> Result<Value, InterpreterError> {
    Ok(Value::Bool(numeric_cmp(a, b, "LT")? == std::cmp::Ordering::Less))
}

pub fn gt(a: &Value, b: &Value) -> Result<Value, InterpreterError> {
    Ok(Value::Bool(numeric_cmp(a, b, "GT")? == std::cmp::Ordering::Greater))
}

/// EQ: same-tag comparison, except either side may be `nil`.
/// `nil == nil` is true, `nil == <non-nil>` is always false.
pub fn eq(a: &Value, b: &Value) -> Result<Value, InterpreterError> {
    if a.tag() == TypeTag::Nil || b.tag() == TypeTag::Nil {
        return Ok(Value::Bool(a.tag() == TypeTag::Nil && b.tag() == TypeTag::Nil));
    }
    if a.tag() != b.tag() {
        return Err(InterpreterError::type_mismatch(format!(
            "EQ requires operands of the same type, got {:?} and {:?}",
            a.tag(),
            b.tag()
        )));
    }
    let equal = match (a, b) {
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(_), Value::String(_)) => a.de_escaped_str() == b.de_escaped_str(),
        _ => unreachable!(),
    };
    Ok(Value::Bool(equal))
}

fn as_bool(v: &Value, op_name: &str) -> Result<bool, InterpreterError> {
    match v {
        Value::Bool(b) => Ok(*b),
        _ => Err(InterpreterError::type_mismatch(format!(
            "{op_name} supports bool operands only, got {:?}",
            v.tag()
        ))),
    }
}

pub fn and(a: &Value, b: &Value) -> Result<Value, InterpreterError> {
    Ok(Value::Bool(as_bool(a, "AND")? && as_bool(b, "AND")?))
}

pub fn or(a: &Value, b: &Value) -> Result<Value, InterpreterError> {
    Ok(Value::Bool(as_bool(a, "OR")? || as_bool(b, "OR")?))
}

pub fn not(a: &Value) -> Result<Value, InterpreterError> {
    Ok(Value::Bool(!as_bool(a, "NOT")?))
}

pub fn int2char(a: &Value) -> Result<Value, InterpreterError> {
    let code = match a {
        Value::Int(i) => *i,
        _ => return Err(InterpreterError::type_mismatch(format!("INT2CHAR requires an int operand, got {:?}", a.tag()))),
    };
    let code: u32 = code
        .try_into()
        .map_err(|_| InterpreterError::string_op(format!("{code} is not a valid Unicode code point")))?;
    char::from_u32(code)
        .map(|c| Value::String(c.to_string()))
        .ok_or_else(|| InterpreterError::string_op(format!("{code} is not a valid Unicode code point")))
}

pub fn stri2int(s: &Value, idx: &Value) -> Result<Value, InterpreterError> {
    let s = match s {
        Value::String(s) => Value::de_escape(s),
        _ => return Err(InterpreterError::type_mismatch(format!("STRI2INT requires a string operand, got {:?}", s.tag()))),
    };
    let idx = match idx {
        Value::Int(i) => *i,
        _ => return Err(InterpreterError::type_mismatch(format!("STRI2INT requires an int index, got {:?}", idx.tag()))),
    };
    char_at(&s, idx)
        .map(|c| Value::Int(c as i64))
        .ok_or_else(|| InterpreterError::string_op("index out of range in STRI2INT"))
}

pub fn int2float(a: &Value) -> Result<Value, InterpreterError> {
    match a {
        Value::Undef => Err(InterpreterError::missing_value("INT2FLOAT operand has no value")),
        Value::Int(i) => Ok(Value::Float(*i as f64)),
        _ => Err(InterpreterError::type_mismatch(format!("INT2FLOAT requires an int operand, got {:?}", a.tag()))),
    }
}

pub fn float2int(a: &Value) -> Result<Value, InterpreterError> {
    match a {
        Value::Undef => Err(InterpreterError::missing_value("FLOAT2INT operand has no value")),
        Value::Float(f) => Ok(Value::Int(*f as i64)),
        _ => Err(InterpreterError::type_mismatch(format!("FLOAT2INT requires a float operand, got {:?}", a.tag()))),
    }
}

pub fn concat(a: &Value, b: &Value) -> Result<Value, InterpreterError> {
    match (a, b) {
        (Value::String(_), Value::String(_)) => Ok(Value::String(format!("{}{}", a.de_escaped_str(), b.de_escaped_str()))),
        _ => Err(InterpreterError::type_mismatch("CONCAT requires two string operands")),
    }
}

pub fn strlen(a: &Value) -> Result<Value, InterpreterError> {
    match a {
        Value::String(s) => Ok(Value::Int(Value::de_escape(s).chars().count() as i64)),
        _ => Err(InterpreterError::type_mismatch(format!("STRLEN requires a string operand, got {:?}", a.tag()))),
    }
}

pub fn getchar(s: &Value, idx: &Value) -> Result<Value, InterpreterError> {
    let text = match s {
        Value::String(s) => Value::de_escape(s),
        _ => return Err(InterpreterError::type_mismatch("GETCHAR requires a string as its first operand")),
    };
    let idx = match idx {
        Value::Int(i) => *i,
        _ => return Err(InterpreterError::type_mismatch("GETCHAR requires an int index")),
    };
    char_at(&text, idx)
        .map(|c| Value::String(c.to_string()))
        .ok_or_else(|| InterpreterError::string_op("index out of range in GETCHAR"))
}

pub fn setchar(dest: &Value, idx: &Value, replacement: &Value) -> Result<Value, InterpreterError> {
    let base = match dest {
        Value::String(s) => Value::de_escape(s),
        _ => return Err(InterpreterError::type_mismatch("SETCHAR's destination must already hold a string")),
    };
    let idx = match idx {
        Value::Int(i) => *i,
        _ => return Err(InterpreterError::type_mismatch("SETCHAR requires an int index")),
    };
    let replacement = match replacement {
        Value::String(s) => Value::de_escape(s),
        _ => return Err(InterpreterError::type_mismatch("SETCHAR requires a string replacement")),
    };
    let replacement_char = replacement
        .chars()
        .next()
        .ok_or_else(|| InterpreterError::string_op("SETCHAR replacement string is empty"))?;

    if idx < 0 {
        return Err(InterpreterError::string_op("SETCHAR index must be non-negative"));
    }
    let mut chars: Vec<char> = base.chars().collect();
    let idx = idx as usize;
    if idx >= chars.len() {
        return Err(InterpreterError::string_op("SETCHAR index out of range"));
    }
    chars[idx] = replacement_char;
    Ok(Value::String(chars.into_iter().collect()))
}

/// Reports the type name TYPE(dest, src) would assign, as the `string`
/// value TYPE writes (or the empty string for `undef`, per §4.1 — TYPE is
/// the only operator that never fails on `undef`).
pub fn type_name_of(a: &Value) -> Value {
    match a.tag().type_name() {
        Some(name) => Value::String(name.to_string()),
        None => Value::String(String::new()),
    }
}

fn char_at(s: &str, idx: i64) -> Option<char> {
    if idx < 0 {
        return None;
    }
    s.chars().nth(idx as usize)
}
