use std::fmt;
use std::rc::Rc;

use bigdecimal::BigDecimal;
use itertools::Itertools;
use num_bigint::BigInt;
use num_traits::Signed;
use smol_str::SmolStr;
use thiserror::Error;
use ttcn3_syn::ast::{BlockStmt, FormalPars};

use crate::{Builtin, Environment};

mod bitstring;

pub use bitstring::{Bitstring, Unit};

/// A literal that could not be turned into a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("invalid bitstring literal `{0}`")]
    InvalidBitstring(String),
    #[error("invalid integer literal `{0}`")]
    InvalidInteger(String),
    #[error("invalid float literal `{0}`")]
    InvalidFloat(String),
}

/// The discriminant of an [`Object`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Undefined,
    RuntimeError,
    ReturnValue,
    Integer,
    Float,
    Boolean,
    String,
    Bitstring,
    Function,
    List,
    Builtin,
    Verdict,
}

impl ObjectType {
    /// The name used in messages, e.g. `"integer"`.
    pub fn name(self) -> &'static str {
        match self {
            ObjectType::Undefined => "undefined",
            ObjectType::RuntimeError => "runtime error",
            ObjectType::ReturnValue => "return value",
            ObjectType::Integer => "integer",
            ObjectType::Float => "float",
            ObjectType::Boolean => "boolean",
            ObjectType::String => "string",
            ObjectType::Bitstring => "bitstring",
            ObjectType::Function => "function",
            ObjectType::List => "list",
            ObjectType::Builtin => "builtin function",
            ObjectType::Verdict => "verdict",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An error raised while evaluating. Errors are ordinary values and travel
/// through evaluation like any other object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeError {
    pub message: String,
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {}", self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    None,
    Pass,
    Inconc,
    Fail,
    Error,
}

impl Verdict {
    pub fn from_keyword(s: &str) -> Option<Verdict> {
        Some(match s {
            "none" => Verdict::None,
            "pass" => Verdict::Pass,
            "inconc" => Verdict::Inconc,
            "fail" => Verdict::Fail,
            "error" => Verdict::Error,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::None => "none",
            Verdict::Pass => "pass",
            Verdict::Inconc => "inconc",
            Verdict::Fail => "fail",
            Verdict::Error => "error",
        }
    }
}

/// A user defined function together with the environment it closes over.
#[derive(Debug)]
pub struct Function {
    pub params: Option<FormalPars>,
    pub body: BlockStmt,
    pub env: Environment,
}

impl Function {
    /// Parameter names in declaration order. Parameters without a name are
    /// left out.
    pub fn param_names(&self) -> Vec<SmolStr> {
        self.params
            .iter()
            .flat_map(|pars| pars.pars())
            .filter_map(|par| par.name())
            .map(|name| name.text())
            .collect()
    }
}

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Object {
    Undefined,
    Error(RuntimeError),
    Bool(bool),
    Int(BigInt),
    Float(BigDecimal),
    String(String),
    Bitstring(Bitstring),
    /// Elements that are `None` have not been assigned yet.
    List(Vec<Option<Object>>),
    Function(Rc<Function>),
    Builtin(Builtin),
    /// Wraps the value of a `return` while it unwinds out of a function body.
    ReturnValue(Box<Object>),
    Verdict(Verdict),
}

impl Object {
    pub fn error(message: impl Into<String>) -> Object {
        Object::Error(RuntimeError {
            message: message.into(),
        })
    }

    pub fn int_from_literal(s: &str) -> Result<Object, ValueError> {
        s.parse::<BigInt>()
            .map(Object::Int)
            .map_err(|_| ValueError::InvalidInteger(s.to_owned()))
    }

    pub fn float_from_literal(s: &str) -> Result<Object, ValueError> {
        s.parse::<BigDecimal>()
            .map(Object::Float)
            .map_err(|_| ValueError::InvalidFloat(s.to_owned()))
    }

    pub fn bitstring_from_literal(s: &str) -> Result<Object, ValueError> {
        Bitstring::parse(s).map(Object::Bitstring)
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Undefined => ObjectType::Undefined,
            Object::Error(_) => ObjectType::RuntimeError,
            Object::Bool(_) => ObjectType::Boolean,
            Object::Int(_) => ObjectType::Integer,
            Object::Float(_) => ObjectType::Float,
            Object::String(_) => ObjectType::String,
            Object::Bitstring(_) => ObjectType::Bitstring,
            Object::List(_) => ObjectType::List,
            Object::Function(_) => ObjectType::Function,
            Object::Builtin(_) => ObjectType::Builtin,
            Object::ReturnValue(_) => ObjectType::ReturnValue,
            Object::Verdict(_) => ObjectType::Verdict,
        }
    }

    /// Render the value the way it is shown to users.
    pub fn inspect(&self) -> String {
        match self {
            Object::Undefined => "undefined".to_owned(),
            Object::Error(e) => e.to_string(),
            Object::Bool(b) => b.to_string(),
            Object::Int(i) => i.to_string(),
            Object::Float(f) => inspect_float(f),
            Object::String(s) => s.clone(),
            Object::Bitstring(b) => b.to_string(),
            Object::List(elems) => format!(
                "{{{}}}",
                elems
                    .iter()
                    .map(|e| e.as_ref().map_or_else(|| "null".to_owned(), Object::inspect))
                    .join(", ")
            ),
            Object::Function(func) => {
                format!("function(\"{}\")", func.param_names().iter().join(", "))
            }
            Object::Builtin(_) => "builtin function".to_owned(),
            Object::ReturnValue(v) => v.inspect(),
            Object::Verdict(v) => v.as_str().to_owned(),
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Object::Undefined)
    }

    /// Returns `true` if the value is a runtime error.
    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error(_))
    }

    pub fn is_return_value(&self) -> bool {
        matches!(self, Object::ReturnValue(_))
    }

    /// Returns the boolean value, if the value is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Object::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns a reference to the integer, if the value is an integer.
    pub fn as_int(&self) -> Option<&BigInt> {
        match self {
            Object::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<&BigDecimal> {
        match self {
            Object::Float(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Object::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bitstring(&self) -> Option<&Bitstring> {
        match self {
            Object::Bitstring(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Option<Object>]> {
        match self {
            Object::List(elems) => Some(elems),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Rc<Function>> {
        match self {
            Object::Function(func) => Some(func),
            _ => None,
        }
    }

    /// Strip one level of [`Object::ReturnValue`] wrapping. Other values are
    /// returned as is.
    pub fn unwrap_return(self) -> Object {
        match self {
            Object::ReturnValue(v) => *v,
            v => v,
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}

impl From<bool> for Object {
    fn from(b: bool) -> Self {
        Object::Bool(b)
    }
}

impl From<i32> for Object {
    fn from(i: i32) -> Self {
        Object::Int(i.into())
    }
}

impl From<i64> for Object {
    fn from(i: i64) -> Self {
        Object::Int(i.into())
    }
}

impl From<BigInt> for Object {
    fn from(i: BigInt) -> Self {
        Object::Int(i)
    }
}

impl From<String> for Object {
    fn from(s: String) -> Self {
        Object::String(s)
    }
}

impl From<&str> for Object {
    fn from(s: &str) -> Self {
        Object::String(s.to_owned())
    }
}

impl From<Verdict> for Object {
    fn from(v: Verdict) -> Self {
        Object::Verdict(v)
    }
}

/// Plain decimal text without an exponent, using the fewest digits that
/// represent the value. Integral floats keep a trailing `.0` so they read
/// differently from integers.
fn inspect_float(f: &BigDecimal) -> String {
    let (int, scale) = f.normalized().into_bigint_and_exponent();
    let sign = if int.is_negative() { "-" } else { "" };
    let digits = int.magnitude().to_string();

    if scale <= 0 {
        let zeros = "0".repeat(scale.unsigned_abs() as usize);
        return format!("{}{}{}.0", sign, digits, zeros);
    }
    let scale = scale as usize;
    if digits.len() > scale {
        let (whole, frac) = digits.split_at(digits.len() - scale);
        format!("{}{}.{}", sign, whole, frac)
    } else {
        format!("{}0.{}{}", sign, "0".repeat(scale - digits.len()), digits)
    }
}
