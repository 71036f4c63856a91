//! Functions that are always in scope.

use std::fmt;

use bigdecimal::BigDecimal;
use itertools::Itertools;
use num_bigint::{BigInt, BigUint};
use num_traits::ToPrimitive;

use crate::Object;

/// A natively implemented function.
#[derive(Clone, Copy)]
pub struct Builtin {
    name: &'static str,
    func: fn(&[Object]) -> Object,
}

impl Builtin {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Call the builtin. Failures come back as [`Object::Error`].
    pub fn call(&self, args: &[Object]) -> Object {
        tracing::trace!(name = self.name, args = args.len(), "call builtin");
        (self.func)(args)
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Builtin {}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "lengthof",
        func: lengthof,
    },
    Builtin {
        name: "rnd",
        func: rnd,
    },
    Builtin {
        name: "int2float",
        func: int2float,
    },
    Builtin {
        name: "float2int",
        func: float2int,
    },
    Builtin {
        name: "log",
        func: log,
    },
];

pub fn lookup(name: &str) -> Option<Builtin> {
    BUILTINS.iter().find(|b| b.name == name).copied()
}

pub fn all() -> &'static [Builtin] {
    BUILTINS
}

/// The line `log` writes: every argument inspected, separated by spaces.
pub fn log_line(args: &[Object]) -> String {
    args.iter().map(Object::inspect).join(" ")
}

fn check_arity(args: &[Object], want: usize) -> Result<(), Object> {
    if args.len() == want {
        Ok(())
    } else {
        Err(Object::error(format!(
            "wrong number of arguments. got={}, want={}",
            args.len(),
            want
        )))
    }
}

fn unsupported(arg: &Object) -> Object {
    Object::error(format!("{} arguments not supported", arg.object_type()))
}

fn lengthof(args: &[Object]) -> Object {
    if let Err(e) = check_arity(args, 1) {
        return e;
    }
    match &args[0] {
        Object::String(s) => Object::Int(s.chars().count().into()),
        Object::Bitstring(b) => Object::Int(b.len().into()),
        other => unsupported(other),
    }
}

fn rnd(args: &[Object]) -> Object {
    if let Err(e) = check_arity(args, 0) {
        return e;
    }
    float_from_f64(rand::random::<f64>())
        .map(Object::Float)
        .unwrap_or_else(|| Object::error("random number out of range"))
}

fn int2float(args: &[Object]) -> Object {
    if let Err(e) = check_arity(args, 1) {
        return e;
    }
    match &args[0] {
        Object::Int(i) => {
            let f = i.to_f64().and_then(float_from_f64);
            Object::Float(f.unwrap_or_else(|| BigDecimal::new(round_to_double(i), 0)))
        }
        other => unsupported(other),
    }
}

/// The decimal with the shortest text that reads back as `f`.
fn float_from_f64(f: f64) -> Option<BigDecimal> {
    if !f.is_finite() {
        return None;
    }
    f.to_string().parse().ok()
}

/// Round `i` to the 53 significant bits of a double, for integers too large
/// to be one.
fn round_to_double(i: &BigInt) -> BigInt {
    const MANTISSA_BITS: u64 = 53;
    let magnitude = i.magnitude();
    let bits = magnitude.bits();
    if bits <= MANTISSA_BITS {
        return i.clone();
    }
    let shift = bits - MANTISSA_BITS;
    let half = BigUint::from(1u8) << (shift - 1);
    let mantissa = (magnitude + half) >> shift;
    BigInt::from_biguint(i.sign(), mantissa << shift)
}

/// Truncates towards zero.
fn float2int(args: &[Object]) -> Object {
    if let Err(e) = check_arity(args, 1) {
        return e;
    }
    match &args[0] {
        Object::Float(f) => Object::Int(f.with_scale(0).into_bigint_and_exponent().0),
        other => unsupported(other),
    }
}

fn log(args: &[Object]) -> Object {
    eprintln!("{}", log_line(args));
    Object::Undefined
}
