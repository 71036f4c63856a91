//! The value system of the TTCN-3 evaluator: objects, environments and
//! builtin functions.

pub mod builtins;
mod env;
mod value;

#[cfg(test)]
mod test;

pub use builtins::Builtin;
pub use env::Environment;
pub use value::{
    Bitstring, Function, Object, ObjectType, RuntimeError, Unit, ValueError, Verdict,
};
