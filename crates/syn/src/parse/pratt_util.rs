//! Pratt parsing utilities and definitions.
//!
//! This module contains utilities for pratt-parsing TTCN-3 expressions.

use crate::node::SynTag;

/*
   Precedence from high to low:

       - Primary Expr: Ident, Literal, Composite literal, Parens
       - Selector/Index/Call Expr `x.a` `x[a]` `f(a)`

       - Unary Op `-x` `+x` `not4b x`
       - Multiplicative Op `x * y` `x / y` `x mod y` `x rem y`
       - Additive Op `x + y` `x - y` `x & y`
       - Bitwise Op `x and4b y` `x xor4b y` `x or4b y`
       - Shift Op `x << y` `x >> y` `x <@ y` `x @> y`
       - Range `x .. y`
       - Comparison Op `x < y` `x > y` `x <= y` `x >= y`
       - Equality Op `x == y` `x != y`
       - Unary Logical Op `not x`
       - Binary And Op `x and y`
       - Binary Xor Op `x xor y`
       - Binary Or Op `x or y`
       - Assignment Op `x := y`

   Binding power are precedence combined with associativity. The basic unit in
   precedence is 10, and every left/right associativity alternate this by 1.
*/

use SynTag::*;

#[derive(Debug, Clone, Copy)]
pub enum Infix {
    Left(i32),
    Right(i32),
}

impl Infix {
    pub fn binding_power(self) -> (i32, i32) {
        match self {
            Infix::Left(i) => (i, i + 1),
            Infix::Right(i) => (i + 1, i),
        }
    }
}

pub fn prefix_binding_power(op: SynTag) -> Option<i32> {
    match op {
        NotKw => Some(40),
        Add | Sub | Not4bKw => Some(120),
        _ => None,
    }
}

pub fn infix_binding_power(op: SynTag) -> Option<Infix> {
    match op {
        Assign => Infix::Right(10).into(),
        OrKw => Infix::Left(20).into(),
        XorKw => Infix::Left(25).into(),
        AndKw => Infix::Left(30).into(),

        Eq | Neq => Infix::Left(50).into(),
        Lt | Gt | Le | Ge => Infix::Left(60).into(),
        DotDot => Infix::Left(65).into(),
        Shl | Shr | Rotl | Rotr => Infix::Left(70).into(),
        Or4bKw => Infix::Left(80).into(),
        Xor4bKw => Infix::Left(85).into(),
        And4bKw => Infix::Left(90).into(),

        Add | Sub | Amp => Infix::Left(100).into(),
        Mul | Div | ModKw | RemKw => Infix::Left(110).into(),

        _ => None,
    }
}

/// Call, selector and index expressions bind tighter than any operator.
pub fn postfix_binding_power(op: SynTag) -> Option<i32> {
    match op {
        LParen | Dot | LBracket => Some(130),
        _ => None,
    }
}
