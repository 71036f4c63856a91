use std::fmt;

use num_bigint::BigUint;
use num_traits::Num;

use super::ValueError;

/// How the digits of a [`Bitstring`] are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    /// `'1010'B`
    Bit,
    /// `'FF'H`
    Hex,
    /// `'FF'O`
    Octet,
}

impl Unit {
    pub fn from_suffix(c: char) -> Option<Unit> {
        match c.to_ascii_uppercase() {
            'B' => Some(Unit::Bit),
            'H' => Some(Unit::Hex),
            'O' => Some(Unit::Octet),
            _ => None,
        }
    }

    pub fn suffix(self) -> char {
        match self {
            Unit::Bit => 'B',
            Unit::Hex => 'H',
            Unit::Octet => 'O',
        }
    }

    /// The radix digits are written in.
    pub fn base(self) -> u32 {
        match self {
            Unit::Bit => 2,
            Unit::Hex | Unit::Octet => 16,
        }
    }

    /// Number of bits a single element occupies.
    ///
    /// Octets are counted in 4-bit steps like hexstrings.
    pub fn width(self) -> u64 {
        match self {
            Unit::Bit => 1,
            Unit::Hex | Unit::Octet => 4,
        }
    }
}

/// A bitstring, hexstring or octetstring value.
///
/// Only the magnitude is stored, so leading zero digits are not preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bitstring {
    value: BigUint,
    unit: Unit,
}

impl Bitstring {
    pub fn new(value: BigUint, unit: Unit) -> Self {
        Bitstring { value, unit }
    }

    /// Parse a literal like `'1010'B`, `'ff'h` or `'00 FF'O`.
    ///
    /// Whitespace between the quotes is ignored. Every other character must be
    /// a digit of the unit's base.
    pub fn parse(s: &str) -> Result<Bitstring, ValueError> {
        let err = || ValueError::InvalidBitstring(s.to_owned());

        let bytes = s.as_bytes();
        let len = bytes.len();
        if len < 3 || bytes[0] != b'\'' || bytes[len - 2] != b'\'' {
            return Err(err());
        }
        let unit = Unit::from_suffix(bytes[len - 1] as char).ok_or_else(err)?;

        let digits = s[1..len - 2]
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>();
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(unit.base())) {
            return Err(err());
        }

        let value = BigUint::from_str_radix(&digits, unit.base()).map_err(|_| err())?;
        Ok(Bitstring { value, unit })
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// The number of elements, derived from the bit length of the magnitude.
    pub fn len(&self) -> u64 {
        self.value.bits() / self.unit.width()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Bitstring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}'{}",
            self.value.to_str_radix(self.unit.base()),
            self.unit.suffix()
        )
    }
}
