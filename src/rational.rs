// mediatag-core/src/rational.rs
//! TIFF fraction types
//!
//! Stored fields are kept exactly as decoded; reduction only happens when
//! asked for explicitly or when formatting for display.

use std::fmt;

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Unsigned fraction (wire type 5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rational {
    /// Numerator
    pub numerator: u32,
    /// Denominator; zero marks an invalid value
    pub denominator: u32,
}

impl Rational {
    /// Build a fraction without reducing it
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// `false` for the `x/0` sentinel
    pub fn is_valid(&self) -> bool {
        self.denominator != 0
    }

    /// Divide both fields by their greatest common divisor
    ///
    /// `0/n` reduces to `0/1`. Invalid values (`x/0`) are returned unchanged.
    pub fn reduce(&self) -> Self {
        if self.denominator == 0 {
            return *self;
        }
        if self.numerator == 0 {
            return Self::new(0, 1);
        }
        let g = gcd(self.numerator as u64, self.denominator as u64) as u32;
        Self::new(self.numerator / g, self.denominator / g)
    }

    /// Floating point value; follows IEEE division when the denominator is zero
    pub fn to_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.reduce();
        write!(f, "{}/{}", r.numerator, r.denominator)
    }
}

impl From<(u32, u32)> for Rational {
    fn from((numerator, denominator): (u32, u32)) -> Self {
        Self::new(numerator, denominator)
    }
}

/// Signed fraction (wire type 10)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SRational {
    /// Numerator
    pub numerator: i32,
    /// Denominator; zero marks an invalid value
    pub denominator: i32,
}

impl SRational {
    /// Build a fraction without reducing it
    pub const fn new(numerator: i32, denominator: i32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// `false` for the `x/0` sentinel
    pub fn is_valid(&self) -> bool {
        self.denominator != 0
    }

    /// Divide both fields by their greatest common divisor and move the sign
    /// into the numerator
    ///
    /// `0/n` reduces to `0/1`. Invalid values (`x/0`) are returned unchanged.
    /// Results that cannot be represented in `i32` (only possible around
    /// `i32::MIN`) are also returned unchanged.
    pub fn reduce(&self) -> Self {
        if self.denominator == 0 {
            return *self;
        }
        if self.numerator == 0 {
            return Self::new(0, 1);
        }
        let num = self.numerator as i64;
        let den = self.denominator as i64;
        let g = gcd(num.unsigned_abs(), den.unsigned_abs()) as i64;
        let (mut num, mut den) = (num / g, den / g);
        if den < 0 {
            num = -num;
            den = -den;
        }
        match (i32::try_from(num), i32::try_from(den)) {
            (Ok(n), Ok(d)) => Self::new(n, d),
            _ => *self,
        }
    }

    /// Floating point value; follows IEEE division when the denominator is zero
    pub fn to_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl fmt::Display for SRational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.reduce();
        write!(f, "{}/{}", r.numerator, r.denominator)
    }
}

impl From<(i32, i32)> for SRational {
    fn from((numerator, denominator): (i32, i32)) -> Self {
        Self::new(numerator, denominator)
    }
}
