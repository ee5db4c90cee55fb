//! Rationals extended by infinities and an undefined value.

use std::cmp::Ordering;
use std::fmt;
use std::ops::*;

use crate::{Integer, MathsError, MathsResult};

/// Element of ℚ ∪ {+∞, −∞, undefined}.
///
/// Finite values are stored in lowest terms with a positive denominator.
/// The sentinels are `(1, 0)` for +∞, `(-1, 0)` for −∞, and `(0, 0)` for the
/// undefined value. Arithmetic follows the extended real line where that is
/// defined (`∞ + 1 == ∞`, `1 / 0 == ∞`) and is undefined elsewhere
/// (`∞ - ∞`, `0 * ∞`).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Rational {
    num: Integer,
    den: Integer,
}

impl Default for Rational {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Rational {
    /// Zero.
    pub const ZERO: Self = Self {
        num: Integer::ZERO,
        den: Integer::ONE,
    };
    /// One.
    pub const ONE: Self = Self {
        num: Integer::ONE,
        den: Integer::ONE,
    };
    /// Positive infinity.
    pub const INFINITY: Self = Self {
        num: Integer::ONE,
        den: Integer::ZERO,
    };
    /// Negative infinity.
    pub const NEG_INFINITY: Self = Self {
        num: Integer::MINUS_ONE,
        den: Integer::ZERO,
    };
    /// Undefined value.
    pub const UNDEFINED: Self = Self {
        num: Integer::ZERO,
        den: Integer::ZERO,
    };

    /// Constructs `num / den` in lowest terms. A zero denominator gives a
    /// signed infinity, or undefined for `0 / 0`.
    pub fn new(num: impl Into<Integer>, den: impl Into<Integer>) -> Self {
        let (num, den) = (num.into(), den.into());
        if den.is_zero() {
            return match num.sign() {
                1 => Self::INFINITY,
                -1 => Self::NEG_INFINITY,
                _ => Self::UNDEFINED,
            };
        }
        if num.is_zero() {
            return Self::ZERO;
        }
        let mut g = num.gcd(&den);
        if den.is_negative() {
            g.negate();
        }
        Self {
            num: &num / &g,
            den: &den / &g,
        }
    }

    /// Returns the numerator.
    pub fn numerator(&self) -> &Integer {
        &self.num
    }
    /// Returns the denominator, which is zero exactly for the sentinels.
    pub fn denominator(&self) -> &Integer {
        &self.den
    }

    /// Returns whether the value is a finite rational.
    pub fn is_finite(&self) -> bool {
        !self.den.is_zero()
    }
    /// Returns whether the value is +∞ or −∞.
    pub fn is_infinite(&self) -> bool {
        self.den.is_zero() && !self.num.is_zero()
    }
    /// Returns whether the value is undefined.
    pub fn is_undefined(&self) -> bool {
        self.den.is_zero() && self.num.is_zero()
    }
    /// Returns whether the value is zero.
    pub fn is_zero(&self) -> bool {
        self.num.is_zero() && !self.den.is_zero()
    }
    /// Returns whether the value is a finite integer.
    pub fn is_integer(&self) -> bool {
        self.den == 1
    }

    /// Returns `-1`, `0`, or `1` by sign. Undefined has sign zero.
    pub fn sign(&self) -> i32 {
        self.num.sign()
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self {
            num: self.num.abs(),
            den: self.den.clone(),
        }
    }

    /// Returns the multiplicative inverse. The inverse of zero is +∞ and the
    /// inverse of either infinity is zero.
    #[must_use]
    pub fn inverse(&self) -> Self {
        if self.is_undefined() {
            Self::UNDEFINED
        } else if self.is_infinite() {
            Self::ZERO
        } else if self.num.is_zero() {
            Self::INFINITY
        } else {
            Self::new(self.den.clone(), self.num.clone())
        }
    }

    /// Returns `self / rhs`, or an error if `rhs` is zero.
    pub fn try_div(&self, rhs: &Self) -> MathsResult<Self> {
        match rhs.is_zero() {
            true => Err(MathsError::DivisionByZero),
            false => Ok(self / rhs),
        }
    }

    /// Returns the nearest `f64`, or `None` if the value is not finite or is
    /// outside the range of finite non-zero doubles.
    pub fn double_approx(&self) -> Option<f64> {
        if !self.is_finite() {
            return None;
        }
        if self.num.is_zero() {
            return Some(0.0);
        }
        const EXACT: u64 = 1 << 53;
        if let (Some(n), Some(d)) = (self.num.to_i64(), self.den.to_i64()) {
            if n.unsigned_abs() <= EXACT && d.unsigned_abs() <= EXACT {
                return Some(n as f64 / d as f64);
            }
        }

        // Scale so that the integer quotient carries 64 significant bits.
        let shift = self.num.bit_length() as i64 - self.den.bit_length() as i64 - 64;
        let quotient = match u32::try_from(shift) {
            Ok(s) => &self.num / (&self.den << s),
            Err(_) => (&self.num << u32::try_from(-shift).ok()?) / &self.den,
        };
        let mantissa = num_traits::ToPrimitive::to_f64(&quotient)?;
        let exponent = i32::try_from(shift).ok()?;
        // Split the power of two so that neither factor overflows on its own.
        let half = exponent / 2;
        let ret = mantissa * 2.0_f64.powi(half) * 2.0_f64.powi(exponent - half);
        (ret.is_finite() && ret != 0.0).then_some(ret)
    }

    fn cmp_finite(&self, other: &Self) -> Ordering {
        (&self.num * &other.den).cmp(&(&other.num * &self.den))
    }
}

impl From<Integer> for Rational {
    fn from(value: Integer) -> Self {
        Self {
            num: value,
            den: Integer::ONE,
        }
    }
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Self::from(Integer::from(value))
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_undefined() {
            write!(f, "Undef")
        } else if self.is_infinite() {
            match self.num.is_negative() {
                true => write!(f, "-Inf"),
                false => write!(f, "Inf"),
            }
        } else if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl PartialOrd for Rational {
    /// Orders the extended line `−∞ < finite < +∞`. The undefined value is
    /// equal to itself and incomparable with everything else.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.is_undefined(), other.is_undefined()) {
            (true, true) => return Some(Ordering::Equal),
            (true, false) | (false, true) => return None,
            (false, false) => (),
        }
        match (self.is_finite(), other.is_finite()) {
            (true, true) => Some(self.cmp_finite(other)),
            // Infinities compare by sign against anything.
            _ => Some(
                self.extended_rank()
                    .cmp(&other.extended_rank())
                    .then_with(|| self.cmp_finite(other)),
            ),
        }
    }
}

impl Rational {
    fn extended_rank(&self) -> i32 {
        match self.is_infinite() {
            true => self.num.sign(),
            false => 0,
        }
    }
}

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational {
            num: -&self.num,
            den: self.den.clone(),
        }
    }
}

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        -&self
    }
}

impl Add<&Rational> for &Rational {
    type Output = Rational;

    fn add(self, rhs: &Rational) -> Rational {
        if self.is_undefined() || rhs.is_undefined() {
            return Rational::UNDEFINED;
        }
        match (self.is_infinite(), rhs.is_infinite()) {
            (true, true) if self.num != rhs.num => Rational::UNDEFINED,
            (true, _) => self.clone(),
            (false, true) => rhs.clone(),
            (false, false) => Rational::new(
                &self.num * &rhs.den + &rhs.num * &self.den,
                &self.den * &rhs.den,
            ),
        }
    }
}

impl Sub<&Rational> for &Rational {
    type Output = Rational;

    fn sub(self, rhs: &Rational) -> Rational {
        self + &-rhs
    }
}

impl Mul<&Rational> for &Rational {
    type Output = Rational;

    fn mul(self, rhs: &Rational) -> Rational {
        if self.is_undefined() || rhs.is_undefined() {
            return Rational::UNDEFINED;
        }
        if self.is_infinite() || rhs.is_infinite() {
            return match self.sign() * rhs.sign() {
                1 => Rational::INFINITY,
                -1 => Rational::NEG_INFINITY,
                _ => Rational::UNDEFINED,
            };
        }
        Rational::new(&self.num * &rhs.num, &self.den * &rhs.den)
    }
}

impl Div<&Rational> for &Rational {
    type Output = Rational;

    fn div(self, rhs: &Rational) -> Rational {
        if rhs.is_zero() {
            // Signed infinity, so that `-1 / 0 == -∞`.
            return Rational::new(self.num.clone(), Integer::ZERO);
        }
        self * &rhs.inverse()
    }
}

macro_rules! impl_owned_ops {
    ($($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident;)*) => {
        $(
            impl $trait<Rational> for Rational {
                type Output = Rational;

                fn $method(self, rhs: Rational) -> Rational {
                    (&self).$method(&rhs)
                }
            }
            impl $trait<&Rational> for Rational {
                type Output = Rational;

                fn $method(self, rhs: &Rational) -> Rational {
                    (&self).$method(rhs)
                }
            }
            impl $trait<Rational> for &Rational {
                type Output = Rational;

                fn $method(self, rhs: Rational) -> Rational {
                    self.$method(&rhs)
                }
            }
            impl $assign_trait<&Rational> for Rational {
                fn $assign_method(&mut self, rhs: &Rational) {
                    *self = (&*self).$method(rhs);
                }
            }
            impl $assign_trait<Rational> for Rational {
                fn $assign_method(&mut self, rhs: Rational) {
                    *self = (&*self).$method(&rhs);
                }
            }
        )*
    };
}

impl_owned_ops! {
    Add, add, AddAssign, add_assign;
    Sub, sub, SubAssign, sub_assign;
    Mul, mul, MulAssign, mul_assign;
    Div, div, DivAssign, div_assign;
}

impl std::iter::Sum for Rational {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |a, b| a + b)
    }
}
