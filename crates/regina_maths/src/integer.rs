//! Arbitrary-precision integers with a native fast path.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::ops::*;
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use num_integer::Integer as _;
use num_traits::{One, Pow, Signed, ToPrimitive, Zero};

use crate::{MathsError, MathsResult};

/// Element of ℤ with no bound on magnitude.
///
/// Values that fit in an `i64` are always stored natively; anything larger
/// lives on the heap. Every operation re-normalises its result, so two equal
/// integers always have the same representation.
///
/// The arithmetic operators behave like those on primitive integers except
/// that they never overflow: `/` and `%` truncate toward zero and panic on a
/// zero divisor. Use [`Integer::try_div()`] or
/// [`Integer::div_with_remainder()`] for fallible division.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Integer(Repr);

#[derive(Clone, PartialEq, Eq, Hash)]
enum Repr {
    Small(i64),
    Large(BigInt),
}

impl Default for Integer {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Integer {
    /// Zero.
    pub const ZERO: Self = Self(Repr::Small(0));
    /// One.
    pub const ONE: Self = Self(Repr::Small(1));
    /// Negative one.
    pub const MINUS_ONE: Self = Self(Repr::Small(-1));

    /// Constructs an integer from a big integer, storing it natively if it
    /// fits.
    pub fn from_big(value: BigInt) -> Self {
        match value.to_i64() {
            Some(x) => Self(Repr::Small(x)),
            None => Self(Repr::Large(value)),
        }
    }

    /// Returns the value as a big integer.
    pub fn to_big(&self) -> BigInt {
        self.big().into_owned()
    }

    fn big(&self) -> Cow<'_, BigInt> {
        match &self.0 {
            Repr::Small(x) => Cow::Owned(BigInt::from(*x)),
            Repr::Large(x) => Cow::Borrowed(x),
        }
    }

    /// Returns the value as an `i64`, if it fits.
    pub fn to_i64(&self) -> Option<i64> {
        match self.0 {
            Repr::Small(x) => Some(x),
            Repr::Large(_) => None,
        }
    }

    /// Returns whether the value is stored in native form.
    pub fn is_native(&self) -> bool {
        matches!(self.0, Repr::Small(_))
    }

    /// Converts to native form if the value fits. Returns whether the value is
    /// now native.
    ///
    /// All arithmetic already leaves its results reduced, so this only does
    /// work on values built through unusual paths.
    pub fn try_reduce(&mut self) -> bool {
        if let Repr::Large(x) = &self.0 {
            if let Some(small) = x.to_i64() {
                self.0 = Repr::Small(small);
            }
        }
        self.is_native()
    }

    /// Returns whether the value is zero.
    pub fn is_zero(&self) -> bool {
        matches!(self.0, Repr::Small(0))
    }
    /// Returns whether the value is strictly negative.
    pub fn is_negative(&self) -> bool {
        self.sign() < 0
    }
    /// Returns whether the value is strictly positive.
    pub fn is_positive(&self) -> bool {
        self.sign() > 0
    }

    /// Returns `-1`, `0`, or `1` according to the sign of the value.
    pub fn sign(&self) -> i32 {
        match &self.0 {
            Repr::Small(x) => x.signum() as i32,
            Repr::Large(x) => match x.sign() {
                Sign::Minus => -1,
                Sign::NoSign => 0,
                Sign::Plus => 1,
            },
        }
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        match &self.0 {
            Repr::Small(x) => match x.checked_abs() {
                Some(y) => Self(Repr::Small(y)),
                None => Self::from_big(BigInt::from(*x).abs()),
            },
            Repr::Large(x) => Self::from_big(x.abs()),
        }
    }

    /// Negates the value in place.
    pub fn negate(&mut self) {
        *self = -&*self;
    }

    /// Returns the number of bits in the binary representation of the
    /// absolute value. Zero has bit length zero.
    pub fn bit_length(&self) -> u64 {
        match &self.0 {
            Repr::Small(x) => 64 - u64::from(x.unsigned_abs().leading_zeros()),
            Repr::Large(x) => x.bits(),
        }
    }

    /// Returns `self` raised to the power `exp`.
    #[must_use]
    pub fn raise_to_power(&self, exp: u32) -> Self {
        if let Repr::Small(x) = self.0 {
            if let Some(y) = x.checked_pow(exp) {
                return Self(Repr::Small(y));
            }
        }
        Self::from_big(Pow::pow(&*self.big(), exp))
    }

    /// Returns the non-negative greatest common divisor. `gcd(0, 0)` is zero.
    #[must_use]
    pub fn gcd(&self, other: &Self) -> Self {
        match (&self.0, &other.0) {
            (Repr::Small(a), Repr::Small(b)) => {
                let g = a.unsigned_abs().gcd(&b.unsigned_abs());
                match i64::try_from(g) {
                    Ok(g) => Self(Repr::Small(g)),
                    Err(_) => Self::from_big(BigInt::from(g)),
                }
            }
            _ => Self::from_big(self.big().gcd(&other.big())),
        }
    }

    /// Returns the non-negative least common multiple. If either argument is
    /// zero then the result is zero.
    #[must_use]
    pub fn lcm(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::ZERO;
        }
        let g = self.gcd(other);
        (self / &g * other).abs()
    }

    /// Returns `(g, u, v)` where `g` is the non-negative gcd of `self` and
    /// `other` and `u * self + v * other == g`.
    ///
    /// When both arguments are non-zero, the coefficients are the unique pair
    /// with `1 <= u * sign(self) <= |other| / g` and
    /// `-|self| / g < v * sign(other) <= 0`. When exactly one argument is zero
    /// the coefficients are `0` and `±1`.
    ///
    /// Returns an error if both arguments are zero.
    pub fn gcd_with_coeffs(&self, other: &Self) -> MathsResult<(Self, Self, Self)> {
        match (self.is_zero(), other.is_zero()) {
            (true, true) => {
                return Err(MathsError::InvalidArgument(
                    "gcd_with_coeffs() requires a non-zero argument".to_string(),
                ));
            }
            (true, false) => return Ok((other.abs(), Self::ZERO, Self::from(other.sign()))),
            (false, true) => return Ok((self.abs(), Self::from(self.sign()), Self::ZERO)),
            (false, false) => (),
        }

        let a = self.abs();
        let b = other.abs();

        // Extended Euclid on |a|, |b|.
        let (mut r0, mut r1) = (a.clone(), b.clone());
        let (mut s0, mut s1) = (Self::ONE, Self::ZERO);
        while !r1.is_zero() {
            let (q, r) = r0.div_with_remainder(&r1)?;
            r0 = std::mem::replace(&mut r1, r);
            let s = &s0 - &q * &s1;
            s0 = std::mem::replace(&mut s1, s);
        }
        let g = r0;

        // Shift `u` into the range [1, |b|/g]; `v` then lands in (-|a|/g, 0].
        let b_over_g = b.div_exact(&g)?;
        let (_, shifted) = (&s0 - &Self::ONE).div_with_remainder(&b_over_g)?;
        let u = shifted + Self::ONE;
        let v = (&g - &u * &a).div_exact(&b)?;

        Ok((g, u * Self::from(self.sign()), v * Self::from(other.sign())))
    }

    /// Returns `(q, r)` with `self == q * divisor + r` and
    /// `0 <= r < |divisor|`.
    pub fn div_with_remainder(&self, divisor: &Self) -> MathsResult<(Self, Self)> {
        if divisor.is_zero() {
            return Err(MathsError::DivisionByZero);
        }
        if let (Repr::Small(a), Repr::Small(b)) = (&self.0, &divisor.0) {
            if let (Some(q), Some(r)) = (a.checked_div_euclid(*b), a.checked_rem_euclid(*b)) {
                return Ok((Self(Repr::Small(q)), Self(Repr::Small(r))));
            }
        }
        let (a, b) = (self.big(), divisor.big());
        let (mut q, mut r) = a.div_mod_floor(&b);
        if r.is_negative() {
            // Only possible for a negative divisor.
            r -= &*b;
            q += 1;
        }
        Ok((Self::from_big(q), Self::from_big(r)))
    }

    /// Returns `self / divisor`, which must be exact.
    pub fn div_exact(&self, divisor: &Self) -> MathsResult<Self> {
        let (q, r) = self.try_div_rem(divisor)?;
        if !r.is_zero() {
            return Err(MathsError::InvalidArgument(format!(
                "{divisor} does not divide {self}",
            )));
        }
        Ok(q)
    }

    /// Returns `self / divisor` truncated toward zero, or an error if the
    /// divisor is zero.
    pub fn try_div(&self, divisor: &Self) -> MathsResult<Self> {
        Ok(self.try_div_rem(divisor)?.0)
    }

    /// Returns `self % divisor` with the sign of `self`, or an error if the
    /// divisor is zero.
    pub fn try_rem(&self, divisor: &Self) -> MathsResult<Self> {
        Ok(self.try_div_rem(divisor)?.1)
    }

    fn try_div_rem(&self, divisor: &Self) -> MathsResult<(Self, Self)> {
        if divisor.is_zero() {
            return Err(MathsError::DivisionByZero);
        }
        if let (Repr::Small(a), Repr::Small(b)) = (&self.0, &divisor.0) {
            if let (Some(q), Some(r)) = (a.checked_div(*b), a.checked_rem(*b)) {
                return Ok((Self(Repr::Small(q)), Self(Repr::Small(r))));
            }
        }
        let (q, r) = self.big().div_rem(&divisor.big());
        Ok((Self::from_big(q), Self::from_big(r)))
    }

    /// Returns whether `self` divides `other`. Zero divides only zero.
    pub fn divides(&self, other: &Self) -> bool {
        match other.try_rem(self) {
            Ok(r) => r.is_zero(),
            Err(_) => other.is_zero(),
        }
    }
}

macro_rules! impl_from_primitive {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Integer {
                fn from(value: $t) -> Self {
                    match i64::try_from(value) {
                        Ok(x) => Self(Repr::Small(x)),
                        Err(_) => Self::from_big(BigInt::from(value)),
                    }
                }
            }
        )*
    };
}
impl_from_primitive!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, usize, isize);

impl From<BigInt> for Integer {
    fn from(value: BigInt) -> Self {
        Self::from_big(value)
    }
}

impl From<&Integer> for BigInt {
    fn from(value: &Integer) -> Self {
        value.to_big()
    }
}

impl FromStr for Integer {
    type Err = MathsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(x) = s.parse::<i64>() {
            return Ok(Self(Repr::Small(x)));
        }
        BigInt::from_str(s)
            .map(Self::from_big)
            .map_err(|_| MathsError::InvalidArgument(format!("invalid integer {s:?}")))
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Small(x) => fmt::Display::fmt(x, f),
            Repr::Large(x) => fmt::Display::fmt(x, f),
        }
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Ord for Integer {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.0, &other.0) {
            (Repr::Small(a), Repr::Small(b)) => a.cmp(b),
            // A large value never fits in an i64, so its sign decides.
            (Repr::Small(_), Repr::Large(b)) => match b.sign() {
                Sign::Minus => Ordering::Greater,
                _ => Ordering::Less,
            },
            (Repr::Large(a), Repr::Small(_)) => match a.sign() {
                Sign::Minus => Ordering::Less,
                _ => Ordering::Greater,
            },
            (Repr::Large(a), Repr::Large(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Integer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq<i64> for Integer {
    fn eq(&self, other: &i64) -> bool {
        self.0 == Repr::Small(*other)
    }
}

impl PartialOrd<i64> for Integer {
    fn partial_cmp(&self, other: &i64) -> Option<Ordering> {
        Some(self.cmp(&Integer::from(*other)))
    }
}

impl Neg for &Integer {
    type Output = Integer;

    fn neg(self) -> Integer {
        match &self.0 {
            Repr::Small(x) => match x.checked_neg() {
                Some(y) => Integer(Repr::Small(y)),
                None => Integer::from_big(-BigInt::from(*x)),
            },
            Repr::Large(x) => Integer::from_big(-x),
        }
    }
}

impl Neg for Integer {
    type Output = Integer;

    fn neg(self) -> Integer {
        -&self
    }
}

/// Implements a binary operator for all combinations of owned and borrowed
/// operands, trying the native checked operation first.
macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, |$a:ident, $b:ident| $small:expr, $big:expr) => {
        impl $trait<&Integer> for &Integer {
            type Output = Integer;

            fn $method(self, rhs: &Integer) -> Integer {
                if let (Repr::Small($a), Repr::Small($b)) = (&self.0, &rhs.0) {
                    let ($a, $b): (i64, i64) = (*$a, *$b);
                    if let Some(result) = $small {
                        return Integer(Repr::Small(result));
                    }
                }
                let (lhs_big, rhs_big) = (self.big(), rhs.big());
                let ($a, $b): (&BigInt, &BigInt) = (&lhs_big, &rhs_big);
                Integer::from_big($big)
            }
        }
        impl $trait<Integer> for &Integer {
            type Output = Integer;

            fn $method(self, rhs: Integer) -> Integer {
                self.$method(&rhs)
            }
        }
        impl $trait<&Integer> for Integer {
            type Output = Integer;

            fn $method(self, rhs: &Integer) -> Integer {
                (&self).$method(rhs)
            }
        }
        impl $trait<Integer> for Integer {
            type Output = Integer;

            fn $method(self, rhs: Integer) -> Integer {
                (&self).$method(&rhs)
            }
        }
        impl $trait<i64> for Integer {
            type Output = Integer;

            fn $method(self, rhs: i64) -> Integer {
                (&self).$method(&Integer::from(rhs))
            }
        }
        impl $trait<i64> for &Integer {
            type Output = Integer;

            fn $method(self, rhs: i64) -> Integer {
                self.$method(&Integer::from(rhs))
            }
        }
        impl $assign_trait<&Integer> for Integer {
            fn $assign_method(&mut self, rhs: &Integer) {
                *self = (&*self).$method(rhs);
            }
        }
        impl $assign_trait<Integer> for Integer {
            fn $assign_method(&mut self, rhs: Integer) {
                *self = (&*self).$method(&rhs);
            }
        }
        impl $assign_trait<i64> for Integer {
            fn $assign_method(&mut self, rhs: i64) {
                *self = (&*self).$method(&Integer::from(rhs));
            }
        }
    };
}

impl_binary_op!(Add, add, AddAssign, add_assign, |a, b| a.checked_add(b), a + b);
impl_binary_op!(Sub, sub, SubAssign, sub_assign, |a, b| a.checked_sub(b), a - b);
impl_binary_op!(Mul, mul, MulAssign, mul_assign, |a, b| a.checked_mul(b), a * b);
impl_binary_op!(Div, div, DivAssign, div_assign, |a, b| a.checked_div(b), {
    assert!(!b.is_zero(), "attempt to divide by zero");
    a / b
});
impl_binary_op!(Rem, rem, RemAssign, rem_assign, |a, b| a.checked_rem(b), {
    assert!(!b.is_zero(), "attempt to calculate the remainder with a divisor of zero");
    a % b
});
impl_binary_op!(BitAnd, bitand, BitAndAssign, bitand_assign, |a, b| Some(a & b), a & b);
impl_binary_op!(BitOr, bitor, BitOrAssign, bitor_assign, |a, b| Some(a | b), a | b);
impl_binary_op!(BitXor, bitxor, BitXorAssign, bitxor_assign, |a, b| Some(a ^ b), a ^ b);

impl Shl<u32> for &Integer {
    type Output = Integer;

    fn shl(self, rhs: u32) -> Integer {
        if let Repr::Small(x) = self.0 {
            if rhs < 64 && (x << rhs) >> rhs == x {
                return Integer(Repr::Small(x << rhs));
            }
        }
        Integer::from_big(&*self.big() << rhs)
    }
}

impl Shr<u32> for &Integer {
    type Output = Integer;

    /// Arithmetic shift, rounding toward negative infinity.
    fn shr(self, rhs: u32) -> Integer {
        match &self.0 {
            Repr::Small(x) => Integer(Repr::Small(*x >> rhs.min(63))),
            Repr::Large(x) => Integer::from_big(x >> rhs),
        }
    }
}

impl Shl<u32> for Integer {
    type Output = Integer;

    fn shl(self, rhs: u32) -> Integer {
        &self << rhs
    }
}

impl Shr<u32> for Integer {
    type Output = Integer;

    fn shr(self, rhs: u32) -> Integer {
        &self >> rhs
    }
}

impl std::iter::Sum for Integer {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |a, b| a + b)
    }
}

impl<'a> std::iter::Sum<&'a Integer> for Integer {
    fn sum<I: Iterator<Item = &'a Integer>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |a, b| a + b)
    }
}

impl std::iter::Product for Integer {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |a, b| a * b)
    }
}

impl Zero for Integer {
    fn zero() -> Self {
        Self::ZERO
    }

    fn is_zero(&self) -> bool {
        Integer::is_zero(self)
    }
}

impl One for Integer {
    fn one() -> Self {
        Self::ONE
    }
}

impl ToPrimitive for Integer {
    fn to_i64(&self) -> Option<i64> {
        Integer::to_i64(self)
    }

    fn to_u64(&self) -> Option<u64> {
        match &self.0 {
            Repr::Small(x) => u64::try_from(*x).ok(),
            Repr::Large(x) => x.to_u64(),
        }
    }

    fn to_f64(&self) -> Option<f64> {
        match &self.0 {
            Repr::Small(x) => Some(*x as f64),
            Repr::Large(x) => x.to_f64(),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Integer {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Integer {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
