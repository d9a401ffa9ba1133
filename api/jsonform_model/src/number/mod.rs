// Copyright 2015-2024 Swim Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use num_bigint::{BigInt, Sign};
use num_traits::{Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// The largest exponent for which a number is printed in plain (rather than scientific)
/// notation.
const MAX_PLAIN_DIGITS: i64 = 21;
/// The smallest (negative) position of the decimal point for which a number is printed in
/// plain notation.
const MIN_PLAIN_POINT: i64 = -6;
/// Integers wider than this number of decimal digits cannot fit in 128 bits.
const MAX_INT_DIGITS: i64 = 39;

/// An arbitrary precision decimal number.
///
/// The value is `unscaled * 10^exponent`. Numbers are always kept normalized (the unscaled
/// value has no trailing zeros and zero is always `0 * 10^0`) so that structural equality and
/// hashing coincide with equality of the decimal value.
///
/// # Examples
///
/// ```
/// use jsonform_model::Number;
///
/// let ten: Number = "10".parse().unwrap();
/// let also_ten: Number = "10.0".parse().unwrap();
/// assert_eq!(ten, also_ten);
/// assert_eq!(Number::from(10), ten);
/// assert_eq!(ten.to_string(), "10");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Number {
    unscaled: BigInt,
    exponent: i64,
}

/// A string could not be interpreted as a decimal number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a valid decimal number")]
pub struct ParseNumberError(pub String);

impl Default for Number {
    fn default() -> Self {
        Number::zero()
    }
}

impl Number {
    /// Create a number with the value `unscaled * 10^exponent`. Fails if, once normalized,
    /// the number cannot be written with an exponent in the range of `i64`.
    pub fn new(unscaled: BigInt, exponent: i64) -> Option<Self> {
        if unscaled.is_zero() {
            return Some(Number::zero());
        }
        let (unscaled, trailing) = strip_trailing_zeros(unscaled);
        let exponent = exponent.checked_add(trailing)?;
        Number::checked(unscaled, exponent)
    }

    fn from_integer(n: BigInt) -> Self {
        if n.is_zero() {
            return Number::zero();
        }
        let (unscaled, exponent) = strip_trailing_zeros(n);
        Number { unscaled, exponent }
    }

    /// The exponent of the leading digit (as in `d.ddd * 10^e`) must be representable, and
    /// negatable, in an `i64`.
    fn checked(unscaled: BigInt, exponent: i64) -> Option<Self> {
        let digits = unscaled.magnitude().to_string().len() as i128;
        let leading = i128::from(exponent) + digits - 1;
        if leading > i128::from(i64::MAX) || leading < -i128::from(i64::MAX) {
            None
        } else {
            Some(Number { unscaled, exponent })
        }
    }

    pub fn zero() -> Self {
        Number {
            unscaled: BigInt::zero(),
            exponent: 0,
        }
    }

    /// Assemble a number from the parts of its decimal text. The integral and fractional parts
    /// must consist only of ASCII digits and at least one of them must be non-empty.
    ///
    /// # Arguments
    /// * `negative` - Whether the number had a leading minus sign.
    /// * `integral` - The digits before the decimal point.
    /// * `fraction` - The digits after the decimal point.
    /// * `exponent` - The value of the exponent part (zero if there was none).
    pub fn from_decimal_parts(
        negative: bool,
        integral: &str,
        fraction: &str,
        exponent: i64,
    ) -> Option<Number> {
        let mut digits = String::with_capacity(integral.len() + fraction.len());
        digits.push_str(integral);
        digits.push_str(fraction);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let frac_len = i64::try_from(fraction.len()).ok()?;
        let trimmed = digits.trim_end_matches('0');
        let trailing = i64::try_from(digits.len() - trimmed.len()).ok()?;
        let trimmed = trimmed.trim_start_matches('0');
        if trimmed.is_empty() {
            return Some(Number::zero());
        }
        let magnitude = BigInt::parse_bytes(trimmed.as_bytes(), 10)?;
        let unscaled = if negative { -magnitude } else { magnitude };
        let exponent = exponent.checked_sub(frac_len)?.checked_add(trailing)?;
        Number::checked(unscaled, exponent)
    }

    /// Convert a finite floating point number to a decimal. The shortest decimal that
    /// round-trips to the same `f64` is used.
    pub fn from_f64(value: f64) -> Option<Number> {
        if value.is_finite() {
            let mut buffer = ryu::Buffer::new();
            buffer.format_finite(value).parse().ok()
        } else {
            None
        }
    }

    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    pub fn exponent(&self) -> i64 {
        self.exponent
    }

    pub fn is_zero(&self) -> bool {
        self.unscaled.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.unscaled.is_negative()
    }

    /// Whether the number has no fractional part.
    pub fn is_integer(&self) -> bool {
        self.exponent >= 0
    }

    /// The exact integral value of this number, if it has no fractional part and it is not
    /// wider than 128 bits.
    fn to_bounded_integer(&self) -> Option<BigInt> {
        if self.exponent < 0 || self.digit_count().saturating_add(self.exponent) > MAX_INT_DIGITS {
            None
        } else {
            let exp = u32::try_from(self.exponent).ok()?;
            Some(&self.unscaled * BigInt::from(10u32).pow(exp))
        }
    }

    pub fn to_i128(&self) -> Option<i128> {
        self.to_bounded_integer()?.to_i128()
    }

    pub fn to_u128(&self) -> Option<u128> {
        self.to_bounded_integer()?.to_u128()
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.to_i128().and_then(|n| i64::try_from(n).ok())
    }

    pub fn to_i32(&self) -> Option<i32> {
        self.to_i128().and_then(|n| i32::try_from(n).ok())
    }

    pub fn to_i16(&self) -> Option<i16> {
        self.to_i128().and_then(|n| i16::try_from(n).ok())
    }

    pub fn to_i8(&self) -> Option<i8> {
        self.to_i128().and_then(|n| i8::try_from(n).ok())
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.to_u128().and_then(|n| u64::try_from(n).ok())
    }

    pub fn to_u32(&self) -> Option<u32> {
        self.to_u128().and_then(|n| u32::try_from(n).ok())
    }

    pub fn to_u16(&self) -> Option<u16> {
        self.to_u128().and_then(|n| u16::try_from(n).ok())
    }

    pub fn to_u8(&self) -> Option<u8> {
        self.to_u128().and_then(|n| u8::try_from(n).ok())
    }

    /// The nearest `f64` to this number. Fails if the number is outside of the finite range
    /// of `f64`.
    pub fn to_f64(&self) -> Option<f64> {
        let text = format!("{}e{}", self.unscaled, self.exponent);
        text.parse::<f64>().ok().filter(|x| x.is_finite())
    }

    fn digit_count(&self) -> i64 {
        if self.unscaled.is_zero() {
            1
        } else {
            self.unscaled.magnitude().to_string().len() as i64
        }
    }

    fn compare_magnitude(&self, other: &Number) -> Ordering {
        let left_point = self.digit_count().saturating_add(self.exponent);
        let right_point = other.digit_count().saturating_add(other.exponent);
        match left_point.cmp(&right_point) {
            Ordering::Equal => {
                let left = self.unscaled.magnitude();
                let right = other.unscaled.magnitude();
                // Both have the same number of integral digits so the shift is bounded by the
                // difference in their digit counts.
                match self.exponent.cmp(&other.exponent) {
                    Ordering::Equal => left.cmp(right),
                    Ordering::Greater => {
                        let shift = (self.exponent - other.exponent) as u32;
                        (left * num_bigint::BigUint::from(10u32).pow(shift)).cmp(right)
                    }
                    Ordering::Less => {
                        let shift = (other.exponent - self.exponent) as u32;
                        left.cmp(&(right * num_bigint::BigUint::from(10u32).pow(shift)))
                    }
                }
            }
            ow => ow,
        }
    }
}

fn strip_trailing_zeros(mut unscaled: BigInt) -> (BigInt, i64) {
    let mut count = 0i64;
    while (&unscaled % 10u32).is_zero() {
        unscaled /= 10u32;
        count += 1;
    }
    (unscaled, count)
}

fn sign_rank(sign: Sign) -> i8 {
    match sign {
        Sign::Minus => -1,
        Sign::NoSign => 0,
        Sign::Plus => 1,
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        let left_sign = self.unscaled.sign();
        match sign_rank(left_sign).cmp(&sign_rank(other.unscaled.sign())) {
            Ordering::Equal => match left_sign {
                Sign::NoSign => Ordering::Equal,
                Sign::Plus => self.compare_magnitude(other),
                Sign::Minus => self.compare_magnitude(other).reverse(),
            },
            ow => ow,
        }
    }
}

/// Numbers are written in plain notation unless this would require too many padding zeros,
/// in which case `E` notation is used. The output always satisfies the JSON number grammar.
impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.unscaled.is_negative() {
            f.write_str("-")?;
        }
        let digits = self.unscaled.magnitude().to_string();
        let len = digits.len() as i128;
        let exponent = i128::from(self.exponent);
        let point = len + exponent;
        if exponent >= 0 && point <= i128::from(MAX_PLAIN_DIGITS) {
            f.write_str(&digits)?;
            for _ in 0..exponent {
                f.write_str("0")?;
            }
            Ok(())
        } else if exponent < 0 && point > 0 {
            let (integral, fraction) = digits.split_at(point as usize);
            write!(f, "{}.{}", integral, fraction)
        } else if point <= 0 && point > i128::from(MIN_PLAIN_POINT) {
            f.write_str("0.")?;
            for _ in 0..(-point) {
                f.write_str("0")?;
            }
            f.write_str(&digits)
        } else {
            let (first, rest) = digits.split_at(1);
            if rest.is_empty() {
                write!(f, "{}E{}", first, point - 1)
            } else {
                write!(f, "{}.{}E{}", first, rest, point - 1)
            }
        }
    }
}

/// Lenient decimal syntax: an optional sign, digits with an optional fractional part and an
/// optional exponent. The strict JSON number grammar is enforced by the JSON reader, not here.
impl FromStr for Number {
    type Err = ParseNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseNumberError(s.to_string());
        let (negative, rest) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let (mantissa, exponent) = match rest.find(|c: char| c == 'e' || c == 'E') {
            Some(idx) => {
                let exp_str = &rest[idx + 1..];
                let exp = exp_str.parse::<i64>().map_err(|_| err())?;
                (&rest[..idx], exp)
            }
            None => (rest, 0),
        };
        let (integral, fraction) = match mantissa.split_once('.') {
            Some((integral, fraction)) => (integral, fraction),
            None => (mantissa, ""),
        };
        Number::from_decimal_parts(negative, integral, fraction, exponent).ok_or_else(err)
    }
}

macro_rules! number_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Number {
                fn from(n: $t) -> Self {
                    Number::from_integer(BigInt::from(n))
                }
            }
        )*
    };
}

number_from_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl From<BigInt> for Number {
    fn from(n: BigInt) -> Self {
        Number::from_integer(n)
    }
}

impl TryFrom<f64> for Number {
    type Error = f64;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Number::from_f64(value).ok_or(value)
    }
}

impl TryFrom<f32> for Number {
    type Error = f32;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        if value.is_finite() {
            let mut buffer = ryu::Buffer::new();
            buffer.format_finite(value).parse().map_err(|_| value)
        } else {
            Err(value)
        }
    }
}
