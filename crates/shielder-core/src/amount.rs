//! Exact conversion between human-readable token amounts and atomic units.
//!
//! Atomic amounts are `U256`; nothing in this module goes through floating
//! point once the input has been rendered to decimal text. Excess fractional
//! digits are always floored so a converted balance never overstates what
//! is spendable, and every unusable input converts to zero instead of
//! failing.

use std::fmt;

use alloy::primitives::U256;
use serde::{Serialize, Serializer};

/// Decimal digits in `U256::MAX`.
const MAX_ATOMIC_DIGITS: usize = 78;

/// A value accepted by [`to_atomic`]. Integer variants are whole tokens,
/// not atomic units.
#[derive(Debug, Clone, PartialEq)]
pub enum DecimalInput {
    Text(String),
    Float(f64),
    Signed(i128),
    Unsigned(U256),
    Decimal(DecimalAmount),
}

impl From<&str> for DecimalInput {
    fn from(value: &str) -> Self {
        DecimalInput::Text(value.to_owned())
    }
}

impl From<String> for DecimalInput {
    fn from(value: String) -> Self {
        DecimalInput::Text(value)
    }
}

impl From<&String> for DecimalInput {
    fn from(value: &String) -> Self {
        DecimalInput::Text(value.clone())
    }
}

impl From<f64> for DecimalInput {
    fn from(value: f64) -> Self {
        DecimalInput::Float(value)
    }
}

impl From<f32> for DecimalInput {
    fn from(value: f32) -> Self {
        DecimalInput::Float(f64::from(value))
    }
}

impl From<i32> for DecimalInput {
    fn from(value: i32) -> Self {
        DecimalInput::Signed(i128::from(value))
    }
}

impl From<i64> for DecimalInput {
    fn from(value: i64) -> Self {
        DecimalInput::Signed(i128::from(value))
    }
}

impl From<i128> for DecimalInput {
    fn from(value: i128) -> Self {
        DecimalInput::Signed(value)
    }
}

impl From<u32> for DecimalInput {
    fn from(value: u32) -> Self {
        DecimalInput::Unsigned(U256::from(value))
    }
}

impl From<u64> for DecimalInput {
    fn from(value: u64) -> Self {
        DecimalInput::Unsigned(U256::from(value))
    }
}

impl From<u128> for DecimalInput {
    fn from(value: u128) -> Self {
        DecimalInput::Unsigned(U256::from(value))
    }
}

impl From<U256> for DecimalInput {
    fn from(value: U256) -> Self {
        DecimalInput::Unsigned(value)
    }
}

impl From<DecimalAmount> for DecimalInput {
    fn from(value: DecimalAmount) -> Self {
        DecimalInput::Decimal(value)
    }
}

impl From<&DecimalAmount> for DecimalInput {
    fn from(value: &DecimalAmount) -> Self {
        DecimalInput::Decimal(value.clone())
    }
}

/// Exact decimal view of an atomic amount: `atomic / 10^decimals`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecimalAmount {
    atomic: U256,
    decimals: u8,
}

impl DecimalAmount {
    /// Floors `text` to `decimals` places. Unparseable text yields zero.
    pub fn parse(text: &str, decimals: u8) -> Self {
        from_atomic(to_atomic(text, decimals), decimals)
    }

    pub fn zero(decimals: u8) -> Self {
        Self {
            atomic: U256::ZERO,
            decimals,
        }
    }

    pub fn atomic(&self) -> U256 {
        self.atomic
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn is_zero(&self) -> bool {
        self.atomic.is_zero()
    }

    /// Whole-token part, truncated.
    pub fn integer_part(&self) -> U256 {
        match ten_pow(self.decimals) {
            Some(scale) => self.atomic / scale,
            // 10^decimals exceeds every U256, so the amount is below one token.
            None => U256::ZERO,
        }
    }

    /// All `decimals` fractional digits, zero-padded and untrimmed.
    pub fn fraction_digits(&self) -> String {
        let (_, fraction) = self.split_digits();
        fraction
    }

    fn split_digits(&self) -> (String, String) {
        let digits = self.atomic.to_string();
        let decimals = usize::from(self.decimals);
        if decimals == 0 {
            return (digits, String::new());
        }
        let padded = if digits.len() <= decimals {
            format!("{}{digits}", "0".repeat(decimals + 1 - digits.len()))
        } else {
            digits
        };
        let (integer, fraction) = padded.split_at(padded.len() - decimals);
        (integer.to_owned(), fraction.to_owned())
    }
}

impl fmt::Display for DecimalAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (integer, fraction) = self.split_digits();
        let fraction = fraction.trim_end_matches('0');
        if fraction.is_empty() {
            f.write_str(&integer)
        } else {
            write!(f, "{integer}.{fraction}")
        }
    }
}

impl Serialize for DecimalAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Converts `value` to atomic units at `decimals` precision.
///
/// Extra fractional digits are floored. Negative, zero, NaN, infinite,
/// unparseable or out-of-range values yield `U256::ZERO`.
pub fn to_atomic(value: impl Into<DecimalInput>, decimals: u8) -> U256 {
    match try_to_atomic(value.into(), decimals) {
        Ok(atomic) => atomic,
        Err(reason) => {
            tracing::debug!(decimals, reason, "amount converted to zero");
            U256::ZERO
        }
    }
}

/// Exact decimal value of `value` atomic units. With `decimals == 0` the
/// integer is returned unscaled.
pub fn from_atomic(value: U256, decimals: u8) -> DecimalAmount {
    DecimalAmount {
        atomic: value,
        decimals,
    }
}

fn try_to_atomic(value: DecimalInput, decimals: u8) -> Result<U256, &'static str> {
    match value {
        DecimalInput::Text(text) => scale_text(&text, decimals),
        DecimalInput::Float(float) => {
            if float.is_nan() {
                return Err("not a number");
            }
            if !float.is_finite() {
                return Err("infinite");
            }
            if float <= 0.0 {
                return Err("not positive");
            }
            // f64 Display is the shortest exact round-trip rendering and
            // never uses exponent notation.
            scale_text(&float.to_string(), decimals)
        }
        DecimalInput::Signed(int) => {
            if int <= 0 {
                return Err("not positive");
            }
            scale_whole(U256::from(int.unsigned_abs()), decimals)
        }
        DecimalInput::Unsigned(int) => scale_whole(int, decimals),
        DecimalInput::Decimal(amount) => rescale(&amount, decimals),
    }
}

fn scale_whole(whole: U256, decimals: u8) -> Result<U256, &'static str> {
    if whole.is_zero() {
        return Ok(U256::ZERO);
    }
    ten_pow(decimals)
        .and_then(|scale| whole.checked_mul(scale))
        .ok_or("overflow")
}

fn rescale(amount: &DecimalAmount, decimals: u8) -> Result<U256, &'static str> {
    if amount.decimals <= decimals {
        let scale = ten_pow(decimals - amount.decimals).ok_or("overflow")?;
        amount.atomic.checked_mul(scale).ok_or("overflow")
    } else {
        match ten_pow(amount.decimals - decimals) {
            Some(scale) => Ok(amount.atomic / scale),
            None => Ok(U256::ZERO),
        }
    }
}

/// Parses plain or exponent decimal text and floors it to `decimals`
/// places.
fn scale_text(text: &str, decimals: u8) -> Result<U256, &'static str> {
    let text = text.trim();
    let (negative, body) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let (mantissa, exponent) = match body.find(|c: char| c == 'e' || c == 'E') {
        Some(at) => {
            let exponent = body[at + 1..]
                .parse::<i32>()
                .map_err(|_| "malformed exponent")?;
            (&body[..at], i64::from(exponent))
        }
        None => (body, 0),
    };

    let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if integer.is_empty() && fraction.is_empty() {
        return Err("no digits");
    }
    if !integer.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err("not a decimal number");
    }

    let digits = format!("{integer}{fraction}");
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Err("not positive");
    }
    if negative {
        return Err("negative");
    }

    // Position of the decimal point within `significant`, after scaling by
    // 10^decimals.
    let dropped = (digits.len() - significant.len()) as i64;
    let point = integer.len() as i64 - dropped + exponent + i64::from(decimals);
    if point <= 0 {
        // Entirely below one atomic unit.
        return Ok(U256::ZERO);
    }
    if point > MAX_ATOMIC_DIGITS as i64 {
        return Err("overflow");
    }

    let point = point as usize;
    let scaled = if point <= significant.len() {
        significant[..point].to_owned()
    } else {
        format!("{significant}{}", "0".repeat(point - significant.len()))
    };
    U256::from_str_radix(&scaled, 10).map_err(|_| "overflow")
}

fn ten_pow(exponent: u8) -> Option<U256> {
    let ten = U256::from(10u8);
    let mut out = U256::from(1u8);
    for _ in 0..exponent {
        out = out.checked_mul(ten)?;
    }
    Some(out)
}
