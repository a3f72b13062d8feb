//! Classification of bare literals: booleans, numbers and date/times.

#[cfg(test)]
#[path = "./number_tests.rs"]
mod tests;

use std::num::IntErrorKind;

use num_bigint::BigInt;

use crate::error::ErrorKind;
use crate::options::BigIntPolicy;
use crate::parser::{ParseError, Parser};
use crate::time::Datetime;
use crate::Value;

/// Digits of `radix` separated by single underscores: `d(_?d)*`.
fn is_digit_run(s: &[u8], radix: u32) -> bool {
    let mut prev_digit = false;
    for &b in s {
        if b == b'_' {
            if !prev_digit {
                return false;
            }
            prev_digit = false;
        } else if (b as char).is_digit(radix) {
            prev_digit = true;
        } else {
            return false;
        }
    }
    prev_digit
}

/// Splits an integer literal into sign, radix and digits, or returns `None`
/// when it is not integer-shaped.
fn integer_parts(s: &str) -> Option<(bool, u32, &str)> {
    let bytes = s.as_bytes();
    let (negative, radix, body) = if let Some(hex) = s.strip_prefix("0x") {
        (false, 16, hex)
    } else if let Some(oct) = s.strip_prefix("0o") {
        (false, 8, oct)
    } else if let Some(bin) = s.strip_prefix("0b") {
        (false, 2, bin)
    } else {
        match bytes.first() {
            Some(b'+') => (false, 10, &s[1..]),
            Some(b'-') => (true, 10, &s[1..]),
            _ => (false, 10, s),
        }
    };
    // Octal and binary bodies are shape-checked as decimal; a stray 8 or 9
    // is reported as an invalid number once parsing fails.
    let shape_radix = if radix == 16 { 16 } else { 10 };
    is_digit_run(body.as_bytes(), shape_radix).then_some((negative, radix, body))
}

/// `[+-]?d(_?d)*(.d(_?d)*)?([eE][+-]?d(_?d)*)?`
fn is_float(s: &str) -> bool {
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(idx) => (&s[..idx], Some(&s[idx + 1..])),
        None => (s, None),
    };
    let (whole, fraction) = match mantissa.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (mantissa, None),
    };
    if !is_digit_run(whole.as_bytes(), 10) {
        return false;
    }
    if let Some(fraction) = fraction {
        if !is_digit_run(fraction.as_bytes(), 10) {
            return false;
        }
    }
    match exponent {
        Some(exp) => {
            let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            is_digit_run(exp.as_bytes(), 10)
        }
        None => true,
    }
}

/// `[+-]?0[0-9_]`
fn has_leading_zero(s: &str) -> bool {
    let s = s.strip_prefix(['+', '-']).unwrap_or(s).as_bytes();
    s.first() == Some(&b'0') && matches!(s.get(1), Some(b'0'..=b'9' | b'_'))
}

impl<'a> Parser<'a> {
    /// Classifies the trimmed bare literal `raw`, which starts at `ptr`.
    pub(crate) fn parse_literal(&self, raw: &str, ptr: usize) -> Result<Value, ParseError> {
        match raw {
            "true" => return Ok(Value::Boolean(true)),
            "false" => return Ok(Value::Boolean(false)),
            "inf" | "+inf" => return Ok(Value::Float(f64::INFINITY)),
            "-inf" => return Ok(Value::Float(f64::NEG_INFINITY)),
            "nan" | "+nan" | "-nan" => return Ok(Value::Float(f64::NAN)),
            "-0" => return Ok(self.zero()),
            _ => {}
        }

        let integer = integer_parts(raw);
        if integer.is_some() || is_float(raw) {
            if has_leading_zero(raw) {
                return Err(self.error(ptr, ErrorKind::LeadingZero));
            }
            let cleaned = raw.replace('_', "");
            return match integer {
                Some((negative, radix, _)) => self.parse_integer(&cleaned, negative, radix, ptr),
                None => match cleaned.parse::<f64>() {
                    Ok(f) => Ok(Value::Float(f)),
                    Err(_) => Err(self.error(ptr, ErrorKind::InvalidNumber)),
                },
            };
        }

        let datetime = Datetime::parse(raw);
        if datetime.is_valid() {
            Ok(Value::Datetime(datetime))
        } else {
            Err(self.error(ptr, ErrorKind::InvalidValue))
        }
    }

    fn zero(&self) -> Value {
        match self.options.integers {
            BigIntPolicy::Always => Value::BigInteger(BigInt::from(0)),
            _ => Value::Integer(0),
        }
    }

    /// Parses an integer with underscores already removed.
    fn parse_integer(
        &self,
        cleaned: &str,
        negative: bool,
        radix: u32,
        ptr: usize,
    ) -> Result<Value, ParseError> {
        let digits = match radix {
            10 => cleaned.trim_start_matches(['+', '-']),
            _ => &cleaned[2..],
        };

        if self.options.integers == BigIntPolicy::Always {
            return self.parse_big_integer(digits, negative, radix, ptr);
        }

        let result = if negative {
            // Keep the sign attached so i64::MIN parses.
            i64::from_str_radix(cleaned, 10)
        } else {
            i64::from_str_radix(digits, radix)
        };
        match result {
            Ok(n) => Ok(Value::Integer(n)),
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    match self.options.integers {
                        BigIntPolicy::Never => Err(self.error(ptr, ErrorKind::LossyInteger)),
                        _ => self.parse_big_integer(digits, negative, radix, ptr),
                    }
                }
                _ => Err(self.error(ptr, ErrorKind::InvalidNumber)),
            },
        }
    }

    fn parse_big_integer(
        &self,
        digits: &str,
        negative: bool,
        radix: u32,
        ptr: usize,
    ) -> Result<Value, ParseError> {
        match BigInt::parse_bytes(digits.as_bytes(), radix) {
            Some(n) if negative => Ok(Value::BigInteger(-n)),
            Some(n) => Ok(Value::BigInteger(n)),
            None => Err(self.error(ptr, ErrorKind::InvalidNumber)),
        }
    }
}
