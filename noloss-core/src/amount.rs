//! Fixed-point token amount formatting
//!
//! Raw on-chain amounts are integers scaled by `10^decimals`. Conversions here
//! work on the digit string so no precision is lost for any decimal count.

use rust_decimal::Decimal;

use crate::error::{CoreError, CoreResult};

/// Render a raw fixed-point amount as a decimal string.
///
/// Trailing fractional zeros are dropped, so `1_500_000` with 6 decimals
/// renders as `"1.5"` and zero renders as `"0"`.
pub fn to_display(raw: u128, decimals: u32) -> String {
    let digits = raw.to_string();
    let decimals = decimals as usize;

    if decimals == 0 {
        return digits;
    }

    let (whole, fraction) = if digits.len() > decimals {
        let split = digits.len() - decimals;
        (digits[..split].to_string(), digits[split..].to_string())
    } else {
        ("0".to_string(), format!("{:0>width$}", digits, width = decimals))
    };

    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// Parse a decimal string into a raw fixed-point amount.
///
/// Fractional digits beyond `decimals` are truncated. Negative, empty and
/// non-numeric input is rejected with [`CoreError::Parse`]; values that do not
/// fit in a `u128` are rejected with [`CoreError::Overflow`].
pub fn to_raw(display: &str, decimals: u32) -> CoreResult<u128> {
    let input = display.trim();

    if input.is_empty() {
        return Err(CoreError::parse("amount is empty"));
    }
    if input.starts_with('-') {
        return Err(CoreError::parse(format!("negative amount: {}", input)));
    }

    let (whole, fraction) = input.split_once('.').unwrap_or((input, ""));

    if whole.is_empty() && fraction.is_empty() {
        return Err(CoreError::parse(format!("not a number: {}", input)));
    }
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(whole) || !is_digits(fraction) {
        return Err(CoreError::parse(format!("not a number: {}", input)));
    }

    let decimals = decimals as usize;
    let mut digits = String::with_capacity(whole.len() + decimals);
    digits.push_str(whole);
    if fraction.len() >= decimals {
        digits.push_str(&fraction[..decimals]);
    } else {
        digits.push_str(fraction);
        digits.extend(std::iter::repeat('0').take(decimals - fraction.len()));
    }

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(0);
    }

    digits
        .parse::<u128>()
        .map_err(|_| CoreError::overflow(format!("{} exceeds the raw amount range", input)))
}

/// Convert a raw fixed-point amount into a normalized [`Decimal`].
pub fn to_decimal(raw: u128, decimals: u32) -> CoreResult<Decimal> {
    let mantissa = i128::try_from(raw)
        .map_err(|_| CoreError::overflow(format!("raw amount {} too large", raw)))?;

    Decimal::try_from_i128_with_scale(mantissa, decimals)
        .map(|d| d.normalize())
        .map_err(|e| {
            CoreError::overflow(format!(
                "raw amount {} with {} decimals: {}",
                raw, decimals, e
            ))
        })
}
