// src/blockchain/denominate.rs
//
// Exact conversion between human decimal amounts and integer base units.
// Floating point is never used here: a single rounding error would corrupt
// fund amounts.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::ToolError;

/// EGLD always uses 18 decimals; other tokens report theirs on-chain.
pub const EGLD_NUM_DECIMALS: u32 = 18;

pub fn denominate_egld_value(value: &str) -> Result<BigUint, ToolError> {
    denominate(value, EGLD_NUM_DECIMALS)
}

/// Computes `round_down(value * 10^decimals)` over the decimal string
/// directly. Accepts an optional fractional part; extra fractional digits
/// beyond `decimals` are truncated toward zero.
pub fn denominate(value: &str, decimals: u32) -> Result<BigUint, ToolError> {
    let value = value.trim();
    let invalid = || ToolError::InvalidAmount(value.to_string());

    let (int_part, frac_part) = match value.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (value, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }

    let scale = decimals as usize;
    let mut digits = String::with_capacity(int_part.len() + scale);
    digits.push_str(int_part);
    if frac_part.len() >= scale {
        digits.push_str(&frac_part[..scale]);
    } else {
        digits.push_str(frac_part);
        digits.extend(std::iter::repeat('0').take(scale - frac_part.len()));
    }

    if digits.is_empty() {
        // e.g. ".5" with zero decimals
        return Ok(BigUint::zero());
    }
    digits.parse::<BigUint>().map_err(|_| invalid())
}

pub fn format_egld(base_units: &BigUint) -> String {
    format_units(base_units, EGLD_NUM_DECIMALS)
}

/// Renders base units back as a decimal string, trimming trailing zeros.
pub fn format_units(base_units: &BigUint, decimals: u32) -> String {
    let scale = decimals as usize;
    // Pad so there is always at least one integer digit.
    let padded = format!("{:0>width$}", base_units.to_string(), width = scale + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - scale);
    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{}.{}", int_part, frac_part)
    }
}
