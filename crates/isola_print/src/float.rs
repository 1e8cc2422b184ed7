//! Exact text for float constants.
//!
//! Constants are stored as raw bits. Printing them as hexadecimal floats
//! keeps every value bit-exact through a reparse, NaN payloads included.

use std::fmt::Write;

struct Layout {
    exponent_bits: u32,
    mantissa_bits: u32,
    bias: i64,
}

const F32: Layout = Layout {
    exponent_bits: 8,
    mantissa_bits: 23,
    bias: 127,
};

const F64: Layout = Layout {
    exponent_bits: 11,
    mantissa_bits: 52,
    bias: 1023,
};

pub(crate) fn f32_text(bits: u32) -> String {
    hex_float(u64::from(bits), &F32)
}

pub(crate) fn f64_text(bits: u64) -> String {
    hex_float(bits, &F64)
}

fn hex_float(bits: u64, layout: &Layout) -> String {
    let Layout {
        exponent_bits,
        mantissa_bits,
        bias,
    } = *layout;
    let exponent_max = (1u64 << exponent_bits) - 1;
    let negative = (bits >> (exponent_bits + mantissa_bits)) & 1 == 1;
    let exponent = (bits >> mantissa_bits) & exponent_max;
    let mantissa = bits & ((1u64 << mantissa_bits) - 1);

    let mut out = String::new();
    if negative {
        out.push('-');
    }

    if exponent == exponent_max {
        if mantissa == 0 {
            out.push_str("inf");
        } else {
            let _ = write!(out, "nan:0x{mantissa:x}");
        }
        return out;
    }
    if exponent == 0 && mantissa == 0 {
        out.push_str("0x0p+0");
        return out;
    }

    // Left-align the fraction on a nibble boundary, then drop trailing zeros.
    let digits = mantissa_bits.div_ceil(4);
    let fraction = mantissa << (digits * 4 - mantissa_bits);
    let mut hex = format!("{fraction:0width$x}", width = digits as usize);
    while hex.ends_with('0') {
        hex.pop();
    }

    // Subnormals share the smallest normal exponent with a leading zero.
    let (lead, power) = match i64::try_from(exponent) {
        Ok(0) | Err(_) => ('0', 1 - bias),
        Ok(e) => ('1', e - bias),
    };
    out.push_str("0x");
    out.push(lead);
    if !hex.is_empty() {
        out.push('.');
        out.push_str(&hex);
    }
    let _ = write!(out, "p{power:+}");
    out
}
