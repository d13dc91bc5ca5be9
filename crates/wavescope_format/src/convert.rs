//! Conversion between raw bit strings and displayed numbers.

use num_bigint::{BigInt, BigUint, Sign};
use wavescope_common::{literal_payload, pad_bits, ValueKind};

use crate::display::Base;
use crate::error::ParseDisplayError;

/// Formats a raw value for display.
///
/// Real and string literals are shown without their tag. Values with any
/// `x`/`z` bit are returned unchanged. Bit strings are left-padded to
/// `width` and converted to `base`; when `is_signed` is set the bit string
/// is read as a two's complement number, and binary output separates the
/// sign bit with an underscore (`1_001`).
///
/// ```
/// use wavescope_format::{format, Base};
/// assert_eq!(format("1001", 4, true, Base::Decimal), "-7");
/// assert_eq!(format("00001111", 8, false, Base::Hex), "F");
/// ```
pub fn format(raw: &str, width: u32, is_signed: bool, base: Base) -> String {
    match ValueKind::classify(raw) {
        ValueKind::Real | ValueKind::Str => return literal_payload(raw).to_string(),
        ValueKind::Bits => {}
        ValueKind::Unknown | ValueKind::HighZ | ValueKind::Mixed => return raw.to_string(),
    }

    let bits = pad_bits(raw, width);
    if base == Base::Binary {
        return if is_signed && bits.len() > 1 {
            format!("{}_{}", &bits[..1], &bits[1..])
        } else {
            bits
        };
    }

    let Some(magnitude) = BigUint::parse_bytes(bits.as_bytes(), 2) else {
        return raw.to_string();
    };
    let value = if is_signed && bits.starts_with('1') {
        BigInt::from(magnitude) - modulus(bits.len() as u32)
    } else {
        BigInt::from(magnitude)
    };
    to_radix(&value, base)
}

/// Parses a displayed number back into a raw bit string of `width` bits.
///
/// Accepts an optional `0x`/`0b` prefix and `_` separators. Negative numbers
/// are only accepted when `is_signed` is set, and must fit the two's
/// complement range of `width`. All-`x` or all-`z` text yields the
/// corresponding sentinel.
///
/// # Errors
///
/// Returns [`ParseDisplayError::Invalid`] for text that is not a number in
/// `base`, and [`ParseDisplayError::OutOfRange`] if it does not fit.
pub fn parse_display(
    text: &str,
    width: u32,
    is_signed: bool,
    base: Base,
) -> Result<String, ParseDisplayError> {
    let width = width.max(1);
    let invalid = || ParseDisplayError::Invalid {
        text: text.to_string(),
        base,
    };
    let out_of_range = || ParseDisplayError::OutOfRange {
        text: text.to_string(),
        width,
    };

    let cleaned: String = text
        .trim()
        .chars()
        .filter(|&c| c != '_')
        .collect::<String>()
        .to_ascii_lowercase();
    if cleaned.is_empty() {
        return Err(invalid());
    }
    for sentinel in ['x', 'z'] {
        if cleaned.chars().all(|c| c == sentinel) {
            return Ok(sentinel.to_string().repeat(width as usize));
        }
    }

    let (negative, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.as_str()),
    };
    let digits = match base {
        Base::Hex => digits.strip_prefix("0x").unwrap_or(digits),
        Base::Binary => digits.strip_prefix("0b").unwrap_or(digits),
        Base::Decimal => digits,
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(base.radix())) {
        return Err(invalid());
    }

    if base == Base::Binary && !negative {
        // Binary text is the bit pattern itself, sign bit included.
        if digits.len() > width as usize {
            return Err(out_of_range());
        }
        return Ok(pad_bits(digits, width));
    }

    let magnitude = BigUint::parse_bytes(digits.as_bytes(), base.radix()).ok_or_else(invalid)?;
    let mut value = BigInt::from(magnitude);
    if negative {
        if !is_signed {
            return Err(out_of_range());
        }
        value = -value;
    }

    let modulus = modulus(width);
    let (low, high) = if is_signed {
        let half: BigInt = &modulus >> 1usize;
        (-half.clone(), half)
    } else {
        (BigInt::default(), modulus.clone())
    };
    if value < low || value >= high {
        return Err(out_of_range());
    }
    if value.sign() == Sign::Minus {
        value += &modulus;
    }
    Ok(pad_bits(&value.to_str_radix(2), width))
}

/// `2^width` as a signed big integer.
fn modulus(width: u32) -> BigInt {
    BigInt::from(1u8) << width as usize
}

fn to_radix(value: &BigInt, base: Base) -> String {
    let text = value.to_str_radix(base.radix());
    if base == Base::Hex {
        text.to_uppercase()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn signed_decimal_negative() {
        assert_eq!(format("1001", 4, true, Base::Decimal), "-7");
        assert_eq!(format("1000", 4, true, Base::Decimal), "-8");
        assert_eq!(format("0111", 4, true, Base::Decimal), "7");
        assert_eq!(format("1", 1, true, Base::Decimal), "-1");
    }

    #[test]
    fn unsigned_hex_and_decimal() {
        assert_eq!(format("00001111", 8, false, Base::Hex), "F");
        assert_eq!(format("00001111", 8, false, Base::Decimal), "15");
        assert_eq!(format("10101011", 8, false, Base::Hex), "AB");
        assert_eq!(format("0000", 4, false, Base::Hex), "0");
    }

    #[test]
    fn signed_hex_has_leading_minus() {
        assert_eq!(format("1001", 4, true, Base::Hex), "-7");
        assert_eq!(format("11110001", 8, true, Base::Hex), "-F");
        assert_eq!(format("01111111", 8, true, Base::Hex), "7F");
    }

    #[test]
    fn binary_separates_sign_bit() {
        assert_eq!(format("1001", 4, true, Base::Binary), "1_001");
        assert_eq!(format("1001", 4, false, Base::Binary), "1001");
        assert_eq!(format("1", 1, true, Base::Binary), "1");
    }

    #[test]
    fn short_values_are_padded() {
        assert_eq!(format("101", 8, false, Base::Binary), "00000101");
        assert_eq!(format("1", 4, true, Base::Decimal), "1");
    }

    #[test]
    fn unknown_values_pass_through() {
        assert_eq!(format("xxxx", 4, false, Base::Hex), "xxxx");
        assert_eq!(format("zz", 2, true, Base::Decimal), "zz");
        assert_eq!(format("10x1", 4, false, Base::Decimal), "10x1");
    }

    #[test]
    fn literals_lose_their_tag() {
        assert_eq!(format("r3.5", 64, false, Base::Hex), "3.5");
        assert_eq!(format("sIDLE", 1, true, Base::Decimal), "IDLE");
    }

    #[test]
    fn wide_values_convert_exactly() {
        let bits = "1".repeat(128);
        assert_eq!(
            format(&bits, 128, false, Base::Hex),
            "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF"
        );
        assert_eq!(format(&bits, 128, true, Base::Decimal), "-1");
        assert_eq!(
            format(&bits, 128, false, Base::Decimal),
            "340282366920938463463374607431768211455"
        );
    }

    #[test]
    fn parse_display_inverts_format() {
        assert_eq!(parse_display("-7", 4, true, Base::Decimal).unwrap(), "1001");
        assert_eq!(parse_display("F", 8, false, Base::Hex).unwrap(), "00001111");
        assert_eq!(parse_display("0xab", 8, false, Base::Hex).unwrap(), "10101011");
        assert_eq!(parse_display("1_001", 4, true, Base::Binary).unwrap(), "1001");
        assert_eq!(parse_display("101", 8, false, Base::Binary).unwrap(), "00000101");
    }

    #[test]
    fn parse_display_sentinels() {
        assert_eq!(parse_display("x", 4, false, Base::Hex).unwrap(), "xxxx");
        assert_eq!(parse_display("ZZ", 3, false, Base::Decimal).unwrap(), "zzz");
    }

    #[test]
    fn parse_display_rejects_out_of_range() {
        assert!(matches!(
            parse_display("16", 4, false, Base::Decimal),
            Err(ParseDisplayError::OutOfRange { width: 4, .. })
        ));
        assert!(parse_display("8", 4, true, Base::Decimal).is_err());
        assert!(parse_display("-9", 4, true, Base::Decimal).is_err());
        assert!(parse_display("-1", 4, false, Base::Decimal).is_err());
        assert!(parse_display("11111", 4, false, Base::Binary).is_err());
    }

    #[test]
    fn parse_display_rejects_garbage() {
        assert!(matches!(
            parse_display("12g", 8, false, Base::Hex),
            Err(ParseDisplayError::Invalid { base: Base::Hex, .. })
        ));
        assert!(parse_display("", 8, false, Base::Decimal).is_err());
        assert!(parse_display("-", 8, true, Base::Decimal).is_err());
        assert!(parse_display("12", 8, false, Base::Binary).is_err());
    }

    #[test]
    fn all_four_bit_patterns_signed() {
        for v in 0u32..16 {
            let bits = format!("{v:04b}");
            let expected = if v >= 8 { v as i32 - 16 } else { v as i32 };
            assert_eq!(format(&bits, 4, true, Base::Decimal), expected.to_string());
        }
    }

    fn bit_pattern() -> impl Strategy<Value = (u32, String)> {
        (1u32..=40).prop_flat_map(|w| {
            proptest::collection::vec(prop_oneof![Just('0'), Just('1')], w as usize)
                .prop_map(move |chars| (w, chars.into_iter().collect()))
        })
    }

    proptest! {
        #[test]
        fn twos_complement_round_trip((width, bits) in bit_pattern(), signed in any::<bool>()) {
            for base in [Base::Binary, Base::Decimal, Base::Hex] {
                let shown = format(&bits, width, signed, base);
                let back = parse_display(&shown, width, signed, base).unwrap();
                prop_assert_eq!(&back, &bits);
            }
        }
    }
}
