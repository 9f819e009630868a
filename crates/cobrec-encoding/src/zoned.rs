//! Overpunched sign handling for zoned decimal numbers.
//!
//! A zoned decimal stores its sign in the final digit: `{` through `I`
//! mean a positive number ending in 0 through 9, `}` through `R` the
//! negative equivalents. The conversion works on decoded text, so EBCDIC
//! data can be handled with the same code once the bytes have been run
//! through a code page (the EBCDIC zone nibbles translate to exactly
//! these letters).

/// Applies an overpunched sign to a plain signed number, so `"-465"`
/// becomes `"46N"`. An empty or sign-only value yields an empty string.
pub fn to_zoned(num: &str) -> String {
    let trimmed = num.trim();
    if trimmed.is_empty() || trimmed == "-" || trimmed == "+" {
        return String::new();
    }
    let negative = trimmed.starts_with('-');
    let unsigned = trimmed.strip_prefix(['-', '+']).unwrap_or(trimmed);
    let mut chars: Vec<char> = unsigned.chars().collect();
    if let Some(last) = chars.last_mut() {
        *last = zoned_char(*last, negative);
    }
    chars.into_iter().collect()
}

/// Removes an overpunched sign, so `"46N"` becomes `"-465"`. Values whose
/// final character carries no overpunch pass through unchanged.
pub fn from_zoned(zoned: &str) -> String {
    let trimmed = zoned.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let mut chars: Vec<char> = trimmed.chars().collect();
    let last = chars[chars.len() - 1].to_ascii_uppercase();
    let (digit, negative) = match last {
        '{' => ('0', false),
        '}' => ('0', true),
        'A'..='I' => (char::from(b'1' + (last as u8 - b'A')), false),
        'J'..='R' => (char::from(b'1' + (last as u8 - b'J')), true),
        other => (other, false),
    };
    if let Some(slot) = chars.last_mut() {
        *slot = digit;
    }
    let body: String = chars.into_iter().collect();
    if negative {
        format!("-{body}")
    } else {
        body
    }
}

fn zoned_char(digit: char, negative: bool) -> char {
    match digit {
        '0' => {
            if negative {
                '}'
            } else {
                '{'
            }
        }
        '1'..='9' => {
            let offset = digit as u8 - b'1';
            char::from(if negative { b'J' + offset } else { b'A' + offset })
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_zoned_positive() {
        assert_eq!(to_zoned("10"), "1{");
        assert_eq!(to_zoned("465"), "46E");
        assert_eq!(to_zoned("+1"), "A");
        assert_eq!(to_zoned("9"), "I");
    }

    #[test]
    fn test_to_zoned_negative() {
        assert_eq!(to_zoned("-10"), "1}");
        assert_eq!(to_zoned("-465"), "46N");
        assert_eq!(to_zoned("-9"), "R");
    }

    #[test]
    fn test_to_zoned_empty_and_sign_only() {
        assert_eq!(to_zoned(""), "");
        assert_eq!(to_zoned("   "), "");
        assert_eq!(to_zoned("+"), "");
        assert_eq!(to_zoned("-"), "");
    }

    #[test]
    fn test_from_zoned() {
        assert_eq!(from_zoned("1{"), "10");
        assert_eq!(from_zoned("1}"), "-10");
        assert_eq!(from_zoned("46E"), "465");
        assert_eq!(from_zoned("46N"), "-465");
        assert_eq!(from_zoned("46n"), "-465");
    }

    #[test]
    fn test_from_zoned_passthrough() {
        assert_eq!(from_zoned("123"), "123");
        assert_eq!(from_zoned("  42  "), "42");
        assert_eq!(from_zoned(""), "");
        assert_eq!(from_zoned("   "), "");
    }

    #[test]
    fn test_zoned_round_trip() {
        for value in ["0", "7", "10", "465", "90210", "-1", "-10", "-465", "-90210"] {
            assert_eq!(from_zoned(&to_zoned(value)), value);
        }
    }
}
