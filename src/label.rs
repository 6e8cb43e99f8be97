//! Page label numeral codecs.
//!
//! Converts between integer numbering positions and their displayed forms
//! (Roman numerals, spreadsheet-style letters, decimal digits), and
//! classifies numeral tokens back into a [`LabelStyle`].

use crate::error::{Error, Result};
use crate::model::LabelStyle;
use regex::Regex;

/// Largest value expressible with the subtractive-pair Roman alphabet.
const ROMAN_MAX: u32 = 3999;

const ROMAN_PAIRS: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Encode an integer as an uppercase Roman numeral.
///
/// Valid for 1–3999; anything outside that range is a [`Error::LabelRule`].
pub fn int_to_roman(n: u32) -> Result<String> {
    if n == 0 || n > ROMAN_MAX {
        return Err(Error::LabelRule(format!(
            "{} is outside the Roman numeral range 1-{}",
            n, ROMAN_MAX
        )));
    }
    let mut remaining = n;
    let mut out = String::new();
    for &(value, symbol) in &ROMAN_PAIRS {
        while remaining >= value {
            out.push_str(symbol);
            remaining -= value;
        }
    }
    Ok(out)
}

/// Decode a Roman numeral (either case).
///
/// A symbol whose value exceeds its predecessor's forms a subtractive pair:
/// the predecessor's value, already added, is subtracted twice.
pub fn roman_to_int(s: &str) -> Result<u32> {
    let mut total: i64 = 0;
    let mut prev: i64 = 0;
    for c in s.chars() {
        let value = match c.to_ascii_uppercase() {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            'C' => 100,
            'D' => 500,
            'M' => 1000,
            other => {
                return Err(Error::LabelRule(format!(
                    "invalid Roman numeral symbol '{}' in {:?}",
                    other, s
                )))
            }
        };
        if value > prev && prev > 0 {
            total += value - 2 * prev;
        } else {
            total += value;
        }
        prev = value;
    }
    if total <= 0 {
        return Err(Error::LabelRule(format!("empty Roman numeral {:?}", s)));
    }
    Ok(total as u32)
}

/// Encode an integer as a lowercase letter sequence, 1-indexed base-26 with
/// no zero digit (1 → "a", 26 → "z", 27 → "aa").
pub fn int_to_letter(n: u32) -> Result<String> {
    if n == 0 {
        return Err(Error::LabelRule(
            "letter numbering starts at 1".to_string(),
        ));
    }
    let mut remaining = n;
    let mut out = Vec::new();
    while remaining > 0 {
        let rem = (remaining - 1) % 26;
        out.push((b'a' + rem as u8) as char);
        remaining = (remaining - 1) / 26;
    }
    Ok(out.iter().rev().collect())
}

/// Decode a letter sequence (either case) to its numeric value.
pub fn letter_to_int(s: &str) -> Result<u32> {
    if s.is_empty() {
        return Err(Error::LabelRule("empty letter numeral".to_string()));
    }
    let mut total: u32 = 0;
    for c in s.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::LabelRule(format!(
                "invalid letter numeral symbol '{}' in {:?}",
                c, s
            )));
        }
        total = total * 26 + (c.to_ascii_lowercase() as u32 - 'a' as u32 + 1);
    }
    Ok(total)
}

/// Render the numeral string for a numbering position under a style.
///
/// `None` yields an empty string (the label is the prefix alone).
pub fn format_numeral(style: LabelStyle, n: u32) -> Result<String> {
    match style {
        LabelStyle::None => Ok(String::new()),
        LabelStyle::Decimal => Ok(n.to_string()),
        LabelStyle::UpperRoman => int_to_roman(n),
        LabelStyle::LowerRoman => int_to_roman(n).map(|s| s.to_lowercase()),
        LabelStyle::UpperAlpha => int_to_letter(n).map(|s| s.to_uppercase()),
        LabelStyle::LowerAlpha => int_to_letter(n),
    }
}

/// Classify a numeral token into a style and its numeric value.
///
/// Canonical Roman numerals win over the alphabetic reading (`"iv"` is Roman,
/// not letters); digits are decimal; remaining all-letter tokens are
/// alphabetic. Case selects the upper or lower style variant. Anything else
/// is a [`Error::LabelRule`].
pub fn classify_numeral(token: &str) -> Result<(LabelStyle, u32)> {
    let roman = Regex::new(r"^M{0,4}(CM|CD|D?C{0,3})(XC|XL|L?X{0,3})(IX|IV|V?I{0,3})$").unwrap();

    if token.is_empty() {
        return Err(Error::LabelRule("empty numeral token".to_string()));
    }
    let all_upper = token.chars().all(|c| !c.is_lowercase());

    if roman.is_match(&token.to_uppercase()) {
        let style = if all_upper {
            LabelStyle::UpperRoman
        } else {
            LabelStyle::LowerRoman
        };
        return Ok((style, roman_to_int(token)?));
    }
    if token.chars().all(|c| c.is_ascii_digit()) {
        let value = token
            .parse::<u32>()
            .map_err(|_| Error::LabelRule(format!("invalid decimal numeral {:?}", token)))?;
        return Ok((LabelStyle::Decimal, value));
    }
    if token.chars().all(|c| c.is_ascii_alphabetic()) {
        let style = if all_upper {
            LabelStyle::UpperAlpha
        } else {
            LabelStyle::LowerAlpha
        };
        return Ok((style, letter_to_int(token)?));
    }
    Err(Error::LabelRule(format!(
        "unrecognized numeral token {:?}",
        token
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roman_round_trip_full_range() {
        for n in 1..=3999 {
            let encoded = int_to_roman(n).unwrap();
            assert_eq!(roman_to_int(&encoded).unwrap(), n, "n={}", n);
        }
    }

    #[test]
    fn test_roman_canonical_strings() {
        for (n, s) in [(4, "IV"), (9, "IX"), (14, "XIV"), (1994, "MCMXCIV"), (3999, "MMMCMXCIX")] {
            assert_eq!(int_to_roman(n).unwrap(), s);
            assert_eq!(roman_to_int(s).unwrap(), n);
        }
    }

    #[test]
    fn test_roman_out_of_range() {
        assert!(int_to_roman(0).is_err());
        assert!(int_to_roman(4000).is_err());
    }

    #[test]
    fn test_roman_invalid_symbol() {
        assert!(matches!(roman_to_int("XQ"), Err(Error::LabelRule(_))));
    }

    #[test]
    fn test_letter_round_trip_three_letter_range() {
        for n in 1..=18278 {
            let encoded = int_to_letter(n).unwrap();
            assert_eq!(letter_to_int(&encoded).unwrap(), n, "n={}", n);
        }
    }

    #[test]
    fn test_letter_spreadsheet_examples() {
        assert_eq!(int_to_letter(1).unwrap(), "a");
        assert_eq!(int_to_letter(26).unwrap(), "z");
        assert_eq!(int_to_letter(27).unwrap(), "aa");
        assert_eq!(int_to_letter(702).unwrap(), "zz");
        assert_eq!(int_to_letter(703).unwrap(), "aaa");
        assert_eq!(letter_to_int("AA").unwrap(), 27);
    }

    #[test]
    fn test_format_numeral_styles() {
        assert_eq!(format_numeral(LabelStyle::None, 7).unwrap(), "");
        assert_eq!(format_numeral(LabelStyle::Decimal, 7).unwrap(), "7");
        assert_eq!(format_numeral(LabelStyle::UpperRoman, 7).unwrap(), "VII");
        assert_eq!(format_numeral(LabelStyle::LowerRoman, 7).unwrap(), "vii");
        assert_eq!(format_numeral(LabelStyle::UpperAlpha, 28).unwrap(), "AB");
        assert_eq!(format_numeral(LabelStyle::LowerAlpha, 28).unwrap(), "ab");
    }

    #[test]
    fn test_classify_roman_beats_alpha() {
        assert_eq!(
            classify_numeral("iv").unwrap(),
            (LabelStyle::LowerRoman, 4)
        );
        assert_eq!(
            classify_numeral("XIV").unwrap(),
            (LabelStyle::UpperRoman, 14)
        );
    }

    #[test]
    fn test_classify_decimal_and_alpha() {
        assert_eq!(classify_numeral("12").unwrap(), (LabelStyle::Decimal, 12));
        assert_eq!(classify_numeral("b").unwrap(), (LabelStyle::LowerAlpha, 2));
        assert_eq!(classify_numeral("AB").unwrap(), (LabelStyle::UpperAlpha, 28));
    }

    #[test]
    fn test_classify_rejects_garbage() {
        assert!(matches!(classify_numeral("1a"), Err(Error::LabelRule(_))));
        assert!(matches!(classify_numeral(""), Err(Error::LabelRule(_))));
    }
}
