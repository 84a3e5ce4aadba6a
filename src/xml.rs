//! Formatting helpers shared by all section renderers.
//!
//! The JoFotara schema is matched byte-for-byte, so everything here is
//! deterministic: fixed escaping, fixed 9-decimal-place amounts, LF line
//! endings.

use rust_decimal::{Decimal, RoundingStrategy};

/// Escape text for use in XML element content or attribute values.
pub(crate) fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Round to the 9 decimal places the JoFotara schema works in.
///
/// Midpoints round away from zero, matching the upstream validator.
pub(crate) fn round9(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(9, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount with exactly 9 decimal places.
pub(crate) fn format_amount(amount: Decimal) -> String {
    format!("{:.9}", round9(amount))
}

/// Normalize line endings to Unix style (LF).
pub(crate) fn normalize_newlines(xml: &str) -> String {
    xml.replace("\r\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn escape_xml_cases() {
        assert_eq!(escape_xml("plain"), "plain");
        assert_eq!(
            escape_xml("a < b > c & \"d\" 'e'"),
            "a &lt; b &gt; c &amp; &quot;d&quot; &apos;e&apos;"
        );
        assert_eq!(escape_xml("ملاحظة"), "ملاحظة");
    }

    #[test]
    fn format_amount_pads_to_nine_places() {
        assert_eq!(format_amount(dec!(100)), "100.000000000");
        assert_eq!(format_amount(dec!(92.8)), "92.800000000");
        assert_eq!(format_amount(dec!(0)), "0.000000000");
    }

    #[test]
    fn format_amount_rounds_at_nine_places() {
        assert_eq!(format_amount(dec!(1.00000000049)), "1.000000000");
        assert_eq!(format_amount(dec!(1.0000000005)), "1.000000001");
    }

    #[test]
    fn normalize_newlines_strips_cr() {
        assert_eq!(normalize_newlines("a\r\nb\nc"), "a\nb\nc");
    }
}
