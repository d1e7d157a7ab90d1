//! Java 整数字面量 -> i32
//!
//! 规则与 javac 一致：
//! - 十六进制 / 八进制 / 二进制可以占满 32 位（`0xFFFFFFFF` == -1）
//! - 十进制必须落在 i32 内，唯一例外是取负的 `2147483648`
//! - `L`/`l` 后缀是 long，不是 int

use crate::error::LiteralError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Radix {
    Hex,
    Octal,
    Binary,
    Decimal,
}

impl Radix {
    fn base(self) -> u32 {
        match self {
            Radix::Hex => 16,
            Radix::Octal => 8,
            Radix::Binary => 2,
            Radix::Decimal => 10,
        }
    }
}

/// 是否带 long 后缀
#[inline]
pub fn is_long_literal(text: &str) -> bool {
    text.ends_with('L') || text.ends_with('l')
}

fn split_radix(text: &str) -> (Radix, &str) {
    if let Some(rest) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        (Radix::Hex, rest)
    } else if let Some(rest) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
        (Radix::Binary, rest)
    } else if text.len() > 1 && text.starts_with('0') {
        (Radix::Octal, &text[1..])
    } else {
        (Radix::Decimal, text)
    }
}

/// 把一个 int 字面量（可带 `_` 分隔符）解析为有符号 32 位整数。
///
/// `negated` 表示字面量前紧跟一元负号，用于接受 `-2147483648`。
pub fn parse_int32(text: &str, negated: bool) -> Result<i32, LiteralError> {
    if is_long_literal(text) {
        return Err(LiteralError::Long(text.to_string()));
    }

    let (radix, digits) = split_radix(text);
    let digits: String = digits.chars().filter(|&c| c != '_').collect();
    if digits.is_empty() {
        return Err(LiteralError::Invalid(text.to_string()));
    }

    let raw = u64::from_str_radix(&digits, radix.base())
        .map_err(|_| LiteralError::Invalid(text.to_string()))?;

    let value = match radix {
        Radix::Decimal => {
            let limit = if negated { 1u64 << 31 } else { i32::MAX as u64 };
            if raw > limit {
                return Err(LiteralError::OutOfRange(text.to_string()));
            }
            raw as u32 as i32
        }
        _ => {
            if raw > u32::MAX as u64 {
                return Err(LiteralError::OutOfRange(text.to_string()));
            }
            raw as u32 as i32
        }
    };

    Ok(if negated { value.wrapping_neg() } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_every_radix() {
        assert_eq!(parse_int32("0x7f0a0012", false), Ok(0x7f0a0012));
        assert_eq!(parse_int32("2131361810", false), Ok(2131361810));
        assert_eq!(parse_int32("017", false), Ok(15));
        assert_eq!(parse_int32("0b101", false), Ok(5));
        assert_eq!(parse_int32("0", false), Ok(0));
        assert_eq!(parse_int32("1_000", false), Ok(1000));
    }

    #[test]
    fn hex_uses_all_32_bits() {
        assert_eq!(parse_int32("0xFFFFFFFF", false), Ok(-1));
        assert_eq!(parse_int32("0x80000000", false), Ok(i32::MIN));
        assert!(matches!(parse_int32("0x100000000", false), Err(LiteralError::OutOfRange(_))));
    }

    #[test]
    fn decimal_bounds() {
        assert!(matches!(parse_int32("2147483648", false), Err(LiteralError::OutOfRange(_))));
        assert_eq!(parse_int32("2147483648", true), Ok(i32::MIN));
        assert_eq!(parse_int32("5", true), Ok(-5));
    }

    #[test]
    fn long_suffix_is_rejected() {
        assert!(matches!(parse_int32("10L", false), Err(LiteralError::Long(_))));
        assert!(is_long_literal("0x7fl"));
    }
}
