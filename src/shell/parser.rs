//! Cursor-based extraction of numeric tokens from operator input.
//!
//! Tokens follow the C `strtoull(s, NULL, 0)` convention the debugger shell
//! has always used: `0x`/`0X` selects hexadecimal, a bare leading `0` selects
//! octal, anything else is decimal. A token longer than [`MAX_TOKEN_LEN`]
//! bytes is rejected outright rather than silently truncated to the buffer
//! cap the way the original scratch-array parser behaved.
use std::fmt;

/// Longest accepted token, matching the original 32-byte scratch buffer
/// (31 characters plus terminator).
pub const MAX_TOKEN_LEN: usize = 31;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No characters remained after skipping leading spaces.
    Empty,
    /// Token ran past [`MAX_TOKEN_LEN`] before a delimiter.
    TooLong { len: usize },
    /// Token contained a character invalid for its detected base.
    BadDigit { token: String },
    /// Token parsed but did not fit in 64 bits.
    Overflow { token: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty numeric token"),
            ParseError::TooLong { len } => {
                write!(f, "token of {len} bytes exceeds the {MAX_TOKEN_LEN}-byte limit")
            }
            ParseError::BadDigit { token } => {
                write!(f, "'{token}' is not a valid unsigned integer")
            }
            ParseError::Overflow { token } => write!(f, "'{token}' overflows 64 bits"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Mutable position into the remaining unconsumed operator input.
///
/// Owned exclusively by the caller; each [`take_number`](Self::take_number)
/// consumes exactly one token left to right. On success the cursor rests at
/// the start of the next token (delimiter spaces are consumed too). On
/// failure the cursor is left unchanged.
pub struct TokenCursor<'a> {
    rest: &'a str,
}

impl<'a> TokenCursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { rest: input }
    }

    /// Remaining unconsumed input.
    #[inline(always)]
    pub fn rest(&self) -> &'a str {
        self.rest
    }

    /// True once no non-space characters remain.
    pub fn is_empty(&self) -> bool {
        self.rest.trim_start_matches(' ').is_empty()
    }

    /// Extract one whitespace-delimited token and parse it as an unsigned
    /// integer with base auto-detection.
    pub fn take_number(&mut self) -> ParseResult<u64> {
        let after_spaces = self.rest.trim_start_matches(' ');
        let token_len = after_spaces
            .find(' ')
            .unwrap_or(after_spaces.len());
        if token_len == 0 {
            return Err(ParseError::Empty);
        }
        if token_len > MAX_TOKEN_LEN {
            return Err(ParseError::TooLong { len: token_len });
        }

        let token = &after_spaces[..token_len];
        let value = parse_unsigned(token)?;

        self.rest = after_spaces[token_len..].trim_start_matches(' ');
        Ok(value)
    }
}

/// `strtoull`-style parse with auto-detected base. The base prefix must be
/// followed by at least one digit; a lone `"0"` is octal zero and valid.
fn parse_unsigned(token: &str) -> ParseResult<u64> {
    let (radix, digits) = if let Some(stripped) =
        token.strip_prefix("0x").or_else(|| token.strip_prefix("0X"))
    {
        (16, stripped)
    } else if token != "0" && token.starts_with('0') {
        (8, &token[1..])
    } else {
        (10, token)
    };

    // `from_str_radix` tolerates a leading '+', which strtoull base-0 does
    // not; only bare digits may follow the prefix.
    if digits.is_empty() || digits.starts_with('+') {
        return Err(ParseError::BadDigit {
            token: token.to_string(),
        });
    }

    u64::from_str_radix(digits, radix).map_err(|err| match err.kind() {
        std::num::IntErrorKind::PosOverflow => ParseError::Overflow {
            token: token.to_string(),
        },
        _ => ParseError::BadDigit {
            token: token.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_base_prefix() {
        assert_eq!(TokenCursor::new("0x10").take_number().unwrap(), 16);
        assert_eq!(TokenCursor::new("0X10").take_number().unwrap(), 16);
        assert_eq!(TokenCursor::new("010").take_number().unwrap(), 8);
        assert_eq!(TokenCursor::new("10").take_number().unwrap(), 10);
        assert_eq!(TokenCursor::new("0").take_number().unwrap(), 0);
    }

    #[test]
    fn cursor_rests_at_start_of_next_token() {
        let mut cur = TokenCursor::new("  0x1000 0xdead beef");
        assert_eq!(cur.take_number().unwrap(), 0x1000);
        assert_eq!(cur.rest(), "0xdead beef", "delimiter spaces are consumed");
        assert_eq!(cur.take_number().unwrap(), 0xdead);
        assert_eq!(cur.rest(), "beef");
    }

    #[test]
    fn prefix_value_matches_token_parsed_alone() {
        let alone = TokenCursor::new("0x7fff0004").take_number().unwrap();
        let mut cur = TokenCursor::new("0x7fff0004 trailing junk");
        assert_eq!(
            cur.take_number().unwrap(),
            alone,
            "token followed by more input parses to the same value"
        );
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(TokenCursor::new("").take_number(), Err(ParseError::Empty));
        assert_eq!(
            TokenCursor::new("    ").take_number(),
            Err(ParseError::Empty)
        );
    }

    #[test]
    fn rejects_overlong_token_instead_of_truncating() {
        let long = "0x".to_string() + &"1".repeat(MAX_TOKEN_LEN);
        let mut cur = TokenCursor::new(&long);
        assert!(
            matches!(cur.take_number(), Err(ParseError::TooLong { .. })),
            "token past the scratch limit must hard-fail"
        );
        assert_eq!(cur.rest(), long, "cursor unchanged on failure");
    }

    #[test]
    fn rejects_garbage_digits() {
        for bad in ["zzz", "0xg1", "099", "12ab", "-4", "0x", "+7", "0+7", "0x+4"] {
            assert!(
                matches!(
                    TokenCursor::new(bad).take_number(),
                    Err(ParseError::BadDigit { .. })
                ),
                "'{bad}' should be rejected"
            );
        }
    }

    #[test]
    fn rejects_overflow_of_u64() {
        assert!(matches!(
            TokenCursor::new("0xffffffffffffffff1").take_number(),
            Err(ParseError::Overflow { .. })
        ));
        assert_eq!(
            TokenCursor::new("0xffffffffffffffff").take_number().unwrap(),
            u64::MAX
        );
    }

    #[test]
    fn zero_is_a_legal_value_not_a_sentinel() {
        assert_eq!(TokenCursor::new("0x0").take_number().unwrap(), 0);
        assert_eq!(TokenCursor::new("00").take_number().unwrap(), 0);
    }
}
