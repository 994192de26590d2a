//! Numeric console input shared by the menu choice and the port prompt.

use std::io::{self, BufRead};

/// Maximum number of digits accepted on one line.
pub const MAX_DIGITS: usize = 5;

/// One line of operator input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericInput {
    Value(u32),
    /// Empty, non-numeric, or longer than [`MAX_DIGITS`].
    Invalid,
    /// The console was closed.
    Eof,
}

/// Parses one input line, without its terminator.
///
/// Only ASCII digits are accepted, between 1 and [`MAX_DIGITS`] of them.
pub fn parse_numeric(line: &str) -> Option<u32> {
    if line.is_empty() || line.len() > MAX_DIGITS || !line.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    line.parse().ok()
}

/// Reads one line from `input` and parses it with [`parse_numeric`].
///
/// Bytes that are not valid UTF-8 make the line invalid, not an I/O error.
pub fn read_numeric(input: &mut impl BufRead) -> io::Result<NumericInput> {
    let mut raw = Vec::new();
    if input.read_until(b'\n', &mut raw)? == 0 {
        return Ok(NumericInput::Eof);
    }

    let line = raw
        .strip_suffix(b"\n")
        .map(|l| l.strip_suffix(b"\r").unwrap_or(l))
        .unwrap_or(raw.as_slice());

    Ok(match std::str::from_utf8(line).ok().and_then(parse_numeric) {
        Some(value) => NumericInput::Value(value),
        None => NumericInput::Invalid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(text: &str) -> NumericInput {
        read_numeric(&mut Cursor::new(text.as_bytes())).unwrap()
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("123"), Some(123));
        assert_eq!(parse_numeric("0"), Some(0));
        assert_eq!(parse_numeric("99999"), Some(99999));
        assert_eq!(parse_numeric("00007"), Some(7));
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("12a3"), None);
        assert_eq!(parse_numeric("123456"), None);
        assert_eq!(parse_numeric(" 1"), None);
        assert_eq!(parse_numeric("-1"), None);
        assert_eq!(parse_numeric("+1"), None);
    }

    #[test]
    fn test_read_numeric_lines() {
        assert_eq!(read("123\n"), NumericInput::Value(123));
        assert_eq!(read("0\n"), NumericInput::Value(0));
        assert_eq!(read("\n"), NumericInput::Invalid);
        assert_eq!(read("12a3\n"), NumericInput::Invalid);
        assert_eq!(read("123456\n"), NumericInput::Invalid);
        assert_eq!(read("42\r\n"), NumericInput::Value(42));
    }

    #[test]
    fn test_read_non_utf8_is_invalid() {
        let mut cursor = Cursor::new(b"\xff\n1\xc3\n7\n".as_slice());
        assert_eq!(read_numeric(&mut cursor).unwrap(), NumericInput::Invalid);
        assert_eq!(read_numeric(&mut cursor).unwrap(), NumericInput::Invalid);
        // The stream stays usable after a bad line.
        assert_eq!(read_numeric(&mut cursor).unwrap(), NumericInput::Value(7));
    }

    #[test]
    fn test_read_numeric_eof() {
        assert_eq!(read(""), NumericInput::Eof);
        // A final line without terminator still counts.
        assert_eq!(read("5"), NumericInput::Value(5));
    }

    #[test]
    fn test_read_consumes_one_line() {
        let mut cursor = Cursor::new(b"1\n3\n".as_slice());
        assert_eq!(read_numeric(&mut cursor).unwrap(), NumericInput::Value(1));
        assert_eq!(read_numeric(&mut cursor).unwrap(), NumericInput::Value(3));
        assert_eq!(read_numeric(&mut cursor).unwrap(), NumericInput::Eof);
    }
}
