use std::str::Chars;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EscapeError {
    #[error("unknown escape sequence \\{0}")]
    Unknown(char),
    #[error("escape sequence truncated at end of literal")]
    Truncated,
    #[error("invalid digit {digit:?} in \\{kind} escape")]
    BadDigit { kind: char, digit: char },
    #[error("\\{kind} escape is not a valid codepoint: {value:#x}")]
    InvalidCodepoint { kind: char, value: u32 },
}

/// Decodes backslash escapes in a string literal the way a C-style
/// source literal is decoded: single-char escapes, one to three octal
/// digits, `\xNN`, `\uNNNN` and `\UNNNNNNNN`. Every escape resolves to
/// a codepoint which is re-encoded as UTF-8, so `\x80` yields the two
/// bytes `0xc2 0x80`, not a lone `0x80`.
pub fn decode_escapes(raw: &str) -> Result<String, EscapeError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let esc = chars.next().ok_or(EscapeError::Truncated)?;
        match esc {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'v' => out.push('\x0b'),
            '0'..='7' => out.push(take_octal(&mut chars, esc)?),
            'x' => out.push(take_hex(&mut chars, 2, 'x')?),
            'u' => out.push(take_hex(&mut chars, 4, 'u')?),
            'U' => out.push(take_hex(&mut chars, 8, 'U')?),
            other => return Err(EscapeError::Unknown(other)),
        }
    }
    Ok(out)
}

// First digit already consumed; up to two more octal digits follow.
fn take_octal(chars: &mut Chars<'_>, first: char) -> Result<char, EscapeError> {
    let mut value = first.to_digit(8).ok_or(EscapeError::BadDigit { kind: '0', digit: first })?;
    for _ in 0..2 {
        let Some(d) = chars.clone().next() else { break };
        let Some(digit) = d.to_digit(8) else { break };
        chars.next();
        value = value * 8 + digit;
    }
    // max value is 0o777, always a valid codepoint
    char::from_u32(value).ok_or(EscapeError::InvalidCodepoint { kind: '0', value })
}

fn take_hex(chars: &mut Chars<'_>, count: usize, kind: char) -> Result<char, EscapeError> {
    let mut value: u32 = 0;
    for _ in 0..count {
        let d = chars.next().ok_or(EscapeError::Truncated)?;
        let digit = d.to_digit(16).ok_or(EscapeError::BadDigit { kind, digit: d })?;
        value = value * 16 + digit;
    }
    char::from_u32(value).ok_or(EscapeError::InvalidCodepoint { kind, value })
}
