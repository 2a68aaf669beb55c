use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use rand::RngCore;
use regex::Regex;
use std::io::{BufRead, Write};
use thiserror::Error;
use tracing::debug;

use crate::escape::{decode_escapes, EscapeError};

// Anchored at the start only, and greedy up to the final quote on the
// line, so a literal with an embedded unescaped quote extends to the
// last quote (widest match wins) and trailing text does not prevent a
// match.
static DECLARATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^#define ([a-zA-Z_]+) "(.*)""#).expect("declaration pattern"));

#[derive(Debug, Error)]
pub enum ObfuscationError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("bad escape in {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: EscapeError,
    },
    #[error("randomness source failure: {0}")]
    Rng(#[from] rand::Error),
}

/// A recognized `#define NAME "TEXT"` line, escapes still un-decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub raw_literal: String,
}

/// Matches a trimmed input line against the declaration grammar.
/// Anything outside the grammar is pass-through text, never an error.
pub fn parse_declaration(line: &str) -> Option<Declaration> {
    let caps = DECLARATION.captures(line.trim())?;
    Some(Declaration {
        name: caps[1].to_string(),
        raw_literal: caps[2].to_string(),
    })
}

/// Renders the replacement block for one declaration:
///
/// ```text
/// //#define NAME "RAW"
/// #define NAME_ENC {<masked bytes>,<keystream bytes>}
/// #define NAME_LEN <len + 1>
/// ```
///
/// The keystream is drawn from the operating system CSPRNG, one fresh
/// byte per decoded byte plus a forced zero terminator. Downstream C
/// code reconstructs the string by XOR-ing the first half of the array
/// against the second, so the masked-then-keystream order is a fixed
/// contract.
pub fn obfuscate_declaration(decl: &Declaration) -> Result<String, ObfuscationError> {
    let decoded = decode_escapes(&decl.raw_literal).map_err(|source| ObfuscationError::Decode {
        name: decl.name.clone(),
        source,
    })?;
    let plain = decoded.as_bytes();

    let mut keystream = vec![0u8; plain.len()];
    OsRng.try_fill_bytes(&mut keystream)?;
    let mut masked: Vec<u8> = keystream.iter().zip(plain).map(|(k, p)| k ^ p).collect();
    masked.push(0);
    keystream.push(0);

    Ok(format!(
        "//#define {name} \"{raw}\"\n#define {name}_ENC {{{},{}}}\n#define {name}_LEN {len}\n",
        hex_list(&masked),
        hex_list(&keystream),
        name = decl.name,
        raw = decl.raw_literal,
        len = masked.len(),
    ))
}

// hex() formatting the consuming build expects: lowercase, unpadded.
fn hex_list(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:#x}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Single synchronous pass over the input. Non-matching lines are
/// copied byte-for-byte, terminator included, so CRLF files and a
/// missing final newline survive untouched. Returns the number of
/// declarations rewritten.
pub fn obfuscate_stream<R, W>(mut reader: R, mut writer: W) -> Result<usize, ObfuscationError>
where
    R: BufRead,
    W: Write,
{
    let mut line = String::new();
    let mut count = 0;
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        match parse_declaration(&line) {
            Some(decl) => {
                debug!(name = %decl.name, "obfuscating declaration");
                writer.write_all(obfuscate_declaration(&decl)?.as_bytes())?;
                count += 1;
            }
            None => writer.write_all(line.as_bytes())?,
        }
    }
    writer.flush()?;
    Ok(count)
}
