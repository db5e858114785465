//! Argument quoting for the session log
//!
//! Each argument becomes exactly one log token, so a `cmd:` line can always be
//! split back into the original argument vector:
//! - `"`, `\` and newline are escaped with a `\` (newline is written as `\n`)
//! - the token is wrapped in double quotes if the argument contains a space,
//!   tab, newline, `"` or `\`

use crate::error::QuoteError;
use std::borrow::Cow;
use std::ffi::OsStr;

/// Bound used by the wrapper for a single quoted argument
pub const QUOTE_BUFFER_SIZE: usize = 4096;

/// Number of input bytes echoed back in an overflow error
const ERROR_PREFIX_LEN: usize = 9;

fn needs_escape(byte: u8) -> bool {
    matches!(byte, b'"' | b'\\' | b'\n')
}

fn needs_quotes(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'"' | b'\\')
}

/// Length of the quoted form of `input`, without building it
pub fn quoted_len(input: &[u8]) -> usize {
    let escapes = input.iter().filter(|&&b| needs_escape(b)).count();
    let wrap = if input.iter().any(|&b| needs_quotes(b)) { 2 } else { 0 };
    input.len() + escapes + wrap
}

/// Quote `input` into a single log token of at most `limit` bytes
pub fn quote(input: &[u8], limit: usize) -> Result<Vec<u8>, QuoteError> {
    if quoted_len(input) > limit {
        let end = input.len().min(ERROR_PREFIX_LEN);
        return Err(QuoteError {
            prefix: String::from_utf8_lossy(&input[..end])
                .escape_debug()
                .to_string(),
            limit,
        });
    }

    let wrap = input.iter().any(|&b| needs_quotes(b));
    let mut output = Vec::with_capacity(quoted_len(input));
    if wrap {
        output.push(b'"');
    }
    for &byte in input {
        match byte {
            b'\n' => output.extend_from_slice(b"\\n"),
            b'"' | b'\\' => {
                output.push(b'\\');
                output.push(byte);
            }
            _ => output.push(byte),
        }
    }
    if wrap {
        output.push(b'"');
    }
    Ok(output)
}

/// Quote a platform string, using its raw bytes where the platform has them
pub fn quote_os(input: &OsStr, limit: usize) -> Result<Vec<u8>, QuoteError> {
    quote(&os_bytes(input), limit)
}

/// Reverse `quote`. Returns `None` for tokens `quote` cannot produce.
pub fn unquote(token: &[u8]) -> Option<Vec<u8>> {
    let body = match token {
        [b'"', inner @ .., b'"'] => inner,
        [b'"'] => return None,
        _ if token.iter().any(|&b| needs_quotes(b)) => return None,
        _ => return Some(token.to_vec()),
    };

    let mut output = Vec::with_capacity(body.len());
    let mut bytes = body.iter();
    while let Some(&byte) = bytes.next() {
        match byte {
            b'\\' => match *bytes.next()? {
                b'n' => output.push(b'\n'),
                escaped @ (b'"' | b'\\') => output.push(escaped),
                _ => return None,
            },
            b'"' | b'\n' => return None,
            _ => output.push(byte),
        }
    }
    Some(output)
}

#[cfg(unix)]
pub(crate) fn os_bytes(input: &OsStr) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(input.as_bytes())
}

#[cfg(not(unix))]
pub(crate) fn os_bytes(input: &OsStr) -> Cow<'_, [u8]> {
    match input.to_string_lossy() {
        Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
        Cow::Owned(s) => Cow::Owned(s.into_bytes()),
    }
}
