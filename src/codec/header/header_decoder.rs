//! Scanners for the request head and chunk metadata.
//!
//! All parsing here is line-oriented and single-pass: the request line, the
//! header lines, the chunk-size lines and the request-target decoding are
//! each handled by a dedicated scanner over one already-delimited line.
//! Errors name the phase that failed so the stable error codes stay precise.

use std::collections::HashMap;

use crate::ensure;
use crate::protocol::HttpError;

/// Parses `TOKEN SP TARGET SP HTTP/x.y` into (method, target, version).
///
/// The method must be a non-empty RFC 7230 token, the target must contain no
/// whitespace, and the only accepted version is `HTTP/1.1`. A structurally
/// valid line with a different `HTTP/x.y` version reports
/// `UnsupportedHttpVersion` rather than `InvalidRequestLine`.
pub(crate) fn parse_request_line(line: &str) -> Result<(&str, &str, &str), HttpError> {
    let mut parts = line.split(' ');
    let method = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("");
    let version = parts.next().unwrap_or("");
    ensure!(parts.next().is_none(), HttpError::InvalidRequestLine);

    ensure!(!method.is_empty() && method.bytes().all(is_token_byte), HttpError::InvalidRequestLine);
    ensure!(
        !target.is_empty() && !target.bytes().any(|b| b.is_ascii_whitespace()),
        HttpError::InvalidRequestLine
    );

    let v = version.as_bytes();
    let shape_ok = v.len() == 8
        && &v[..5] == b"HTTP/"
        && v[5].is_ascii_digit()
        && v[6] == b'.'
        && v[7].is_ascii_digit();
    ensure!(shape_ok, HttpError::InvalidRequestLine);
    ensure!(version == "HTTP/1.1", HttpError::unsupported_version(version));

    Ok((method, target, version))
}

/// Splits a header (or trailer) line at the first `:`.
///
/// The name is the prefix and must be non-empty; the value is the suffix with
/// left whitespace trimmed.
pub(crate) fn parse_header_line(line: &str) -> Result<(&str, &str), HttpError> {
    let (name, value) = line.split_once(':').ok_or(HttpError::InvalidRequestHeader)?;
    ensure!(!name.is_empty(), HttpError::InvalidRequestHeader);
    Ok((name, value.trim_start()))
}

/// Parses the leading hexadecimal digits of a chunk-size line.
///
/// Anything after the digits (chunk extensions) is ignored; a line with no
/// leading hex digit is invalid.
pub(crate) fn parse_chunk_size(line: &str) -> Result<u64, HttpError> {
    let digits = &line[..line.bytes().take_while(u8::is_ascii_hexdigit).count()];
    ensure!(!digits.is_empty(), HttpError::invalid_chunk_length(line));
    u64::from_str_radix(digits, 16).map_err(|_| HttpError::invalid_chunk_length(line))
}

/// Splits a request target at the first `#` and the first `?`, decoding path
/// and fragment and building the query parameter map.
///
/// Query parameters without an `=` sign carry no value and are dropped; on a
/// repeated name the last occurrence wins.
pub(crate) fn split_target(resource: &str) -> (String, HashMap<String, String>, String) {
    let (before_hash, fragment_raw) = match resource.split_once('#') {
        Some((before, fragment)) => (before, fragment),
        None => (resource, ""),
    };
    let (path_raw, query_raw) = match before_hash.split_once('?') {
        Some((path, query)) => (path, query),
        None => (before_hash, ""),
    };

    let mut query = HashMap::new();
    if !query_raw.is_empty() {
        for pair in query_raw.split('&') {
            if let Some((name, value)) = pair.split_once('=') {
                query.insert(decode_component(name), decode_component(value));
            }
        }
    }

    (decode_component(path_raw), query, decode_component(fragment_raw))
}

/// Percent-decodes a target component; `+` decodes to space. A `%` not
/// followed by two hex digits is kept literally.
pub(crate) fn decode_component(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit() =>
            {
                out.push(hex_value(bytes[i + 1]) << 4 | hex_value(bytes[i + 2]));
                i += 3;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'-' | b'!'
                | b'#'
                | b'$'
                | b'%'
                | b'^'
                | b'&'
                | b'*'
                | b'+'
                | b'.'
                | b'_'
                | b'\''
                | b'`'
                | b'|'
                | b'~'
        )
}
