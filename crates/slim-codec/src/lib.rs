//! Codec for the SLIM wire protocol.
//!
//! SLIM messages are nested, length-prefixed lists of byte strings:
//!
//! ```text
//! list  = '[' count ':' item* ']'
//! item  = length ':' payload ':'
//! count, length = exactly six ASCII decimal digits
//! ```
//!
//! `payload` is either a raw byte string or another `list`, recursively.
//! Lengths count *bytes*, not characters, so multi-byte UTF-8 payloads must
//! be measured with `str::len`, never `chars().count()`.
//!
//! This module never splits the input on delimiter characters — `:` and
//! `[`/`]` can appear inside a payload, so the only correct approach is a
//! byte-level recursive-descent parser that trusts the declared lengths.

mod error;

pub use error::CodecError;

const NUMERIC_WIDTH: usize = 6;
const OPEN: u8 = b'[';
const CLOSE: u8 = b']';
const SEPARATOR: u8 = b':';

/// A decoded (or to-be-encoded) SLIM list element.
///
/// Mirrors the wire grammar directly: every element is either a leaf byte
/// string or a nested list of elements. This type is reused, unmodified,
/// as the shape of instruction arguments after symbol substitution — there
/// is no separate "argument tree" type elsewhere in the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlimValue {
    Str(String),
    List(Vec<SlimValue>),
}

impl SlimValue {
    pub fn str(s: impl Into<String>) -> Self {
        SlimValue::Str(s.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SlimValue::Str(s) => Some(s),
            SlimValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[SlimValue]> {
        match self {
            SlimValue::List(items) => Some(items),
            SlimValue::Str(_) => None,
        }
    }
}

impl From<&str> for SlimValue {
    fn from(s: &str) -> Self {
        SlimValue::Str(s.to_string())
    }
}

impl From<String> for SlimValue {
    fn from(s: String) -> Self {
        SlimValue::Str(s)
    }
}

/// Encodes a top-level list of values into a SLIM wire message.
pub fn pack(items: &[SlimValue]) -> String {
    let mut out = String::new();
    pack_into(items, &mut out);
    out
}

fn pack_into(items: &[SlimValue], out: &mut String) {
    out.push(OPEN as char);
    out.push_str(&format!("{:0width$}", items.len(), width = NUMERIC_WIDTH));
    out.push(SEPARATOR as char);
    for item in items {
        pack_item(item, out);
    }
    out.push(CLOSE as char);
}

fn pack_item(item: &SlimValue, out: &mut String) {
    let payload = match item {
        SlimValue::Str(s) => s.clone(),
        SlimValue::List(nested) => {
            let mut nested_out = String::new();
            pack_into(nested, &mut nested_out);
            nested_out
        }
    };
    out.push_str(&format!("{:0width$}", payload.len(), width = NUMERIC_WIDTH));
    out.push(SEPARATOR as char);
    out.push_str(&payload);
    out.push(SEPARATOR as char);
}

/// Decodes a single top-level SLIM list from a complete wire message.
///
/// The entire input must be consumed by exactly one list; trailing bytes
/// after the closing `]` are a framing error rather than silently ignored.
pub fn unpack(input: &str) -> Result<Vec<SlimValue>, CodecError> {
    let bytes = input.as_bytes();
    let (items, consumed) = parse_list(bytes, 0)?;
    if consumed != bytes.len() {
        return Err(CodecError::TrailingData(bytes.len() - consumed));
    }
    Ok(items)
}

/// Parses a list starting at `base` within `bytes`, returning the parsed
/// items and the number of bytes consumed (relative to `base`).
fn parse_list(bytes: &[u8], base: usize) -> Result<(Vec<SlimValue>, usize), CodecError> {
    let mut pos = 0usize;
    expect_byte(bytes, pos, OPEN, base, |offset| {
        CodecError::MissingOpenBracket { offset }
    })?;
    pos += 1;

    let count = read_numeric(bytes, &mut pos, base)?;
    read_separator(bytes, &mut pos, base)?;

    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        let item_len = read_numeric(bytes, &mut pos, base)?;
        read_separator(bytes, &mut pos, base)?;

        if pos + item_len > bytes.len() {
            return Err(CodecError::LengthOverrun {
                offset: base + pos,
                declared: item_len,
                available: bytes.len() - pos,
            });
        }
        let payload_start = pos;
        let payload = &bytes[pos..pos + item_len];
        pos += item_len;
        read_separator(bytes, &mut pos, base)?;

        if is_nested_list(payload) {
            let (nested, consumed) = parse_list(payload, base + payload_start)?;
            if consumed != payload.len() {
                return Err(CodecError::TrailingData(payload.len() - consumed));
            }
            items.push(SlimValue::List(nested));
        } else {
            let s = std::str::from_utf8(payload).map_err(|_| CodecError::InvalidUtf8 {
                offset: base + pos - item_len,
            })?;
            items.push(SlimValue::Str(s.to_string()));
        }
    }

    expect_byte(bytes, pos, CLOSE, base, |offset| {
        CodecError::MissingCloseBracket { offset }
    })?;
    pos += 1;

    Ok((items, pos))
}

fn is_nested_list(payload: &[u8]) -> bool {
    payload.first() == Some(&OPEN) && payload.last() == Some(&CLOSE)
}

fn expect_byte(
    bytes: &[u8],
    pos: usize,
    expected: u8,
    base: usize,
    err: impl FnOnce(usize) -> CodecError,
) -> Result<(), CodecError> {
    match bytes.get(pos) {
        Some(&b) if b == expected => Ok(()),
        _ => Err(err(base + pos)),
    }
}

fn read_numeric(bytes: &[u8], pos: &mut usize, base: usize) -> Result<usize, CodecError> {
    if *pos + NUMERIC_WIDTH > bytes.len() {
        return Err(CodecError::InvalidLengthHeader {
            offset: base + *pos,
            width: NUMERIC_WIDTH,
        });
    }
    let digits = &bytes[*pos..*pos + NUMERIC_WIDTH];
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err(CodecError::InvalidLengthHeader {
            offset: base + *pos,
            width: NUMERIC_WIDTH,
        });
    }
    let text = std::str::from_utf8(digits).expect("ascii digits are valid utf-8");
    let value: usize = text.parse().map_err(|_| CodecError::InvalidLengthHeader {
        offset: base + *pos,
        width: NUMERIC_WIDTH,
    })?;
    *pos += NUMERIC_WIDTH;
    Ok(value)
}

fn read_separator(bytes: &[u8], pos: &mut usize, base: usize) -> Result<(), CodecError> {
    expect_byte(bytes, *pos, SEPARATOR, base, |offset| {
        CodecError::MissingSeparator { offset }
    })?;
    *pos += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn packs_a_flat_list() {
        let items = vec![SlimValue::str("OK"), SlimValue::str("true")];
        assert_eq!(pack(&items), "[000002:000002:OK:000004:true:]");
    }

    #[test]
    fn unpacks_a_flat_list() {
        let decoded = unpack("[000002:000002:OK:000004:true:]").unwrap();
        assert_eq!(decoded, vec![SlimValue::str("OK"), SlimValue::str("true")]);
    }

    #[test]
    fn round_trips_nested_lists() {
        let items = vec![
            SlimValue::str("call"),
            SlimValue::List(vec![SlimValue::str("a"), SlimValue::str("b")]),
        ];
        let packed = pack(&items);
        let decoded = unpack(&packed).unwrap();
        assert_eq!(decoded, items);
    }

    #[test]
    fn counts_utf8_bytes_not_characters() {
        // "café" is 4 chars but 5 bytes (é is 2 bytes in UTF-8).
        let items = vec![SlimValue::str("café")];
        let packed = pack(&items);
        assert!(packed.contains("000005:café:"));
        let decoded = unpack(&packed).unwrap();
        assert_eq!(decoded, items);
    }

    #[test]
    fn rejects_truncated_length_header() {
        let err = unpack("[00000").unwrap_err();
        assert!(matches!(err, CodecError::InvalidLengthHeader { .. }));
    }

    #[test]
    fn rejects_overrunning_item_length() {
        let err = unpack("[000001:000999:abc:]").unwrap_err();
        assert!(matches!(err, CodecError::LengthOverrun { .. }));
    }

    #[test]
    fn rejects_missing_separator() {
        let err = unpack("[000001X000003:abc:]").unwrap_err();
        assert!(matches!(err, CodecError::MissingSeparator { .. }));
    }

    #[test]
    fn rejects_trailing_data() {
        let err = unpack("[000000:]garbage").unwrap_err();
        assert!(matches!(err, CodecError::TrailingData(_)));
    }

    #[test]
    fn rejects_unclosed_list() {
        let err = unpack("[000000:").unwrap_err();
        assert!(matches!(err, CodecError::MissingCloseBracket { .. }));
    }

    fn arb_value() -> impl Strategy<Value = SlimValue> {
        let leaf = "[a-zA-Z0-9 _.,-]{0,40}".prop_map(SlimValue::str);
        leaf.prop_recursive(3, 32, 5, |inner| {
            proptest::collection::vec(inner, 0..5).prop_map(SlimValue::List)
        })
    }

    proptest! {
        #[test]
        fn pack_unpack_round_trip(items in proptest::collection::vec(arb_value(), 0..8)) {
            let packed = pack(&items);
            let decoded = unpack(&packed).unwrap();
            prop_assert_eq!(decoded, items);
        }
    }
}
