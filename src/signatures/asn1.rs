//! Minimal DER encoding and decoding primitives shared by the CMS, RFC 3161
//! timestamp, and OCSP/CRL revocation code.
//!
//! The signing pipeline builds CMS structures by hand rather than through the
//! `cms`/`der` crates' typed API, so that one small, well-tested encoder
//! backs every ASN.1 structure this crate produces or reads. This mirrors
//! the approach already used for PKCS#7 assembly before this module existed.

/// Encodes a DER length octet sequence for a content of `len` bytes.
pub fn encode_length(len: usize) -> Vec<u8> {
    if len < 0x80 {
        vec![len as u8]
    } else {
        let mut bytes = Vec::new();
        let mut n = len;
        while n > 0 {
            bytes.insert(0, (n & 0xff) as u8);
            n >>= 8;
        }
        let mut out = vec![0x80 | bytes.len() as u8];
        out.extend(bytes);
        out
    }
}

fn tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    out.extend(encode_length(content.len()));
    out.extend_from_slice(content);
    out
}

/// `SEQUENCE` (0x30).
pub fn sequence(content: &[u8]) -> Vec<u8> {
    tlv(0x30, content)
}

/// `SET OF` (0x31).
pub fn set(content: &[u8]) -> Vec<u8> {
    tlv(0x31, content)
}

/// `SET OF`, but DER requires SET elements be sorted by their encoding; used
/// for signed-attribute sets where ordering matters for digesting.
pub fn set_sorted(mut elements: Vec<Vec<u8>>) -> Vec<u8> {
    elements.sort();
    let content: Vec<u8> = elements.into_iter().flatten().collect();
    set(&content)
}

/// `OCTET STRING` (0x04).
pub fn octet_string(bytes: &[u8]) -> Vec<u8> {
    tlv(0x04, bytes)
}

/// `BIT STRING` (0x03) with zero unused bits, the only case this crate needs.
pub fn bit_string(bytes: &[u8]) -> Vec<u8> {
    let mut content = vec![0u8];
    content.extend_from_slice(bytes);
    tlv(0x03, &content)
}

/// `BOOLEAN` (0x01).
pub fn boolean(value: bool) -> Vec<u8> {
    tlv(0x01, &[if value { 0xff } else { 0x00 }])
}

/// `NULL` (0x05).
pub fn null() -> Vec<u8> {
    vec![0x05, 0x00]
}

/// `INTEGER` (0x02) from a non-negative value, minimally encoded with a
/// leading zero byte inserted when the high bit of the first byte is set.
pub fn integer(bytes: &[u8]) -> Vec<u8> {
    let mut trimmed = bytes;
    while trimmed.len() > 1 && trimmed[0] == 0 && trimmed[1] & 0x80 == 0 {
        trimmed = &trimmed[1..];
    }
    let mut content = Vec::new();
    if trimmed.is_empty() {
        content.push(0);
    } else if trimmed[0] & 0x80 != 0 {
        content.push(0);
        content.extend_from_slice(trimmed);
    } else {
        content.extend_from_slice(trimmed);
    }
    tlv(0x02, &content)
}

/// `INTEGER` from a small non-negative `u64`.
pub fn integer_u64(value: u64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let mut trimmed = &bytes[..];
    while trimmed.len() > 1 && trimmed[0] == 0 {
        trimmed = &trimmed[1..];
    }
    integer(trimmed)
}

/// `OBJECT IDENTIFIER` (0x06) from a dotted string, e.g. `"1.2.840.113549.1.1.1"`.
pub fn oid(dotted: &str) -> Vec<u8> {
    let parts: Vec<u64> = dotted.split('.').map(|p| p.parse().unwrap_or(0)).collect();
    let mut content = Vec::new();
    if parts.len() >= 2 {
        content.push((parts[0] * 40 + parts[1]) as u8);
        for &p in &parts[2..] {
            content.extend(encode_base128(p));
        }
    }
    tlv(0x06, &content)
}

fn encode_base128(mut value: u64) -> Vec<u8> {
    if value == 0 {
        return vec![0];
    }
    let mut bytes = Vec::new();
    while value > 0 {
        bytes.insert(0, (value & 0x7f) as u8);
        value >>= 7;
    }
    for b in bytes.iter_mut().take(bytes.len() - 1) {
        *b |= 0x80;
    }
    bytes
}

/// `[n] IMPLICIT` context-specific constructed tag (e.g. `[0]`, `[1]`).
pub fn context_constructed(n: u8, content: &[u8]) -> Vec<u8> {
    tlv(0xa0 | n, content)
}

/// `[n] IMPLICIT` context-specific primitive tag carrying raw bytes verbatim.
pub fn context_primitive(n: u8, content: &[u8]) -> Vec<u8> {
    tlv(0x80 | n, content)
}

/// `UTCTime` (0x17), DER form `YYMMDDHHMMSSZ`.
pub fn utc_time(s: &str) -> Vec<u8> {
    tlv(0x17, s.as_bytes())
}

/// `GeneralizedTime` (0x18), DER form `YYYYMMDDHHMMSSZ`.
pub fn generalized_time(s: &str) -> Vec<u8> {
    tlv(0x18, s.as_bytes())
}

/// A single decoded DER TLV element: tag, its raw content bytes, and the
/// total number of bytes (tag + length + content) it occupied in the input.
#[derive(Debug, Clone)]
pub struct Tlv<'a> {
    pub tag: u8,
    pub content: &'a [u8],
    pub consumed: usize,
}

/// Reads one TLV element from the front of `data`.
pub fn read_tlv(data: &[u8]) -> Option<Tlv<'_>> {
    if data.len() < 2 {
        return None;
    }
    let tag = data[0];
    let mut idx = 1usize;
    let first_len = data[idx];
    idx += 1;
    let len = if first_len & 0x80 == 0 {
        first_len as usize
    } else {
        let n = (first_len & 0x7f) as usize;
        if n == 0 || idx + n > data.len() {
            return None;
        }
        let mut len = 0usize;
        for &b in &data[idx..idx + n] {
            len = (len << 8) | b as usize;
        }
        idx += n;
        len
    };
    if idx + len > data.len() {
        return None;
    }
    Some(Tlv {
        tag,
        content: &data[idx..idx + len],
        consumed: idx + len,
    })
}

/// Reads every top-level TLV element in `data` (a SEQUENCE/SET's content, or
/// a whole DER document containing one value).
pub fn read_all(data: &[u8]) -> Vec<Tlv<'_>> {
    let mut out = Vec::new();
    let mut rest = data;
    while !rest.is_empty() {
        match read_tlv(rest) {
            Some(t) => {
                let consumed = t.consumed;
                out.push(t);
                rest = &rest[consumed..];
            }
            None => break,
        }
    }
    out
}

/// Decodes an `OBJECT IDENTIFIER`'s content bytes back into dotted form.
pub fn decode_oid(content: &[u8]) -> String {
    if content.is_empty() {
        return String::new();
    }
    let mut parts = Vec::new();
    let first = content[0] as u64;
    parts.push(first / 40);
    parts.push(first % 40);
    let mut value = 0u64;
    for &b in &content[1..] {
        value = (value << 7) | (b & 0x7f) as u64;
        if b & 0x80 == 0 {
            parts.push(value);
            value = 0;
        }
    }
    parts.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(".")
}

/// Re-encodes a decoded [`Tlv`] back into its full tag+length+content bytes,
/// e.g. to lift a nested element back out as a standalone DER value.
pub fn raw(tlv: &Tlv<'_>) -> Vec<u8> {
    let mut out = vec![tlv.tag];
    out.extend(encode_length(tlv.content.len()));
    out.extend_from_slice(tlv.content);
    out
}

/// Decodes an `INTEGER`'s content bytes into an unsigned big-endian byte
/// vector suitable for hex display (e.g. a certificate serial number).
pub fn decode_integer_bytes(content: &[u8]) -> Vec<u8> {
    let mut bytes = content;
    while bytes.len() > 1 && bytes[0] == 0 {
        bytes = &bytes[1..];
    }
    bytes.to_vec()
}
