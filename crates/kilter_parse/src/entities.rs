//! Entity and character reference decoding.

use std::borrow::Cow;

use crate::ParseError;

/// Decode references in `raw`, which starts at byte `offset` of the source.
pub(crate) fn decode(raw: &str, offset: usize) -> Result<Cow<'_, str>, ParseError> {
    let Some(first) = memchr::memchr(b'&', raw.as_bytes()) else {
        return Ok(Cow::Borrowed(raw));
    };

    let mut out = String::with_capacity(raw.len());
    out.push_str(&raw[..first]);
    let mut rest = &raw[first..];
    let mut at = offset + first;

    while let Some(amp) = memchr::memchr(b'&', rest.as_bytes()) {
        out.push_str(&rest[..amp]);
        at += amp;
        rest = &rest[amp + 1..];
        let Some(semi) = memchr::memchr(b';', rest.as_bytes()) else {
            return Err(ParseError::Unterminated {
                offset: at,
                construct: "entity reference",
            });
        };
        let name = &rest[..semi];
        out.push(resolve(name, at)?);
        rest = &rest[semi + 1..];
        at += name.len() + 2;
    }
    out.push_str(rest);
    Ok(Cow::Owned(out))
}

fn resolve(name: &str, offset: usize) -> Result<char, ParseError> {
    match name {
        "amp" => return Ok('&'),
        "lt" => return Ok('<'),
        "gt" => return Ok('>'),
        "quot" => return Ok('"'),
        "apos" => return Ok('\''),
        _ => {}
    }

    let Some(number) = name.strip_prefix('#') else {
        return Err(ParseError::UnknownEntity {
            offset,
            name: name.to_string(),
        });
    };
    let code = match number.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => number.parse::<u32>(),
    };
    code.ok()
        .filter(|&c| c != 0)
        .and_then(char::from_u32)
        .ok_or_else(|| ParseError::InvalidCharacterReference {
            offset,
            reference: name.to_string(),
        })
}
