//! UTF-8 helpers for the cursor's slow path.
//!
//! Both helpers look at no more than [`UTF_MAX`] bytes and lean on
//! [`std::str::from_utf8`]: `valid_up_to` tells whether a complete character
//! starts the slice, `error_len` separates an invalid sequence (`Some`) from
//! one that is merely cut short (`None`).

/// Maximum number of bytes in a UTF-8 encoded character.
pub(crate) const UTF_MAX: usize = 4;

/// Bytes below this value are ASCII characters on their own.
pub(crate) const RUNE_SELF: u8 = 0x80;

/// Byte-order mark.
pub(crate) const BOM: char = '\u{FEFF}';

/// Reports whether `bytes` starts with a complete encoding, valid or not.
///
/// Returns `false` only for an empty slice or a prefix of a valid multi-byte
/// sequence, i.e. when more input could still change the result.
pub(crate) fn full_rune(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(UTF_MAX)];
    match std::str::from_utf8(head) {
        Ok(s) => !s.is_empty(),
        Err(err) => err.valid_up_to() > 0 || err.error_len().is_some(),
    }
}

/// Decode the first character of `bytes`.
///
/// Returns the character and its encoded width, or `None` if `bytes` does
/// not start with a valid encoding. An invalid sequence is always skipped one
/// byte at a time.
pub(crate) fn decode_rune(bytes: &[u8]) -> Option<(char, usize)> {
    let head = &bytes[..bytes.len().min(UTF_MAX)];
    let valid = match std::str::from_utf8(head) {
        Ok(s) => s,
        Err(err) => std::str::from_utf8(&head[..err.valid_up_to()]).unwrap_or_default(),
    };
    valid.chars().next().map(|ch| (ch, ch.len_utf8()))
}
