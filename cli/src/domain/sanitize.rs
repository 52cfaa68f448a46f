//! Output sanitizer for `wsl.exe`.
//!
//! `wsl.exe` writes UTF-16LE with a BOM for its own messages and plain bytes
//! for commands run inside a distribution. Keeping printable ASCII plus
//! line-feed turns both into parseable text; localized messages are lost.

/// Keep only bytes in `32..=126` and `\n`.
#[must_use]
pub fn sanitize(raw: &[u8]) -> String {
    raw.iter()
        .copied()
        .filter(|b| is_kept(*b))
        .map(char::from)
        .collect()
}

fn is_kept(b: u8) -> bool {
    (32..=126).contains(&b) || b == b'\n'
}
