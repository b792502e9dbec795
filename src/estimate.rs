//! Narration runtime estimation from character counts.
//!
//! The reading rate is 725 non-whitespace characters per 120 seconds
//! (about 6.04 characters per second). All arithmetic is done on integers
//! so `ceil(n / (725 / 120))` is exact for every `n`.

/// Characters in one rate unit.
pub const RATE_CHARS: u64 = 725;
/// Seconds in one rate unit.
pub const RATE_SECS: u64 = 120;

/// Reading rate as characters per second, for display only.
pub const CHARS_PER_SECOND: f64 = RATE_CHARS as f64 / RATE_SECS as f64;

/// Whitespace as matched by the editor's character counter.
///
/// This is the ECMAScript `\s` class: the `Zs` space separators, tab,
/// the line terminators and the byte-order mark. U+0085 (NEL) is not in it.
fn is_counted_whitespace(ch: char) -> bool {
    matches!(
        ch,
        '\t' | '\n'
            | '\u{000B}'
            | '\u{000C}'
            | '\r'
            | ' '
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Number of counted characters in `text`.
///
/// Whitespace is skipped. Everything else counts in UTF-16 code units, as
/// the editor's string length does, so a character outside the Basic
/// Multilingual Plane (most emoji) counts twice.
pub fn counted_chars(text: &str) -> usize {
    text.chars()
        .filter(|ch| !is_counted_whitespace(*ch))
        .map(char::len_utf16)
        .sum()
}

/// Estimated narration time in whole seconds, rounded up.
pub fn estimate_secs(text: &str) -> u32 {
    secs_for_chars(counted_chars(text))
}

/// Estimated seconds for an already counted number of characters.
pub fn secs_for_chars(chars: usize) -> u32 {
    let scaled = chars as u64 * RATE_SECS;
    let secs = scaled.div_ceil(RATE_CHARS);
    u32::try_from(secs).unwrap_or(u32::MAX)
}

/// Approximate character budget for a target duration, rounded half up.
pub fn target_chars(target_secs: u32) -> u32 {
    let scaled = u64::from(target_secs) * RATE_CHARS;
    let chars = (scaled * 2 + RATE_SECS) / (RATE_SECS * 2);
    u32::try_from(chars).unwrap_or(u32::MAX)
}

/// Format seconds as `m:ss`.
pub fn format_time(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
