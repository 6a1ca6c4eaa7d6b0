//! Terminal text sanitization.
//!
//! User-typed text is echoed back inside fallback responses and rendered in
//! the transcript. Terminal emulators interpret escape sequences that can
//! rewrite displayed content or alter terminal state, so anything that came
//! from outside the program is stripped of control characters before it
//! enters a display payload.

use std::borrow::Cow;

const ESC: char = '\x1b';

/// Strip ANSI escape sequences and disallowed control characters.
///
/// Removes CSI/OSC sequences, C0 controls other than `\n` and `\t`, C1
/// controls, and DEL. Returns `Cow::Borrowed` when the input is already
/// clean, which is the common case for typed text.
#[must_use]
pub fn sanitize_terminal_text(input: &str) -> Cow<'_, str> {
    if !input.chars().any(needs_stripping) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ESC {
            skip_escape_sequence(&mut chars);
        } else if !needs_stripping(c) {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

fn needs_stripping(c: char) -> bool {
    let allowed_control = matches!(c, '\n' | '\t');
    (c.is_control() && !allowed_control) || ('\u{0080}'..='\u{009f}').contains(&c)
}

/// Consume the remainder of an escape sequence after ESC.
fn skip_escape_sequence<I: Iterator<Item = char>>(chars: &mut std::iter::Peekable<I>) {
    match chars.peek() {
        // CSI: parameters then a final byte in 0x40..=0x7E
        Some('[') => {
            chars.next();
            for c in chars.by_ref() {
                if ('\u{40}'..='\u{7e}').contains(&c) {
                    break;
                }
            }
        }
        // OSC: terminated by BEL or ST (ESC \)
        Some(']') => {
            chars.next();
            while let Some(c) = chars.next() {
                if c == '\x07' {
                    break;
                }
                if c == ESC && chars.peek() == Some(&'\\') {
                    chars.next();
                    break;
                }
            }
        }
        // Two-character sequences (ESC c, ESC 7, ...)
        Some(_) => {
            chars.next();
        }
        None => {}
    }
}
