//! Terminal text sanitization for server-provided strings.
//!
//! Task records come from a remote API and end up in table cells. Escape
//! sequences in them could move the cursor, rewrite the screen, or set the
//! clipboard, so they are stripped before rendering.

use std::borrow::Cow;
use std::iter::Peekable;

const ESC: char = '\x1b';
const BEL: char = '\x07';
const C1_CSI: char = '\u{009b}';

/// Sanitize text for a single-line terminal cell.
///
/// Strips ANSI escape sequences (CSI, OSC, DCS/PM/APC and two-byte forms),
/// C0/C1 controls and DEL. Newlines and tabs become single spaces.
///
/// Returns `Cow::Borrowed` when nothing needs to change.
#[must_use]
pub fn sanitize_terminal_text(input: &str) -> Cow<'_, str> {
    if !input.chars().any(needs_attention) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ESC => skip_escape_sequence(&mut chars),
            C1_CSI => skip_csi_params(&mut chars),
            '\n' | '\t' | '\r' => {
                if !out.ends_with(' ') {
                    out.push(' ');
                }
            }
            c if is_control(c) => {}
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn needs_attention(c: char) -> bool {
    c == ESC || is_control(c)
}

fn is_control(c: char) -> bool {
    c <= '\x1f' || c == '\x7f' || ('\u{0080}'..='\u{009f}').contains(&c)
}

fn skip_escape_sequence<I: Iterator<Item = char>>(chars: &mut Peekable<I>) {
    let Some(&next) = chars.peek() else {
        return;
    };
    match next {
        '[' => {
            chars.next();
            skip_csi_params(chars);
        }
        ']' => {
            chars.next();
            skip_string_sequence(chars, true);
        }
        'P' | '^' | '_' => {
            chars.next();
            skip_string_sequence(chars, false);
        }
        '(' | ')' | '*' | '+' | '#' | ' ' => {
            chars.next();
            chars.next();
        }
        '7' | '8' | 'c' | 'D' | 'E' | 'H' | 'M' | 'N' | 'O' | 'Z' | '=' | '>' | '<' => {
            chars.next();
        }
        _ => {}
    }
}

/// Parameter and intermediate bytes, then one final byte in `0x40..=0x7e`.
fn skip_csi_params<I: Iterator<Item = char>>(chars: &mut Peekable<I>) {
    while let Some(&c) = chars.peek() {
        if ('\x40'..='\x7e').contains(&c) {
            chars.next();
            return;
        }
        if !('\x20'..='\x3f').contains(&c) {
            return;
        }
        chars.next();
    }
}

/// Runs to ST (`ESC \`), or to BEL when `bel_terminates`.
fn skip_string_sequence<I: Iterator<Item = char>>(chars: &mut Peekable<I>, bel_terminates: bool) {
    while let Some(c) = chars.next() {
        if bel_terminates && c == BEL {
            return;
        }
        if c == ESC && chars.peek() == Some(&'\\') {
            chars.next();
            return;
        }
    }
}
