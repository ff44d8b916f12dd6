//! Digit-insensitive string identity.
//!
//! Every ASCII digit in a string has the same advance once laid out (digits
//! are shaped as `0` and swapped at draw time), so strings that differ only in
//! their digits can share one layout. The cache key is the string with every
//! visible ASCII digit replaced by `0`. Digits that select a color in an
//! escape code are kept, since they change the layout's style changes.

use std::fmt;
use std::rc::Rc;

use crate::escape_codes::MARKER;

/// Write `s` into `buf` with every visible ASCII digit replaced by `'0'`.
///
/// `buf` is cleared first and keeps its capacity, so repeated lookups reuse
/// one allocation.
pub fn normalize_digits_into(buf: &mut String, s: &str) {
    buf.clear();
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == MARKER {
            buf.push(c);
            if let Some(code) = chars.next() {
                buf.push(code);
            }
        } else if c.is_ascii_digit() {
            buf.push('0');
        } else {
            buf.push(c);
        }
    }
}

/// Digit-normalized form of `s` in a new string.
pub fn normalize_digits(s: &str) -> String {
    let mut buf = String::with_capacity(s.len());
    normalize_digits_into(&mut buf, s);
    buf
}

/// Identity shared by every string with the same digit-normalized form.
///
/// A cached layout stays alive as long as something holds a strong reference
/// to its identity.
#[derive(Debug, PartialEq, Eq)]
pub struct StringIdentity {
    key: String,
    text: String,
}

impl StringIdentity {
    pub(crate) fn new(text: &str) -> Self {
        Self {
            key: normalize_digits(text),
            text: text.to_owned(),
        }
    }

    /// The digit-normalized cache key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Private copy of the string the layout was first built from.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Keeps one string's cached layout alive until dropped.
#[derive(Clone)]
pub struct TextHandle {
    identity: Rc<StringIdentity>,
}

impl TextHandle {
    pub(crate) fn new(identity: Rc<StringIdentity>) -> Self {
        Self { identity }
    }

    pub fn as_str(&self) -> &str {
        self.identity.text()
    }

    pub fn key(&self) -> &str {
        self.identity.key()
    }
}

impl fmt::Debug for TextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TextHandle").field(&self.identity.text).finish()
    }
}
