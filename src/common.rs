//! Random types and utilties used by the library.

use std::borrow::Cow;
use std::fmt::Debug;

/// This type is like a [`Range`][std::ops::Range],
/// only smaller, and also implements `Copy`.
///
/// Spans produced by the [text segmenter][crate::text] count
/// unicode codepoints, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Span {
  /// The start index, inclusive.
  pub start: u32,

  /// The end index, exclusive.
  pub end: u32,
}

impl Span {
  /// Number of codepoints covered by this span.
  #[inline]
  pub fn len(&self) -> usize {
    (self.end - self.start) as usize
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.start == self.end
  }
}

impl From<std::ops::Range<usize>> for Span {
  #[inline]
  fn from(value: std::ops::Range<usize>) -> Self {
    Span {
      start: value.start as u32,
      end: value.end as u32,
    }
  }
}

impl From<Span> for std::ops::Range<usize> {
  #[inline]
  fn from(value: Span) -> Self {
    value.start as usize..value.end as usize
  }
}

/// A `%XX` escape sequence was truncated, not hex,
/// or the decoded bytes were not valid UTF-8.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeError;

impl std::fmt::Display for DecodeError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str("malformed percent-encoding")
  }
}

impl std::error::Error for DecodeError {}

/// Percent-decode `value`.
///
/// Only `%XX` sequences are decoded, `+` is left alone.
/// If there is nothing to decode, the original `value` is borrowed.
pub fn percent_decode(value: &str) -> Result<Cow<'_, str>, DecodeError> {
  let Some(start) = value.find('%') else {
    return Ok(Cow::Borrowed(value));
  };

  let bytes = value.as_bytes();
  let mut out = Vec::with_capacity(value.len());
  out.extend_from_slice(&bytes[..start]);

  let mut i = start;
  while i < bytes.len() {
    if bytes[i] == b'%' {
      let hi = bytes.get(i + 1).copied().and_then(hex_digit);
      let lo = bytes.get(i + 2).copied().and_then(hex_digit);
      let (Some(hi), Some(lo)) = (hi, lo) else {
        return Err(DecodeError);
      };
      out.push(hi << 4 | lo);
      i += 3;
    } else {
      out.push(bytes[i]);
      i += 1;
    }
  }

  String::from_utf8(out)
    .map(Cow::Owned)
    .map_err(|_| DecodeError)
}

/// Percent-decode `value`, falling back to the raw `value` if it is malformed.
#[inline]
pub fn maybe_percent_decode(value: &str) -> Cow<'_, str> {
  percent_decode(value).unwrap_or(Cow::Borrowed(value))
}

#[inline]
fn hex_digit(b: u8) -> Option<u8> {
  (b as char).to_digit(16).map(|d| d as u8)
}

/// Replace literal `\s` sequences with a space.
///
/// Twitch escapes spaces this way in tags such as `system-msg`
/// and `reply-parent-msg-body`.
pub fn unescape_spaces<'a>(value: impl Into<Cow<'a, str>>) -> Cow<'a, str> {
  let value: Cow<'_, str> = value.into();
  if value.contains("\\s") {
    Cow::Owned(value.replace("\\s", " "))
  } else {
    value
  }
}

/// The name to display for a user.
///
/// This is just `display_name` if it only differs from `login` by case,
/// otherwise both are shown: `display_name (login)`.
pub fn best_name(display_name: &str, login: &str) -> String {
  if display_name.to_lowercase() == login {
    display_name.to_owned()
  } else {
    format!("{display_name} ({login})")
  }
}

/// Number of unicode codepoints in `s`.
#[inline]
pub fn char_len(s: &str) -> usize {
  s.chars().count()
}
