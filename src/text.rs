//! ## Text segmenter
//!
//! Splits a message body into [`Token`]s which can be rendered directly.
//!
//! Words are separated by single spaces. Each word becomes, in order of precedence:
//! 1. A Twitch emote, if one of the ranges in the `emotes` tag starts at the word.
//! 2. A third-party emote, if the [`CosmeticCatalog`] knows the word.
//! 3. A link, if the word starts with `http://` or `https://`.
//! 4. Plain text.

use crate::common::{char_len, Span};
use crate::cosmetics::CosmeticCatalog;
use smallvec::SmallVec;

/// One classified fragment of a message body.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
  feature = "serde",
  derive(serde::Serialize),
  serde(tag = "type", rename_all = "lowercase")
)]
pub enum Token {
  Text {
    content: String,
  },
  Link {
    content: String,
    url: String,
  },
  Emote {
    /// The word which was replaced by the emote.
    content: String,
    id: String,
    url: String,
    #[cfg_attr(feature = "serde", serde(rename = "aspectRatio"))]
    aspect_ratio: f32,
  },
}

impl Token {
  pub fn text(content: impl Into<String>) -> Self {
    Token::Text {
      content: content.into(),
    }
  }

  /// The source text of this token.
  pub fn content(&self) -> &str {
    match self {
      Token::Text { content } | Token::Link { content, .. } | Token::Emote { content, .. } => content,
    }
  }

  #[inline]
  pub fn is_text(&self) -> bool {
    matches!(self, Self::Text { .. })
  }

  #[inline]
  pub fn is_link(&self) -> bool {
    matches!(self, Self::Link { .. })
  }

  #[inline]
  pub fn is_emote(&self) -> bool {
    matches!(self, Self::Emote { .. })
  }
}

/// A Twitch emote occurrence, from the `emotes` tag.
///
/// `start` and `end` are inclusive codepoint offsets into the message body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmoteRange<'src> {
  pub id: &'src str,
  pub start: usize,
  pub end: usize,
}

/// Twitch emote occurrences of a single message.
pub type EmoteRanges<'src> = SmallVec<[EmoteRange<'src>; 8]>;

/// Parse the `emotes` tag.
///
/// `id:start-end,start-end/id:start-end`
///
/// Malformed entries are skipped.
pub fn parse_emote_ranges(tag: &str) -> EmoteRanges<'_> {
  tag
    .split('/')
    .filter_map(|emote| emote.split_once(':'))
    .flat_map(|(id, ranges)| {
      ranges.split(',').filter_map(move |range| {
        let (start, end) = range.split_once('-')?;
        Some(EmoteRange {
          id,
          start: start.parse().ok()?,
          end: end.parse().ok()?,
        })
      })
    })
    .filter(|range| !range.id.is_empty())
    .collect()
}

/// Image URL of a Twitch emote.
pub fn twitch_emote_url(id: &str) -> String {
  format!("https://static-cdn.jtvnw.net/emoticons/v2/{id}/default/dark/3.0")
}

/// Segment `body` into tokens.
pub fn segment(body: &str, emotes: &[EmoteRange<'_>], catalog: &CosmeticCatalog) -> Vec<Token> {
  segment_spans(body, emotes, catalog)
    .into_iter()
    .map(|(_, token)| token)
    .collect()
}

/// Segment `body` into tokens, each paired with the codepoint [`Span`] it covers.
///
/// Empty words (from consecutive, leading or trailing spaces) produce no token,
/// but still advance the position by one.
pub fn segment_spans(
  body: &str,
  emotes: &[EmoteRange<'_>],
  catalog: &CosmeticCatalog,
) -> Vec<(Span, Token)> {
  if body.is_empty() {
    return Vec::new();
  }

  let (_, tokens) = body
    .split(' ')
    .fold((0usize, Vec::new()), |(index, mut tokens), word| {
      let len = char_len(word);
      if !word.is_empty() {
        let span = Span::from(index..index + len);
        tokens.push((span, classify(word, index, emotes, catalog)));
      }
      (index + len + 1, tokens)
    });

  tokens
}

fn classify(word: &str, index: usize, emotes: &[EmoteRange<'_>], catalog: &CosmeticCatalog) -> Token {
  if let Some(emote) = emotes.iter().find(|emote| emote.start == index) {
    return Token::Emote {
      content: word.to_owned(),
      id: emote.id.to_owned(),
      url: twitch_emote_url(emote.id),
      aspect_ratio: 1.0,
    };
  }

  if let Some((_, emote)) = catalog.emote(word) {
    return Token::Emote {
      content: word.to_owned(),
      id: emote.id.clone(),
      url: emote.url.clone(),
      aspect_ratio: emote.aspect_ratio.unwrap_or(1.0),
    };
  }

  if word.starts_with("http://") || word.starts_with("https://") {
    return Token::Link {
      content: word.to_owned(),
      url: word.to_owned(),
    };
  }

  Token::text(word)
}

/// Split `text` on spaces into plain text tokens.
pub(crate) fn plain_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Vec<Token> {
  words
    .into_iter()
    .filter(|word| !word.is_empty())
    .map(Token::text)
    .collect()
}
