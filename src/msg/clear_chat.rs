//! Sent when a user is timed out or banned.

use super::{
  is_not_empty, parse_numeric_tag, parse_timestamp, raw_tags, to_datetime, MessageParseError,
};
use crate::cosmetics::CosmeticCatalog;
use crate::irc::{IrcLine, Tag};
use crate::text::{plain_words, Token};
use chrono::{DateTime, Utc};

/// Sent when a user is timed out or banned.
///
/// Clears of the whole chat are not represented.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ClearChat {
  id: String,
  channel: String,
  timestamp: i64,
  target: String,
  ban_duration: Option<u64>,
  tokens: Vec<Token>,
  raw_tags: Vec<(String, String)>,
}

generate_getters! {
  for ClearChat as self {
    /// ID of the event.
    ///
    /// Twitch does not give these an ID, so this is the time at which the relay received it.
    id -> &str = self.id.as_str(),

    /// Name of the channel in which the user was punished, including the `#`.
    channel -> &str = self.channel.as_str(),

    /// Milliseconds since the unix epoch at which the user was punished.
    timestamp -> i64,

    /// The time at which the user was punished.
    time -> Option<DateTime<Utc>> = to_datetime(self.timestamp),

    /// Login of the user who was punished.
    target -> &str = self.target.as_str(),

    /// Duration of the timeout in seconds.
    ///
    /// [`None`] if the user was banned.
    ban_duration -> Option<u64>,

    /// Whether the user was permanently banned.
    is_ban -> bool = self.ban_duration.is_none(),

    /// A description of the event, one token per word.
    tokens -> &[Token] = &self.tokens,

    /// Decoded tags of the source line, in source order.
    raw_tags -> &[(String, String)] = &self.raw_tags,
  }
}

impl ClearChat {
  fn parse(line: &IrcLine<'_>) -> Result<Self, MessageParseError> {
    let channel = line
      .channel()
      .ok_or(MessageParseError::MissingField("channel"))?;
    let target = line
      .text()
      .filter(is_not_empty)
      .ok_or(MessageParseError::MissingField("target"))?;
    let timestamp = parse_timestamp(line);

    let ban_duration = parse_numeric_tag::<u64>(line, Tag::BanDuration);

    let text = match ban_duration {
      Some(duration) => format!("{target} has been timed out for {duration} seconds"),
      None => format!("{target} has been banned"),
    };

    Ok(ClearChat {
      id: line.tag(Tag::RmReceivedTs).unwrap_or_default().to_owned(),
      channel: channel.to_owned(),
      timestamp,
      target: target.to_owned(),
      ban_duration,
      tokens: plain_words(text.split(' ')),
      raw_tags: raw_tags(line),
    })
  }
}

impl super::FromIrc for ClearChat {
  #[inline]
  fn from_irc(line: &IrcLine<'_>, _: &CosmeticCatalog) -> Result<Self, MessageParseError> {
    Self::parse(line)
  }
}

impl From<ClearChat> for super::Message {
  fn from(msg: ClearChat) -> Self {
    super::Message::ClearChat(msg)
  }
}
