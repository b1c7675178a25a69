//! A user notice is sent when some event occurs, such as a subscription or a raid.

use super::{
  is_not_empty, parse_bool, parse_timestamp, prefix_user, raw_tags, to_datetime, Author,
  MessageParseError,
};
use crate::common::unescape_spaces;
use crate::cosmetics::CosmeticCatalog;
use crate::irc::{IrcLine, Tag};
use crate::text::{parse_emote_ranges, plain_words, segment, Token};
use chrono::{DateTime, Utc};

/// A user notice is sent when some event occurs, such as a subscription or a raid.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UserNotice {
  id: String,
  channel: String,
  timestamp: i64,
  author: Author,
  msg_id: String,
  system_message: Option<String>,
  tokens: Vec<Token>,
  add_colon: bool,
  is_first_message: bool,
  raw_tags: Vec<(String, String)>,
}

generate_getters! {
  for UserNotice as self {
    /// Unique ID of the message.
    id -> &str = self.id.as_str(),

    /// Name of the channel which received this user notice, including the `#`.
    channel -> &str = self.channel.as_str(),

    /// Milliseconds since the unix epoch at which the event occurred.
    timestamp -> i64,

    /// The time at which the event occurred.
    time -> Option<DateTime<Utc>> = to_datetime(self.timestamp),

    /// The user who caused the event.
    author -> &Author = &self.author,

    /// Kind of the event, e.g. `resub` or `raid`.
    msg_id -> &str = self.msg_id.as_str(),

    /// Human-readable description of the event.
    ///
    /// [`None`] if the description is what [`UserNotice::tokens`] shows.
    system_message -> Option<&str> = self.system_message.as_deref(),

    /// Tokens to display.
    ///
    /// This is the message the user sent along with the event, if any.
    /// Otherwise it is derived from the event's description.
    tokens -> &[Token] = &self.tokens,

    /// Whether a `:` should be rendered after the author's name.
    add_colon -> bool,

    /// Whether this is the first message the user ever sent in the channel.
    is_first_message -> bool,

    /// Decoded tags of the source line, in source order.
    raw_tags -> &[(String, String)] = &self.raw_tags,
  }
}

impl UserNotice {
  fn parse(line: &IrcLine<'_>, catalog: &CosmeticCatalog) -> Result<Self, MessageParseError> {
    let login = line
      .tag(Tag::Login)
      .filter(is_not_empty)
      .or_else(|| prefix_user(line))
      .ok_or(MessageParseError::MissingField("login"))?;
    let channel = line
      .channel()
      .ok_or(MessageParseError::MissingField("channel"))?;
    let timestamp = parse_timestamp(line);
    let msg_id = line.tag(Tag::MsgId).unwrap_or_default();

    let body = line.text().unwrap_or_default();
    let emotes = parse_emote_ranges(line.tag(Tag::Emotes).unwrap_or_default());
    let tokens = segment(body, &emotes, catalog);

    let system_message = line
      .tag(Tag::SystemMsg)
      .map(unescape_spaces)
      .map(|text| text.trim().to_owned())
      .filter(is_not_empty);

    let (tokens, system_message, add_colon) = match system_message {
      Some(system_message) if tokens.is_empty() => {
        let words = system_message.split(' ');
        // raid descriptions start with the raider's name, everything else with a verb
        let tokens = if msg_id == "raid" {
          plain_words(words)
        } else {
          plain_words(words.skip(1))
        };
        (tokens, None, false)
      }
      system_message => {
        let add_colon = !tokens.is_empty();
        (tokens, system_message, add_colon)
      }
    };

    Ok(UserNotice {
      id: line.tag(Tag::Id).unwrap_or_default().to_owned(),
      channel: channel.to_owned(),
      timestamp,
      author: Author::from_line(line, login, catalog),
      msg_id: msg_id.to_owned(),
      system_message,
      tokens,
      add_colon,
      is_first_message: line.tag(Tag::FirstMsg).is_some_and(parse_bool),
      raw_tags: raw_tags(line),
    })
  }
}

impl super::FromIrc for UserNotice {
  #[inline]
  fn from_irc(line: &IrcLine<'_>, catalog: &CosmeticCatalog) -> Result<Self, MessageParseError> {
    Self::parse(line, catalog)
  }
}

impl From<UserNotice> for super::Message {
  fn from(msg: UserNotice) -> Self {
    super::Message::UserNotice(msg)
  }
}
