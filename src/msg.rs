//! ## Chat history message types
//!
//! The entrypoint to this module is [`parse_batch`], which turns
//! the raw lines returned by a recent-messages relay into [`Message`]s.
//!
//! ```rust
//! use tmi_history::{parse_batch, CosmeticCatalog, Message};
//!
//! let lines = [
//!   "@badge-info=;badges=;color=#0000FF;display-name=JuN1oRRRR;emotes=;id=e9d998c3-36f1-430f-89ec-6b887c28af36;tmi-sent-ts=1594545155039 :jun1orrrr!jun1orrrr@jun1orrrr.tmi.twitch.tv PRIVMSG #pajlada :dank cam",
//!   ":tmi.twitch.tv ROOMSTATE #pajlada",
//! ];
//! let messages = parse_batch(lines, &CosmeticCatalog::empty());
//!
//! assert_eq!(messages.len(), 1);
//! let Message::Privmsg(msg) = &messages[0] else { unreachable!() };
//! assert_eq!(msg.author().best_name(), "JuN1oRRRR");
//! assert_eq!(messages[0].plain_text(), "dank cam");
//! ```

#[macro_use]
pub(crate) mod macros;

use crate::common::{best_name, unescape_spaces};
use crate::cosmetics::CosmeticCatalog;
use crate::irc::{Command, IrcLine, Tag};
use crate::text::Token;
use chrono::{DateTime, Utc};
use smallvec::SmallVec;

/// Name color used when a user has not picked one.
pub const FALLBACK_COLOR: &str = "#808080";

/// Implemented for types which may be built from a tokenized [`IrcLine`].
pub trait FromIrc: Sized + private::Sealed {
  /// Attempt to build `Self` from an [`IrcLine`], resolving cosmetics from `catalog`.
  fn from_irc(line: &IrcLine<'_>, catalog: &CosmeticCatalog) -> Result<Self, MessageParseError>;
}

/// A fully parsed chat history entry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
  feature = "serde",
  derive(serde::Serialize),
  serde(tag = "type", rename_all = "UPPERCASE")
)]
pub enum Message {
  Privmsg(Privmsg),
  UserNotice(UserNotice),
  ClearChat(ClearChat),
}

impl Message {
  /// Attempt to parse a message from a single raw line.
  ///
  /// This is shorthand for [`IrcLine::parse`] followed by [`Message::from_irc`].
  pub fn parse(src: &str, catalog: &CosmeticCatalog) -> Result<Self, MessageParseError> {
    IrcLine::parse(src)
      .ok_or(MessageParseError::Unparseable)
      .and_then(|line| Message::from_irc(&line, catalog))
  }

  /// Unique ID of the message.
  pub fn id(&self) -> &str {
    match self {
      Message::Privmsg(msg) => msg.id(),
      Message::UserNotice(msg) => msg.id(),
      Message::ClearChat(msg) => msg.id(),
    }
  }

  /// Milliseconds since the unix epoch at which the message was sent.
  pub fn timestamp(&self) -> i64 {
    match self {
      Message::Privmsg(msg) => msg.timestamp(),
      Message::UserNotice(msg) => msg.timestamp(),
      Message::ClearChat(msg) => msg.timestamp(),
    }
  }

  /// The time at which the message was sent.
  pub fn time(&self) -> Option<DateTime<Utc>> {
    to_datetime(self.timestamp())
  }

  /// The user who sent the message.
  ///
  /// [`None`] for moderation events, which have no author.
  pub fn author(&self) -> Option<&Author> {
    match self {
      Message::Privmsg(msg) => Some(msg.author()),
      Message::UserNotice(msg) => Some(msg.author()),
      Message::ClearChat(_) => None,
    }
  }

  /// Tokens to render, in order.
  pub fn tokens(&self) -> &[Token] {
    match self {
      Message::Privmsg(msg) => msg.tokens(),
      Message::UserNotice(msg) => msg.tokens(),
      Message::ClearChat(msg) => msg.tokens(),
    }
  }

  /// The content of all tokens, separated by single spaces.
  pub fn plain_text(&self) -> String {
    join_tokens(self.tokens())
  }

  /// Whether a `:` should be rendered after the author's name.
  pub fn add_colon(&self) -> bool {
    match self {
      Message::Privmsg(msg) => msg.add_colon(),
      Message::UserNotice(msg) => msg.add_colon(),
      Message::ClearChat(_) => false,
    }
  }

  /// Whether this is the first message the author ever sent in the channel.
  pub fn is_first_message(&self) -> bool {
    match self {
      Message::Privmsg(msg) => msg.is_first_message(),
      Message::UserNotice(msg) => msg.is_first_message(),
      Message::ClearChat(_) => false,
    }
  }

  /// Decoded tags of the source line, in source order.
  pub fn raw_tags(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
    let tags = match self {
      Message::Privmsg(msg) => msg.raw_tags(),
      Message::UserNotice(msg) => msg.raw_tags(),
      Message::ClearChat(msg) => msg.raw_tags(),
    };
    tags.iter().map(|(key, value)| (key.as_str(), value.as_str()))
  }
}

impl FromIrc for Message {
  fn from_irc(line: &IrcLine<'_>, catalog: &CosmeticCatalog) -> Result<Self, MessageParseError> {
    use Command as C;
    Ok(match line.command() {
      C::Privmsg => Privmsg::from_irc(line, catalog)?.into(),
      C::UserNotice => UserNotice::from_irc(line, catalog)?.into(),
      C::ClearChat => ClearChat::from_irc(line, catalog)?.into(),
      C::Other(command) => return Err(MessageParseError::UnknownCommand(command.into())),
    })
  }
}

/// Parse a batch of raw lines.
///
/// Lines which fail to parse are left out, the rest keep their relative order.
/// Unknown commands are reported at `WARN` level. Other failures are expected
/// noise and not reported.
pub fn parse_batch<I, S>(lines: I, catalog: &CosmeticCatalog) -> Vec<Message>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  lines
    .into_iter()
    .filter_map(|line| {
      let line = line.as_ref();
      match Message::parse(line, catalog) {
        Ok(message) => Some(message),
        Err(e) => {
          report(line, &e);
          None
        }
      }
    })
    .collect()
}

fn report(line: &str, error: &MessageParseError) {
  use MessageParseError as E;
  match error {
    E::Unparseable | E::MissingField(_) => {}
    E::UnknownCommand(command) => warn!(raw = line, "unhandled message type: {command}"),
  }
}

/// Failed to parse a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessageParseError {
  /// The line does not have the shape of an IRC line.
  Unparseable,

  /// The line's command does not produce a chat history entry.
  UnknownCommand(String),

  /// Something the message cannot exist without is missing,
  /// such as the sender's login or the channel.
  MissingField(&'static str),
}

impl std::fmt::Display for MessageParseError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Unparseable => f.write_str("failed to parse message"),
      Self::UnknownCommand(command) => write!(f, "unhandled message type: {command}"),
      Self::MissingField(field) => write!(f, "missing {field}"),
    }
  }
}

impl std::error::Error for MessageParseError {}

/// A chat badge, resolved from the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Badge {
  name: String,
  version: String,
  title: String,
  url: String,
}

generate_getters! {
  for Badge as self {
    /// Name of the badge set, e.g. `subscriber`.
    name -> &str = self.name.as_str(),

    /// Version of the badge.
    version -> &str = self.version.as_str(),

    /// Title to display, e.g. `Subscriber (22 months)`.
    title -> &str = self.title.as_str(),

    /// Image URL.
    url -> &str = self.url.as_str(),
  }
}

/// The user who sent a message.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Author {
  login: String,
  display_name: String,
  best_name: String,
  color: String,
  badges: Vec<Badge>,
}

generate_getters! {
  for Author as self {
    /// Login of the user. Always lowercase ASCII.
    login -> &str = self.login.as_str(),

    /// Display name.
    ///
    /// This is the name which appears in chat, and may contain arbitrary unicode characters.
    /// This is in contrast to [`Author::login`] which is always only ASCII.
    display_name -> &str = self.display_name.as_str(),

    /// [`Author::display_name`], followed by the login in parentheses
    /// if they differ by more than case.
    best_name -> &str = self.best_name.as_str(),

    /// The user's selected name color, or [`FALLBACK_COLOR`].
    color -> &str = self.color.as_str(),

    /// Badges enabled by the user which were found in the catalog.
    badges -> &[Badge] = &self.badges,
  }
}

impl Author {
  fn from_line(line: &IrcLine<'_>, login: &str, catalog: &CosmeticCatalog) -> Self {
    let display_name = line
      .tag(Tag::DisplayName)
      .map(unescape_spaces)
      .map(|name| name.trim().to_owned())
      .filter(is_not_empty)
      .unwrap_or_else(|| login.to_owned());
    Author {
      login: login.to_owned(),
      best_name: best_name(&display_name, login),
      display_name,
      color: line
        .tag(Tag::Color)
        .filter(is_not_empty)
        .unwrap_or(FALLBACK_COLOR)
        .to_owned(),
      badges: parse_badges(
        line.tag(Tag::Badges).unwrap_or_default(),
        line.tag(Tag::BadgeInfo).unwrap_or_default(),
        catalog,
      ),
    }
  }
}

fn is_not_empty<T: AsRef<str>>(s: &T) -> bool {
  !s.as_ref().is_empty()
}

fn to_datetime(ms: i64) -> Option<DateTime<Utc>> {
  use chrono::TimeZone;
  Utc.timestamp_millis_opt(ms).single()
}

/// A tag holding an integer.
///
/// Malformed values are reported at `ERROR` level and treated as absent.
fn parse_numeric_tag<T: std::str::FromStr>(line: &IrcLine<'_>, tag: Tag<'_>) -> Option<T> {
  let value = line.tag(tag.clone()).filter(is_not_empty)?;
  match value.parse() {
    Ok(n) => Some(n),
    Err(_) => {
      error!(
        raw = line.raw(),
        tag = tag.as_str(),
        value,
        "malformed numeric tag, ignoring it"
      );
      None
    }
  }
}

/// `tmi-sent-ts`, defaulting to `0` when absent or malformed.
fn parse_timestamp(line: &IrcLine<'_>) -> i64 {
  parse_numeric_tag(line, Tag::TmiSentTs).unwrap_or(0)
}

/// Strip the CTCP `ACTION` wrapper used by `/me` messages.
fn parse_message_text(input: &str) -> (&str, bool) {
  let Some(s) = input.strip_prefix("\u{0001}ACTION ") else {
    return (input, false);
  };
  let Some(s) = s.strip_suffix('\u{0001}') else {
    return (input, false);
  };
  (s.trim(), true)
}

fn parse_bool(v: &str) -> bool {
  v.parse::<u8>().ok().map(|n| n > 0).unwrap_or(false)
}

fn raw_tags(line: &IrcLine<'_>) -> Vec<(String, String)> {
  line
    .tags()
    .iter()
    .map(|(key, value)| (key.to_owned(), value.to_owned()))
    .collect()
}

/// Extract `login` from a `nick!login@host` prefix.
fn prefix_user<'src>(line: &IrcLine<'src>) -> Option<&'src str> {
  line
    .prefix()
    .and_then(|prefix| prefix.user)
    .filter(is_not_empty)
}

fn join_tokens(tokens: &[Token]) -> String {
  let mut out = String::new();
  for (i, token) in tokens.iter().enumerate() {
    if i > 0 {
      out.push(' ');
    }
    out.push_str(token.content());
  }
  out
}

const MONTHS_BADGES: [&str; 2] = ["subscriber", "founder"];

/// Resolve `badges` against the `catalog`.
///
/// Badges which are not in the catalog are skipped.
/// Subscriber and founder badges get the month count from `badge_info` appended to their title.
fn parse_badges(badges: &str, badge_info: &str, catalog: &CosmeticCatalog) -> Vec<Badge> {
  if badges.is_empty() {
    return Vec::new();
  }

  let badge_info = badge_info
    .split(',')
    .flat_map(|info| info.split_once('/'))
    .collect::<SmallVec<[_; 4]>>();

  badges
    .split(',')
    .flat_map(|badge| badge.split_once('/'))
    .filter_map(|(name, version)| {
      let asset = catalog.badge(name, version)?;

      let months = MONTHS_BADGES
        .contains(&name)
        .then(|| {
          badge_info
            .iter()
            .find(|(needle, _)| *needle == name)
            .and_then(|(_, months)| months.parse::<u64>().ok())
        })
        .flatten()
        .filter(|months| *months > 1);

      let title = match months {
        Some(months) => format!("{} ({months} months)", asset.title),
        None => asset.title.clone(),
      };

      Some(Badge {
        name: name.to_owned(),
        version: version.to_owned(),
        title,
        url: asset.url.clone(),
      })
    })
    .collect()
}

pub mod clear_chat;
pub use clear_chat::*;
pub mod privmsg;
pub use privmsg::*;
pub mod user_notice;
pub use user_notice::*;

mod private {
  pub trait Sealed {}
}
impl private::Sealed for ClearChat {}
impl private::Sealed for Privmsg {}
impl private::Sealed for UserNotice {}
impl private::Sealed for Message {}

static_assert_send!(Message);
static_assert_sync!(Message);
