use std::borrow::Cow;
use std::fmt::{Debug, Display};

use crate::common::maybe_percent_decode;

macro_rules! tags_def {
  (
    $tag:ident;
    $($(#[$meta:meta])* $key:literal = $name:ident),* $(,)?
  ) => {
    /// A tag key.
    #[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
    #[non_exhaustive]
    pub enum $tag<'src> {
      $(
        $(#[$meta])*
        $name,
      )*
      Unknown(&'src str),
    }

    impl<'src> $tag<'src> {
      #[doc = concat!("Get the string value of the [`", stringify!($tag), "`].")]
      #[inline]
      pub fn as_str(&self) -> &'src str {
        match self {
          $(Self::$name => $key,)*
          Self::Unknown(key) => key,
        }
      }

      #[doc = concat!("Parse a [`", stringify!($tag), "`] from a string.")]
      #[inline]
      pub fn parse(src: &'src str) -> Self {
        match src {
          $($key => Self::$name,)*
          _ => Self::Unknown(src),
        }
      }
    }
  }
}

impl<'src> From<&'src str> for Tag<'src> {
  fn from(value: &'src str) -> Self {
    Tag::parse(value)
  }
}

tags_def! {
  Tag;
  "id" = Id,
  "msg-id" = MsgId,
  "login" = Login,
  "display-name" = DisplayName,
  "color" = Color,
  "badges" = Badges,
  "badge-info" = BadgeInfo,
  "emotes" = Emotes,
  "first-msg" = FirstMsg,
  "tmi-sent-ts" = TmiSentTs,

  /// Time at which the relay received the line.
  ///
  /// `CLEARCHAT` has no `id` tag, so this is used to identify it instead.
  "rm-received-ts" = RmReceivedTs,

  /// ID of the message the user replied to.
  "reply-parent-msg-id" = ReplyParentMsgId,
  "reply-parent-msg-body" = ReplyParentMsgBody,
  "reply-parent-user-login" = ReplyParentUserLogin,

  /// Human-readable description of a `USERNOTICE` event, with spaces escaped as `\s`.
  "system-msg" = SystemMsg,

  /// Duration of a timeout, in seconds. Absent for permanent bans.
  "ban-duration" = BanDuration,
}

impl<'src> Display for Tag<'src> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Decoded tags of a single line, in source order.
///
/// If a key appears more than once, the last occurrence wins.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Tags<'src>(Vec<(&'src str, Cow<'src, str>)>);

impl<'src> Tags<'src> {
  /// Parse the content of a tag block, without the leading `@`.
  ///
  /// `key=value;key=value;key`
  ///
  /// Values are percent-decoded. If decoding fails, the raw value is kept.
  pub fn parse(src: &'src str) -> Self {
    Tags(
      src
        .split(';')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
          Some((key, value)) => (key, maybe_percent_decode(value)),
          None => (pair, Cow::Borrowed("")),
        })
        .collect(),
    )
  }

  /// Retrieve the value of `tag`.
  pub fn get<'a>(&self, tag: impl Into<Tag<'a>>) -> Option<&str> {
    let tag = tag.into();
    self
      .0
      .iter()
      .rev()
      .find(|(key, _)| *key == tag.as_str())
      .map(|(_, value)| &**value)
  }

  /// Iterate over `(key, value)` pairs in source order.
  pub fn iter(&self) -> impl Iterator<Item = (&'src str, &str)> + '_ {
    self.0.iter().map(|(key, value)| (*key, &**value))
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl<'src> Debug for Tags<'src> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_map().entries(self.iter()).finish()
  }
}
