//! ## Twitch IRC line tokenizer
//!
//! The entrypoint to this module is [`IrcLine`].
//!
//! ```rust
//! let line = tmi_history::IrcLine::parse(
//!   "@color=#0000FF;display-name=JuN1oRRRR :jun1orrrr!jun1orrrr@jun1orrrr.tmi.twitch.tv PRIVMSG #pajlada :dank cam",
//! )
//! .unwrap();
//! assert_eq!(line.command(), tmi_history::Command::Privmsg);
//! assert_eq!(line.tag(tmi_history::Tag::Color), Some("#0000FF"));
//! assert_eq!(line.text(), Some("dank cam"));
//! ```
//!
//! ⚠ This tokenizer is _not_ compliant with the IRCv3 spec!
//! It only handles the shape of lines stored by recent-messages relays.

mod command;
mod prefix;
mod tags;

pub use command::Command;
pub use prefix::Prefix;
pub use tags::{Tag, Tags};

use std::fmt::Debug;

/// A single tokenized IRC line.
///
/// This references the original string instead of owning it.
/// Tag values are only copied if they had to be percent-decoded.
#[derive(Clone)]
pub struct IrcLine<'src> {
  src: &'src str,
  tags: Tags<'src>,
  prefix: Option<&'src str>,
  command: Command<'src>,
  rest: &'src str,
}

impl<'src> IrcLine<'src> {
  /// Tokenize a single line.
  ///
  /// The grammar is `(@TAGS )?(:PREFIX )?COMMAND REST`.
  /// Returns [`None`] if the line does not match it.
  pub fn parse(src: &'src str) -> Option<Self> {
    let src = src.trim_end_matches(&['\r', '\n'][..]);
    if src.chars().nth(3).is_none() {
      return None;
    }

    let (tags, remainder) = match src.strip_prefix('@') {
      Some(s) => {
        let (tags, remainder) = s.split_once(' ')?;
        if tags.is_empty() {
          return None;
        }
        (Tags::parse(tags), remainder)
      }
      None => (Tags::default(), src),
    };

    let (prefix, remainder) = match remainder.strip_prefix(':') {
      Some(s) => {
        let (prefix, remainder) = s.split_once(' ')?;
        if prefix.is_empty() {
          return None;
        }
        (Some(prefix), remainder)
      }
      None => (None, remainder),
    };

    let (command, rest) = command::parse(remainder)?;

    Some(Self {
      src,
      tags,
      prefix,
      command,
      rest,
    })
  }

  /// Get the string from which this line was parsed.
  pub fn raw(&self) -> &'src str {
    self.src
  }

  /// Get the decoded tags.
  pub fn tags(&self) -> &Tags<'src> {
    &self.tags
  }

  /// Retrieve the value of `tag`.
  ///
  /// `tag` can be provided as a variant of the [`Tag`] enum,
  /// or as the stringified kebab-case tag name.
  pub fn tag<'a>(&self, tag: impl Into<Tag<'a>>) -> Option<&str> {
    self.tags.get(tag)
  }

  /// Get the raw prefix, without the leading `:`.
  pub fn raw_prefix(&self) -> Option<&'src str> {
    self.prefix
  }

  /// Get the parsed [`Prefix`].
  pub fn prefix(&self) -> Option<Prefix<'src>> {
    self.prefix.map(Prefix::parse)
  }

  /// Get the line's [`Command`].
  pub fn command(&self) -> Command<'src> {
    self.command
  }

  /// Everything after the command.
  ///
  /// This may be empty.
  pub fn rest(&self) -> &'src str {
    self.rest
  }

  /// The channel token at the start of [`IrcLine::rest`], including the `#`.
  pub fn channel(&self) -> Option<&'src str> {
    let rest = self.rest.trim_start();
    if !rest.starts_with('#') {
      return None;
    }
    match rest.split_once(' ') {
      Some((channel, _)) => Some(channel),
      None => Some(rest),
    }
  }

  /// The argument following the channel token, with a leading `:` stripped
  /// and surrounding whitespace trimmed.
  ///
  /// Returns an empty string if the channel is the last token.
  /// Returns [`None`] if there is no channel token.
  pub fn text(&self) -> Option<&'src str> {
    let channel = self.channel()?;
    let after = &self.rest.trim_start()[channel.len()..];
    let after = after.strip_prefix(' ').unwrap_or(after);
    let after = after.strip_prefix(':').unwrap_or(after);
    Some(after.trim())
  }
}

impl<'src> Debug for IrcLine<'src> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("IrcLine")
      .field("tags", &self.tags)
      .field("prefix", &self.prefix)
      .field("command", &self.command)
      .field("rest", &self.rest)
      .finish()
  }
}

static_assert_send!(IrcLine);
static_assert_sync!(IrcLine);

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn full_line() {
    let data = "@badge-info=;badges=;color=#0000FF;display-name=JuN1oRRRR;tmi-sent-ts=1594545155039 :jun1orrrr!jun1orrrr@jun1orrrr.tmi.twitch.tv PRIVMSG #pajlada :dank cam";

    let line = IrcLine::parse(data).unwrap();
    assert_eq!(line.command(), Command::Privmsg);
    assert_eq!(line.tag(Tag::DisplayName), Some("JuN1oRRRR"));
    assert_eq!(line.tag("tmi-sent-ts"), Some("1594545155039"));
    assert_eq!(
      line.raw_prefix(),
      Some("jun1orrrr!jun1orrrr@jun1orrrr.tmi.twitch.tv")
    );
    assert_eq!(line.rest(), "#pajlada :dank cam");
    assert_eq!(line.channel(), Some("#pajlada"));
    assert_eq!(line.text(), Some("dank cam"));
  }

  #[test]
  fn without_tags_or_prefix() {
    let line = IrcLine::parse("CLEARCHAT #pajlada :weeb123").unwrap();
    assert!(line.tags().is_empty());
    assert_eq!(line.prefix(), None);
    assert_eq!(line.command(), Command::ClearChat);
    assert_eq!(line.text(), Some("weeb123"));
  }

  #[test]
  fn empty_rest() {
    let line = IrcLine::parse(":tmi.twitch.tv RECONNECT").unwrap();
    assert_eq!(line.command(), Command::Other("RECONNECT"));
    assert_eq!(line.rest(), "");
    assert_eq!(line.channel(), None);
    assert_eq!(line.text(), None);
  }

  #[test]
  fn channel_without_text() {
    let line = IrcLine::parse(":tmi.twitch.tv CLEARCHAT #randers").unwrap();
    assert_eq!(line.channel(), Some("#randers"));
    assert_eq!(line.text(), Some(""));
  }

  #[test]
  fn trailing_newline() {
    let line = IrcLine::parse("PING :tmi.twitch.tv\r\n").unwrap();
    assert_eq!(line.command(), Command::Other("PING"));
    assert_eq!(line.rest(), ":tmi.twitch.tv");
  }

  #[test]
  fn too_short() {
    assert!(IrcLine::parse("").is_none());
    assert!(IrcLine::parse("PIN").is_none());
  }

  #[test]
  fn grammar_mismatch() {
    // lowercase command
    assert!(IrcLine::parse(":tmi.twitch.tv privmsg #a :b").is_none());
    // numeric command
    assert!(IrcLine::parse(":tmi.twitch.tv 001 justinfan :Welcome").is_none());
    // tags never terminated
    assert!(IrcLine::parse("@color=#FF0000").is_none());
    // prefix never terminated
    assert!(IrcLine::parse(":only.a.prefix").is_none());
    // empty tag block
    assert!(IrcLine::parse("@ PRIVMSG #a :b").is_none());
  }

  #[test]
  fn regression_equals_in_tag_value() {
    let data = "@display-name=Dixtor334;emotes=;first-msg=0;flags=;id=0b4c70e4-9a47-4ce1-9c3e-8f78111cdc19;mod=0;reply-parent-display-name=minosura;reply-parent-msg-body=https://youtu.be/-ek4MFjz_eM?list=PL91C6439FD45DE2F3\\sannytfDinkDonk\\sstrimmer\\skorean\\sone;reply-parent-msg-id=7f811788-b897-4b4c-9f91-99fafe70eb7f;reply-parent-user-id=141993641;reply-parent-user-login=minosura;returning-chatter=0;room-id=56418014;subscriber=1;tmi-sent-ts=1686049636367;turbo=0;user-id=73714767;user-type= :dixtor334!dixtor334@dixtor334.tmi.twitch.tv PRIVMSG #anny :@minosura @anny";
    assert_eq!(
      "https://youtu.be/-ek4MFjz_eM?list=PL91C6439FD45DE2F3\\sannytfDinkDonk\\sstrimmer\\skorean\\sone",
      IrcLine::parse(data)
        .unwrap()
        .tag(Tag::ReplyParentMsgBody)
        .unwrap()
    );
  }
}
