use std::fmt::Display;

/// A Twitch IRC command.
///
/// Only the commands which produce a chat history entry have their own variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Command<'src> {
  /// Send a message to a channel
  Privmsg,
  /// Announces Twitch-specific events to the channel
  UserNotice,
  /// Purge a user's messages in a channel
  ClearChat,
  /// Any other command
  Other(&'src str),
}

impl<'src> Command<'src> {
  /// Get the string value of the [`Command`].
  pub fn as_str(&self) -> &'src str {
    use Command::*;
    match self {
      Privmsg => "PRIVMSG",
      UserNotice => "USERNOTICE",
      ClearChat => "CLEARCHAT",
      Other(cmd) => cmd,
    }
  }
}

impl<'src> Display for Command<'src> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// `COMMAND <rest>`
///
/// The command must be made of uppercase ASCII letters,
/// and be followed by a space or the end of the line.
#[inline(always)]
pub(super) fn parse(src: &str) -> Option<(Command<'_>, &str)> {
  let (word, rest) = match src.split_once(' ') {
    Some((word, rest)) => (word, rest),
    None => (src, ""),
  };

  if word.is_empty() || !word.bytes().all(|b| b.is_ascii_uppercase()) {
    return None;
  }

  use Command as C;
  let cmd = match word {
    "PRIVMSG" => C::Privmsg,
    "USERNOTICE" => C::UserNotice,
    "CLEARCHAT" => C::ClearChat,
    other => C::Other(other),
  };

  Some((cmd, rest))
}
