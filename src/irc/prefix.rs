/// A message prefix.
///
/// ```text,ignore
/// :nick!user@host
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Prefix<'src> {
  /// The `nick` part of the prefix.
  pub nick: Option<&'src str>,
  /// The `user` part of the prefix.
  pub user: Option<&'src str>,
  /// The `host` part of the prefix.
  pub host: &'src str,
}

impl<'src> Prefix<'src> {
  /// Split a raw prefix (without the leading `:`) into its parts.
  ///
  /// ```text,ignore
  /// host
  /// nick@host
  /// nick!user@host
  /// ```
  pub fn parse(src: &'src str) -> Self {
    let Some((name, host)) = src.split_once('@') else {
      return Prefix {
        nick: None,
        user: None,
        host: src,
      };
    };

    match name.split_once('!') {
      Some((nick, user)) => Prefix {
        nick: Some(nick),
        user: Some(user),
        host,
      },
      None => Prefix {
        nick: Some(name),
        user: None,
        host,
      },
    }
  }
}

impl<'src> std::fmt::Display for Prefix<'src> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match (self.nick, self.user, self.host) {
      (Some(nick), Some(user), host) => write!(f, "{nick}!{user}@{host}"),
      (Some(nick), None, host) => write!(f, "{nick}@{host}"),
      (None, _, host) => write!(f, "{host}"),
    }
  }
}
