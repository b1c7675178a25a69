macro_rules! generate_getters {
  {
    $(<$($L:lifetime)*>)? for $T:ty as $self:ident {
      $(
        $(#[$meta:meta])*
        $field:ident -> $R:ty $(= $e:expr)?
      ),* $(,)?
    }
  } => {
    impl$(<$($L)*>)? $T {
      $(
        #[inline]
        $(#[$meta])*
        pub fn $field(&$self) -> $R {
          generate_getters!(@getter $self $field $($e)?)
        }
      )*
    }
  };

  (@getter $self:ident $field:ident $e:expr) => ($e);
  (@getter $self:ident $field:ident) => ($self.$field.clone());
}

#[cfg(test)]
pub(crate) fn _parse_irc<T: crate::msg::FromIrc>(
  input: &str,
  catalog: &crate::cosmetics::CosmeticCatalog,
) -> Result<T, crate::msg::MessageParseError> {
  let line = crate::irc::IrcLine::parse(input).ok_or(crate::msg::MessageParseError::Unparseable)?;
  <T as crate::msg::FromIrc>::from_irc(&line, catalog)
}

/// Parse `$input` as `$T`, panicking if it fails.
#[cfg(test)]
macro_rules! parse_irc {
  ($T:ty, $input:expr) => {
    parse_irc!($T, $input, &$crate::cosmetics::CosmeticCatalog::empty())
  };
  ($T:ty, $input:expr, $catalog:expr $(,)?) => {
    $crate::msg::macros::_parse_irc::<$T>($input, $catalog).unwrap()
  };
}

/// Render a message the way a chat would, for snapshots.
#[cfg(test)]
pub(crate) fn render(message: &crate::msg::Message) -> String {
  match message.author() {
    Some(author) if message.add_colon() => format!("{}: {}", author.best_name(), message.plain_text()),
    Some(author) => format!("{} {}", author.best_name(), message.plain_text()),
    None => message.plain_text(),
  }
}
