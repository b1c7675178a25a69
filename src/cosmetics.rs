//! ## Cosmetic catalog
//!
//! Badges and third-party emotes resolved while parsing a batch of lines.
//!
//! The catalog is built once per batch using [`CosmeticCatalog::builder`],
//! and is read-only afterwards.
//!
//! ```rust
//! use tmi_history::{BadgeAsset, CosmeticCatalog, EmoteAsset, Provider, Scope};
//!
//! let catalog = CosmeticCatalog::builder()
//!   .badge("moderator", "1", BadgeAsset::new("Moderator", "https://example.com/mod.png"))
//!   .emote(
//!     Provider::SevenTv,
//!     Scope::Channel,
//!     EmoteAsset::new("01F6MQ33FG000FFJ97ZB8MWV52", "peepoHappy", "https://example.com/1x.webp"),
//!   )
//!   .build();
//!
//! assert!(catalog.badge("moderator", "1").is_some());
//! assert_eq!(catalog.emote("peepoHappy").map(|(provider, _)| provider), Some(Provider::SevenTv));
//! ```

use std::collections::HashMap;

/// A third-party emote provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
  feature = "serde",
  derive(serde::Serialize),
  serde(rename_all = "lowercase")
)]
pub enum Provider {
  SevenTv,
  BetterTtv,
  FrankerFaceZ,
}

impl Provider {
  /// Order in which providers are searched within a [`Scope`].
  pub const PRIORITY: [Provider; 3] = [Provider::SevenTv, Provider::BetterTtv, Provider::FrankerFaceZ];

  #[inline]
  fn index(self) -> usize {
    match self {
      Provider::SevenTv => 0,
      Provider::BetterTtv => 1,
      Provider::FrankerFaceZ => 2,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Provider::SevenTv => "7tv",
      Provider::BetterTtv => "bttv",
      Provider::FrankerFaceZ => "ffz",
    }
  }
}

impl std::fmt::Display for Provider {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Where an emote is usable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
  feature = "serde",
  derive(serde::Serialize),
  serde(rename_all = "lowercase")
)]
pub enum Scope {
  /// Only in the channel whose history is being rendered.
  Channel,
  /// Everywhere.
  Global,
}

impl Scope {
  /// Order in which scopes are searched. Channel emotes shadow global ones.
  pub const PRIORITY: [Scope; 2] = [Scope::Channel, Scope::Global];

  #[inline]
  fn index(self) -> usize {
    match self {
      Scope::Channel => 0,
      Scope::Global => 1,
    }
  }
}

/// Display information for one badge version.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BadgeAsset {
  pub title: String,
  pub url: String,
}

impl BadgeAsset {
  pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
    Self {
      title: title.into(),
      url: url.into(),
    }
  }
}

/// Display information for a third-party emote.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EmoteAsset {
  /// Provider-specific emote ID.
  pub id: String,

  /// The word which is replaced by this emote.
  ///
  /// For providers which support aliases, this is the alias.
  pub name: String,

  pub url: String,

  /// Width divided by height.
  ///
  /// [`None`] if the provider does not say, in which case `1.0` is assumed.
  pub aspect_ratio: Option<f32>,
}

impl EmoteAsset {
  pub fn new(id: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      name: name.into(),
      url: url.into(),
      aspect_ratio: None,
    }
  }

  pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
    self.aspect_ratio = Some(aspect_ratio);
    self
  }
}

type EmoteMap = HashMap<String, EmoteAsset>;

/// Badges and emotes available while parsing a batch of lines.
///
/// An empty catalog is valid: badges are then dropped,
/// and words are never turned into third-party emotes.
#[derive(Clone, Debug, Default)]
pub struct CosmeticCatalog {
  badges: HashMap<String, BadgeAsset>,
  // [scope][provider]
  emotes: [[EmoteMap; 3]; 2],
}

impl CosmeticCatalog {
  /// A catalog with no badges and no emotes.
  pub fn empty() -> Self {
    Self::default()
  }

  pub fn builder() -> CatalogBuilder {
    CatalogBuilder::default()
  }

  /// Look up a badge by its set ID and version ID.
  pub fn badge(&self, set_id: &str, version: &str) -> Option<&BadgeAsset> {
    self.badges.get(&badge_key(set_id, version))
  }

  /// Look up a third-party emote by exact name.
  ///
  /// Channel emotes are searched before global ones,
  /// and within a scope providers are searched in [`Provider::PRIORITY`] order.
  pub fn emote(&self, word: &str) -> Option<(Provider, &EmoteAsset)> {
    Scope::PRIORITY.iter().find_map(|scope| {
      Provider::PRIORITY.iter().find_map(|provider| {
        self.emotes[scope.index()][provider.index()]
          .get(word)
          .map(|emote| (*provider, emote))
      })
    })
  }

  /// All emotes of `provider` in `scope`.
  pub fn emotes(&self, provider: Provider, scope: Scope) -> &HashMap<String, EmoteAsset> {
    &self.emotes[scope.index()][provider.index()]
  }

  pub fn num_badges(&self) -> usize {
    self.badges.len()
  }

  pub fn num_emotes(&self) -> usize {
    self.emotes.iter().flatten().map(HashMap::len).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.num_badges() == 0 && self.num_emotes() == 0
  }
}

/// `{set_id}_{version}`
#[inline]
pub fn badge_key(set_id: &str, version: &str) -> String {
  format!("{set_id}_{version}")
}

/// Builder for a [`CosmeticCatalog`].
///
/// Later insertions replace earlier ones with the same key,
/// so global badges should be added before channel badges.
#[derive(Default)]
pub struct CatalogBuilder {
  catalog: CosmeticCatalog,
}

impl CatalogBuilder {
  pub fn badge(
    mut self,
    set_id: impl AsRef<str>,
    version: impl AsRef<str>,
    asset: BadgeAsset,
  ) -> Self {
    self
      .catalog
      .badges
      .insert(badge_key(set_id.as_ref(), version.as_ref()), asset);
    self
  }

  /// Add `(set_id, version, asset)` triples.
  pub fn badges<S, V>(mut self, badges: impl IntoIterator<Item = (S, V, BadgeAsset)>) -> Self
  where
    S: AsRef<str>,
    V: AsRef<str>,
  {
    for (set_id, version, asset) in badges {
      self = self.badge(set_id, version, asset);
    }
    self
  }

  /// Add an emote, keyed by [`EmoteAsset::name`].
  pub fn emote(mut self, provider: Provider, scope: Scope, asset: EmoteAsset) -> Self {
    self.catalog.emotes[scope.index()][provider.index()].insert(asset.name.clone(), asset);
    self
  }

  pub fn emotes(
    mut self,
    provider: Provider,
    scope: Scope,
    emotes: impl IntoIterator<Item = EmoteAsset>,
  ) -> Self {
    for asset in emotes {
      self = self.emote(provider, scope, asset);
    }
    self
  }

  pub fn build(self) -> CosmeticCatalog {
    self.catalog
  }
}

static_assert_send!(CosmeticCatalog);
static_assert_sync!(CosmeticCatalog);

#[cfg(test)]
mod tests {
  use super::*;

  fn emote(id: &str, name: &str) -> EmoteAsset {
    EmoteAsset::new(id, name, format!("https://cdn.example.com/{id}"))
  }

  #[test]
  fn badge_lookup() {
    let catalog = CosmeticCatalog::builder()
      .badge("subscriber", "12", BadgeAsset::new("1-Year Subscriber", "sub12.png"))
      .build();
    assert_eq!(
      catalog.badge("subscriber", "12").map(|b| b.title.as_str()),
      Some("1-Year Subscriber")
    );
    assert!(catalog.badge("subscriber", "0").is_none());
  }

  #[test]
  fn later_badge_replaces_earlier() {
    let catalog = CosmeticCatalog::builder()
      .badge("subscriber", "0", BadgeAsset::new("Subscriber", "global.png"))
      .badge("subscriber", "0", BadgeAsset::new("Subscriber", "channel.png"))
      .build();
    assert_eq!(catalog.num_badges(), 1);
    assert_eq!(catalog.badge("subscriber", "0").unwrap().url, "channel.png");
  }

  #[test]
  fn provider_priority_within_scope() {
    let catalog = CosmeticCatalog::builder()
      .emote(Provider::FrankerFaceZ, Scope::Channel, emote("ffz", "OMEGALUL"))
      .emote(Provider::BetterTtv, Scope::Channel, emote("bttv", "OMEGALUL"))
      .emote(Provider::SevenTv, Scope::Channel, emote("7tv", "OMEGALUL"))
      .build();
    let (provider, asset) = catalog.emote("OMEGALUL").unwrap();
    assert_eq!(provider, Provider::SevenTv);
    assert_eq!(asset.id, "7tv");
  }

  #[test]
  fn channel_scope_shadows_global() {
    let catalog = CosmeticCatalog::builder()
      .emote(Provider::SevenTv, Scope::Global, emote("global", "EZ"))
      .emote(Provider::FrankerFaceZ, Scope::Channel, emote("channel", "EZ"))
      .build();
    let (provider, asset) = catalog.emote("EZ").unwrap();
    assert_eq!(provider, Provider::FrankerFaceZ);
    assert_eq!(asset.id, "channel");
  }

  #[test]
  fn lookup_is_exact() {
    let catalog = CosmeticCatalog::builder()
      .emote(Provider::BetterTtv, Scope::Global, emote("1", "catJAM"))
      .build();
    assert!(catalog.emote("catjam").is_none());
    assert!(catalog.emote("catJAM!").is_none());
    assert!(catalog.emote("catJAM").is_some());
  }

  #[test]
  fn empty_catalog() {
    let catalog = CosmeticCatalog::empty();
    assert!(catalog.is_empty());
    assert!(catalog.emote("Kappa").is_none());
    assert!(catalog.badge("moderator", "1").is_none());
  }
}
