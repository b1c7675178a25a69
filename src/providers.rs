//! ## Provider payloads
//!
//! Typed decoders for the JSON returned by the services a chat history is assembled from:
//! a recent-messages relay, Twitch Helix, BetterTTV, FrankerFaceZ and 7TV.
//!
//! Nothing here performs I/O. The payloads are turned into entries
//! for a [`CatalogBuilder`][crate::CatalogBuilder], or into raw lines for [`parse_batch`][crate::parse_batch].
//!
//! ```rust
//! use tmi_history::providers::bttv;
//! use tmi_history::{CosmeticCatalog, Provider, Scope};
//!
//! let global = bttv::parse_global(r#"[{"id":"54fa8f1401e468494b85b537","code":":tf:"}]"#).unwrap();
//! let catalog = CosmeticCatalog::builder()
//!   .emotes(Provider::BetterTtv, Scope::Global, global)
//!   .build();
//! assert!(catalog.emote(":tf:").is_some());
//! ```

pub mod bttv;
pub mod ffz;
pub mod helix;
pub mod recent_messages;
pub mod seventv;

use serde::de::DeserializeOwned;

/// Failed to decode a provider payload.
#[derive(Debug)]
pub struct PayloadError {
  provider: &'static str,
  source: serde_json::Error,
}

impl PayloadError {
  /// Name of the service which sent the payload.
  pub fn provider(&self) -> &'static str {
    self.provider
  }
}

impl std::fmt::Display for PayloadError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "failed to decode {} payload: {}", self.provider, self.source)
  }
}

impl std::error::Error for PayloadError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    Some(&self.source)
  }
}

pub(crate) fn decode<T: DeserializeOwned>(provider: &'static str, src: &str) -> Result<T, PayloadError> {
  serde_json::from_str(src).map_err(|source| PayloadError { provider, source })
}
