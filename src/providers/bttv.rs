//! Payloads of the BetterTTV API.

use super::{decode, PayloadError};
use crate::cosmetics::EmoteAsset;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Emote {
  pub id: String,
  pub code: String,
}

impl From<Emote> for EmoteAsset {
  fn from(emote: Emote) -> Self {
    let url = emote_url(&emote.id);
    EmoteAsset::new(emote.id, emote.code, url)
  }
}

/// Response of `GET /3/cached/users/twitch/{id}`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelEmotes {
  #[serde(default)]
  pub channel_emotes: Vec<Emote>,
  #[serde(default)]
  pub shared_emotes: Vec<Emote>,
}

impl ChannelEmotes {
  /// Shared emotes followed by the channel's own emotes, so the latter win on conflicts.
  pub fn into_emotes(self) -> impl Iterator<Item = EmoteAsset> {
    self
      .shared_emotes
      .into_iter()
      .chain(self.channel_emotes)
      .map(EmoteAsset::from)
  }
}

pub fn emote_url(id: &str) -> String {
  format!("https://cdn.betterttv.net/emote/{id}/3x.webp")
}

pub fn parse_channel(src: &str) -> Result<ChannelEmotes, PayloadError> {
  decode("bttv", src)
}

/// Parse the response of `GET /3/cached/emotes/global`.
pub fn parse_global(src: &str) -> Result<Vec<EmoteAsset>, PayloadError> {
  let emotes: Vec<Emote> = decode("bttv", src)?;
  Ok(emotes.into_iter().map(EmoteAsset::from).collect())
}
