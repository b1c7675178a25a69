//! Payloads of the 7TV GraphQL API.

use super::{decode, PayloadError};
use crate::cosmetics::EmoteAsset;
use serde::Deserialize;

pub const GQL_URL: &str = "https://7tv.io/v4/gql";

/// Request body which asks for the active emote set of the Twitch user `twitch_id`.
pub fn active_emote_set_query(twitch_id: &str) -> serde_json::Value {
  let query = format!(
    r#"{{ users {{ userByConnection(platform: TWITCH, platformId: "{twitch_id}") {{ id style {{ activeEmoteSet {{ id name capacity emotes {{ items {{ id alias }} }} }} }} }} }} }}"#
  );
  serde_json::json!({
    "query": query,
    "variables": { "id": twitch_id },
  })
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Response {
  #[serde(default)]
  data: Option<Data>,
}

#[derive(Clone, Debug, Deserialize)]
struct Data {
  users: Option<Users>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Users {
  user_by_connection: Option<User>,
}

#[derive(Clone, Debug, Deserialize)]
struct User {
  style: Option<Style>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Style {
  active_emote_set: Option<EmoteSet>,
}

#[derive(Clone, Debug, Deserialize)]
struct EmoteSet {
  emotes: Option<Emotes>,
}

#[derive(Clone, Debug, Deserialize)]
struct Emotes {
  #[serde(default)]
  items: Vec<Emote>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Emote {
  pub id: String,
  pub alias: String,
}

impl From<Emote> for EmoteAsset {
  fn from(emote: Emote) -> Self {
    let url = emote_url(&emote.id);
    EmoteAsset::new(emote.id, emote.alias, url)
  }
}

impl Response {
  /// Emotes of the user's active set.
  ///
  /// Empty if the user has no 7TV account or no active set.
  pub fn into_emotes(self) -> Vec<EmoteAsset> {
    self
      .data
      .and_then(|data| data.users)
      .and_then(|users| users.user_by_connection)
      .and_then(|user| user.style)
      .and_then(|style| style.active_emote_set)
      .and_then(|set| set.emotes)
      .map(|emotes| emotes.items.into_iter().map(EmoteAsset::from).collect())
      .unwrap_or_default()
  }
}

pub fn emote_url(id: &str) -> String {
  format!("https://cdn.7tv.app/emote/{id}/1x.webp")
}

pub fn parse(src: &str) -> Result<Response, PayloadError> {
  decode("7tv", src)
}
