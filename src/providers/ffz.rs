//! Payloads of the FrankerFaceZ API.

use super::{decode, PayloadError};
use crate::cosmetics::EmoteAsset;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Response of `GET /v1/room/id/{id}` and `GET /v1/set/global`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Sets {
  #[serde(default)]
  pub sets: BTreeMap<String, Set>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Set {
  #[serde(default)]
  pub emoticons: Vec<Emote>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Emote {
  pub id: u64,
  pub name: String,
  #[serde(default)]
  pub width: f32,
  #[serde(default)]
  pub height: f32,
}

impl Emote {
  /// `width / height`, or `1.0` if that is not a positive number.
  pub fn aspect_ratio(&self) -> f32 {
    let ratio = self.width / self.height;
    if ratio.is_finite() && ratio > 0.0 {
      ratio
    } else {
      1.0
    }
  }
}

impl From<Emote> for EmoteAsset {
  fn from(emote: Emote) -> Self {
    let aspect_ratio = emote.aspect_ratio();
    EmoteAsset::new(emote.id.to_string(), emote.name, emote_url(emote.id))
      .with_aspect_ratio(aspect_ratio)
  }
}

impl Sets {
  /// Emotes of every set, in set key order.
  pub fn into_emotes(self) -> impl Iterator<Item = EmoteAsset> {
    self
      .sets
      .into_values()
      .flat_map(|set| set.emoticons)
      .map(EmoteAsset::from)
  }
}

pub fn emote_url(id: u64) -> String {
  format!("https://cdn.frankerfacez.com/emote/{id}/2")
}

pub fn parse(src: &str) -> Result<Sets, PayloadError> {
  decode("ffz", src)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_sets() {
    let emotes = parse(
      r#"{
        "room": {"id": "pajlada", "set": 1},
        "sets": {
          "3": {"id": 3, "title": "Global Emotes", "emoticons": [
            {"id": 28136, "name": "LULW", "width": 42, "height": 28},
            {"id": 9, "name": "ZreknarF", "width": 40, "height": 30}
          ]},
          "1": {"id": 1, "title": "Channel", "emoticons": [
            {"id": 1, "name": "broken", "width": 0, "height": 0}
          ]}
        }
      }"#,
    )
    .unwrap()
    .into_emotes()
    .collect::<Vec<_>>();

    let names = emotes.iter().map(|emote| emote.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["broken", "LULW", "ZreknarF"]);
    assert_eq!(emotes[0].aspect_ratio, Some(1.0));
    assert_eq!(emotes[1].aspect_ratio, Some(1.5));
    assert_eq!(emotes[1].id, "28136");
    assert_eq!(emotes[1].url, "https://cdn.frankerfacez.com/emote/28136/2");
  }

  #[test]
  fn missing_sets() {
    assert_eq!(parse(r#"{"error":"Not Found"}"#).unwrap().into_emotes().count(), 0);
  }
}
