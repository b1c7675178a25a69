//! Payloads of the Twitch Helix API.

use super::{decode, PayloadError};
use crate::cosmetics::BadgeAsset;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Response of `GET /helix/users`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Users {
  #[serde(default)]
  pub data: Vec<User>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct User {
  pub id: String,
  pub login: String,
  #[serde(default)]
  pub display_name: String,
}

pub fn parse_users(src: &str) -> Result<Users, PayloadError> {
  decode("helix", src)
}

/// Response of `GET /helix/chat/badges` and `GET /helix/chat/badges/global`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BadgeSets {
  #[serde(default)]
  pub data: Vec<BadgeSet>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BadgeSet {
  pub set_id: String,
  #[serde(default)]
  pub versions: BadgeVersions,
}

/// Helix sends a list, older mirrors of it send a map keyed by version ID.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum BadgeVersions {
  List(Vec<BadgeVersion>),
  Map(BTreeMap<String, BadgeVersion>),
}

impl Default for BadgeVersions {
  fn default() -> Self {
    BadgeVersions::List(Vec::new())
  }
}

#[derive(Clone, Debug, Deserialize)]
pub struct BadgeVersion {
  #[serde(default)]
  pub id: String,
  #[serde(default)]
  pub image_url_2x: String,
  #[serde(default)]
  pub title: String,
}

pub fn parse_badges(src: &str) -> Result<BadgeSets, PayloadError> {
  decode("helix", src)
}

impl BadgeSets {
  /// `(set_id, version, asset)` for every version which has both an ID and an image.
  pub fn into_badges(self) -> Vec<(String, String, BadgeAsset)> {
    let mut badges = Vec::new();
    for set in self.data {
      let versions = match set.versions {
        BadgeVersions::List(versions) => versions,
        BadgeVersions::Map(versions) => versions.into_values().collect(),
      };
      for version in versions {
        if version.id.is_empty() || version.image_url_2x.is_empty() {
          continue;
        }
        badges.push((
          set.set_id.clone(),
          version.id,
          BadgeAsset::new(version.title, version.image_url_2x),
        ));
      }
    }
    badges
  }
}
