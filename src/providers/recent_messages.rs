//! Payloads of recent-messages relays.

use super::{decode, PayloadError};
use serde::Deserialize;

/// Response of `GET /api/v2/recent-messages/{channel}`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct RecentMessages {
  /// Raw IRC lines, oldest first.
  #[serde(default)]
  pub messages: Vec<String>,

  /// Set when the relay could not serve the channel fully,
  /// e.g. because it only just started recording it.
  #[serde(default)]
  pub error: Option<String>,

  #[serde(default)]
  pub error_code: Option<String>,
}

pub fn parse(src: &str) -> Result<RecentMessages, PayloadError> {
  decode("recent-messages", src)
}

/// Split a plain-text log into lines.
///
/// Blank lines are skipped.
pub fn parse_raw_logs(src: &str) -> Vec<String> {
  src
    .lines()
    .map(str::trim_end)
    .filter(|line| !line.is_empty())
    .map(String::from)
    .collect()
}
