//! ## Fetching chat history
//!
//! [`Fetcher`] loads the recent history of a channel together with every
//! cosmetic it needs, and parses it.
//!
//! ```rust,no_run
//! # async fn run() -> Result<(), tmi_history::FetchError> {
//! use tmi_history::{FetchConfig, Fetcher};
//!
//! let fetcher = Fetcher::new(FetchConfig::from_env())?;
//! let history = fetcher.load_channel("pajlada").await?;
//! for message in &history.messages {
//!   println!("{}", message.plain_text());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! All requests of a load are sent concurrently. If a cosmetic request fails,
//! a warning is logged and the load continues without those cosmetics.

use crate::cosmetics::{BadgeAsset, CosmeticCatalog, EmoteAsset, Provider, Scope};
use crate::msg::{parse_batch, Message};
use crate::providers::{bttv, ffz, helix, recent_messages, seventv, PayloadError};
use reqwest::{Client, RequestBuilder};
use std::borrow::Cow;
use std::str::FromStr;

const HELIX_URL: &str = "https://api.twitch.tv/helix";
const BTTV_URL: &str = "https://api.betterttv.net/3/cached";
const FFZ_URL: &str = "https://api.frankerfacez.com/v1";

/// Number of messages requested when no valid limit is configured.
pub const DEFAULT_LIMIT: u32 = 800;

/// Where the raw lines come from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Source {
  /// `recent-messages.robotty.de`
  #[default]
  Robotty,
  /// `recent-messages.zneix.eu`
  Zneix,
  /// `rm.lilb.dev`
  Lilb,
  /// `logs.zonian.dev`
  Zonian,
  /// Base URL of another recent-messages API. Always ends with `/`.
  Custom(String),
  /// URL of a plain-text log, one raw line per line.
  Logs(String),
}

impl Source {
  /// A custom recent-messages API rooted at `url`.
  pub fn custom(url: impl Into<String>) -> Self {
    let mut url = url.into();
    if !url.ends_with('/') {
      url.push('/');
    }
    Source::Custom(url)
  }

  /// Base URL to which the channel name is appended.
  ///
  /// [`None`] for [`Source::Logs`].
  pub fn base_url(&self) -> Option<&str> {
    match self {
      Source::Robotty => Some("https://recent-messages.robotty.de/api/v2/recent-messages/"),
      Source::Zneix => Some("https://recent-messages.zneix.eu/api/v2/recent-messages/"),
      Source::Lilb => Some("https://rm.lilb.dev/api/v2/recent-messages/"),
      Source::Zonian => Some("https://logs.zonian.dev/rm/"),
      Source::Custom(url) => Some(url.as_str()),
      Source::Logs(_) => None,
    }
  }

  /// URL from which the history of `channel` is requested.
  pub fn url(&self, channel: &str, limit: u32) -> String {
    match self {
      Source::Logs(url) => raw_logs_url(url).into_owned(),
      _ => format!(
        "{}{}?limit={limit}",
        self.base_url().unwrap_or_default(),
        channel.to_lowercase()
      ),
    }
  }
}

/// Ask a logs service for the plain-text format.
fn raw_logs_url(url: &str) -> Cow<'_, str> {
  match url.split_once('?') {
    Some((_, query)) if query.split('&').any(|param| param == "raw" || param.starts_with("raw=")) => {
      Cow::Borrowed(url)
    }
    Some(_) => Cow::Owned(format!("{url}&raw")),
    None => Cow::Owned(format!("{url}?raw")),
  }
}

impl FromStr for Source {
  type Err = FetchError;

  /// Either the name of a known relay, or a URL.
  ///
  /// URLs ending with `/` are recent-messages APIs, anything else is a plain-text log.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    Ok(match s.to_ascii_lowercase().as_str() {
      "robotty" => Source::Robotty,
      "zneix" => Source::Zneix,
      "lilb" => Source::Lilb,
      "zonian" => Source::Zonian,
      _ if s.starts_with("http://") || s.starts_with("https://") => {
        if s.ends_with('/') {
          Source::Custom(s.to_owned())
        } else {
          Source::Logs(s.to_owned())
        }
      }
      _ => return Err(FetchError::InvalidSource(s.to_owned())),
    })
  }
}

/// Configuration of a [`Fetcher`].
#[derive(Clone, Debug)]
pub struct FetchConfig {
  pub source: Source,

  /// Maximum number of messages to request.
  ///
  /// Values of `1` or less are ignored in favor of [`DEFAULT_LIMIT`].
  pub limit: u32,

  /// Return the newest message first.
  pub reverse: bool,

  /// Sent as `Client-ID` to Helix.
  pub helix_client_id: String,

  pub user_agent: String,
}

impl Default for FetchConfig {
  fn default() -> Self {
    Self {
      source: Source::default(),
      limit: DEFAULT_LIMIT,
      reverse: true,
      helix_client_id: String::new(),
      user_agent: concat!("tmi-history/", env!("CARGO_PKG_VERSION")).into(),
    }
  }
}

impl FetchConfig {
  /// The default configuration, with `HELIX_CLIENT_ID` and `RMLOG_USER_AGENT`
  /// read from the environment when they are set.
  pub fn from_env() -> Self {
    let mut config = Self::default();
    if let Ok(client_id) = std::env::var("HELIX_CLIENT_ID") {
      config.helix_client_id = client_id;
    }
    if let Ok(user_agent) = std::env::var("RMLOG_USER_AGENT") {
      if !user_agent.trim().is_empty() {
        config.user_agent = user_agent;
      }
    }
    config
  }

  /// The limit which is actually requested.
  pub fn effective_limit(&self) -> u32 {
    if self.limit > 1 {
      self.limit
    } else {
      DEFAULT_LIMIT
    }
  }
}

/// The result of a load.
#[derive(Clone, Debug)]
pub struct History {
  pub messages: Vec<Message>,
  pub catalog: CosmeticCatalog,
}

/// Check that `channel` is a valid Twitch login.
pub fn validate_channel(channel: &str) -> Result<(), FetchError> {
  let valid = (3..=25).contains(&channel.len())
    && channel
      .bytes()
      .all(|b| b.is_ascii_alphanumeric() || b == b'_');
  if valid {
    Ok(())
  } else {
    Err(FetchError::InvalidChannel(channel.to_owned()))
  }
}

/// Loads chat history over HTTP.
#[derive(Clone, Debug)]
pub struct Fetcher {
  client: Client,
  config: FetchConfig,
}

impl Fetcher {
  pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
    let client = Client::builder().user_agent(config.user_agent.as_str()).build()?;
    Ok(Self { client, config })
  }

  pub fn config(&self) -> &FetchConfig {
    &self.config
  }

  /// Load the recent history of `channel`, with its badges and emotes.
  pub async fn load_channel(&self, channel: &str) -> Result<History, FetchError> {
    validate_channel(channel)?;
    let channel_id = self
      .user_id(channel)
      .await?
      .ok_or_else(|| FetchError::ChannelNotFound(channel.to_owned()))?;
    debug!(channel, channel_id = %channel_id, "loading channel");

    let source = &self.config.source;
    let lines_url = source.url(channel, self.config.effective_limit());
    let ffz_channel_url = format!("{FFZ_URL}/room/id/{channel_id}");
    let ffz_global_url = format!("{FFZ_URL}/set/global");

    let (
      lines,
      global_badges,
      channel_badges,
      seventv_emotes,
      bttv_channel,
      bttv_global,
      ffz_channel,
      ffz_global,
    ) = futures_util::join!(
      self.lines(&lines_url, matches!(source, Source::Logs(_))),
      self.global_badges(),
      self.channel_badges(&channel_id),
      self.seventv_emotes(&channel_id),
      self.bttv_channel_emotes(&channel_id),
      self.bttv_global_emotes(),
      self.ffz_emotes(&ffz_channel_url),
      self.ffz_emotes(&ffz_global_url),
    );
    let lines = lines?;

    let catalog = CosmeticCatalog::builder()
      .badges(or_empty("global badges", global_badges))
      .badges(or_empty("channel badges", channel_badges))
      .emotes(
        Provider::SevenTv,
        Scope::Channel,
        or_empty("7tv emotes", seventv_emotes),
      )
      .emotes(
        Provider::BetterTtv,
        Scope::Channel,
        or_empty("bttv channel emotes", bttv_channel),
      )
      .emotes(
        Provider::BetterTtv,
        Scope::Global,
        or_empty("bttv global emotes", bttv_global),
      )
      .emotes(
        Provider::FrankerFaceZ,
        Scope::Channel,
        or_empty("ffz channel emotes", ffz_channel),
      )
      .emotes(
        Provider::FrankerFaceZ,
        Scope::Global,
        or_empty("ffz global emotes", ffz_global),
      )
      .build();

    Ok(self.finish(&lines, catalog))
  }

  /// Load a plain-text log from `url`.
  ///
  /// Only global badges are resolved, since the channel is not known.
  pub async fn load_url(&self, url: &str) -> Result<History, FetchError> {
    let url = raw_logs_url(url);
    let (lines, global_badges) = futures_util::join!(self.lines(&url, true), self.global_badges());
    let lines = lines?;
    let catalog = CosmeticCatalog::builder()
      .badges(or_empty("global badges", global_badges))
      .build();
    Ok(self.finish(&lines, catalog))
  }

  fn finish(&self, lines: &[String], catalog: CosmeticCatalog) -> History {
    let mut messages = parse_batch(lines, &catalog);
    debug!(
      lines = lines.len(),
      messages = messages.len(),
      badges = catalog.num_badges(),
      emotes = catalog.num_emotes(),
      "parsed history"
    );
    if self.config.reverse {
      messages.reverse();
    }
    History { messages, catalog }
  }

  /// Raw lines from a recent-messages API, or from a plain-text log if `raw` is set.
  ///
  /// Plain-text logs are cut to the newest [`FetchConfig::effective_limit`] lines.
  async fn lines(&self, url: &str, raw: bool) -> Result<Vec<String>, FetchError> {
    let body = self.text(self.client.get(url), url).await?;
    if raw {
      let mut lines = recent_messages::parse_raw_logs(&body);
      let limit = self.config.effective_limit() as usize;
      if lines.len() > limit {
        lines.drain(..lines.len() - limit);
      }
      return Ok(lines);
    }

    let payload = recent_messages::parse(&body)?;
    if let Some(error) = &payload.error {
      warn!(url, error = %error, "recent-messages relay reported an error");
    }
    Ok(payload.messages)
  }

  async fn user_id(&self, login: &str) -> Result<Option<String>, FetchError> {
    let url = format!("{HELIX_URL}/users");
    let request = self.helix(&url).query(&[("login", login)]);
    let users = helix::parse_users(&self.text(request, &url).await?)?;
    Ok(users.data.into_iter().next().map(|user| user.id))
  }

  async fn global_badges(&self) -> Result<Vec<(String, String, BadgeAsset)>, FetchError> {
    let url = format!("{HELIX_URL}/chat/badges/global");
    let body = self.text(self.helix(&url), &url).await?;
    Ok(helix::parse_badges(&body)?.into_badges())
  }

  async fn channel_badges(
    &self,
    channel_id: &str,
  ) -> Result<Vec<(String, String, BadgeAsset)>, FetchError> {
    let url = format!("{HELIX_URL}/chat/badges");
    let request = self.helix(&url).query(&[("broadcaster_id", channel_id)]);
    let body = self.text(request, &url).await?;
    Ok(helix::parse_badges(&body)?.into_badges())
  }

  async fn seventv_emotes(&self, channel_id: &str) -> Result<Vec<EmoteAsset>, FetchError> {
    let request = self
      .client
      .post(seventv::GQL_URL)
      .json(&seventv::active_emote_set_query(channel_id));
    let body = self.text(request, seventv::GQL_URL).await?;
    Ok(seventv::parse(&body)?.into_emotes())
  }

  async fn bttv_channel_emotes(&self, channel_id: &str) -> Result<Vec<EmoteAsset>, FetchError> {
    let url = format!("{BTTV_URL}/users/twitch/{channel_id}");
    let body = self.text(self.client.get(&url), &url).await?;
    Ok(bttv::parse_channel(&body)?.into_emotes().collect())
  }

  async fn bttv_global_emotes(&self) -> Result<Vec<EmoteAsset>, FetchError> {
    let url = format!("{BTTV_URL}/emotes/global");
    let body = self.text(self.client.get(&url), &url).await?;
    Ok(bttv::parse_global(&body)?)
  }

  async fn ffz_emotes(&self, url: &str) -> Result<Vec<EmoteAsset>, FetchError> {
    let body = self.text(self.client.get(url), url).await?;
    Ok(ffz::parse(&body)?.into_emotes().collect())
  }

  fn helix(&self, url: &str) -> RequestBuilder {
    self
      .client
      .get(url)
      .header("Client-ID", self.config.helix_client_id.as_str())
  }

  async fn text(&self, request: RequestBuilder, url: &str) -> Result<String, FetchError> {
    trace!(url, "sending request");
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
      return Err(FetchError::Status {
        url: url.to_owned(),
        status,
      });
    }
    Ok(response.text().await?)
  }
}

fn or_empty<T: Default>(what: &str, result: Result<T, FetchError>) -> T {
  match result {
    Ok(value) => value,
    Err(e) => {
      warn!(error = %e, "failed to load {what}, continuing without them");
      T::default()
    }
  }
}

/// Failed to load a chat history.
#[derive(Debug)]
pub enum FetchError {
  /// The channel name is not a valid Twitch login.
  InvalidChannel(String),

  /// Helix does not know the channel.
  ChannelNotFound(String),

  /// The source is neither a known relay nor a URL.
  InvalidSource(String),

  /// The request could not be sent, or the response could not be read.
  Http(reqwest::Error),

  /// The server responded with a non-success status.
  Status {
    url: String,
    status: reqwest::StatusCode,
  },

  /// The response body was not what the service is supposed to send.
  Payload(PayloadError),
}

impl From<reqwest::Error> for FetchError {
  fn from(value: reqwest::Error) -> Self {
    Self::Http(value)
  }
}

impl From<PayloadError> for FetchError {
  fn from(value: PayloadError) -> Self {
    Self::Payload(value)
  }
}

impl std::fmt::Display for FetchError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      FetchError::InvalidChannel(channel) => write!(f, "invalid channel name: {channel:?}"),
      FetchError::ChannelNotFound(channel) => write!(f, "channel not found: {channel}"),
      FetchError::InvalidSource(source) => write!(f, "unknown source: {source:?}"),
      FetchError::Http(e) => write!(f, "request failed: {e}"),
      FetchError::Status { url, status } => write!(f, "{url} responded with {status}"),
      FetchError::Payload(e) => write!(f, "{e}"),
    }
  }
}

impl std::error::Error for FetchError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      FetchError::Http(e) => Some(e),
      FetchError::Payload(e) => Some(e),
      _ => None,
    }
  }
}

static_assert_send!(Fetcher);
static_assert_sync!(Fetcher);
