//! Print the recent chat history of a channel.
//!
//! ```text,ignore
//! $ HELIX_CLIENT_ID=... cargo run -p rmlog -- --channel forsen --limit 100
//! $ cargo run -p rmlog -- --file lines.txt
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use tmi_history::{FetchConfig, Fetcher, Message, Source, Token};

#[derive(Parser)]
#[command(author, version)]
struct Args {
  /// Channel to load the history of
  #[arg(long)]
  channel: Option<String>,

  /// URL of a plain-text log to load instead of a channel
  #[arg(long)]
  url: Option<String>,

  /// Local file with one raw IRC line per line.
  /// No cosmetics are resolved.
  #[arg(long)]
  file: Option<std::path::PathBuf>,

  /// `robotty`, `zneix`, `lilb`, `zonian`, or the URL of a recent-messages API
  #[arg(long, default_value = "robotty")]
  source: Source,

  /// Maximum number of messages
  #[arg(long, default_value_t = tmi_history::fetch::DEFAULT_LIMIT)]
  limit: u32,

  /// Print the oldest message first
  #[arg(long)]
  oldest_first: bool,

  /// Print messages as JSON, one per line
  #[arg(long)]
  json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  let messages = if let Some(path) = &args.file {
    let src = std::fs::read_to_string(path)
      .with_context(|| format!("failed to read {}", path.display()))?;
    let lines = tmi_history::providers::recent_messages::parse_raw_logs(&src);
    let mut messages = tmi_history::parse_batch(&lines, &tmi_history::CosmeticCatalog::empty());
    if !args.oldest_first {
      messages.reverse();
    }
    messages
  } else {
    let config = FetchConfig {
      source: args.source.clone(),
      limit: args.limit,
      reverse: !args.oldest_first,
      ..FetchConfig::from_env()
    };
    let fetcher = Fetcher::new(config)?;
    let history = match (&args.channel, &args.url) {
      (Some(channel), _) => fetcher.load_channel(channel.trim_start_matches('#')).await?,
      (None, Some(url)) => fetcher.load_url(url).await?,
      (None, None) => bail!("one of --channel, --url or --file is required"),
    };
    history.messages
  };

  for message in &messages {
    if args.json {
      println!("{}", serde_json::to_string(message)?);
    } else {
      println!("{}", render(message));
    }
  }

  Ok(())
}

fn render(message: &Message) -> String {
  let time = message
    .time()
    .map(|time| time.format("%Y-%m-%d %H:%M:%S").to_string())
    .unwrap_or_default();

  let text = message
    .tokens()
    .iter()
    .map(|token| match token {
      Token::Text { content } => content.clone(),
      Token::Link { url, .. } => format!("<{url}>"),
      Token::Emote { content, .. } => format!("[{content}]"),
    })
    .collect::<Vec<_>>()
    .join(" ");

  match message.author() {
    Some(author) => {
      let badges = author
        .badges()
        .iter()
        .map(|badge| format!("[{}] ", badge.title()))
        .collect::<String>();
      let colon = if message.add_colon() { ":" } else { "" };
      format!("{time} {badges}{}{colon} {text}", author.best_name())
    }
    None => format!("{time} {text}"),
  }
}
