//! Represents a basic Twitch chat message sent by some user to a specific channel.

use super::{
  is_not_empty, parse_bool, parse_message_text, parse_timestamp, prefix_user, raw_tags,
  to_datetime, Author, MessageParseError,
};
use crate::common::unescape_spaces;
use crate::cosmetics::CosmeticCatalog;
use crate::irc::{IrcLine, Tag};
use crate::text::{parse_emote_ranges, segment, Token};
use chrono::{DateTime, Utc};

/// Represents a basic Twitch chat message sent by some user to a specific channel.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Privmsg {
  id: String,
  channel: String,
  timestamp: i64,
  author: Author,
  reply: Option<Reply>,
  tokens: Vec<Token>,
  is_action: bool,
  add_colon: bool,
  is_first_message: bool,
  raw_tags: Vec<(String, String)>,
}

generate_getters! {
  for Privmsg as self {
    /// Unique ID of the message.
    id -> &str = self.id.as_str(),

    /// Channel in which this message was sent, including the `#`.
    channel -> &str = self.channel.as_str(),

    /// Milliseconds since the unix epoch at which the message was sent.
    timestamp -> i64,

    /// The time at which the message was sent.
    time -> Option<DateTime<Utc>> = to_datetime(self.timestamp),

    /// The user who sent this message.
    author -> &Author = &self.author,

    /// Info about the parent message this message is a reply to.
    reply -> Option<&Reply> = self.reply.as_ref(),

    /// Tokens of the message body.
    ///
    /// If the message is a reply, the leading `@mention` is not included.
    tokens -> &[Token] = &self.tokens,

    /// Whether the message was sent with `/me`.
    is_action -> bool,

    /// Whether a `:` should be rendered after the author's name.
    ///
    /// `false` for `/me` messages.
    add_colon -> bool,

    /// Whether this is the first message the user ever sent in the channel.
    is_first_message -> bool,

    /// Decoded tags of the source line, in source order.
    raw_tags -> &[(String, String)] = &self.raw_tags,
  }
}

/// Information about the reply parent message.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Reply {
  parent_id: String,
  username: String,
  text: String,
}

generate_getters! {
  for Reply as self {
    /// Reply parent message ID
    parent_id -> &str = self.parent_id.as_str(),

    /// Reply parent user login
    ///
    /// Empty if the relay did not store it.
    username -> &str = self.username.as_str(),

    /// Reply parent text
    text -> &str = self.text.as_str(),
  }
}

fn is_valid_login(login: &&str) -> bool {
  (1..=25).contains(&login.len())
    && login
      .bytes()
      .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

impl Privmsg {
  fn parse(line: &IrcLine<'_>, catalog: &CosmeticCatalog) -> Result<Self, MessageParseError> {
    let login = prefix_user(line)
      .filter(is_valid_login)
      .ok_or(MessageParseError::MissingField("login"))?;
    let channel = line
      .channel()
      .ok_or(MessageParseError::MissingField("channel"))?;
    let body = line
      .text()
      .ok_or(MessageParseError::MissingField("text"))?;
    let timestamp = parse_timestamp(line);

    let (body, is_action) = parse_message_text(body);

    let reply = line
      .tag(Tag::ReplyParentMsgId)
      .filter(is_not_empty)
      .map(|parent_id| Reply {
        parent_id: parent_id.to_owned(),
        username: line
          .tag(Tag::ReplyParentUserLogin)
          .unwrap_or_default()
          .to_owned(),
        text: unescape_spaces(line.tag(Tag::ReplyParentMsgBody).unwrap_or_default()).into_owned(),
      });

    let emotes = parse_emote_ranges(line.tag(Tag::Emotes).unwrap_or_default());
    let mut tokens = segment(body, &emotes, catalog);
    if reply.is_some()
      && tokens
        .first()
        .is_some_and(|token| token.is_text() && token.content().starts_with('@'))
    {
      tokens.remove(0);
    }

    Ok(Privmsg {
      id: line.tag(Tag::Id).unwrap_or_default().to_owned(),
      channel: channel.to_owned(),
      timestamp,
      author: Author::from_line(line, login, catalog),
      reply,
      tokens,
      is_action,
      add_colon: !is_action,
      is_first_message: line.tag(Tag::FirstMsg).is_some_and(parse_bool),
      raw_tags: raw_tags(line),
    })
  }
}

impl super::FromIrc for Privmsg {
  #[inline]
  fn from_irc(line: &IrcLine<'_>, catalog: &CosmeticCatalog) -> Result<Self, MessageParseError> {
    Self::parse(line, catalog)
  }
}

impl From<Privmsg> for super::Message {
  fn from(msg: Privmsg) -> Self {
    super::Message::Privmsg(msg)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cosmetics::{BadgeAsset, EmoteAsset, Provider, Scope};
  use crate::msg::macros::render;
  use crate::msg::Message;

  fn catalog() -> CosmeticCatalog {
    CosmeticCatalog::builder()
      .badge("moderator", "1", BadgeAsset::new("Moderator", "https://example.com/mod.png"))
      .badge("subscriber", "12", BadgeAsset::new("1-Year Subscriber", "https://example.com/sub.png"))
      .emote(
        Provider::BetterTtv,
        Scope::Channel,
        EmoteAsset::new("5e76d338d6581c3724c0f0b2", "cvHazmat", "https://cdn.betterttv.net/emote/5e76d338d6581c3724c0f0b2/3x.webp"),
      )
      .build()
  }

  #[test]
  fn parse_privmsg_basic_example() {
    let msg = parse_irc!(Privmsg, "@badge-info=;badges=;color=#0000FF;display-name=JuN1oRRRR;emotes=;flags=;id=e9d998c3-36f1-430f-89ec-6b887c28af36;mod=0;room-id=11148817;subscriber=0;tmi-sent-ts=1594545155039;turbo=0;user-id=29803735;user-type= :jun1orrrr!jun1orrrr@jun1orrrr.tmi.twitch.tv PRIVMSG #pajlada :dank cam");
    assert_eq!(msg.id(), "e9d998c3-36f1-430f-89ec-6b887c28af36");
    assert_eq!(msg.channel(), "#pajlada");
    assert_eq!(msg.timestamp(), 1594545155039);
    assert_eq!(msg.author().login(), "jun1orrrr");
    assert_eq!(msg.author().color(), "#0000FF");
    assert!(msg.author().badges().is_empty());
    assert!(!msg.is_action());
    assert!(msg.add_colon());
    assert!(msg.reply().is_none());
    insta::assert_snapshot!(render(&msg.into()), @"JuN1oRRRR: dank cam");
  }

  #[test]
  fn parse_privmsg_action() {
    let msg = parse_irc!(Privmsg, "@badge-info=;badges=;color=#19E6E6;display-name=alice;emotes=;id=a1;tmi-sent-ts=1594555275886 :alice!alice@alice.tmi.twitch.tv PRIVMSG #pajlada :\u{0001}ACTION waves hello\u{0001}");
    assert!(msg.is_action());
    assert!(!msg.add_colon());
    insta::assert_snapshot!(render(&msg.into()), @"alice waves hello");
  }

  #[test]
  fn unterminated_action_is_plain_text() {
    let msg = parse_irc!(Privmsg, "@id=a1 :alice!alice@alice.tmi.twitch.tv PRIVMSG #pajlada :\u{0001}ACTION waves");
    assert!(!msg.is_action());
    assert!(msg.add_colon());
  }

  #[test]
  fn parse_privmsg_action_and_badges() {
    let msg = parse_irc!(
      Privmsg,
      "@badge-info=subscriber/22;badges=moderator/1,subscriber/12;color=#19E6E6;display-name=randers;emotes=;flags=;id=d831d848-b7c7-4559-ae3a-2cb88f4dbfed;mod=1;room-id=11148817;subscriber=1;tmi-sent-ts=1594555275886;turbo=0;user-id=40286300;user-type=mod :randers!randers@randers.tmi.twitch.tv PRIVMSG #pajlada :\u{0001}ACTION -tags\u{0001}",
      &catalog()
    );
    assert!(msg.is_action());
    let titles = msg
      .author()
      .badges()
      .iter()
      .map(|badge| badge.title())
      .collect::<Vec<_>>();
    assert_eq!(titles, ["Moderator", "1-Year Subscriber (22 months)"]);
    insta::assert_snapshot!(render(&msg.into()), @"randers -tags");
  }

  #[test]
  fn parse_privmsg_reply_parent_included() {
    let msg = parse_irc!(Privmsg, "@badge-info=;badges=;client-nonce=cd56193132f934ac71b4d5ac488d4bd6;color=;display-name=LeftSwing;emotes=;first-msg=0;flags=;id=5b4f63a9-776f-4fce-bf3c-d9707f52e32d;mod=0;reply-parent-display-name=Retoon;reply-parent-msg-body=hello\\sthere;reply-parent-msg-id=6b13e51b-7ecb-43b5-ba5b-2bb5288df696;reply-parent-user-id=37940952;reply-parent-user-login=retoon;returning-chatter=0;room-id=37940952;subscriber=0;tmi-sent-ts=1673925983585;turbo=0;user-id=133651738;user-type= :leftswing!leftswing@leftswing.tmi.twitch.tv PRIVMSG #retoon :@Retoon yes");
    let reply = msg.reply().unwrap();
    assert_eq!(reply.parent_id(), "6b13e51b-7ecb-43b5-ba5b-2bb5288df696");
    assert_eq!(reply.username(), "retoon");
    assert_eq!(reply.text(), "hello there");
    assert_eq!(msg.author().color(), crate::msg::FALLBACK_COLOR);
    insta::assert_snapshot!(render(&msg.into()), @"LeftSwing: yes");
  }

  #[test]
  fn reply_drops_leading_mention() {
    let msg = parse_irc!(Privmsg, "@id=b1;reply-parent-msg-id=p1;reply-parent-user-login=alice :bob!bob@bob.tmi.twitch.tv PRIVMSG #chan :@alice hi there");
    let contents = msg.tokens().iter().map(Token::content).collect::<Vec<_>>();
    assert_eq!(contents, ["hi", "there"]);
  }

  #[test]
  fn mention_is_kept_without_reply() {
    let msg = parse_irc!(Privmsg, "@id=b1 :bob!bob@bob.tmi.twitch.tv PRIVMSG #chan :@alice hi");
    assert_eq!(msg.tokens()[0].content(), "@alice");
  }

  #[test]
  fn reply_keeps_leading_emote() {
    let msg = parse_irc!(
      Privmsg,
      "@id=b1;reply-parent-msg-id=p1 :bob!bob@bob.tmi.twitch.tv PRIVMSG #chan :cvHazmat hi",
      &catalog()
    );
    assert!(msg.tokens()[0].is_emote());
    assert_eq!(msg.tokens().len(), 2);
  }

  #[test]
  fn empty_reply_parent_is_not_a_reply() {
    let msg = parse_irc!(Privmsg, "@id=1;reply-parent-msg-id=;reply-parent-user-login= :alice!alice@alice.tmi.twitch.tv PRIVMSG #chan :@bob hi");
    assert!(msg.reply().is_none());
    let contents = msg.tokens().iter().map(Token::content).collect::<Vec<_>>();
    assert_eq!(contents, ["@bob", "hi"]);
  }

  #[test]
  fn reply_without_login_or_body() {
    let msg = parse_irc!(Privmsg, "@id=b1;reply-parent-msg-id=p1 :bob!bob@bob.tmi.twitch.tv PRIVMSG #chan :@someone ok");
    let reply = msg.reply().unwrap();
    assert_eq!(reply.username(), "");
    assert_eq!(reply.text(), "");
  }

  #[test]
  fn parse_privmsg_display_name_with_trailing_space() {
    let msg = parse_irc!(Privmsg, "@rm-received-ts=1594554085918;historical=1;badge-info=;badges=;client-nonce=815810609edecdf4537bd9586994182b;color=;display-name=CarvedTaleare\\s;emotes=;flags=;id=c9b941d9-a0ab-4534-9903-971768fcdf10;mod=0;room-id=22484632;subscriber=0;tmi-sent-ts=1594554085753;turbo=0;user-id=467684514;user-type= :carvedtaleare!carvedtaleare@carvedtaleare.tmi.twitch.tv PRIVMSG #forsen :NaM");
    assert_eq!(msg.author().display_name(), "CarvedTaleare");
    assert_eq!(msg.author().best_name(), "CarvedTaleare");
  }

  #[test]
  fn parse_privmsg_korean_display_name() {
    let msg = parse_irc!(Privmsg, "@badge-info=subscriber/35;badges=moderator/1,subscriber/3024;color=#FF0000;display-name=테스트계정420;emotes=;flags=;id=bdfa278e-11c4-484f-9491-0a61b16fab60;mod=1;room-id=11148817;subscriber=1;tmi-sent-ts=1593953876927;turbo=0;user-id=117166826;user-type=mod :testaccount_420!testaccount_420@testaccount_420.tmi.twitch.tv PRIVMSG #pajlada :@asd");
    insta::assert_snapshot!(render(&msg.into()), @"테스트계정420 (testaccount_420): @asd");
  }

  #[test]
  fn parse_privmsg_display_name_with_middle_space() {
    let msg = parse_irc!(Privmsg, "@badge-info=;badges=;color=;display-name=Riot\\sGames;emotes=;flags=;id=bdfa278e-11c4-484f-9491-0a61b16fab60;mod=1;room-id=36029255;subscriber=0;tmi-sent-ts=1593953876927;turbo=0;user-id=36029255;user-type= :riotgames!riotgames@riotgames.tmi.twitch.tv PRIVMSG #riotgames :test fake message");
    assert_eq!(msg.author().display_name(), "Riot Games");
    insta::assert_snapshot!(render(&msg.into()), @"Riot Games (riotgames): test fake message");
  }

  #[test]
  fn missing_display_name_falls_back_to_login() {
    let msg = parse_irc!(Privmsg, "@display-name=;id=x :someone!someone@someone.tmi.twitch.tv PRIVMSG #chan :hi");
    assert_eq!(msg.author().display_name(), "someone");
    assert_eq!(msg.author().best_name(), "someone");
  }

  #[test]
  fn parse_privmsg_emotes_1() {
    let msg = parse_irc!(
      Privmsg,
      "@badge-info=;badges=moderator/1;client-nonce=fc4ebe0889105c8404a9be81cf9a9ad4;color=#FF0000;display-name=boring_nick;emotes=555555591:51-52/25:0-4,12-16,18-22/1902:6-10,29-33,35-39/1:45-46,48-49;first-msg=0;flags=;id=3d9540a0-04b6-4bea-baf9-9165b14160be;mod=1;returning-chatter=0;room-id=55203741;subscriber=0;tmi-sent-ts=1696093084212;turbo=0;user-id=111024753;user-type=mod :boring_nick!boring_nick@boring_nick.tmi.twitch.tv PRIVMSG #moscowwbish :Kappa Keepo Kappa Kappa test Keepo Keepo 123 :) :) :P"
    );
    let emotes = msg
      .tokens()
      .iter()
      .filter(|token| token.is_emote())
      .count();
    assert_eq!(emotes, 9);
  }

  #[test]
  fn parse_privmsg_emote_non_numeric_id() {
    let msg = parse_irc!(Privmsg, "@badge-info=;badges=;client-nonce=245b864d508a69a685e25104204bd31b;color=#FF144A;display-name=AvianArtworks;emote-only=1;emotes=300196486_TK:0-7;flags=;id=21194e0d-f0fa-4a8f-a14f-3cbe89366ad9;mod=0;room-id=11148817;subscriber=0;tmi-sent-ts=1594552113129;turbo=0;user-id=39565465;user-type= :avianartworks!avianartworks@avianartworks.tmi.twitch.tv PRIVMSG #pajlada :pajaM_TK");
    assert_eq!(
      msg.tokens(),
      [Token::Emote {
        content: "pajaM_TK".into(),
        id: "300196486_TK".into(),
        url: "https://static-cdn.jtvnw.net/emoticons/v2/300196486_TK/default/dark/3.0".into(),
        aspect_ratio: 1.0,
      }]
    );
  }

  #[test]
  fn first_message() {
    let msg = parse_irc!(Privmsg, "@first-msg=1;id=x :newbie!newbie@newbie.tmi.twitch.tv PRIVMSG #chan :hello");
    assert!(msg.is_first_message());
  }

  #[test]
  fn empty_body() {
    let msg = parse_irc!(Privmsg, "@id=x :someone!someone@someone.tmi.twitch.tv PRIVMSG #chan :");
    assert!(msg.tokens().is_empty());
  }

  #[test]
  fn missing_login() {
    let catalog = CosmeticCatalog::empty();
    let err = crate::msg::macros::_parse_irc::<Privmsg>(
      "@id=x :tmi.twitch.tv PRIVMSG #chan :hello",
      &catalog,
    )
    .unwrap_err();
    assert_eq!(err, MessageParseError::MissingField("login"));

    let err = crate::msg::macros::_parse_irc::<Privmsg>(
      "@id=x :Not-A-Login!Not-A-Login@host PRIVMSG #chan :hello",
      &catalog,
    )
    .unwrap_err();
    assert_eq!(err, MessageParseError::MissingField("login"));
  }

  #[test]
  fn missing_channel() {
    let err = crate::msg::macros::_parse_irc::<Privmsg>(
      "@id=x :someone!someone@someone.tmi.twitch.tv PRIVMSG someone :hello",
      &CosmeticCatalog::empty(),
    )
    .unwrap_err();
    assert_eq!(err, MessageParseError::MissingField("channel"));
  }

  #[test]
  fn deterministic() {
    let src = "@badges=moderator/1;emotes=25:0-4;id=x :someone!someone@someone.tmi.twitch.tv PRIVMSG #chan :Kappa cvHazmat https://example.com";
    let catalog = catalog();
    let a: Message = parse_irc!(Privmsg, src, &catalog).into();
    let b: Message = parse_irc!(Privmsg, src, &catalog).into();
    assert_eq!(a, b);
  }
}
