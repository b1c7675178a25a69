#![doc = include_str!("../README.md")]

#[macro_use]
extern crate tracing;

pub(crate) const fn assert_sync<T: ?Sized + Sync>() {}
macro_rules! static_assert_sync {
  ($T:ty) => {
    const _: () = {
      let _ = $crate::assert_sync::<$T>;
    };
  };
}

pub(crate) const fn assert_send<T: ?Sized + Send>() {}
macro_rules! static_assert_send {
  ($T:ty) => {
    const _: () = {
      let _ = $crate::assert_send::<$T>;
    };
  };
}

pub mod common;
pub use common::Span;

pub mod irc;
pub use irc::*;

pub mod cosmetics;
pub use cosmetics::{BadgeAsset, CatalogBuilder, CosmeticCatalog, EmoteAsset, Provider, Scope};

pub mod text;
pub use text::Token;

pub mod msg;
pub use msg::*;

#[cfg(feature = "providers")]
pub mod providers;

#[cfg(feature = "fetch")]
pub mod fetch;

#[cfg(feature = "fetch")]
pub use fetch::{FetchConfig, FetchError, Fetcher, History, Source};
