use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tmi_history::{BadgeAsset, CosmeticCatalog, EmoteAsset, Provider, Scope};

fn read_input() -> Vec<String> {
  include_str!("data.txt")
    .lines()
    .cycle()
    .take(1000)
    .map(String::from)
    .collect::<Vec<_>>()
}

fn catalog() -> CosmeticCatalog {
  CosmeticCatalog::builder()
    .badge("moderator", "1", BadgeAsset::new("Moderator", "mod.png"))
    .badge("subscriber", "12", BadgeAsset::new("1-Year Subscriber", "sub12.png"))
    .badge("subscriber", "3", BadgeAsset::new("3-Month Subscriber", "sub3.png"))
    .emote(Provider::SevenTv, Scope::Channel, EmoteAsset::new("1", "catJAM", "catjam.webp"))
    .emote(Provider::BetterTtv, Scope::Global, EmoteAsset::new("2", "OMEGALUL", "omegalul.webp"))
    .emote(
      Provider::FrankerFaceZ,
      Scope::Global,
      EmoteAsset::new("28136", "LULW", "lulw.png").with_aspect_ratio(1.5),
    )
    .build()
}

fn parse(c: &mut Criterion) {
  let input = read_input();
  let catalog = catalog();
  c.bench_with_input(
    BenchmarkId::new("parse_batch", "data.txt"),
    &input,
    |b, lines| {
      b.iter(|| black_box(tmi_history::parse_batch(lines, &catalog)));
    },
  );
  c.bench_with_input(
    BenchmarkId::new("parse_batch", "data.txt (empty catalog)"),
    &input,
    |b, lines| {
      let catalog = CosmeticCatalog::empty();
      b.iter(|| black_box(tmi_history::parse_batch(lines, &catalog)));
    },
  );
}

criterion_group!(benches, parse);
criterion_main!(benches);
