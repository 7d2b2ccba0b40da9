use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use lineup_scraper::fixture_page::extract_fixtures;
use lineup_scraper::lineup::extract_lineup;
use lineup_scraper::normalize::normalize;
use lineup_scraper::slug::resolve_slug;

const TEAMS: &[(&str, u32, bool)] = &[
    ("FC Bayern München", 1, false),
    ("1. FC Köln", 1, false),
    ("Bayer 04 Leverkusen", 99, false),
    ("SV 07 Elversberg", 2, false),
    ("Olympique Lyon", 21, false),
    ("Paris Saint-Germain", 11, true),
    ("Union Saint-Gilloise", 12, true),
];

fn bench_slug_resolution(c: &mut Criterion) {
    c.bench_function("slug_resolution", |b| {
        b.iter(|| {
            for (name, id, international) in TEAMS {
                let slug = resolve_slug(black_box(name), *id, *international);
                black_box(slug);
            }
        })
    });
}

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize", |b| {
        b.iter(|| {
            for (name, _, _) in TEAMS {
                black_box(normalize(black_box(name)));
            }
        })
    });
}

fn bench_lineup_extract(c: &mut Criterion) {
    c.bench_function("lineup_extract", |b| {
        b.iter(|| {
            let lineup = extract_lineup(black_box(LINEUP_HTML), true)
                .expect("fixture has lineup containers");
            black_box(lineup.home.len() + lineup.away.len());
        })
    });
}

fn bench_fixture_listing(c: &mut Criterion) {
    let page: String = (1..=9)
        .map(|i| {
            format!(
                r#"<a class="ergebnis" href="/bundesliga/2027/7/t{i}-u{i}/" title="T{i} - U{i} ({:02}.10.2026)"><span id="s{i}">1:{i}</span></a>
<a href="/bundesliga/2027/8/v{i}-w{i}/" title="V{i} - W{i} (2{i}.10.2026 15:30)"><span>15:30</span></a>"#,
                i
            )
        })
        .collect();
    c.bench_function("fixture_listing", |b| {
        b.iter(|| {
            let fixtures = extract_fixtures(black_box(&page));
            black_box(fixtures.len());
        })
    });
}

criterion_group!(
    perf,
    bench_slug_resolution,
    bench_normalize,
    bench_lineup_extract,
    bench_fixture_listing
);
criterion_main!(perf);

static LINEUP_HTML: &str = include_str!("../tests/fixtures/lineup_bayern_dortmund.html");
