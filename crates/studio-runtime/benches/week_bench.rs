use criterion::{criterion_group, criterion_main, Criterion};
use studio_content::ContentPack;
use studio_core::StudioConfig;
use studio_runtime::StudioManager;

fn play_year(studio: &mut StudioManager) {
    for _ in 0..52 {
        while let Some(crisis) = studio.pending_crises().first() {
            let (id, option) = (crisis.id.clone(), crisis.options[0].id.clone());
            if studio.resolve_crisis(&id, &option).is_err() {
                break;
            }
        }
        if studio.end_week().is_err() {
            break;
        }
    }
}

fn bench_weeks(c: &mut Criterion) {
    let content = ContentPack::builtin().unwrap();
    let base = StudioManager::new(StudioConfig::default(), content);
    c.bench_function("studio_year", |b| {
        b.iter(|| {
            let mut studio = base.clone();
            play_year(&mut studio);
        })
    });

    let mut played = base.clone();
    play_year(&mut played);
    c.bench_function("studio_snapshot", |b| b.iter(|| played.snapshot()));
}

criterion_group!(benches, bench_weeks);
criterion_main!(benches);
