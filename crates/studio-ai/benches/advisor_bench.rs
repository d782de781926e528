use criterion::{black_box, criterion_group, criterion_main, Criterion};
use studio_ai::Autopilot;
use studio_content::ContentPack;
use studio_core::StudioConfig;
use studio_runtime::StudioManager;

fn bench_autoplay(c: &mut Criterion) {
    let base = StudioManager::new(StudioConfig::default(), ContentPack::builtin().unwrap());
    let pilot = Autopilot::default();
    c.bench_function("autopilot 2y", |b| {
        b.iter(|| {
            let mut studio = base.clone();
            let turns = pilot.play(&mut studio, 104);
            black_box(turns.len())
        })
    });
}

criterion_group!(benches, bench_autoplay);
criterion_main!(benches);
