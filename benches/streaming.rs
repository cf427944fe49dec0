use criterion::{Criterion, black_box, criterion_group, criterion_main};

use pepse::{App, Controls, Engine, GameConfig, StreamOp, StreamWindow, Terrain, Trees, WorldContext};

fn bench_walk_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream_walk");
    let ctx = WorldContext::from_config(&GameConfig::default());
    group.bench_function("terrain_trees_1000_steps", |b| {
        b.iter(|| {
            let mut engine = Engine::new();
            let mut terrain = Terrain::new(&ctx);
            let mut trees = Trees::new(&ctx);
            let mut window = StreamWindow::new(ctx.half_width(), 60);
            for step in 0..1000 {
                for op in window.advance(step * 5) {
                    match op {
                        StreamOp::Create { min, max } => {
                            terrain.create_in_range(&mut engine, min, max);
                            trees.create_in_range(&mut engine, &terrain, min, max);
                        }
                        StreamOp::Delete { min, max } => {
                            terrain.delete_in_range(&mut engine, min, max);
                            trees.delete_in_range(&mut engine, min, max);
                        }
                    }
                }
            }
            black_box(engine.objects.len());
        })
    });
    group.finish();
}

fn bench_height_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("height_field");
    let ctx = WorldContext::from_config(&GameConfig::default());
    let terrain = Terrain::new(&ctx);
    group.bench_function("ground_height_4096", |b| {
        b.iter(|| {
            let mut acc = 0.0f32;
            for x in 0..4096 {
                acc += terrain.ground_height_at(black_box(x as f32 * 30.0));
            }
            black_box(acc)
        })
    });
    group.finish();
}

fn bench_app_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("app");
    group.sample_size(20);
    group.bench_function("idle_600_frames", |b| {
        b.iter(|| {
            let mut app = App::new(GameConfig::default()).unwrap();
            for _ in 0..600 {
                app.step(1.0 / 60.0, Controls::default());
            }
            black_box(app.stats())
        })
    });
    group.finish();
}

criterion_group!(benches, bench_walk_window, bench_height_field, bench_app_frames);
criterion_main!(benches);
