use criterion::{black_box, criterion_group, criterion_main, Criterion};
use visualiser::animation::{Rate, Tween, TweenRunner};
use visualiser::loading::ProgressTracker;
use visualiser::options::LoadingOptions;
use visualiser::util::easing::EasingFunction;

fn easing_benchmark(c: &mut Criterion) {
    let f = EasingFunction::SmoothStep;
    c.bench_function("smoothstep_easing", |b| {
        b.iter(|| black_box(f.evaluate(black_box(0.5))));
    });
}

fn runner_tick_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("runner_tick");

    for count in [4usize, 16, 64] {
        group.bench_function(format!("{count}_fades"), |b| {
            b.iter(|| {
                let mut runner: TweenRunner<usize, ()> = TweenRunner::new();
                for key in 0..count {
                    let _ = runner.animate(
                        key,
                        Tween::new(0.0, 1.0, Rate::Linear(0.06)),
                        (),
                    );
                }
                let mut sum = 0.0;
                while runner.is_active() {
                    runner.tick(|frame| sum += frame.value);
                }
                black_box(sum)
            });
        });
    }
    group.finish();
}

fn progress_ramp_benchmark(c: &mut Criterion) {
    let options = LoadingOptions::default();
    c.bench_function("progress_ramp_12_items", |b| {
        b.iter(|| {
            let mut tracker = ProgressTracker::new(&options);
            for _ in 0..12 {
                tracker.item_start();
            }
            let mut frames = 0u32;
            while !tracker.tick().loaded {
                if frames % 5 == 0 && !tracker.all_loaded() {
                    tracker.item_end();
                }
                frames += 1;
            }
            black_box(frames)
        });
    });
}

criterion_group!(
    benches,
    easing_benchmark,
    runner_tick_benchmark,
    progress_ramp_benchmark
);
criterion_main!(benches);
