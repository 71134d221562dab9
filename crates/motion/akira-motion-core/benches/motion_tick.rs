//! Frame and scroll costs for a page-sized scene.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use akira_motion_core::animations::{parallax, stagger_in};
use akira_motion_core::scroll::{batch, BatchConfig};
use akira_motion_core::{ElementSpec, MotionContext, Rect, TweenVars};

fn page(cards: usize) -> MotionContext {
    let mut cx = MotionContext::default();
    for i in 0..cards {
        cx.add_element(
            ElementSpec::new("div")
                .class("card")
                .rect(Rect::new(0.0, 900.0 + i as f32 * 240.0, 380.0, 200.0)),
        );
    }
    cx.add_element(
        ElementSpec::new("div")
            .class("bg")
            .rect(Rect::new(0.0, 400.0, 1280.0, 900.0)),
    );
    cx
}

fn bench_tick_stagger(c: &mut Criterion) {
    c.bench_function("tick_stagger_200", |b| {
        b.iter_batched(
            || {
                let mut cx = page(200);
                stagger_in(&mut cx, ".card", TweenVars::new());
                cx
            },
            |mut cx| {
                for _ in 0..60 {
                    black_box(cx.tick(1.0 / 60.0));
                }
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_scroll_sweep(c: &mut Criterion) {
    let mut cx = page(200);
    batch(&mut cx, ".card", BatchConfig::new());
    parallax(&mut cx, ".bg", 1.0, TweenVars::new());
    let bottom = cx.scene().document_height();

    c.bench_function("scroll_sweep_200_triggers", |b| {
        let mut y = 0.0;
        b.iter(|| {
            y = if y > bottom { 0.0 } else { y + 120.0 };
            cx.scroll_to(black_box(y));
            black_box(cx.tick(1.0 / 60.0))
        })
    });
}

criterion_group!(benches, bench_tick_stagger, bench_scroll_sweep);
criterion_main!(benches);
