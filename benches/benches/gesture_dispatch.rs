// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Size};
use understory_gesture::{GestureEngine, RawInput, RawTouch};
use understory_stage::{Content, LocalShape, QueryFilter, ShapeFlags, Stage};

struct Cell(Rect);

impl Content for Cell {
    type Bitmap = ();
    fn render(&self) {}
    fn contains(&self, local: Point) -> bool {
        self.0.contains(local)
    }
}

/// An `n` x `n` grid of overlapping cells, every other one draggable.
fn gen_grid_stage(n: usize, cell: f64) -> Stage<Cell> {
    let mut stage = Stage::new(Size::new(n as f64 * cell, n as f64 * cell));
    for y in 0..n {
        for x in 0..n {
            let mut flags = ShapeFlags::default();
            if (x + y) % 2 == 0 {
                flags |= ShapeFlags::DRAGGABLE;
            }
            stage.insert(
                Cell(Rect::new(0.0, 0.0, cell * 1.5, cell * 1.5)),
                LocalShape {
                    position: Point::new(x as f64 * cell, y as f64 * cell),
                    flags,
                },
            );
        }
    }
    stage
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_random_points(count: usize, extent: f64, seed: u64) -> Vec<Point> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| Point::new(rng.next_f64() * extent, rng.next_f64() * extent))
        .collect()
}

fn bench_hit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_test");
    for &n in &[16usize, 32, 64] {
        let stage = gen_grid_stage(n, 10.0);
        let points = gen_random_points(1024, n as f64 * 10.0, 0x5eed);
        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_function(format!("topmost_point_n{}", n), |b| {
            b.iter(|| {
                let hits = points
                    .iter()
                    .filter(|p| stage.hit_test_point(**p, QueryFilter::default()).is_some())
                    .count();
                black_box(hits);
            })
        });
    }
    group.finish();
}

fn bench_drag_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag_cycle");
    for &n in &[16usize, 32, 64] {
        group.throughput(Throughput::Elements(64));
        group.bench_function(format!("mouse_64_moves_n{}", n), |b| {
            b.iter_batched(
                || (gen_grid_stage(n, 10.0), GestureEngine::default()),
                |(mut stage, mut engine)| {
                    let mut events = engine
                        .pointer_down(&mut stage, &RawInput::mouse(Point::new(5.0, 5.0)), 0)
                        .len();
                    for i in 1..=64_u64 {
                        let p = Point::new(5.0 + i as f64, 5.0 + i as f64);
                        events += engine.pointer_move(&mut stage, &RawInput::mouse(p), i).len();
                    }
                    events += engine
                        .pointer_up(&mut stage, &RawInput::mouse(Point::new(69.0, 69.0)), 65)
                        .len();
                    black_box(events);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_multi_touch(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_touch");
    let n = 32;
    for &fingers in &[2u64, 5, 10] {
        let starts = gen_random_points(fingers as usize, n as f64 * 10.0, fingers);
        group.throughput(Throughput::Elements(fingers));
        group.bench_function(format!("start_move_end_f{}", fingers), |b| {
            b.iter_batched(
                || (gen_grid_stage(n, 10.0), GestureEngine::default()),
                |(mut stage, mut engine)| {
                    let at = |dx: f64| {
                        RawInput::touches(starts.iter().enumerate().map(|(i, p)| RawTouch {
                            id: i as u64,
                            client: Point::new(p.x + dx, p.y),
                        }))
                    };
                    let mut events = engine.pointer_down(&mut stage, &at(0.0), 0).len();
                    events += engine.pointer_move(&mut stage, &at(3.0), 16).len();
                    events += engine
                        .pointer_up(&mut stage, &RawInput::touches([]), 32)
                        .len();
                    black_box(events);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hit_test, bench_drag_cycle, bench_multi_touch);
criterion_main!(benches);
