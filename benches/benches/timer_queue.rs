// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_timer::Timers;

fn bench_schedule_expire(c: &mut Criterion) {
    let mut group = c.benchmark_group("timers");
    for &n in &[256usize, 1024, 4096] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("schedule_expire_n{}", n), |b| {
            b.iter_batched(
                Timers::<usize>::new,
                |mut timers| {
                    for i in 0..n {
                        // Interleave deadlines so the queue is not filled in order.
                        let _ = timers.schedule(((i * 7919) % n) as u64, i);
                    }
                    let mut fired = 0;
                    for now in (0..n as u64).step_by(64) {
                        fired += timers.expire(now).len();
                    }
                    black_box(fired);
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("schedule_cancel_half_n{}", n), |b| {
            b.iter_batched(
                Timers::<usize>::new,
                |mut timers| {
                    let ids: Vec<_> = (0..n).map(|i| timers.schedule(300, i)).collect();
                    for id in ids.iter().step_by(2) {
                        black_box(timers.cancel(*id));
                    }
                    black_box(timers.expire(300).len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_schedule_expire);
criterion_main!(benches);
