// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mandel::{render_threaded, ColorMapper, ImageParams, Schedule};

fn view() -> ImageParams {
    // Seahorse valley: rows differ a lot in cost.
    ImageParams::centered(-0.75, 0.1, 0.1, 200, 200, 500)
}

fn schedules(c: &mut Criterion) {
    let params = view();
    let colors = ColorMapper::default();
    let threads = num_cpus::get().max(2);

    c.bench_function("single thread", |b| {
        b.iter(|| render_threaded(black_box(&params), &colors, 1, Schedule::Static).unwrap())
    });
    c.bench_function("static bands", |b| {
        b.iter(|| render_threaded(black_box(&params), &colors, threads, Schedule::Static).unwrap())
    });
    c.bench_function("work stealing", |b| {
        b.iter(|| render_threaded(black_box(&params), &colors, threads, Schedule::WorkStealing).unwrap())
    });
}

criterion_group!(benches, schedules);
criterion_main!(benches);
