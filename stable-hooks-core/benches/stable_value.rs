//! Render-loop cost of the stable hooks.

use std::rc::Rc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stable_hooks::{use_stable_callback, use_stable_getter, use_stable_value, Runtime};

fn stable_value(c: &mut Criterion) {
    let mut runtime = Runtime::new();
    let id = runtime.mount();
    let shared = Rc::new(vec![String::from("alpha"), String::from("beta")]);

    c.bench_function("stable_value/fresh_allocation", |b| {
        b.iter(|| {
            runtime
                .render(id, |cx| {
                    use_stable_value(cx, Rc::new(vec![String::from("alpha"), String::from("beta")]))
                })
                .unwrap()
        })
    });

    let id = runtime.mount();
    c.bench_function("stable_value/same_allocation", |b| {
        b.iter(|| {
            runtime
                .render(id, |cx| use_stable_value(cx, Rc::clone(&shared)))
                .unwrap()
        })
    });
}

fn stable_callback(c: &mut Criterion) {
    let mut runtime = Runtime::new();
    let id = runtime.mount();

    c.bench_function("stable_callback/render_and_call", |b| {
        b.iter(|| {
            let offset = black_box(3u64);
            let callback = runtime
                .render(id, |cx| {
                    use_stable_getter(cx, offset)?;
                    use_stable_callback(cx, move |n: u64| n + offset)
                })
                .unwrap();
            callback.call(black_box(39))
        })
    });
}

criterion_group!(benches, stable_value, stable_callback);
criterion_main!(benches);
