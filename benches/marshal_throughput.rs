//! Argument marshaling and lifecycle overhead benchmarks
//!
//! Measures the cost the bindings add around native calls:
//! - Building and freeing argv arrays of varying length (4, 16, 64, 256)
//! - A full create → init → run → exit → destroy cycle against the scripted
//!   backend
//!
//! Run benchmarks: `cargo bench --bench marshal_throughput`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use ghostscript::marshal::{CStringArray, NativeBytes};
use ghostscript::native::ScriptedApi;
use ghostscript::Ghostscript;
use std::hint::black_box;
use std::sync::Arc;

fn generate_args(count: usize) -> Vec<String> {
    std::iter::once("gs".to_string())
        .chain((1..count).map(|i| format!("-dOPTION{i}=/Value{i}")))
        .collect()
}

fn bench_argv_marshaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("argv_marshaling");
    for count in [4, 16, 64, 256] {
        let args = generate_args(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &args, |b, args| {
            b.iter(|| {
                let mut argv = CStringArray::new(black_box(args)).unwrap();
                black_box(argv.as_mut_ptr());
            })
        });
    }
    group.finish();
}

fn bench_native_string(c: &mut Criterion) {
    let source = "0 1 99 { pop } for showpage\n".repeat(64);
    let mut group = c.benchmark_group("native_bytes");
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("postscript_source", |b| {
        b.iter(|| {
            let text = NativeBytes::new(black_box(&source));
            black_box(text.native_len().unwrap());
        })
    });
    group.finish();
}

fn bench_lifecycle(c: &mut Criterion) {
    let api = Arc::new(ScriptedApi::new(915));
    let args = generate_args(12);
    c.bench_function("lifecycle_cycle", |b| {
        b.iter(|| {
            api.clear_calls();
            let mut gs = Ghostscript::builder()
                .with_shared_api(api.clone())
                .build()
                .unwrap();
            gs.init(&args).unwrap();
            black_box(gs.run_string("showpage").unwrap());
            gs.exit().unwrap();
            gs.destroy();
        })
    });
}

criterion_group!(
    benches,
    bench_argv_marshaling,
    bench_native_string,
    bench_lifecycle
);
criterion_main!(benches);
