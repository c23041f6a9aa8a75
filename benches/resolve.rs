use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dwd_global_radiation::{nearest_grid_point, GridDataset, GRID_RESOLUTION_DEG};

fn service_axis(start: f64) -> Vec<f64> {
    (0..221).map(|i| start + i as f64 * GRID_RESOLUTION_DEG).collect()
}

fn full_grid() -> GridDataset {
    let latitudes = service_axis(46.0);
    let longitudes = service_axis(5.0);
    let cells = latitudes.len() * longitudes.len();
    GridDataset {
        latitudes,
        longitudes,
        values: vec![0.0; cells],
        time_offsets: vec![56700.0],
        time_units: "seconds since 2024-05-27 00:00:00".to_string(),
        history: "Mon May 27 16:03:17 2024: cdo selname,SIS".to_string(),
    }
}

fn bench_resolve(c: &mut Criterion) {
    let dataset = full_grid();

    c.bench_function("nearest_grid_point", |b| {
        b.iter(|| nearest_grid_point(black_box(52.5186), black_box(13.4083), &dataset))
    });
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
