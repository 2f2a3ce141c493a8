use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};

use pixelplane_core::{compute_grid, Bounds, Transform};
use pixelplane_render::{
    BuiltinShader, ComputeEngine, EventKind, FrameBuffer, Rgba, ViewportState,
};

fn setup(shader: BuiltinShader, w: u32, h: u32) -> (Arc<ViewportState>, ComputeEngine<BuiltinShader>) {
    let bounds = Bounds::centered(0.0, 0.0, 8.0, 6.0).unwrap();
    let state = Arc::new(ViewportState::new(bounds, w, h).unwrap());
    let engine = ComputeEngine::new(Arc::clone(&state), shader);
    (state, engine)
}

fn bench_full_pass(c: &mut Criterion) {
    for shader in [BuiltinShader::Checkerboard, BuiltinShader::Rings] {
        let (state, mut engine) = setup(shader, 640, 480);
        c.bench_function(&format!("pass_640x480_{}", shader.label()), |b| {
            b.iter(|| {
                state.set_event(EventKind::ViewChanged);
                engine.compute_pass().unwrap()
            });
        });
    }
}

fn bench_resample(c: &mut Criterion) {
    let frame = FrameBuffer::try_new(640, 480, Rgba::BACKDROP).unwrap();
    c.bench_function("resample_640x480_to_1280x960", |b| {
        b.iter(|| frame.resampled(1280, 960).unwrap());
    });
}

fn bench_grid(c: &mut Criterion) {
    let bounds = Bounds::centered(0.0, 0.0, 97.0, 61.0).unwrap();
    let transform = Transform::new(bounds, 1280, 800).unwrap();
    c.bench_function("grid_1280x800", |b| {
        b.iter(|| compute_grid(&transform));
    });
}

criterion_group!(benches, bench_full_pass, bench_resample, bench_grid);
criterion_main!(benches);
