use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ink_layer::ink::{
    tessellator_for, Color, FrameContext, GeometryBuffer, InkDocument, InkSettings, InkStroke,
    LayeredTessellator, TessellationStrategy, Viewport,
};

fn wavy_stroke(offset: i32, samples: usize) -> InkStroke {
    let mut stroke = InkStroke::new(Color::BLACK);
    for i in 0..samples {
        let t = i as f32 * 0.15;
        let x = offset + i as i32 * 4;
        let y = 400 + (t.sin() * 120.0) as i32;
        stroke.add_point((x, y), 4.0 + (t.cos() * 3.0).abs() as f64);
    }
    stroke
}

fn bench_strategies(c: &mut Criterion) {
    let settings = InkSettings::default();
    let frame = FrameContext::new(Viewport::new(1920, 1080));
    let stroke = wavy_stroke(0, 400);

    for strategy in [
        TessellationStrategy::Ribbon,
        TessellationStrategy::Dots,
        TessellationStrategy::Adjacency,
    ] {
        let tessellator = tessellator_for(strategy, &settings);
        let mut out = GeometryBuffer::new(strategy.primitive());
        c.bench_function(&format!("tessellate_{}_400pts", strategy.as_label()), |b| {
            b.iter(|| {
                out.clear();
                tessellator.tessellate(black_box(&stroke), &frame, &mut out);
                out.vertex_count()
            })
        });
    }
}

fn bench_layered_frame(c: &mut Criterion) {
    let settings = InkSettings::default();
    let frame = FrameContext::new(Viewport::new(1920, 1080));
    let tessellator = tessellator_for(TessellationStrategy::Ribbon, &settings);

    let mut document = InkDocument::new();
    for i in 0..100 {
        *document.current_stroke_mut() = wavy_stroke(i * 10, 100);
        document.add_current_stroke(false);
    }
    *document.current_stroke_mut() = wavy_stroke(0, 200);

    let mut layers = LayeredTessellator::new();
    c.bench_function("layered_frame_100_committed", |b| {
        b.iter(|| layers.frame(black_box(&document), tessellator.as_ref(), &frame).vertex_count())
    });
}

criterion_group!(benches, bench_strategies, bench_layered_frame);
criterion_main!(benches);
