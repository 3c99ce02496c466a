use ink_layer::ink::ribbon::RibbonBuilder;
use ink_layer::ink::{
    Color, FrameContext, GeometryBuffer, InkDocument, InkStroke, PrimitiveKind, Rect, Tessellate,
    Viewport,
};

fn scenario_document() -> InkDocument {
    let mut document = InkDocument::new();
    let stroke = document.current_stroke_mut();
    stroke.set_color(Color::BLACK);
    for (x, y, w) in [(0, 0, 2.0), (10, 0, 3.0), (10, 10, 2.0), (20, 10, 4.0), (20, 20, 2.0)] {
        stroke.add_point((x, y), w);
    }
    document.add_current_stroke(true);
    document
}

#[test]
fn serialized_document_round_trips_exactly() {
    let document = scenario_document();
    let encoded = document.to_json_string();

    let decoded = InkDocument::from_json(&encoded);
    assert!(decoded.same_strokes(&document));
    assert_eq!(decoded.to_json_string(), encoded);
}

#[test]
fn committed_stroke_has_padded_bounds() {
    let document = scenario_document();
    let stroke: &InkStroke = &document.strokes()[0];
    assert_eq!(
        stroke.bound_rect(),
        Rect {
            x: -30,
            y: -30,
            width: 80,
            height: 80
        }
    );
}

#[test]
fn ribbon_has_one_chord_per_sample_pair() {
    let document = scenario_document();
    let ribbon = RibbonBuilder::default().ribbon(&document.strokes()[0]);
    assert_eq!(ribbon.chords.len(), 4);
    assert!(ribbon.chords.iter().all(|quad| quad.signed_area().abs() > 0.0));
    assert!(!ribbon.joins.is_empty());
}

#[test]
fn tessellated_frame_is_normalized_and_counter_clockwise() {
    let document = scenario_document();
    let frame = FrameContext::new(Viewport::new(1920, 1080));
    let mut out = GeometryBuffer::new(PrimitiveKind::Quads);
    RibbonBuilder::default().tessellate(&document.strokes()[0], &frame, &mut out);

    assert!(out
        .positions()
        .iter()
        .all(|[x, y, z]| x.abs() <= 1.0 && y.abs() <= 1.0 && *z == 0.0));
    for quad in out.positions().chunks_exact(4) {
        let origin = quad[0];
        let mut twice_area = 0.0;
        for i in 1..3 {
            let a = [quad[i][0] - origin[0], quad[i][1] - origin[1]];
            let b = [quad[i + 1][0] - origin[0], quad[i + 1][1] - origin[1]];
            twice_area += a[0] * b[1] - b[0] * a[1];
        }
        assert!(twice_area > 0.0);
    }
}
