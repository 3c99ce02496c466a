use ink_layer::ink::document::parse_strokes;
use ink_layer::ink::{Color, InkDocument, InkEvent};
use serde_json::json;

#[test]
fn loads_strokes_from_json_fixture() {
    let fixture = json!([
        {"color": "#ff0000", "points": [{"x": 1, "y": 2, "w": 3}, {"x": 40, "y": 2, "w": 5.5}]},
        {"color": "#80000000", "points": []},
    ]);
    let mut document = InkDocument::new();
    assert!(document.from_json_string(&fixture.to_string()));

    assert_eq!(document.stroke_count(), 2);
    let first = &document.strokes()[0];
    assert_eq!(first.color(), Color::rgb(255, 0, 0));
    assert_eq!(first.points()[1].width, 5.5);
    assert_eq!(document.strokes()[1].color(), Color::rgba(0, 0, 0, 0x80));
}

#[test]
fn translucent_colors_survive_round_trip() {
    let fixture = json!([{"color": "#40112233", "points": [{"x": 0, "y": 0, "w": 1}]}]);
    let document = InkDocument::from_json(&fixture.to_string());
    let again = InkDocument::from_json(&document.to_json_string());
    assert!(again.same_strokes(&document));
    assert_eq!(again.strokes()[0].color(), Color::rgba(0x11, 0x22, 0x33, 0x40));
}

#[test]
fn rejected_input_clears_document() {
    let mut document = InkDocument::from_json(
        &json!([{"color": "#000000", "points": [{"x": 0, "y": 0, "w": 1}]}]).to_string(),
    );
    assert_eq!(document.stroke_count(), 1);
    document.drain_events();

    assert!(!document.from_json_string(&json!({"strokes": []}).to_string()));
    assert_eq!(document.stroke_count(), 0);
    assert_eq!(document.drain_events(), vec![InkEvent::Cleared]);
}

#[test]
fn unreadable_colors_keep_the_rest_of_the_document() {
    let fixture = json!([
        {"color": "#000000", "points": [{"x": 0, "y": 0, "w": 1}]},
        {"color": "", "points": [{"x": 5, "y": 5, "w": 2}]},
        {"color": "not a color", "points": []},
    ]);
    let mut document = InkDocument::new();
    assert!(document.from_json_string(&fixture.to_string()));
    assert_eq!(document.stroke_count(), 3);
    assert!(document.strokes()[1..]
        .iter()
        .all(|stroke| stroke.color() == Color::default()));

    let strokes = parse_strokes(&fixture.to_string()).unwrap();
    assert_eq!(strokes.len(), 3);
    assert!(parse_strokes("{}").is_err());
}

#[test]
fn merged_and_cloned_documents_compare_by_strokes() {
    let a = InkDocument::from_json(
        &json!([{"color": "#000000", "points": [{"x": 0, "y": 0, "w": 1}]}]).to_string(),
    );
    let mut b = InkDocument::new();
    b.clone_from_document(&a);
    assert!(b.same_strokes(&a));

    b.merge(&a);
    assert_eq!(b.stroke_count(), 2);
    assert!(!b.same_strokes(&a));
}
