use super::*;

#[test]
fn story_canvas_is_portrait_1080x1920() {
    assert_eq!(Canvas::STORY.width, 1080);
    assert_eq!(Canvas::STORY.height, 1920);
    assert_eq!(Canvas::STORY.center_x(), 540.0);
    assert_eq!(Canvas::STORY.pixel_count(), 1080 * 1920);
}

#[test]
fn canvas_rejects_zero_and_oversized() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    assert_eq!(Canvas::new(64, 32).unwrap(), Canvas { width: 64, height: 32 });
}

#[test]
fn premul_round_trip_is_close() {
    let p = Rgba8Premul::from_straight_rgba(200, 100, 50, 128);
    assert_eq!(p.a, 128);
    let [r, g, b, a] = p.to_straight_rgba();
    assert_eq!(a, 128);
    assert!((i32::from(r) - 200).abs() <= 2);
    assert!((i32::from(g) - 100).abs() <= 2);
    assert!((i32::from(b) - 50).abs() <= 2);
}

#[test]
fn fully_transparent_unpremultiplies_to_zero() {
    let p = Rgba8Premul::from_straight_rgba(255, 255, 255, 0);
    assert_eq!(p.to_straight_rgba(), [0, 0, 0, 0]);
}

#[test]
fn opaque_colors_are_unchanged() {
    let p = Rgba8Premul::from_straight_rgba(12, 34, 56, 255);
    assert_eq!((p.r, p.g, p.b), (12, 34, 56));
    assert_eq!(p.to_straight_rgba(), [12, 34, 56, 255]);
}
