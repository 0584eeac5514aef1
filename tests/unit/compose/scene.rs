use super::*;
use crate::catalog::{Color, Riddle, Suit};
use crate::text::wrap::FixedAdvanceMetrics;

fn blue_heart() -> CaptureRequest {
    CaptureRequest::for_riddle(&Riddle {
        color: Color::Blue,
        suit: Suit::Heart,
        question: "I have cities, but no houses. I have mountains, but no trees. \
                   I have water, but no fish. What am I?"
            .to_owned(),
        answer: "A map".to_owned(),
    })
}

fn build(video: Option<&VideoFrame>) -> ShareScene {
    build_share_scene(
        &blue_heart(),
        &ShareLayout::default(),
        video,
        &mut FixedAdvanceMetrics::default(),
    )
}

#[test]
fn placeholder_without_video() {
    let scene = build(None);
    assert_eq!(scene.camera, CameraFill::Placeholder);
    assert!(!scene.ops.iter().any(|op| matches!(op, DrawOp::Video { .. })));
    assert_eq!(scene.canvas, Canvas::STORY);
}

#[test]
fn zero_sized_frame_falls_back_to_placeholder() {
    let frame = VideoFrame::new(0, 0, crate::media::ReadyState::HaveEnoughData, vec![]);
    assert_eq!(build(Some(&frame)).camera, CameraFill::Placeholder);
}

#[test]
fn drawable_frame_is_aspect_filled_inside_clip() {
    let frame = VideoFrame::solid(1280, 720, [10, 20, 30, 255]);
    let scene = build(Some(&frame));
    assert_eq!(scene.camera, CameraFill::Video);

    let pos = scene
        .ops
        .iter()
        .position(|op| matches!(op, DrawOp::Video { .. }))
        .expect("video op");
    assert!(matches!(scene.ops[pos - 1], DrawOp::PushClip { .. }));
    assert!(matches!(scene.ops[pos + 1], DrawOp::PopClip));

    let DrawOp::Video { dest, .. } = &scene.ops[pos] else {
        unreachable!()
    };
    assert!((dest.height() - 676.0).abs() < 1e-9);
    assert!((dest.center().x - 540.0).abs() < 1e-9);
    assert!((dest.center().y - 600.0).abs() < 1e-9);
}

#[test]
fn header_badge_and_footer_text() {
    let scene = build(None);
    let runs: Vec<&TextRun> = scene.text_runs().collect();

    let title = runs.iter().find(|r| r.text == "GDG Noida").expect("title");
    assert_eq!(title.style.role, FontRole::Bold);
    assert_eq!(title.anchor, Point::new(540.0, 80.0));

    let glyph = runs.iter().find(|r| r.text == "♥").expect("suit glyph");
    assert_eq!(glyph.color, Rgba8::rgb(0xef, 0x44, 0x44));
    assert_eq!(glyph.anchor, Point::new(820.0, 880.0));
    assert_eq!(glyph.baseline, TextBaseline::Middle);

    let footer = runs
        .iter()
        .find(|r| r.text == "Share your riddle moment with GDG Noida!")
        .expect("footer");
    assert_eq!(footer.anchor.y, 1820.0);
}

#[test]
fn question_block_is_centered_in_box() {
    let scene = build(None);
    let lines = &scene.question_lines;
    assert!(lines.len() > 1);

    let tops: Vec<f64> = scene
        .text_runs()
        .filter(|r| lines.contains(&r.text))
        .map(|r| r.anchor.y)
        .collect();
    assert_eq!(tops.len(), lines.len());

    let block = lines.len() as f64 * 60.0;
    assert!((tops[0] - (1300.0 - block / 2.0)).abs() < 1e-9);
    for pair in tops.windows(2) {
        assert!((pair[1] - pair[0] - 60.0).abs() < 1e-9);
    }
}

#[test]
fn box_and_ring_use_accent() {
    let scene = build(None);
    let accent = Rgba8::rgb(0x42, 0x85, 0xf4);
    let strokes: Vec<_> = scene
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Stroke { color, width, .. } => Some((*color, *width)),
            _ => None,
        })
        .collect();
    assert_eq!(strokes, vec![(accent, 12.0), (accent, 3.0)]);

    let gradient = scene.ops.iter().find_map(|op| match op {
        DrawOp::Fill {
            paint: Paint::Linear { from, to, start, .. },
            ..
        } if start.x > 0.0 => Some((*from, *to)),
        _ => None,
    });
    assert_eq!(
        gradient,
        Some((accent.with_alpha(0x45), accent.with_alpha(0x20)))
    );
}

#[test]
fn rounded_rect_stays_in_bounds() {
    let r = Rect::new(140.0, 1100.0, 940.0, 1500.0);
    let bbox = kurbo::Shape::bounding_box(&rounded_rect(r, 20.0));
    assert!((bbox.x0 - r.x0).abs() < 1e-9 && (bbox.x1 - r.x1).abs() < 1e-9);
    assert!((bbox.y0 - r.y0).abs() < 1e-9 && (bbox.y1 - r.y1).abs() < 1e-9);
}
