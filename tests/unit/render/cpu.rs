use super::*;
use crate::compose::scene::CameraFill;
use crate::foundation::core::Canvas;
use crate::text::fonts::FontSet;
use crate::text::{FontRole, TextStyle};

fn scene(width: u32, height: u32, ops: Vec<DrawOp>) -> ShareScene {
    ShareScene {
        canvas: Canvas { width, height },
        ops,
        camera: CameraFill::Placeholder,
        question_lines: Vec::new(),
    }
}

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> BezPath {
    Rect::new(x0, y0, x1, y1).to_path(0.1)
}

fn render(s: &ShareScene) -> RiddleResult<FrameRGBA> {
    CpuRenderer::new().render(s, &mut TextLayoutEngine::new(FontSet::empty()))
}

#[test]
fn solid_fill_covers_its_path() {
    let s = scene(
        8,
        8,
        vec![DrawOp::Fill {
            path: rect(0.0, 0.0, 4.0, 8.0),
            paint: Paint::Solid(Rgba8::rgb(255, 0, 0)),
        }],
    );
    let frame = render(&s).unwrap();
    assert_eq!((frame.width, frame.height), (8, 8));
    assert!(frame.premultiplied);
    assert_eq!(frame.pixel(1, 4), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(6, 4), Some([0, 0, 0, 0]));
}

#[test]
fn vertical_gradient_runs_top_to_bottom() {
    let s = scene(
        4,
        64,
        vec![DrawOp::Fill {
            path: rect(0.0, 0.0, 4.0, 64.0),
            paint: Paint::Linear {
                start: Point::new(0.0, 0.0),
                end: Point::new(0.0, 64.0),
                from: Rgba8::WHITE,
                to: Rgba8::BLACK,
            },
        }],
    );
    let frame = render(&s).unwrap();
    let top = frame.pixel(2, 0).unwrap();
    let bottom = frame.pixel(2, 63).unwrap();
    assert!(top[0] > 240, "top {top:?}");
    assert!(bottom[0] < 15, "bottom {bottom:?}");
    assert_eq!(top[3], 255);
}

#[test]
fn clip_restricts_video() {
    let frame = VideoFrame::solid(2, 2, [0, 255, 0, 255]);
    let s = scene(
        10,
        10,
        vec![
            DrawOp::PushClip {
                path: rect(0.0, 0.0, 5.0, 10.0),
            },
            DrawOp::Video {
                frame,
                dest: Rect::new(0.0, 0.0, 10.0, 10.0),
            },
            DrawOp::PopClip,
        ],
    );
    let out = render(&s).unwrap();
    assert_eq!(out.pixel(2, 5), Some([0, 255, 0, 255]));
    assert_eq!(out.pixel(8, 5), Some([0, 0, 0, 0]));
}

#[test]
fn shadow_is_soft_and_offset() {
    let s = scene(
        100,
        100,
        vec![DrawOp::Shadow {
            center: Point::new(50.0, 50.0),
            radius: 20.0,
            color: Rgba8::rgba(0, 0, 0, 128),
            blur: 8.0,
            offset: Vec2::new(0.0, 10.0),
        }],
    );
    let out = render(&s).unwrap();
    let centre = out.pixel(50, 60).unwrap()[3];
    let rim = out.pixel(50, 82).unwrap()[3];
    let far = out.pixel(5, 5).unwrap()[3];
    assert!(centre > 100, "centre {centre}");
    assert!(rim > 0 && rim < centre, "rim {rim}");
    assert_eq!(far, 0);
}

#[test]
fn text_without_fonts_is_skipped() {
    let s = scene(
        32,
        32,
        vec![DrawOp::Text(TextRun {
            text: "hi".to_owned(),
            style: TextStyle::new(FontRole::Regular, 12.0),
            color: Rgba8::BLACK,
            anchor: Point::new(16.0, 4.0),
            baseline: TextBaseline::Top,
        })],
    );
    let mut renderer = CpuRenderer::new();
    let out = renderer
        .render(&s, &mut TextLayoutEngine::new(FontSet::empty()))
        .unwrap();
    assert_eq!(renderer.skipped_text_runs(), 1);
    assert!(out.data.iter().all(|&b| b == 0));
}

#[test]
fn unbalanced_clips_are_rejected() {
    let open = scene(
        4,
        4,
        vec![DrawOp::PushClip {
            path: rect(0.0, 0.0, 2.0, 2.0),
        }],
    );
    assert!(render(&open).is_err());
    assert!(render(&scene(4, 4, vec![DrawOp::PopClip])).is_err());
}
