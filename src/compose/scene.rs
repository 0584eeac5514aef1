use kurbo::Shape as _;

use crate::compose::layout::{ShareLayout, aspect_fill};
use crate::compose::request::CaptureRequest;
use crate::foundation::color::Rgba8;
use crate::foundation::core::{BezPath, Canvas, Point, Rect, Vec2};
use crate::media::VideoFrame;
use crate::text::wrap::{TextMeasure, wrap_lines};
use crate::text::{FontRole, TextStyle};

const PATH_TOLERANCE: f64 = 0.1;

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba8),
    /// Linear gradient from `from` at `start` to `to` at `end`, padded beyond both.
    Linear {
        start: Point,
        end: Point,
        from: Rgba8,
        to: Rgba8,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextBaseline {
    /// `anchor.y` is the top of the line box.
    Top,
    /// `anchor.y` is the vertical middle of the line box.
    Middle,
}

/// One horizontally centered line of text. `anchor.x` is the center.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub style: TextStyle,
    pub color: Rgba8,
    pub anchor: Point,
    pub baseline: TextBaseline,
}

#[derive(Clone, Debug)]
pub enum DrawOp {
    Fill {
        path: BezPath,
        paint: Paint,
    },
    Stroke {
        path: BezPath,
        color: Rgba8,
        width: f64,
    },
    PushClip {
        path: BezPath,
    },
    PopClip,
    /// Camera frame scaled into `dest`.
    Video {
        frame: VideoFrame,
        dest: Rect,
    },
    /// Blurred disc behind a round element.
    Shadow {
        center: Point,
        radius: f64,
        color: Rgba8,
        blur: f64,
        offset: Vec2,
    },
    Text(TextRun),
}

/// What ended up inside the camera circle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraFill {
    Video,
    Placeholder,
}

/// Backend-neutral draw list for one share image.
#[derive(Clone, Debug)]
pub struct ShareScene {
    pub canvas: Canvas,
    pub ops: Vec<DrawOp>,
    pub camera: CameraFill,
    pub question_lines: Vec<String>,
}

impl ShareScene {
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(run) => Some(run),
            _ => None,
        })
    }
}

fn circle(center: Point, radius: f64) -> BezPath {
    kurbo::Circle::new(center, radius).to_path(PATH_TOLERANCE)
}

fn rect_path(rect: Rect) -> BezPath {
    rect.to_path(PATH_TOLERANCE)
}

/// Rounded rectangle with quadratic corners.
pub fn rounded_rect(rect: Rect, radius: f64) -> BezPath {
    let (x0, y0, x1, y1) = (rect.x0, rect.y0, rect.x1, rect.y1);
    let r = radius.min(rect.width() / 2.0).min(rect.height() / 2.0).max(0.0);
    let mut p = BezPath::new();
    p.move_to((x0 + r, y0));
    p.line_to((x1 - r, y0));
    p.quad_to((x1, y0), (x1, y0 + r));
    p.line_to((x1, y1 - r));
    p.quad_to((x1, y1), (x1 - r, y1));
    p.line_to((x0 + r, y1));
    p.quad_to((x0, y1), (x0, y1 - r));
    p.line_to((x0, y0 + r));
    p.quad_to((x0, y0), (x0 + r, y0));
    p.close_path();
    p
}

/// Lay out the share image for `req`.
///
/// `video` is drawn only when [`VideoFrame::is_drawable`] holds; otherwise the placeholder
/// silhouette fills the circle.
pub fn build_share_scene(
    req: &CaptureRequest,
    layout: &ShareLayout,
    video: Option<&VideoFrame>,
    measure: &mut dyn TextMeasure,
) -> ShareScene {
    let canvas = req.canvas;
    let width = f64::from(canvas.width);
    let height = f64::from(canvas.height);
    let cx = canvas.center_x();
    let mut ops = Vec::with_capacity(24);

    ops.push(DrawOp::Fill {
        path: rect_path(Rect::new(0.0, 0.0, width, height)),
        paint: Paint::Linear {
            start: Point::new(0.0, 0.0),
            end: Point::new(0.0, height),
            from: req.background,
            to: req.background_end,
        },
    });

    ops.push(DrawOp::Text(TextRun {
        text: req.texts.title.clone(),
        style: TextStyle::new(FontRole::Bold, layout.title_size),
        color: layout.title_color,
        anchor: Point::new(cx, layout.title_top),
        baseline: TextBaseline::Top,
    }));
    ops.push(DrawOp::Text(TextRun {
        text: req.texts.subtitle.clone(),
        style: TextStyle::new(FontRole::Regular, layout.subtitle_size),
        color: layout.subtitle_color,
        anchor: Point::new(cx, layout.subtitle_top),
        baseline: TextBaseline::Top,
    }));

    // Camera circle.
    let center = layout.camera_center(canvas.width);
    let inner = layout.camera_clip_radius();
    ops.push(DrawOp::PushClip {
        path: circle(center, inner),
    });
    let camera = match video.filter(|v| v.is_drawable()) {
        Some(frame) => {
            ops.push(DrawOp::Video {
                frame: frame.clone(),
                dest: aspect_fill(frame.width, frame.height, center, inner * 2.0),
            });
            CameraFill::Video
        }
        None => {
            ops.push(DrawOp::Fill {
                path: rect_path(Rect::from_center_size(center, (inner * 2.0, inner * 2.0))),
                paint: Paint::Solid(layout.placeholder_fill),
            });
            ops.push(DrawOp::Fill {
                path: circle(center - Vec2::new(0.0, 30.0), 40.0),
                paint: Paint::Solid(layout.placeholder_figure),
            });
            ops.push(DrawOp::Fill {
                path: kurbo::Ellipse::new(center + Vec2::new(0.0, 60.0), (70.0, 50.0), 0.0)
                    .to_path(PATH_TOLERANCE),
                paint: Paint::Solid(layout.placeholder_figure),
            });
            CameraFill::Placeholder
        }
    };
    ops.push(DrawOp::PopClip);
    ops.push(DrawOp::Stroke {
        path: circle(center, layout.ring_radius()),
        color: req.accent,
        width: layout.ring_width,
    });

    // Suit badge.
    let badge = layout.badge_center(canvas.width);
    ops.push(DrawOp::Shadow {
        center: badge,
        radius: layout.badge_radius,
        color: layout.badge_shadow,
        blur: layout.badge_shadow_blur,
        offset: layout.badge_shadow_offset,
    });
    ops.push(DrawOp::Fill {
        path: circle(badge, layout.badge_radius),
        paint: Paint::Solid(req.accent),
    });
    ops.push(DrawOp::Fill {
        path: circle(badge, layout.badge_radius - layout.badge_rim),
        paint: Paint::Solid(Rgba8::WHITE),
    });
    ops.push(DrawOp::Text(TextRun {
        text: req.suit.glyph().to_string(),
        style: TextStyle::new(FontRole::Symbol, layout.badge_glyph_size),
        color: req.suit.ink(),
        anchor: badge,
        baseline: TextBaseline::Middle,
    }));

    // Riddle box.
    let bx = layout.riddle_box(canvas.width);
    let box_path = rounded_rect(bx, layout.box_corner_radius);
    ops.push(DrawOp::Fill {
        path: box_path.clone(),
        paint: Paint::Linear {
            start: Point::new(bx.x0, bx.y0),
            end: Point::new(bx.x1, bx.y1),
            from: req.accent.with_alpha(layout.box_alpha_start),
            to: req.accent.with_alpha(layout.box_alpha_end),
        },
    });
    ops.push(DrawOp::Stroke {
        path: box_path,
        color: req.accent,
        width: layout.box_stroke_width,
    });

    let question_style = TextStyle::new(FontRole::Regular, layout.question_size);
    let lines = wrap_lines(
        &req.question,
        question_style,
        layout.question_max_width(),
        measure,
    );
    let text_height = lines.len() as f64 * layout.question_line_height;
    let start_y = bx.center().y - text_height / 2.0;
    for (i, line) in lines.iter().enumerate() {
        ops.push(DrawOp::Text(TextRun {
            text: line.clone(),
            style: question_style,
            color: layout.question_color,
            anchor: Point::new(cx, start_y + i as f64 * layout.question_line_height),
            baseline: TextBaseline::Top,
        }));
    }

    ops.push(DrawOp::Text(TextRun {
        text: req.texts.footer.clone(),
        style: TextStyle::new(FontRole::Regular, layout.footer_size),
        color: layout.footer_color,
        anchor: Point::new(cx, height - layout.footer_bottom_offset),
        baseline: TextBaseline::Top,
    }));

    ShareScene {
        canvas,
        ops,
        camera,
        question_lines: lines,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/scene.rs"]
mod tests;
