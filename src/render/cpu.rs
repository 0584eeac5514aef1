use std::sync::Arc;

use kurbo::Shape as _;

use crate::compose::scene::{DrawOp, Paint, ShareScene, TextBaseline, TextRun};
use crate::foundation::color::Rgba8;
use crate::foundation::core::{Affine, BezPath, Point, Rect, Rgba8Premul, Vec2};
use crate::foundation::error::{RiddleError, RiddleResult};
use crate::media::VideoFrame;
use crate::render::FrameRGBA;
use crate::render::blur::{blur_rgba8_premul, kernel_radius};
use crate::text::engine::{TextBrushRgba8, TextLayoutEngine};

/// vello_cpu rasterizer for share scenes.
#[derive(Debug, Default)]
pub struct CpuRenderer {
    skipped_text_runs: usize,
}

impl CpuRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text runs left out of the last render because no font was available.
    pub fn skipped_text_runs(&self) -> usize {
        self.skipped_text_runs
    }

    #[tracing::instrument(level = "debug", skip_all, fields(ops = scene.ops.len()))]
    pub fn render(
        &mut self,
        scene: &ShareScene,
        text: &mut TextLayoutEngine,
    ) -> RiddleResult<FrameRGBA> {
        let width: u16 = scene
            .canvas
            .width
            .try_into()
            .map_err(|_| RiddleError::render("canvas width exceeds u16"))?;
        let height: u16 = scene
            .canvas
            .height
            .try_into()
            .map_err(|_| RiddleError::render("canvas height exceeds u16"))?;

        self.skipped_text_runs = 0;
        let mut ctx = vello_cpu::RenderContext::new(width, height);
        let mut clip_depth = 0usize;
        for op in &scene.ops {
            self.draw_op(&mut ctx, op, text, &mut clip_depth)?;
        }
        if clip_depth != 0 {
            return Err(RiddleError::render("scene leaves a clip layer open"));
        }

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        if self.skipped_text_runs > 0 {
            tracing::warn!(
                skipped = self.skipped_text_runs,
                "no font available; text was left out of the image"
            );
        }

        Ok(FrameRGBA {
            width: scene.canvas.width,
            height: scene.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn draw_op(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        op: &DrawOp,
        text: &mut TextLayoutEngine,
        clip_depth: &mut usize,
    ) -> RiddleResult<()> {
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match op {
            DrawOp::Fill { path, paint } => {
                match paint {
                    Paint::Solid(c) => ctx.set_paint(cpu_color(*c)),
                    Paint::Linear {
                        start,
                        end,
                        from,
                        to,
                    } => {
                        let (image, origin) =
                            gradient_image(path.bounding_box(), *start, *end, *from, *to)?;
                        ctx.set_paint_transform(affine_to_cpu(Affine::translate(origin)));
                        ctx.set_paint(image);
                    }
                }
                ctx.fill_path(&bezpath_to_cpu(path));
            }
            DrawOp::Stroke { path, color, width } => {
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                ctx.set_paint(cpu_color(*color));
                ctx.stroke_path(&bezpath_to_cpu(path));
            }
            DrawOp::PushClip { path } => {
                ctx.push_clip_layer(&bezpath_to_cpu(path));
                *clip_depth += 1;
            }
            DrawOp::PopClip => {
                if *clip_depth == 0 {
                    return Err(RiddleError::render("clip pop without matching push"));
                }
                ctx.pop_layer();
                *clip_depth -= 1;
            }
            DrawOp::Video { frame, dest } => draw_video(ctx, frame, *dest)?,
            DrawOp::Shadow {
                center,
                radius,
                color,
                blur,
                offset,
            } => draw_shadow(ctx, *center, *radius, *color, *blur, *offset)?,
            DrawOp::Text(run) => {
                if !self.draw_text(ctx, run, text) {
                    self.skipped_text_runs += 1;
                }
            }
        }
        Ok(())
    }

    /// Returns `false` when the run could not be drawn for lack of a font.
    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        run: &TextRun,
        text: &mut TextLayoutEngine,
    ) -> bool {
        if run.text.is_empty() {
            return true;
        }
        let Some(layout) = text.layout_line(&run.text, run.style, TextBrushRgba8::from(run.color))
        else {
            return false;
        };
        let Some(font) = text.font_data(run.style.role) else {
            return false;
        };

        let w = f64::from(layout.full_width());
        let h = f64::from(layout.height());
        let x = run.anchor.x - w / 2.0;
        let y = match run.baseline {
            TextBaseline::Top => run.anchor.y,
            TextBaseline::Middle => run.anchor.y - h / 2.0,
        };
        ctx.set_transform(affine_to_cpu(Affine::translate((x, y))));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };

                let brush = glyph_run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = glyph_run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(glyph_run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        true
    }
}

fn draw_video(
    ctx: &mut vello_cpu::RenderContext,
    frame: &VideoFrame,
    dest: Rect,
) -> RiddleResult<()> {
    if !frame.is_drawable() {
        return Err(RiddleError::render("video frame is not drawable"));
    }
    let premul: Vec<u8> = frame
        .rgba8
        .chunks_exact(4)
        .flat_map(|px| {
            let p = Rgba8Premul::from_straight_rgba(px[0], px[1], px[2], px[3]);
            [p.r, p.g, p.b, p.a]
        })
        .collect();
    let image = pixmap_image(image_premul_bytes_to_pixmap(&premul, frame.width, frame.height)?);

    let (fw, fh) = (f64::from(frame.width), f64::from(frame.height));
    let transform = Affine::translate((dest.x0, dest.y0))
        * Affine::scale_non_uniform(dest.width() / fw, dest.height() / fh);
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(image);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, fw, fh));
    Ok(())
}

fn draw_shadow(
    ctx: &mut vello_cpu::RenderContext,
    center: Point,
    radius: f64,
    color: Rgba8,
    blur: f64,
    offset: Vec2,
) -> RiddleResult<()> {
    if color.a == 0 || radius <= 0.0 {
        return Ok(());
    }
    // Canvas shadowBlur is twice the gaussian sigma.
    let sigma = (blur / 2.0) as f32;
    let pad = f64::from(kernel_radius(sigma)) + 1.0;
    let side_f = (2.0 * (radius + pad)).ceil();
    let side: u16 = (side_f as u32)
        .try_into()
        .map_err(|_| RiddleError::render("shadow extent exceeds u16"))?;

    let mut local = vello_cpu::RenderContext::new(side, side);
    local.set_paint(cpu_color(color));
    let disc = kurbo::Circle::new((side_f / 2.0, side_f / 2.0), radius).to_path(0.1);
    local.fill_path(&bezpath_to_cpu(&disc));
    let mut pixmap = vello_cpu::Pixmap::new(side, side);
    local.flush();
    local.render_to_pixmap(&mut pixmap);

    let bytes = pixmap.data_as_u8_slice();
    let blurred = blur_rgba8_premul(
        bytes,
        u32::from(side),
        u32::from(side),
        kernel_radius(sigma),
        sigma,
    )?;
    let image = pixmap_image(image_premul_bytes_to_pixmap(
        &blurred,
        u32::from(side),
        u32::from(side),
    )?);

    let origin = center + offset - Vec2::new(side_f / 2.0, side_f / 2.0);
    ctx.set_transform(affine_to_cpu(Affine::translate(origin.to_vec2())));
    ctx.set_paint(image);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, side_f, side_f));
    Ok(())
}

/// Rasterize a linear gradient covering `bounds`; returns the image and its placement offset.
fn gradient_image(
    bounds: Rect,
    start: Point,
    end: Point,
    from: Rgba8,
    to: Rgba8,
) -> RiddleResult<(vello_cpu::Image, Vec2)> {
    let x0 = bounds.x0.floor();
    let y0 = bounds.y0.floor();
    let w = ((bounds.x1.ceil() - x0).max(1.0)) as u32;
    let h = ((bounds.y1.ceil() - y0).max(1.0)) as u32;

    let a = Rgba8Premul::from_straight_rgba(from.r, from.g, from.b, from.a);
    let b = Rgba8Premul::from_straight_rgba(to.r, to.g, to.b, to.a);
    let axis = end - start;
    let len2 = axis.hypot2();

    let mut bytes = vec![0u8; (w as usize).saturating_mul(h as usize).saturating_mul(4)];
    for y in 0..h {
        for x in 0..w {
            let p = Point::new(x0 + f64::from(x) + 0.5, y0 + f64::from(y) + 0.5);
            let t = if len2 <= f64::EPSILON {
                0.0
            } else {
                ((p - start).dot(axis) / len2).clamp(0.0, 1.0)
            };
            let lerp = |a: u8, b: u8| -> u8 {
                let (af, bf) = (f64::from(a), f64::from(b));
                (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
            };
            let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
            bytes[idx..idx + 4].copy_from_slice(&[
                lerp(a.r, b.r),
                lerp(a.g, b.g),
                lerp(a.b, b.b),
                lerp(a.a, b.a),
            ]);
        }
    }

    let pixmap = image_premul_bytes_to_pixmap(&bytes, w, h)?;
    Ok((pixmap_image(pixmap), Vec2::new(x0, y0)))
}

fn cpu_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn pixmap_image(pixmap: vello_cpu::Pixmap) -> vello_cpu::Image {
    vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> RiddleResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| RiddleError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| RiddleError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(RiddleError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
