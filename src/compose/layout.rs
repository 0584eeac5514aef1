use crate::foundation::color::Rgba8;
use crate::foundation::core::{Point, Rect, Vec2};

/// Geometry and typography of the share image, in canvas pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct ShareLayout {
    pub title_top: f64,
    pub title_size: f32,
    pub title_color: Rgba8,
    pub subtitle_top: f64,
    pub subtitle_size: f32,
    pub subtitle_color: Rgba8,

    pub camera_center_y: f64,
    pub camera_radius: f64,
    pub ring_width: f64,
    pub placeholder_fill: Rgba8,
    pub placeholder_figure: Rgba8,

    /// Inset of the badge center from the circle's bounding corner.
    pub badge_inset: f64,
    pub badge_radius: f64,
    pub badge_rim: f64,
    pub badge_glyph_size: f32,
    pub badge_shadow: Rgba8,
    pub badge_shadow_blur: f64,
    pub badge_shadow_offset: Vec2,

    pub box_top: f64,
    pub box_width: f64,
    pub box_height: f64,
    pub box_corner_radius: f64,
    pub box_padding: f64,
    pub box_stroke_width: f64,
    pub box_alpha_start: u8,
    pub box_alpha_end: u8,
    pub question_size: f32,
    pub question_line_height: f64,
    pub question_color: Rgba8,

    /// Distance of the footer's top from the bottom edge.
    pub footer_bottom_offset: f64,
    pub footer_size: f32,
    pub footer_color: Rgba8,
}

impl Default for ShareLayout {
    fn default() -> Self {
        Self {
            title_top: 80.0,
            title_size: 48.0,
            title_color: Rgba8::rgb(0x33, 0x33, 0x33),
            subtitle_top: 150.0,
            subtitle_size: 24.0,
            subtitle_color: Rgba8::rgb(0x66, 0x66, 0x66),

            camera_center_y: 600.0,
            camera_radius: 350.0,
            ring_width: 12.0,
            placeholder_fill: Rgba8::rgb(0xe5, 0xe7, 0xeb),
            placeholder_figure: Rgba8::rgb(0x9c, 0xa3, 0xaf),

            badge_inset: 70.0,
            badge_radius: 45.0,
            badge_rim: 6.0,
            badge_glyph_size: 42.0,
            badge_shadow: Rgba8::rgba(0, 0, 0, 64),
            badge_shadow_blur: 16.0,
            badge_shadow_offset: Vec2::new(0.0, 6.0),

            box_top: 1100.0,
            box_width: 800.0,
            box_height: 400.0,
            box_corner_radius: 20.0,
            box_padding: 40.0,
            box_stroke_width: 3.0,
            box_alpha_start: 0x45,
            box_alpha_end: 0x20,
            question_size: 50.0,
            question_line_height: 60.0,
            question_color: Rgba8::rgb(0x33, 0x33, 0x33),

            footer_bottom_offset: 100.0,
            footer_size: 24.0,
            footer_color: Rgba8::rgb(0x88, 0x88, 0x88),
        }
    }
}

impl ShareLayout {
    pub fn camera_center(&self, canvas_width: u32) -> Point {
        Point::new(f64::from(canvas_width) / 2.0, self.camera_center_y)
    }

    /// Radius of the clip inside the ring.
    pub fn camera_clip_radius(&self) -> f64 {
        self.camera_radius - self.ring_width
    }

    /// Ring stroke runs along the middle of the ring band.
    pub fn ring_radius(&self) -> f64 {
        self.camera_radius - self.ring_width / 2.0
    }

    pub fn badge_center(&self, canvas_width: u32) -> Point {
        let c = self.camera_center(canvas_width);
        Point::new(
            c.x + self.camera_radius - self.badge_inset,
            c.y + self.camera_radius - self.badge_inset,
        )
    }

    pub fn riddle_box(&self, canvas_width: u32) -> Rect {
        let x0 = f64::from(canvas_width) / 2.0 - self.box_width / 2.0;
        Rect::new(
            x0,
            self.box_top,
            x0 + self.box_width,
            self.box_top + self.box_height,
        )
    }

    pub fn question_max_width(&self) -> f64 {
        self.box_width - self.box_padding * 2.0
    }
}

/// Destination rectangle that fills a `size`-wide square centered on `center` while keeping the
/// source aspect ratio. The constrained side equals `size`, the other overflows and is centered.
pub fn aspect_fill(src_width: u32, src_height: u32, center: Point, size: f64) -> Rect {
    let aspect = f64::from(src_width) / f64::from(src_height);
    let (w, h) = if aspect > 1.0 {
        (size * aspect, size)
    } else {
        (size, size / aspect)
    };
    Rect::from_center_size(center, (w, h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_geometry_matches_story_frame() {
        let l = ShareLayout::default();
        assert_eq!(l.camera_center(1080), Point::new(540.0, 600.0));
        assert_eq!(l.camera_clip_radius(), 338.0);
        assert_eq!(l.ring_radius(), 344.0);
        assert_eq!(l.badge_center(1080), Point::new(820.0, 880.0));
        assert_eq!(l.riddle_box(1080), Rect::new(140.0, 1100.0, 940.0, 1500.0));
        assert_eq!(l.question_max_width(), 720.0);
    }

    #[test]
    fn landscape_fill_takes_height() {
        let r = aspect_fill(1280, 720, Point::new(540.0, 600.0), 676.0);
        assert!((r.height() - 676.0).abs() < 1e-9);
        assert!((r.width() - 676.0 * 1280.0 / 720.0).abs() < 1e-9);
        assert!((r.center().x - 540.0).abs() < 1e-9);
        assert!((r.center().y - 600.0).abs() < 1e-9);
    }

    #[test]
    fn portrait_fill_takes_width() {
        let r = aspect_fill(720, 1280, Point::new(540.0, 600.0), 676.0);
        assert!((r.width() - 676.0).abs() < 1e-9);
        assert!((r.height() - 676.0 * 1280.0 / 720.0).abs() < 1e-9);
    }

    #[test]
    fn square_fill_is_exact() {
        let r = aspect_fill(500, 500, Point::new(10.0, 10.0), 20.0);
        assert_eq!(r, Rect::new(0.0, 0.0, 20.0, 20.0));
    }
}
