use std::path::Path;
use std::sync::Arc;

use crate::foundation::error::{RiddleError, RiddleResult};

/// Readiness ladder of a video sink, mirroring HTML media `readyState`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReadyState {
    HaveNothing = 0,
    HaveMetadata = 1,
    HaveCurrentData = 2,
    HaveFutureData = 3,
    HaveEnoughData = 4,
}

impl ReadyState {
    /// A frame can be decoded and drawn.
    pub fn can_draw(self) -> bool {
        self >= ReadyState::HaveCurrentData
    }
}

/// One decoded camera frame in straight-alpha RGBA8.
#[derive(Clone, Debug)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub ready_state: ReadyState,
    pub rgba8: Arc<Vec<u8>>,
}

impl VideoFrame {
    pub fn new(width: u32, height: u32, ready_state: ReadyState, rgba8: Vec<u8>) -> Self {
        Self {
            width,
            height,
            ready_state,
            rgba8: Arc::new(rgba8),
        }
    }

    /// Uniform color frame, handy for tests and demos.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let px = width as usize * height as usize;
        Self::new(width, height, ReadyState::HaveEnoughData, rgba.repeat(px))
    }

    /// Decode an image file into a ready frame.
    pub fn from_image_path(path: &Path) -> RiddleResult<Self> {
        let img = image::open(path)
            .map_err(|e| RiddleError::validation(format!("open image '{}': {e}", path.display())))?
            .to_rgba8();
        let (w, h) = img.dimensions();
        Ok(Self::new(w, h, ReadyState::HaveEnoughData, img.into_raw()))
    }

    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Positive dimensions, decodable state and a pixel buffer that matches the dimensions.
    ///
    /// Anything else is treated as "no camera" by the compositor.
    pub fn is_drawable(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.ready_state.can_draw()
            && self.rgba8.len() == self.width as usize * self.height as usize * 4
    }
}
