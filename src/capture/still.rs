use std::path::Path;

use crate::capture::camera::{CameraBackend, CameraConstraints, CameraError, CameraStream};
use crate::foundation::error::RiddleResult;
use crate::media::{ReadyState, VideoFrame};

/// Serves a fixed photo as the live camera feed.
#[derive(Clone, Debug)]
pub struct StillImageCamera {
    frame: VideoFrame,
}

impl StillImageCamera {
    pub fn new(frame: VideoFrame) -> Self {
        Self { frame }
    }

    pub fn from_path(path: &Path) -> RiddleResult<Self> {
        Ok(Self::new(VideoFrame::from_image_path(path)?))
    }
}

impl CameraBackend for StillImageCamera {
    async fn request(
        &self,
        constraints: &CameraConstraints,
    ) -> Result<Box<dyn CameraStream>, CameraError> {
        tracing::debug!(
            ?constraints,
            width = self.frame.width,
            height = self.frame.height,
            "opening still-image camera"
        );
        Ok(Box::new(StillStream {
            frame: self.frame.clone(),
            playing: false,
            stopped: false,
        }))
    }
}

struct StillStream {
    frame: VideoFrame,
    playing: bool,
    stopped: bool,
}

impl CameraStream for StillStream {
    fn dimensions(&self) -> (u32, u32) {
        if self.stopped {
            return (0, 0);
        }
        (self.frame.width, self.frame.height)
    }

    fn ready_state(&self) -> ReadyState {
        match (self.stopped, self.playing) {
            (true, _) => ReadyState::HaveNothing,
            (false, false) => ReadyState::HaveMetadata,
            (false, true) => self.frame.ready_state,
        }
    }

    fn snapshot(&self) -> Option<VideoFrame> {
        (self.playing && !self.stopped).then(|| self.frame.clone())
    }

    fn play(&mut self) {
        self.playing = !self.stopped;
    }

    fn stop(&mut self) {
        self.stopped = true;
        self.playing = false;
    }
}

/// A platform without a usable camera; every request fails with one category.
#[derive(Clone, Debug)]
pub struct NoCamera {
    pub error: CameraError,
}

impl NoCamera {
    pub fn new(error: CameraError) -> Self {
        Self { error }
    }
}

impl Default for NoCamera {
    fn default() -> Self {
        Self::new(CameraError::NotFound)
    }
}

impl CameraBackend for NoCamera {
    async fn request(
        &self,
        _constraints: &CameraConstraints,
    ) -> Result<Box<dyn CameraStream>, CameraError> {
        Err(self.error.clone())
    }
}
