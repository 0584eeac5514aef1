use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::media::{ReadyState, VideoFrame};

/// Why a camera could not be opened. Non-fatal: the overlay continues without video.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum CameraError {
    #[error("camera permission denied")]
    PermissionDenied,

    #[error("no camera found")]
    NotFound,

    #[error("camera capture is not supported here")]
    NotSupported,

    #[error("camera is in use by another application")]
    DeviceInUse,

    #[error("camera requires a secure context")]
    InsecureContext,

    #[error("camera error: {0}")]
    Other(String),
}

impl CameraError {
    /// Text shown under the camera preview.
    pub fn user_message(&self) -> &'static str {
        match self {
            CameraError::InsecureContext => {
                "Camera needs a secure connection. You can still capture without video."
            }
            _ => "Camera access denied. You can still capture without video.",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    #[default]
    User,
    Environment,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConstraints {
    pub facing: FacingMode,
    pub ideal_width: u32,
    pub ideal_height: u32,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            facing: FacingMode::User,
            ideal_width: 1280,
            ideal_height: 720,
        }
    }
}

/// Where the overlay runs. Camera access needs a secure origin, localhost excepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextSecurity {
    pub secure: bool,
    pub host: String,
}

impl ContextSecurity {
    /// A local desktop process.
    pub fn local() -> Self {
        Self {
            secure: true,
            host: "localhost".to_owned(),
        }
    }

    pub fn allows_camera(&self) -> bool {
        self.secure || is_local_host(&self.host)
    }
}

impl Default for ContextSecurity {
    fn default() -> Self {
        Self::local()
    }
}

fn is_local_host(host: &str) -> bool {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    host == "localhost"
        || host.ends_with(".localhost")
        || host == "::1"
        || host
            .parse::<std::net::Ipv4Addr>()
            .is_ok_and(|ip| ip.is_loopback())
}

/// A live camera stream bound to a video sink.
pub trait CameraStream: Send {
    /// Current video dimensions; `(0, 0)` until metadata arrives.
    fn dimensions(&self) -> (u32, u32);

    fn ready_state(&self) -> ReadyState;

    /// Latest decoded frame, if any.
    fn snapshot(&self) -> Option<VideoFrame>;

    fn play(&mut self);

    /// Stop every track. Idempotent.
    fn stop(&mut self);
}

/// Camera capability of the platform.
pub trait CameraBackend: Send + Sync {
    fn request(
        &self,
        constraints: &CameraConstraints,
    ) -> impl Future<Output = Result<Box<dyn CameraStream>, CameraError>> + Send;
}

/// Owned camera stream; tracks stop when the session is stopped or dropped.
pub struct CameraSession {
    stream: Option<Box<dyn CameraStream>>,
}

impl CameraSession {
    /// Take ownership of `stream` and start playback.
    pub fn start(mut stream: Box<dyn CameraStream>) -> Self {
        stream.play();
        Self {
            stream: Some(stream),
        }
    }

    pub fn is_live(&self) -> bool {
        self.stream.is_some()
    }

    pub fn ready_state(&self) -> ReadyState {
        self.stream
            .as_ref()
            .map_or(ReadyState::HaveNothing, |s| s.ready_state())
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.stream.as_ref().map_or((0, 0), |s| s.dimensions())
    }

    /// A frame worth drawing, or `None`.
    pub fn frame(&self) -> Option<VideoFrame> {
        let stream = self.stream.as_ref()?;
        if !stream.ready_state().can_draw() {
            return None;
        }
        stream.snapshot().filter(VideoFrame::is_drawable)
    }

    pub fn stop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            tracing::debug!("camera tracks stopped");
        }
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for CameraSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSession")
            .field("live", &self.is_live())
            .field("ready_state", &self.ready_state())
            .finish()
    }
}
