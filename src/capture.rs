//! Camera acquisition and the capture → compose → share flow.

pub(crate) mod camera;
pub(crate) mod orchestrator;
pub(crate) mod still;

pub use camera::{
    CameraBackend, CameraConstraints, CameraError, CameraSession, CameraStream, ContextSecurity,
    FacingMode,
};
pub use orchestrator::{CaptureOrchestrator, CaptureOutcome, CaptureSettings};
pub use still::{NoCamera, StillImageCamera};
