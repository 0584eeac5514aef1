//! Riddle cards with a shareable story image.
//!
//! - [`catalog`]: the color → suit → riddle table
//! - [`board`]: card selection and flip state machine
//! - [`compose`]: 1080×1920 share image layout, rasterized by [`render`] and encoded by [`encode`]
//! - [`capture`]: camera session and the capture → compose → share flow
//! - [`share`]: native share with download fallback
#![forbid(unsafe_code)]

mod foundation;

pub mod board;
pub mod capture;
pub mod catalog;
pub mod compose;
pub mod config;
pub mod encode;
pub mod loading;
pub mod media;
pub mod render;
pub mod share;
pub mod text;

pub use crate::foundation::color::Rgba8;
pub use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8Premul, Vec2};
pub use crate::foundation::error::{RiddleError, RiddleResult};

pub use crate::board::{BoardTiming, CardBoard, CardPhase, CardState, ClickOutcome};
pub use crate::capture::{
    CameraBackend, CameraError, CameraStream, CaptureOrchestrator, CaptureOutcome, NoCamera,
    StillImageCamera,
};
pub use crate::catalog::{Color, Riddle, RiddleCatalog, Suit};
pub use crate::compose::{CaptureRequest, Compositor, OutputFormat, ShareScene};
pub use crate::config::AppConfig;
pub use crate::encode::{EncodedImage, ImageCrateEncoder, ImageEncoder};
pub use crate::media::{ReadyState, VideoFrame};
pub use crate::render::FrameRGBA;
pub use crate::share::{ShareDispatcher, ShareFile, ShareOutcome};
