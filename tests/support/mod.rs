#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use riddlecard::capture::{CameraConstraints, CameraStream};
use riddlecard::compose::OutputFormat;
use riddlecard::encode::encode_blocking;
use riddlecard::share::{NativeShare, ShareError, ShareMeta};
use riddlecard::{
    CameraBackend, CameraError, Color, FrameRGBA, ImageEncoder, ReadyState, Riddle, RiddleResult,
    ShareFile, Suit, VideoFrame,
};

pub fn out_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("test-out").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn blue_heart() -> Riddle {
    Riddle {
        color: Color::Blue,
        suit: Suit::Heart,
        question: "I have cities, but no houses. I have mountains, but no trees. \
                   I have water, but no fish. What am I?"
            .to_owned(),
        answer: "A map".to_owned(),
    }
}

#[derive(Default)]
pub struct CameraLog {
    pub requests: AtomicUsize,
    pub stops: AtomicUsize,
}

impl CameraLog {
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

/// Stream served by [`ScriptedCamera`].
#[derive(Clone, Debug)]
pub struct StreamSpec {
    pub frame: VideoFrame,
    /// Delay after play until frames decode; `None` never becomes ready.
    pub ready_after: Option<Duration>,
}

impl StreamSpec {
    pub fn ready(frame: VideoFrame) -> Self {
        Self {
            frame,
            ready_after: Some(Duration::ZERO),
        }
    }

    pub fn never_ready(frame: VideoFrame) -> Self {
        Self {
            frame,
            ready_after: None,
        }
    }
}

/// Camera that answers requests from a script, then repeats `fallback`.
pub struct ScriptedCamera {
    pub log: Arc<CameraLog>,
    script: Mutex<VecDeque<Result<StreamSpec, CameraError>>>,
    fallback: Result<StreamSpec, CameraError>,
}

impl ScriptedCamera {
    pub fn new(fallback: Result<StreamSpec, CameraError>) -> Self {
        Self {
            log: Arc::new(CameraLog::default()),
            script: Mutex::new(VecDeque::new()),
            fallback,
        }
    }

    pub fn then(self, step: Result<StreamSpec, CameraError>) -> Self {
        self.script.lock().unwrap().push_back(step);
        self
    }
}

impl CameraBackend for ScriptedCamera {
    async fn request(
        &self,
        _constraints: &CameraConstraints,
    ) -> Result<Box<dyn CameraStream>, CameraError> {
        self.log.requests.fetch_add(1, Ordering::SeqCst);
        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        let spec = step?;
        Ok(Box::new(ScriptedStream {
            spec,
            log: Arc::clone(&self.log),
            ready_at: None,
            stopped: false,
        }))
    }
}

struct ScriptedStream {
    spec: StreamSpec,
    log: Arc<CameraLog>,
    ready_at: Option<tokio::time::Instant>,
    stopped: bool,
}

impl CameraStream for ScriptedStream {
    fn dimensions(&self) -> (u32, u32) {
        (self.spec.frame.width, self.spec.frame.height)
    }

    fn ready_state(&self) -> ReadyState {
        match self.ready_at {
            Some(at) if !self.stopped && tokio::time::Instant::now() >= at => {
                self.spec.frame.ready_state
            }
            _ => ReadyState::HaveMetadata,
        }
    }

    fn snapshot(&self) -> Option<VideoFrame> {
        (!self.stopped).then(|| self.spec.frame.clone())
    }

    fn play(&mut self) {
        self.ready_at = self
            .spec
            .ready_after
            .map(|d| tokio::time::Instant::now() + d);
    }

    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.log.stops.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Native share that records what it was given.
#[derive(Clone, Default)]
pub struct RecordingShare {
    pub available: bool,
    pub fail: bool,
    pub shared: Arc<Mutex<Vec<(String, ShareMeta)>>>,
}

impl RecordingShare {
    pub fn working() -> Self {
        Self {
            available: true,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            available: true,
            fail: true,
            ..Self::default()
        }
    }

    pub fn shared(&self) -> Vec<String> {
        self.shared
            .lock()
            .unwrap()
            .iter()
            .map(|(f, _)| f.clone())
            .collect()
    }
}

impl NativeShare for RecordingShare {
    fn is_available(&self) -> bool {
        self.available
    }

    fn can_share(&self, file: &ShareFile) -> bool {
        file.mime.starts_with("image/")
    }

    async fn share(&self, file: &ShareFile, meta: &ShareMeta) -> Result<(), ShareError> {
        if self.fail {
            return Err(ShareError::Cancelled);
        }
        self.shared
            .lock()
            .unwrap()
            .push((file.filename.clone(), meta.clone()));
        Ok(())
    }
}

/// Encodes on the calling task, so paused-clock tests do not auto-advance past the timeout.
#[derive(Clone, Copy, Default)]
pub struct InlineEncoder;

impl ImageEncoder for InlineEncoder {
    async fn encode(
        &self,
        frame: FrameRGBA,
        format: OutputFormat,
        quality: f32,
    ) -> RiddleResult<Option<Vec<u8>>> {
        encode_blocking(&frame, format, quality).map(Some)
    }
}

/// Never completes.
#[derive(Clone, Copy, Default)]
pub struct StallingEncoder;

impl ImageEncoder for StallingEncoder {
    async fn encode(
        &self,
        _frame: FrameRGBA,
        _format: OutputFormat,
        _quality: f32,
    ) -> RiddleResult<Option<Vec<u8>>> {
        std::future::pending().await
    }
}

/// Finishes without data.
#[derive(Clone, Copy, Default)]
pub struct EmptyEncoder;

impl ImageEncoder for EmptyEncoder {
    async fn encode(
        &self,
        _frame: FrameRGBA,
        _format: OutputFormat,
        _quality: f32,
    ) -> RiddleResult<Option<Vec<u8>>> {
        Ok(None)
    }
}

/// Takes `delay` of (virtual) time, then yields a stub payload.
#[derive(Clone, Copy)]
pub struct SlowEncoder(pub Duration);

impl ImageEncoder for SlowEncoder {
    async fn encode(
        &self,
        _frame: FrameRGBA,
        _format: OutputFormat,
        _quality: f32,
    ) -> RiddleResult<Option<Vec<u8>>> {
        tokio::time::sleep(self.0).await;
        Ok(Some(b"\x89PNG stub".to_vec()))
    }
}
