use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::capture::camera::{
    CameraBackend, CameraConstraints, CameraError, CameraSession, ContextSecurity,
};
use crate::catalog::Riddle;
use crate::compose::Compositor;
use crate::config::ThemeConfig;
use crate::encode::{ImageCrateEncoder, ImageEncoder, encode_with_timeout};
use crate::foundation::error::{RiddleError, RiddleResult};
use crate::media::VideoFrame;
use crate::share::{NativeShare, NoNativeShare, ShareDispatcher, ShareFile, ShareOutcome};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureSettings {
    pub constraints: CameraConstraints,
    /// Upper bound on waiting for a decodable frame before using the placeholder.
    pub ready_timeout: Duration,
    pub ready_poll: Duration,
    pub security: ContextSecurity,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            constraints: CameraConstraints::default(),
            ready_timeout: Duration::from_secs(3),
            ready_poll: Duration::from_millis(100),
            security: ContextSecurity::local(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureOutcome {
    Delivered(ShareOutcome),
    /// The overlay closed while the capture ran; nothing was shared or saved.
    Discarded,
}

/// Share overlay lifetime: camera session, one capture at a time, delivery.
///
/// All methods take `&self`. Locks are never held across an await, so `close` and
/// `retry_camera` may run while a capture is suspended.
pub struct CaptureOrchestrator<C, E = ImageCrateEncoder, S = NoNativeShare> {
    camera: C,
    compositor: Mutex<Compositor<E>>,
    dispatcher: ShareDispatcher<S>,
    theme: ThemeConfig,
    settings: CaptureSettings,
    session: Mutex<Option<CameraSession>>,
    camera_error: Mutex<Option<CameraError>>,
    in_flight: AtomicBool,
    open: AtomicBool,
    /// Bumped on close; work started under an older epoch is stale.
    epoch: AtomicU64,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<C, E, S> CaptureOrchestrator<C, E, S>
where
    C: CameraBackend,
    E: ImageEncoder,
    S: NativeShare,
{
    pub fn new(
        camera: C,
        compositor: Compositor<E>,
        dispatcher: ShareDispatcher<S>,
        theme: ThemeConfig,
        settings: CaptureSettings,
    ) -> Self {
        Self {
            camera,
            compositor: Mutex::new(compositor),
            dispatcher,
            theme,
            settings,
            session: Mutex::new(None),
            camera_error: Mutex::new(None),
            in_flight: AtomicBool::new(false),
            open: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    pub fn is_capturing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn has_stream(&self) -> bool {
        lock(&self.session).as_ref().is_some_and(CameraSession::is_live)
    }

    pub fn camera_error(&self) -> Option<CameraError> {
        lock(&self.camera_error).clone()
    }

    pub fn dispatcher(&self) -> &ShareDispatcher<S> {
        &self.dispatcher
    }

    /// Open the overlay and try the camera. A failure is recorded and returned, never raised.
    #[tracing::instrument(skip(self))]
    pub async fn open(&self) -> Option<CameraError> {
        self.open.store(true, Ordering::Release);
        self.acquire_camera().await
    }

    /// Release the current stream and acquire again from scratch.
    #[tracing::instrument(skip(self))]
    pub async fn retry_camera(&self) -> Option<CameraError> {
        if !self.is_open() {
            return Some(CameraError::Other("overlay is closed".to_owned()));
        }
        self.release_camera();
        self.acquire_camera().await
    }

    /// Close the overlay: stop all tracks now; any in-flight capture result is dropped.
    #[tracing::instrument(skip(self))]
    pub fn close(&self) {
        self.open.store(false, Ordering::Release);
        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.release_camera();
        *lock(&self.camera_error) = None;
        tracing::info!("share overlay closed");
    }

    fn release_camera(&self) {
        let session = lock(&self.session).take();
        drop(session);
    }

    async fn acquire_camera(&self) -> Option<CameraError> {
        *lock(&self.camera_error) = None;

        if !self.settings.security.allows_camera() {
            tracing::warn!(
                host = %self.settings.security.host,
                "insecure context; camera not requested"
            );
            return self.record_camera_error(CameraError::InsecureContext);
        }

        let epoch = self.epoch.load(Ordering::Acquire);
        let result = self.camera.request(&self.settings.constraints).await;
        if epoch != self.epoch.load(Ordering::Acquire) || !self.is_open() {
            if let Ok(mut stream) = result {
                tracing::debug!("camera granted after close; releasing");
                stream.stop();
            }
            return None;
        }

        match result {
            Ok(stream) => {
                let session = CameraSession::start(stream);
                tracing::info!(dims = ?session.dimensions(), "camera stream started");
                let previous = lock(&self.session).replace(session);
                drop(previous);
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "camera unavailable; continuing without video");
                self.record_camera_error(e)
            }
        }
    }

    fn record_camera_error(&self, e: CameraError) -> Option<CameraError> {
        *lock(&self.camera_error) = Some(e.clone());
        Some(e)
    }

    /// Poll the stream until a frame is decodable, up to the ready timeout.
    async fn wait_for_frame(&self) -> Option<VideoFrame> {
        let deadline = tokio::time::Instant::now() + self.settings.ready_timeout;
        loop {
            {
                let session = lock(&self.session);
                let live = session.as_ref()?;
                if live.ready_state().can_draw() {
                    return live.frame();
                }
            }
            if tokio::time::Instant::now() >= deadline {
                tracing::warn!(
                    timeout_ms = self.settings.ready_timeout.as_millis() as u64,
                    "camera not ready; using placeholder"
                );
                return None;
            }
            tokio::time::sleep(self.settings.ready_poll).await;
        }
    }

    /// Capture, compose and deliver one share image for `riddle`.
    #[tracing::instrument(skip(self, riddle), fields(color = %riddle.color, suit = %riddle.suit))]
    pub async fn capture(&self, riddle: &Riddle) -> RiddleResult<CaptureOutcome> {
        if !self.is_open() {
            return Err(RiddleError::OverlayClosed);
        }
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            tracing::debug!("capture already in flight; ignoring");
            return Err(RiddleError::CaptureInFlight);
        };
        let epoch = self.epoch.load(Ordering::Acquire);

        let frame = self.wait_for_frame().await;
        let request = self.theme.request_for(riddle);
        let filename = request.filename(&self.theme.filename_prefix);

        let (rendered, encoder, timeout) = {
            let mut compositor = lock(&self.compositor);
            let rendered = compositor.render(&request, frame.as_ref())?;
            (rendered, compositor.encoder(), compositor.encode_timeout())
        };
        let image = encode_with_timeout(
            encoder.as_ref(),
            rendered,
            request.format,
            request.quality,
            timeout,
        )
        .await?;

        if epoch != self.epoch.load(Ordering::Acquire) {
            tracing::info!("overlay closed during capture; discarding image");
            return Ok(CaptureOutcome::Discarded);
        }

        let file = ShareFile::from_image(image, filename)?;
        let outcome = self.dispatcher.dispatch(&file).await?;
        Ok(CaptureOutcome::Delivered(outcome))
    }
}
