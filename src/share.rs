//! Delivery of a finished share image: native share when possible, download otherwise.

use std::future::Future;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::encode::EncodedImage;
use crate::foundation::error::{RiddleError, RiddleResult};

/// One file handed to a share target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareFile {
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ShareFile {
    pub fn new(
        filename: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> RiddleResult<Self> {
        let filename = filename.into();
        let bare = Path::new(&filename)
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n == filename);
        if filename.is_empty() || !bare {
            return Err(RiddleError::validation(format!(
                "share filename '{filename}' must be a bare file name"
            )));
        }
        Ok(Self {
            filename,
            mime: mime.into(),
            bytes,
        })
    }

    pub fn from_image(image: EncodedImage, filename: impl Into<String>) -> RiddleResult<Self> {
        let mime = image.mime_type();
        Self::new(filename, mime, image.bytes)
    }
}

/// Title and message passed along with a native share.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareMeta {
    pub title: String,
    pub text: String,
}

impl Default for ShareMeta {
    fn default() -> Self {
        Self {
            title: "GDG Noida Riddle Card".to_owned(),
            text: "Check out this riddle from GDG Noida!".to_owned(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ShareError {
    #[error("native share is not available")]
    Unavailable,

    #[error("native share cannot take '{0}' files")]
    Unsupported(String),

    #[error("share was cancelled")]
    Cancelled,

    #[error("share failed: {0}")]
    Failed(String),

    #[error("share io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Platform share sheet.
pub trait NativeShare: Send + Sync {
    fn is_available(&self) -> bool;

    /// Per-file check, after [`NativeShare::is_available`].
    fn can_share(&self, file: &ShareFile) -> bool;

    fn share(
        &self,
        file: &ShareFile,
        meta: &ShareMeta,
    ) -> impl Future<Output = Result<(), ShareError>> + Send;
}

/// No share capability; everything goes to download.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoNativeShare;

impl NativeShare for NoNativeShare {
    fn is_available(&self) -> bool {
        false
    }

    fn can_share(&self, _file: &ShareFile) -> bool {
        false
    }

    async fn share(&self, _file: &ShareFile, _meta: &ShareMeta) -> Result<(), ShareError> {
        Err(ShareError::Unavailable)
    }
}

/// Hands the image to an external program.
///
/// The file is staged in `staging_dir` and removed once the program exits. In `args`, `{file}`,
/// `{title}` and `{text}` are replaced; when no argument mentions `{file}` the path is appended.
#[derive(Clone, Debug)]
pub struct CommandShare {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub staging_dir: PathBuf,
}

impl CommandShare {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            staging_dir: std::env::temp_dir().join("riddlecard"),
        }
    }

    fn expand_args(&self, file: &Path, meta: &ShareMeta) -> Vec<String> {
        let path = file.to_string_lossy();
        let mut out: Vec<String> = self
            .args
            .iter()
            .map(|a| {
                a.replace("{file}", &path)
                    .replace("{title}", &meta.title)
                    .replace("{text}", &meta.text)
            })
            .collect();
        if !self.args.iter().any(|a| a.contains("{file}")) {
            out.push(path.into_owned());
        }
        out
    }
}

impl NativeShare for CommandShare {
    fn is_available(&self) -> bool {
        // Bare program names are resolved through PATH at spawn time.
        self.program.components().count() == 1 || self.program.is_file()
    }

    fn can_share(&self, file: &ShareFile) -> bool {
        file.mime.starts_with("image/") && !file.bytes.is_empty()
    }

    async fn share(&self, file: &ShareFile, meta: &ShareMeta) -> Result<(), ShareError> {
        tokio::fs::create_dir_all(&self.staging_dir).await?;
        let staged = self.staging_dir.join(&file.filename);
        tokio::fs::write(&staged, &file.bytes).await?;

        let args = self.expand_args(&staged, meta);
        tracing::debug!(program = %self.program.display(), ?args, "running share command");
        let status = tokio::process::Command::new(&self.program)
            .args(&args)
            .status()
            .await;
        if let Err(e) = tokio::fs::remove_file(&staged).await {
            tracing::debug!(path = %staged.display(), error = %e, "staged share file not removed");
        }
        let status = status
            .map_err(|e| ShareError::Failed(format!("spawn {}: {e}", self.program.display())))?;
        if status.success() {
            Ok(())
        } else {
            Err(ShareError::Failed(format!(
                "{} exited with {status}",
                self.program.display()
            )))
        }
    }
}

/// Download target directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadDir {
    pub dir: PathBuf,
}

impl DownloadDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write through a temporary `.part` file and rename it into place.
    pub async fn save(&self, file: &ShareFile) -> RiddleResult<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let dest = self.dir.join(&file.filename);
        let part = self.dir.join(format!(".{}.part", file.filename));

        if let Err(e) = tokio::fs::write(&part, &file.bytes).await {
            let _ = tokio::fs::remove_file(&part).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&part, &dest).await {
            let _ = tokio::fs::remove_file(&part).await;
            return Err(e.into());
        }
        Ok(dest)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Downloaded(PathBuf),
}

/// Native share first, download as the fallback for every share failure.
pub struct ShareDispatcher<S = NoNativeShare> {
    native: S,
    downloads: DownloadDir,
    meta: ShareMeta,
}

impl ShareDispatcher<NoNativeShare> {
    pub fn download_only(downloads: DownloadDir) -> Self {
        Self::new(NoNativeShare, downloads, ShareMeta::default())
    }
}

impl<S: NativeShare> ShareDispatcher<S> {
    pub fn new(native: S, downloads: DownloadDir, meta: ShareMeta) -> Self {
        Self {
            native,
            downloads,
            meta,
        }
    }

    pub fn native(&self) -> &S {
        &self.native
    }

    pub fn downloads(&self) -> &DownloadDir {
        &self.downloads
    }

    #[tracing::instrument(
        skip(self, file),
        fields(file = %file.filename, bytes = file.bytes.len())
    )]
    pub async fn dispatch(&self, file: &ShareFile) -> RiddleResult<ShareOutcome> {
        if self.native.is_available() && self.native.can_share(file) {
            match self.native.share(file, &self.meta).await {
                Ok(()) => {
                    tracing::info!("shared natively");
                    return Ok(ShareOutcome::Shared);
                }
                Err(e) => tracing::warn!(error = %e, "native share failed; downloading instead"),
            }
        } else {
            tracing::debug!("native share unavailable for this file; downloading");
        }

        let path = self.downloads.save(file).await?;
        tracing::info!(path = %path.display(), "image downloaded");
        Ok(ShareOutcome::Downloaded(path))
    }
}
