//! Background image loading.
//!
//! Decoding happens on a worker thread; the result is handed back over a
//! channel that the stage polls once per tick.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use image::RgbaImage;
use tracing::{debug, warn};

use crate::CloudError;

/// Decode an image from disk into RGBA pixels.
pub fn load_image(path: &Path) -> Result<RgbaImage, CloudError> {
    let image = image::open(path).map_err(|source| CloudError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgba8())
}

/// An image load in flight.
#[derive(Debug)]
pub struct PendingImage {
    path: PathBuf,
    rx: Receiver<Result<RgbaImage, CloudError>>,
}

impl PendingImage {
    /// Start loading `path` on a worker thread.
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (tx, rx) = mpsc::channel();
        let worker_path = path.clone();
        let spawned = thread::Builder::new()
            .name("image-loader".into())
            .spawn(move || {
                debug!(path = %worker_path.display(), "loading image");
                // The receiver may be gone if the load was superseded.
                let _ = tx.send(load_image(&worker_path));
            });
        if let Err(e) = spawned {
            // The sender went down with the closure, so polling reports a disconnect.
            warn!(error = %e, "failed to spawn image loader");
        }
        Self { path, rx }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The load result, once available. Yields at most one value.
    pub fn poll(&self) -> Option<Result<RgbaImage, CloudError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(Err(CloudError::Disconnected(self.path.clone())))
            }
        }
    }

    /// Block until the load finishes.
    #[cfg(test)]
    pub fn wait(self) -> Result<RgbaImage, CloudError> {
        self.rx
            .recv()
            .unwrap_or_else(|_| Err(CloudError::Disconnected(self.path)))
    }
}
