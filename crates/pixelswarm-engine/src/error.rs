use std::path::PathBuf;

/// Failures while turning content into a point cloud.
///
/// The stage never surfaces these: it logs them and falls back to text.
#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    #[error("failed to load image {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image loader for {} stopped before delivering a result", .0.display())]
    Disconnected(PathBuf),
}
