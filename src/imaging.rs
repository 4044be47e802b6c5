//! Local gallery previews.
//!
//! Local images are published twice: the original as the lightbox image and
//! a downsized copy for the strip. Remote entries need none of this, the
//! listing service serves sized variants itself.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP, GIF) | `image` crate |
//! | Resize | `DynamicImage::resize` with `Lanczos3`, aspect preserved |
//! | Encode | `DynamicImage::save`, format from the output extension |
//! | Parallelism | `rayon` over all local entries |

use crate::gallery::{OUTPUT_DIR, Origin, ThumbnailEntry, preview_path};
use image::imageops::FilterType;
use image::{GenericImageView, ImageReader};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// What happened to one local entry.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewStatus {
    /// Preview written at the given width.
    Resized { width: u32 },
    /// Source already narrow enough; copied unchanged.
    Copied,
    /// Source could not be decoded; the full image doubles as the preview.
    FullImage { reason: String },
}

/// Write a preview of `src` to `dst`, at most `width` pixels wide.
///
/// Never upscales: narrower sources are copied as-is.
pub fn make_preview(src: &Path, dst: &Path, width: u32) -> Result<PreviewStatus, ImagingError> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    let img = ImageReader::open(src)?.with_guessed_format()?.decode()?;
    let (w, h) = img.dimensions();
    if w <= width {
        fs::copy(src, dst)?;
        return Ok(PreviewStatus::Copied);
    }
    let height = ((h as f64) * (width as f64) / (w as f64)).round().max(1.0) as u32;
    img.resize(width, height, FilterType::Lanczos3).save(dst)?;
    Ok(PreviewStatus::Resized { width })
}

/// Copy every local entry into `output_dir` and build its preview.
///
/// Files land under their plain names; the entries' `src` fields are the
/// URL-encoded form of the same paths.
///
/// Entries whose preview fails fall back to their full image, so the returned
/// list always has the same length and order as `entries`. Only copy failures
/// of the full image are errors.
pub fn publish_local(
    entries: &mut [ThumbnailEntry],
    content_root: &Path,
    output_dir: &Path,
    width: u32,
) -> Result<Vec<PreviewStatus>, ImagingError> {
    entries
        .par_iter_mut()
        .map(|entry| {
            let Origin::Local { path } = &entry.origin else {
                return Ok(None);
            };
            let src = content_root.join(path);
            let file_name = Path::new(path)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.clone());
            let full: PathBuf = output_dir.join(OUTPUT_DIR).join(&file_name);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(&src, &full)?;

            let preview = output_dir.join(preview_path(&file_name, width));
            let status = match make_preview(&src, &preview, width) {
                Ok(status) => status,
                Err(e) => {
                    log::warn!("no preview for {}: {e}", src.display());
                    entry.display_src = entry.full_src.clone();
                    PreviewStatus::FullImage {
                        reason: e.to_string(),
                    }
                }
            };
            Ok(Some(status))
        })
        .collect::<Result<Vec<Option<PreviewStatus>>, ImagingError>>()
        .map(|statuses| statuses.into_iter().flatten().collect())
}
