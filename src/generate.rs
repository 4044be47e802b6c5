//! Page generation.
//!
//! Stage 2 of the build pipeline. Takes the scan manifest and writes the
//! finished site.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                   # The invitation page
//! └── gallery/                     # Only for a local gallery
//!     ├── first-look.jpg           # Full image, shown in the lightbox
//!     └── previews/
//!         └── first-look-480.jpg   # Strip preview
//! ```
//!
//! Remote galleries produce no files: their thumbnail URLs go straight into
//! the page.
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time and inlined into the page:
//! - `static/style.css`: base styles (palette variables injected from config)
//! - `static/app.js`: starfield, strip and lightbox runtime

use crate::config;
use crate::gallery::{GallerySource, Origin};
use crate::imaging::{self, ImagingError, PreviewStatus};
use crate::render::{self, PageModel, RenderContext};
use crate::scan::Manifest;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Imaging error: {0}")]
    Imaging(#[from] ImagingError),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/app.js");

/// Outcome of one generate run, for CLI output.
#[derive(Debug)]
pub struct GenerateReport {
    pub page: PathBuf,
    pub title: String,
    pub event_count: usize,
    pub gallery_source: GallerySource,
    pub gallery_photos: usize,
    /// One entry per local image: published name and what happened to its preview.
    pub previews: Vec<(String, PreviewStatus)>,
    pub notice: bool,
}

/// Read the manifest at `manifest_path` and generate the site.
pub fn generate(
    manifest_path: &Path,
    source_root: &Path,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    let manifest: Manifest = serde_json::from_str(&manifest_content)?;
    generate_from(manifest, source_root, output_dir)
}

/// Generate the site from an in-memory manifest.
pub fn generate_from(
    mut manifest: Manifest,
    source_root: &Path,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    fs::create_dir_all(output_dir)?;

    let statuses = imaging::publish_local(
        &mut manifest.gallery.entries,
        source_root,
        output_dir,
        manifest.config.gallery.preview_width,
    )?;
    let local_names = manifest
        .gallery
        .entries
        .iter()
        .filter_map(|e| match &e.origin {
            Origin::Local { path } => Some(path.clone()),
            Origin::Remote { .. } => None,
        });
    let previews: Vec<(String, PreviewStatus)> = local_names.zip(statuses).collect();

    let color_css = config::generate_color_css(&manifest.config.colors);
    let css = format!("{}\n\n{}", color_css, CSS_STATIC);
    let ctx = RenderContext {
        config: &manifest.config,
        css: &css,
        script: JS,
    };
    let page = PageModel {
        invitation: &manifest.invitation,
        notice: manifest.notice.as_deref(),
        gallery: &manifest.gallery.entries,
    };
    let html = render::render_page(&ctx, &page);

    let page_path = output_dir.join("index.html");
    fs::write(&page_path, html.into_string())?;
    log::debug!("wrote {}", page_path.display());

    let couple = render::Couple::resolve(&manifest.invitation, &manifest.config.fallback);
    Ok(GenerateReport {
        page: page_path,
        title: couple.page_title(),
        event_count: manifest.invitation.events.len(),
        gallery_source: manifest.gallery.source,
        gallery_photos: manifest.gallery.entries.len(),
        previews,
        notice: manifest.notice.is_some(),
    })
}
