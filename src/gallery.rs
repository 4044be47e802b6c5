//! Gallery loading.
//!
//! The strip is filled from one of two sources, in priority order:
//!
//! 1. **Remote folder listing**: when both `gallery.drive_folder_id` and
//!    `gallery.drive_api_key` are configured, the folder is listed page by
//!    page and every `image/*` entry becomes a thumbnail with a small preview
//!    URL and a larger full-resolution URL.
//! 2. **Local folder**: otherwise, or when the remote listing fails for any
//!    reason, the images in `content/<gallery.dir>/` are used.
//!
//! A remote failure is logged as a warning and recorded in
//! [`GalleryLoad::fallback_reason`]; it never reaches the rendered page.
//! Either way the final list is a shuffled permutation of the source set.

use crate::config::GalleryConfig;
use crate::links::encode_component;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;
use walkdir::WalkDir;

const DRIVE_FILES: &str = "https://www.googleapis.com/drive/v3/files";
const DRIVE_THUMBNAIL: &str = "https://drive.google.com/thumbnail";

/// Extensions picked up from the local gallery folder.
pub const LOCAL_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "avif"];

/// Output directory (relative to the site root) for local gallery files.
pub const OUTPUT_DIR: &str = "gallery";

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
    #[error("listing request failed with status {0}")]
    Status(u16),
    #[error("remote folder listed no images")]
    Empty,
    #[error("remote listing repeated page token {0}")]
    RepeatedToken(String),
    #[error("no listing client available")]
    NoClient,
}

/// Where a thumbnail came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Origin {
    /// File path relative to the content root.
    Local { path: String },
    /// Remote file id.
    Remote { id: String },
}

/// One gallery image as shown in the strip and the lightbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailEntry {
    /// Small preview shown in the strip.
    pub display_src: String,
    /// Large variant loaded by the lightbox.
    pub full_src: String,
    pub alt: String,
    pub origin: Origin,
}

/// Which source ended up filling the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GallerySource {
    Remote,
    Local,
}

/// Result of [`load_gallery`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryLoad {
    pub source: GallerySource,
    pub entries: Vec<ThumbnailEntry>,
    /// Why the remote listing was abandoned, when it was attempted and failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

/// A file entry from the remote listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
}

/// One page of the remote listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    #[serde(default)]
    pub files: Vec<RemoteFile>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// A paged folder listing service.
pub trait FolderListing {
    fn list_page(
        &self,
        folder_id: &str,
        api_key: &str,
        page_token: Option<&str>,
    ) -> Result<ListingPage, GalleryError>;
}

/// [`FolderListing`] backed by the Drive v3 `files.list` endpoint.
pub struct DriveListing {
    client: reqwest::blocking::Client,
    page_size: u32,
}

impl DriveListing {
    pub fn new(page_size: u32) -> Result<Self, GalleryError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("simple-invite/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(20))
            .build()?;
        Ok(Self { client, page_size })
    }

    fn page_url(
        &self,
        folder_id: &str,
        api_key: &str,
        page_token: Option<&str>,
    ) -> Result<Url, GalleryError> {
        let mut url = Url::parse(DRIVE_FILES)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("q", &format!("'{folder_id}' in parents and trashed=false"))
                .append_pair("fields", "nextPageToken,files(id,name,mimeType)")
                .append_pair("pageSize", &self.page_size.to_string())
                .append_pair("key", api_key);
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
        }
        Ok(url)
    }
}

impl FolderListing for DriveListing {
    fn list_page(
        &self,
        folder_id: &str,
        api_key: &str,
        page_token: Option<&str>,
    ) -> Result<ListingPage, GalleryError> {
        let url = self.page_url(folder_id, api_key, page_token)?;
        // Errors carry the request URL by default, which includes the key.
        let response = self.client.get(url).send().map_err(|e| e.without_url())?;
        let status = response.status();
        if !status.is_success() {
            return Err(GalleryError::Status(status.as_u16()));
        }
        response
            .json::<ListingPage>()
            .map_err(|e| e.without_url().into())
    }
}

/// List every image in a remote folder, following page tokens.
pub fn list_remote(
    listing: &dyn FolderListing,
    folder_id: &str,
    api_key: &str,
) -> Result<Vec<RemoteFile>, GalleryError> {
    let mut images = Vec::new();
    let mut seen_tokens: Vec<String> = Vec::new();
    let mut token: Option<String> = None;

    loop {
        let page = listing.list_page(folder_id, api_key, token.as_deref())?;
        images.extend(
            page.files
                .into_iter()
                .filter(|f| f.mime_type.starts_with("image/")),
        );
        match page.next_page_token.filter(|t| !t.is_empty()) {
            Some(next) if seen_tokens.contains(&next) => {
                return Err(GalleryError::RepeatedToken(next));
            }
            Some(next) => {
                seen_tokens.push(next.clone());
                token = Some(next);
            }
            None => break,
        }
    }

    if images.is_empty() {
        return Err(GalleryError::Empty);
    }
    Ok(images)
}

/// Human-readable alt text from a file name: extension dropped,
/// separators turned into spaces.
pub fn alt_from_name(name: &str, position: usize) -> String {
    let stem = Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let words = stem.replace(['-', '_'], " ");
    let words = words.split_whitespace().collect::<Vec<_>>().join(" ");
    if words.is_empty() {
        format!("Photo {position}")
    } else {
        words
    }
}

/// Build a thumbnail entry for a remote file.
pub fn remote_thumbnail(file: &RemoteFile, position: usize, cfg: &GalleryConfig) -> ThumbnailEntry {
    let id = encode_component(&file.id);
    let sized = |width: u32| format!("{DRIVE_THUMBNAIL}?id={id}&sz=w{width}");
    ThumbnailEntry {
        display_src: sized(cfg.preview_width),
        full_src: sized(cfg.full_width),
        alt: alt_from_name(&file.name, position),
        origin: Origin::Remote {
            id: file.id.clone(),
        },
    }
}

/// Percent-encode every segment of a site-relative path so it can be used
/// as a `src` or `href`. Separators stay as `/`.
pub fn url_path(path: &str) -> String {
    path.split('/').map(encode_component).collect::<Vec<_>>().join("/")
}

/// Output path (relative to the site root) of a local image's preview.
pub fn preview_path(file_name: &str, width: u32) -> String {
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match path.extension() {
        Some(ext) => format!(
            "{OUTPUT_DIR}/previews/{stem}-{width}.{}",
            ext.to_string_lossy().to_lowercase()
        ),
        None => format!("{OUTPUT_DIR}/previews/{stem}-{width}"),
    }
}

fn is_gallery_image(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|e| LOCAL_EXTENSIONS.contains(&e.as_str()))
}

/// List local gallery images, sorted by file name. The `src` fields are
/// URL-encoded; [`Origin::Local`] keeps the plain path on disk.
///
/// A missing folder yields an empty list; unreadable entries are skipped
/// with a warning.
pub fn scan_local(root: &Path, cfg: &GalleryConfig) -> Vec<ThumbnailEntry> {
    let dir = root.join(&cfg.dir);
    if !dir.is_dir() {
        log::info!("no local gallery at {}", dir.display());
        return Vec::new();
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(&dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("skipping unreadable gallery entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_gallery_image(entry.path()) {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let position = entries.len() + 1;
        entries.push(ThumbnailEntry {
            display_src: url_path(&preview_path(&file_name, cfg.preview_width)),
            full_src: url_path(&format!("{OUTPUT_DIR}/{file_name}")),
            alt: alt_from_name(&file_name, position),
            origin: Origin::Local {
                path: format!("{}/{file_name}", cfg.dir.trim_end_matches('/')),
            },
        });
    }
    entries
}

fn load_remote(
    listing: Option<&dyn FolderListing>,
    folder_id: &str,
    api_key: &str,
    cfg: &GalleryConfig,
) -> Result<Vec<ThumbnailEntry>, GalleryError> {
    let listing = listing.ok_or(GalleryError::NoClient)?;
    let files = list_remote(listing, folder_id, api_key)?;
    Ok(files
        .iter()
        .enumerate()
        .map(|(i, f)| remote_thumbnail(f, i + 1, cfg))
        .collect())
}

/// Load the gallery: remote listing if configured, local folder otherwise
/// or on any remote failure. The result is shuffled with `rng`.
pub fn load_gallery<R: Rng + ?Sized>(
    root: &Path,
    cfg: &GalleryConfig,
    listing: Option<&dyn FolderListing>,
    rng: &mut R,
) -> GalleryLoad {
    let mut fallback_reason = None;

    if let Some((folder_id, api_key)) = cfg.remote() {
        match load_remote(listing, folder_id, api_key, cfg) {
            Ok(mut entries) => {
                log::info!("listed {} remote gallery image(s)", entries.len());
                entries.shuffle(rng);
                return GalleryLoad {
                    source: GallerySource::Remote,
                    entries,
                    fallback_reason: None,
                };
            }
            Err(e) => {
                log::warn!("remote gallery unavailable, using local images: {e}");
                fallback_reason = Some(e.to_string());
            }
        }
    }

    let mut entries = scan_local(root, cfg);
    entries.shuffle(rng);
    GalleryLoad {
        source: GallerySource::Local,
        entries,
        fallback_reason,
    }
}
