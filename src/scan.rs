//! Content scanning and manifest generation.
//!
//! Stage 1 of the build pipeline. Reads the content directory and produces a
//! [`Manifest`] that the generate stage consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! content/
//! ├── config.toml          # Site configuration (optional)
//! ├── invitation.txt       # Text holding the <invitation> block
//! └── gallery/             # Local images (fallback when no remote folder)
//!     ├── first-look.jpg
//!     └── ...
//! ```
//!
//! ## Failure Handling
//!
//! Only a broken `config.toml` stops the scan. Everything else degrades:
//!
//! - invitation unreadable or without its block → logged as an error; the
//!   manifest carries a visitor-facing notice and an empty invitation, so the
//!   page renders with fallback names and no events
//! - remote gallery unavailable → logged as a warning; local images are used
//!   and the page shows nothing about it

use crate::config::{self, SiteConfig};
use crate::gallery::{self, DriveListing, FolderListing, GalleryLoad};
use crate::invitation::{self, InvitationData};
use crate::render::LOAD_FAILURE_NOTICE;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Manifest output from the scan stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub invitation: InvitationData,
    /// Visitor-facing notice, set when the invitation failed to load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    /// Why the invitation failed to load (for the CLI, not the page).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
    pub gallery: GalleryLoad,
    pub config: SiteConfig,
}

/// Scan `root` using the live remote listing (when configured) and a
/// thread-local RNG for the gallery shuffle.
pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;

    let drive = match config.gallery.remote() {
        Some(_) => match DriveListing::new(config.gallery.page_size) {
            Ok(client) => Some(client),
            Err(e) => {
                log::warn!("cannot create listing client: {e}");
                None
            }
        },
        None => None,
    };
    let listing = drive.as_ref().map(|d| d as &dyn FolderListing);

    Ok(scan_with(root, config, listing, &mut rand::thread_rng()))
}

/// Scan with an already-loaded config and explicit listing/RNG.
pub fn scan_with<R: Rng + ?Sized>(
    root: &Path,
    config: SiteConfig,
    listing: Option<&dyn FolderListing>,
    rng: &mut R,
) -> Manifest {
    let invitation_path = root.join(&config.invitation_file);
    let (invitation, notice, load_error) =
        match invitation::load_invitation(&invitation_path, &config.section_tag) {
            Ok(data) => (data, None, None),
            Err(e) => {
                log::error!("invitation data unavailable: {e}");
                (
                    InvitationData::default(),
                    Some(LOAD_FAILURE_NOTICE.to_string()),
                    Some(e.to_string()),
                )
            }
        };

    let gallery = gallery::load_gallery(root, &config.gallery, listing, rng);

    Manifest {
        invitation,
        notice,
        load_error,
        gallery,
        config,
    }
}
