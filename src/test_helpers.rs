//! Shared test utilities for the simple-invite test suite.
//!
//! Provides content-tree fixtures and in-memory [`FolderListing`]
//! implementations so gallery and pipeline tests never touch the network.

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::gallery::{FolderListing, GalleryError, ListingPage, RemoteFile};

// =========================================================================
// Fixture setup
// =========================================================================

/// Invitation text used across pipeline tests.
pub const SAMPLE_INVITATION: &str = "\
Save the date!
<invitation>
Groom: Durga Sai
Bride: Ashiervachita
Family Name: Ravuri

Wedding:
Date: 14 February 2027, 7:30 PM
Venue: Sri Venkateswara Kalyana Mandapam

Reception at Home:
12-4 Lake View Appratment
Road No. 3, Banjara Hills
</invitation>
";

/// Copy `fixtures/content/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write `invitation.txt` with [`SAMPLE_INVITATION`] into `root`.
pub fn write_invitation(root: &Path) {
    fs::write(root.join("invitation.txt"), SAMPLE_INVITATION).unwrap();
}

/// Create placeholder files in `root/gallery/`.
///
/// Contents are not decodable; use [`write_png`] when a real image is needed.
pub fn write_gallery(root: &Path, names: &[&str]) {
    let dir = root.join("gallery");
    fs::create_dir_all(&dir).unwrap();
    for name in names {
        fs::write(dir.join(name), b"not really an image").unwrap();
    }
}

/// Write a solid-colour PNG of the given size.
pub fn write_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    image::RgbImage::from_pixel(width, height, image::Rgb([200, 180, 120]))
        .save(path)
        .unwrap();
}

// =========================================================================
// Listing doubles
// =========================================================================

pub fn remote_file(id: &str, name: &str, mime_type: &str) -> RemoteFile {
    RemoteFile {
        id: id.to_string(),
        name: name.to_string(),
        mime_type: mime_type.to_string(),
    }
}

/// Serves fixed pages in order, linking them with `page-N` tokens.
pub struct PagedListing {
    pages: Vec<Vec<RemoteFile>>,
    tokens: RefCell<Vec<Option<String>>>,
}

impl PagedListing {
    pub fn new(pages: Vec<Vec<RemoteFile>>) -> Self {
        Self {
            pages,
            tokens: RefCell::new(Vec::new()),
        }
    }

    /// Page tokens received, in call order.
    pub fn tokens_seen(&self) -> Vec<Option<String>> {
        self.tokens.borrow().clone()
    }
}

impl FolderListing for PagedListing {
    fn list_page(
        &self,
        _folder_id: &str,
        _api_key: &str,
        page_token: Option<&str>,
    ) -> Result<ListingPage, GalleryError> {
        self.tokens.borrow_mut().push(page_token.map(str::to_string));
        let index = match page_token {
            None => 0,
            Some(t) => t.trim_start_matches("page-").parse::<usize>().unwrap(),
        };
        let next_page_token = (index + 1 < self.pages.len()).then(|| format!("page-{}", index + 1));
        Ok(ListingPage {
            files: self.pages[index].clone(),
            next_page_token,
        })
    }
}

/// Always fails, like an unreachable listing service.
pub struct FailingListing;

impl FolderListing for FailingListing {
    fn list_page(
        &self,
        _folder_id: &str,
        _api_key: &str,
        _page_token: Option<&str>,
    ) -> Result<ListingPage, GalleryError> {
        Err(GalleryError::Status(503))
    }
}

/// Hands back the same next-page token forever, like a listing service stuck
/// on one page.
pub struct LoopingListing {
    pub token: String,
    calls: RefCell<usize>,
}

impl LoopingListing {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            calls: RefCell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.borrow()
    }
}

impl FolderListing for LoopingListing {
    fn list_page(
        &self,
        _folder_id: &str,
        _api_key: &str,
        _page_token: Option<&str>,
    ) -> Result<ListingPage, GalleryError> {
        *self.calls.borrow_mut() += 1;
        Ok(ListingPage {
            files: vec![remote_file("loop", "loop.jpg", "image/jpeg")],
            next_page_token: Some(self.token.clone()),
        })
    }
}
