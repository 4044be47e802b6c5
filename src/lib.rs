//! # Simple Invite
//!
//! A static site generator for a single wedding-invitation page. The couple,
//! family name and events come from a plain-text `<invitation>` block; photos
//! come from a remote shared folder or, failing that, a local `gallery/`
//! directory.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Scan      content/  →  manifest.json    (invitation text + gallery listing)
//! 2. Generate  manifest  →  dist/            (index.html + local gallery images)
//! ```
//!
//! The manifest is human-readable JSON, so a scan can be inspected (or
//! hand-edited) before anything is written to `dist/`.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: reads config, invitation and gallery into a manifest |
//! | [`generate`] | Stage 2: publishes local images and writes the page |
//! | [`config`] | `config.toml` loading, validation, stock defaults and palette CSS |
//! | [`invitation`] | `<invitation>` block extraction and line parsing |
//! | [`gallery`] | Remote folder listing, local fallback, shuffle |
//! | [`imaging`] | Preview generation for local images |
//! | [`links`] | Map-search and RSVP mail links |
//! | [`render`] | Maud templates for the page |
//! | [`strip`] | Thumbnail-strip scroll and drag model |
//! | [`viewer`] | Lightbox state: navigation, focus trap, swipe, zoom and pan |
//! | [`starfield`] | Hero starfield animation model |
//! | [`output`] | CLI output formatting |
//!
//! # Interactive Widgets
//!
//! The strip, lightbox and starfield run in the browser from `static/app.js`.
//! Their behaviour is modelled in [`strip`], [`viewer`] and [`starfield`].
//! Each model's `runtime_settings()` is written by [`render`] as JSON into a
//! `data-settings` attribute, so the Rust models and the runtime share one
//! set of numbers.
//!
//! # Credentials Stay at Build Time
//!
//! The remote folder is listed while scanning. The page only ever contains
//! thumbnail URLs, never the listing key.

pub mod config;
pub mod gallery;
pub mod generate;
pub mod imaging;
pub mod invitation;
pub mod links;
pub mod output;
pub mod render;
pub mod scan;
pub mod starfield;
pub mod strip;
pub mod viewer;

#[cfg(test)]
pub(crate) mod test_helpers;
