//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the content root and is optional: stock defaults are used for every key it
//! does not mention.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! invitation_file = "invitation.txt"  # Text file holding the invitation block
//! section_tag = "invitation"          # <invitation> ... </invitation>
//!
//! [fallback]
//! groom = "Groom"
//! bride = "Bride"
//! family_name = "Family"
//!
//! [gallery]
//! dir = "gallery"           # Local images, used when no remote folder is set
//! # drive_folder_id = "..." # Remote folder listing (needs drive_api_key too)
//! # drive_api_key = "..."
//! preview_width = 480
//! full_width = 1920
//! page_size = 200
//!
//! [viewer]
//! swipe_threshold = 44.0
//! swipe_ratio = 1.2
//! zoom_min = 1.0
//! zoom_max = 4.0
//! zoom_step = 0.25
//!
//! [strip]
//! step_fraction = 0.6
//! drag_threshold = 6.0
//!
//! [starfield]
//! count = 110
//! max_dpr = 2.0
//!
//! [colors]
//! background = "#0b1026"
//! text = "#f5efe6"
//! accent = "#d8b46a"
//! card = "rgba(255, 255, 255, 0.06)"
//!
//! [processing]
//! max_processes = 4         # Max parallel preview workers (omit for auto)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Lowest lightbox zoom: the image at its fitted size.
pub const ZOOM_FLOOR: f64 = 1.0;
/// Highest lightbox zoom any config may ask for.
pub const ZOOM_CEILING: f64 = 4.0;

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Invitation text file, relative to the content root.
    pub invitation_file: String,
    /// Tag delimiting the invitation block inside that file.
    pub section_tag: String,
    /// Names used when the invitation text leaves them empty.
    pub fallback: FallbackConfig,
    /// Gallery sources (local folder, remote folder listing) and preview sizes.
    pub gallery: GalleryConfig,
    /// Lightbox gesture thresholds and zoom bounds.
    pub viewer: ViewerConfig,
    /// Thumbnail strip scrolling.
    pub strip: StripConfig,
    /// Background starfield animation.
    pub starfield: StarfieldConfig,
    /// Page palette.
    pub colors: ColorConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            invitation_file: "invitation.txt".to_string(),
            section_tag: "invitation".to_string(),
            fallback: FallbackConfig::default(),
            gallery: GalleryConfig::default(),
            viewer: ViewerConfig::default(),
            strip: StripConfig::default(),
            starfield: StarfieldConfig::default(),
            colors: ColorConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let v = &self.viewer;
        let floats = [
            ("viewer.swipe_threshold", v.swipe_threshold),
            ("viewer.swipe_ratio", v.swipe_ratio),
            ("viewer.zoom_min", v.zoom_min),
            ("viewer.zoom_max", v.zoom_max),
            ("viewer.zoom_step", v.zoom_step),
            ("strip.step_fraction", self.strip.step_fraction),
            ("strip.drag_threshold", self.strip.drag_threshold),
            ("starfield.max_dpr", self.starfield.max_dpr),
        ];
        if let Some((name, _)) = floats.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::Validation(format!("{name} must be a finite number")));
        }

        if v.zoom_min != ZOOM_FLOOR {
            return Err(ConfigError::Validation("viewer.zoom_min must be 1".into()));
        }
        if !(v.zoom_max > ZOOM_FLOOR && v.zoom_max <= ZOOM_CEILING) {
            return Err(ConfigError::Validation("viewer.zoom_max must be in (1, 4]".into()));
        }
        if v.zoom_step <= 0.0 {
            return Err(ConfigError::Validation("viewer.zoom_step must be positive".into()));
        }
        if v.swipe_threshold < 0.0 {
            return Err(ConfigError::Validation(
                "viewer.swipe_threshold must not be negative".into(),
            ));
        }
        if v.swipe_ratio < 1.0 {
            return Err(ConfigError::Validation("viewer.swipe_ratio must be >= 1".into()));
        }
        if !(self.strip.step_fraction > 0.0 && self.strip.step_fraction <= 1.0) {
            return Err(ConfigError::Validation(
                "strip.step_fraction must be in (0, 1]".into(),
            ));
        }
        if self.strip.drag_threshold < 0.0 {
            return Err(ConfigError::Validation(
                "strip.drag_threshold must not be negative".into(),
            ));
        }
        if self.starfield.count == 0 {
            return Err(ConfigError::Validation("starfield.count must be non-zero".into()));
        }
        if self.starfield.max_dpr < 1.0 {
            return Err(ConfigError::Validation("starfield.max_dpr must be >= 1".into()));
        }
        if self.gallery.preview_width == 0 || self.gallery.full_width == 0 {
            return Err(ConfigError::Validation(
                "gallery preview/full widths must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Names substituted for empty fields of the invitation text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FallbackConfig {
    pub groom: String,
    pub bride: String,
    pub family_name: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            groom: "Groom".to_string(),
            bride: "Bride".to_string(),
            family_name: "Family".to_string(),
        }
    }
}

/// Gallery sources and preview sizes.
///
/// The remote listing is used only when both `drive_folder_id` and
/// `drive_api_key` are set. The key is read at build time and never written
/// into the generated page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Local image folder, relative to the content root.
    pub dir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_folder_id: Option<String>,
    /// Never serialized, so it stays out of the scan manifest.
    #[serde(skip_serializing)]
    pub drive_api_key: Option<String>,
    /// Width (px) of strip previews.
    pub preview_width: u32,
    /// Width (px) requested for the lightbox image of remote entries.
    pub full_width: u32,
    /// Entries requested per listing page.
    pub page_size: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            dir: "gallery".to_string(),
            drive_folder_id: None,
            drive_api_key: None,
            preview_width: 480,
            full_width: 1920,
            page_size: 200,
        }
    }
}

impl GalleryConfig {
    /// Folder id and key, when both are present and non-blank.
    pub fn remote(&self) -> Option<(&str, &str)> {
        let folder = self.drive_folder_id.as_deref().map(str::trim)?;
        let key = self.drive_api_key.as_deref().map(str::trim)?;
        (!folder.is_empty() && !key.is_empty()).then_some((folder, key))
    }
}

/// Lightbox gesture and zoom tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Minimum horizontal travel (px) for a swipe.
    pub swipe_threshold: f64,
    /// Horizontal travel must exceed vertical travel by this factor.
    pub swipe_ratio: f64,
    pub zoom_min: f64,
    pub zoom_max: f64,
    /// Scale change per wheel notch.
    pub zoom_step: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: 44.0,
            swipe_ratio: 1.2,
            zoom_min: 1.0,
            zoom_max: 4.0,
            zoom_step: 0.25,
        }
    }
}

/// Thumbnail strip tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StripConfig {
    /// Fraction of the visible width scrolled by the prev/next buttons.
    pub step_fraction: f64,
    /// Pointer travel (px) that turns a press into a drag.
    pub drag_threshold: f64,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            step_fraction: 0.6,
            drag_threshold: 6.0,
        }
    }
}

/// Starfield tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StarfieldConfig {
    pub count: usize,
    /// Device pixel ratio cap for the canvas backing store.
    pub max_dpr: f64,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            count: 110,
            max_dpr: 2.0,
        }
    }
}

/// Page palette, emitted as CSS custom properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub background: String,
    pub text: String,
    pub accent: String,
    pub card: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: "#0b1026".to_string(),
            text: "#f5efe6".to_string(),
            accent: "#d8b46a".to_string(),
            card: "rgba(255, 255, 255, 0.06)".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel preview workers.
    /// When absent, defaults to the number of CPU cores.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least 1
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from the content root as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from the content root: user values over stock defaults,
/// unknown keys rejected, result validated.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Invite Configuration
# ===========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Text file (relative to the content root) holding the invitation block.
invitation_file = "invitation.txt"

# The block is delimited by <invitation> ... </invitation>.
section_tag = "invitation"

# ---------------------------------------------------------------------------
# Names shown when the invitation text leaves them empty (or fails to load)
# ---------------------------------------------------------------------------
[fallback]
groom = "Groom"
bride = "Bride"
family_name = "Family"

# ---------------------------------------------------------------------------
# Gallery
# ---------------------------------------------------------------------------
[gallery]
# Local image folder, used when no remote folder is configured or when the
# remote listing fails.
dir = "gallery"

# Remote folder listing. Both values are needed. The key is only used at
# build time and is not written into the page.
# drive_folder_id = ""
# drive_api_key = ""

# Strip preview width and lightbox width, in pixels.
preview_width = 480
full_width = 1920

# Entries requested per remote listing page.
page_size = 200

# ---------------------------------------------------------------------------
# Lightbox
# ---------------------------------------------------------------------------
[viewer]
# A swipe must travel this many pixels horizontally...
swipe_threshold = 44.0
# ...and be this many times longer horizontally than vertically.
swipe_ratio = 1.2
# zoom_min is fixed at 1; zoom_max may be anything above 1, up to 4.
zoom_min = 1.0
zoom_max = 4.0
# Scale change per wheel notch.
zoom_step = 0.25

# ---------------------------------------------------------------------------
# Thumbnail strip
# ---------------------------------------------------------------------------
[strip]
# Prev/next buttons scroll by this fraction of the visible width.
step_fraction = 0.6
# Pointer travel (px) before a press counts as a drag instead of a click.
drag_threshold = 6.0

# ---------------------------------------------------------------------------
# Starfield
# ---------------------------------------------------------------------------
[starfield]
count = 110
max_dpr = 2.0

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
background = "#0b1026"
text = "#f5efe6"
accent = "#d8b46a"
card = "rgba(255, 255, 255, 0.06)"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel preview workers. Omit to auto-detect (= CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {bg};
    --color-text: {text};
    --color-accent: {accent};
    --color-card: {card};
}}"#,
        bg = colors.background,
        text = colors.text,
        accent = colors.accent,
        card = colors.card,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_viewer_bounds() {
        let config = SiteConfig::default();
        assert_eq!(config.viewer.zoom_min, 1.0);
        assert_eq!(config.viewer.zoom_max, 4.0);
        assert_eq!(config.viewer.swipe_threshold, 44.0);
        assert_eq!(config.viewer.swipe_ratio, 1.2);
    }

    #[test]
    fn default_config_validates() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn stock_toml_matches_defaults() {
        let parsed: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(parsed.invitation_file, defaults.invitation_file);
        assert_eq!(parsed.viewer, defaults.viewer);
        assert_eq!(parsed.strip, defaults.strip);
        assert_eq!(parsed.starfield, defaults.starfield);
        assert_eq!(parsed.fallback.groom, "Groom");
        assert!(parsed.gallery.remote().is_none());
    }

    #[test]
    fn parse_partial_config() {
        let config: SiteConfig = toml::from_str(
            r#"
[fallback]
groom = "Sai"
"#,
        )
        .unwrap();
        assert_eq!(config.fallback.groom, "Sai");
        assert_eq!(config.fallback.bride, "Bride");
        assert_eq!(config.gallery.dir, "gallery");
    }

    #[test]
    fn unknown_keys_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[viewer]\nzoom_maxx = 3.0\n");
        assert!(result.is_err());
    }

    #[test]
    fn remote_requires_folder_and_key() {
        let mut gallery = GalleryConfig::default();
        assert!(gallery.remote().is_none());
        gallery.drive_folder_id = Some("abc".into());
        assert!(gallery.remote().is_none());
        gallery.drive_api_key = Some("   ".into());
        assert!(gallery.remote().is_none());
        gallery.drive_api_key = Some("key".into());
        assert_eq!(gallery.remote(), Some(("abc", "key")));
    }

    #[test]
    fn validate_rejects_inverted_zoom_bounds() {
        let mut config = SiteConfig::default();
        config.viewer.zoom_max = 1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_pins_zoom_floor() {
        let mut config = SiteConfig::default();
        config.viewer.zoom_min = 2.0;
        config.viewer.zoom_max = 4.0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        config.viewer.zoom_min = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_caps_zoom_max_at_four() {
        let mut config = SiteConfig::default();
        config.viewer.zoom_max = 10.0;
        assert!(config.validate().is_err());
        config.viewer.zoom_max = 4.0;
        assert!(config.validate().is_ok());
        config.viewer.zoom_max = 2.5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_finite_tunables() {
        let cases: [fn(&mut SiteConfig); 8] = [
            |c| c.viewer.swipe_threshold = f64::NAN,
            |c| c.viewer.swipe_ratio = f64::INFINITY,
            |c| c.viewer.zoom_min = f64::NAN,
            |c| c.viewer.zoom_max = f64::NAN,
            |c| c.viewer.zoom_step = f64::INFINITY,
            |c| c.strip.step_fraction = f64::NAN,
            |c| c.strip.drag_threshold = f64::NAN,
            |c| c.starfield.max_dpr = f64::INFINITY,
        ];
        for apply in cases {
            let mut config = SiteConfig::default();
            apply(&mut config);
            match config.validate() {
                Err(ConfigError::Validation(msg)) => assert!(msg.contains("finite"), "{msg}"),
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn validate_rejects_negative_thresholds() {
        let mut config = SiteConfig::default();
        config.strip.drag_threshold = -1.0;
        assert!(config.validate().is_err());
        let mut config = SiteConfig::default();
        config.viewer.swipe_threshold = -44.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_rejects_nan_zoom() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[viewer]\nzoom_max = nan\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn load_config_rejects_wide_zoom_range() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[viewer]\nzoom_min = 2.0\nzoom_max = 10.0\n",
        )
        .unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn validate_rejects_zero_stars() {
        let mut config = SiteConfig::default();
        config.starfield.count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn merge_preserves_unrelated_keys() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str("[strip]\nstep_fraction = 0.8\n").unwrap();
        let merged: SiteConfig = merge_toml(base, overlay).try_into().unwrap();
        assert_eq!(merged.strip.step_fraction, 0.8);
        assert_eq!(merged.strip.drag_threshold, 6.0);
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.section_tag, "invitation");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
invitation_file = "data.txt"

[gallery]
drive_folder_id = "folder"
drive_api_key = "key"
"#,
        )
        .unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.invitation_file, "data.txt");
        assert_eq!(config.gallery.remote(), Some(("folder", "key")));
        assert_eq!(config.gallery.preview_width, 480);
    }

    #[test]
    fn load_config_rejects_invalid_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[viewer]\nzoom_min = 0.5\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn generate_css_uses_config_colors() {
        let mut colors = ColorConfig::default();
        colors.accent = "#abcdef".to_string();
        let css = generate_color_css(&colors);
        assert!(css.contains("--color-accent: #abcdef"));
        assert!(css.contains("--color-bg: #0b1026"));
    }

    #[test]
    fn effective_threads_clamps_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = ProcessingConfig {
            max_processes: Some(cores + 10),
        };
        assert_eq!(effective_threads(&config), cores);
        let config = ProcessingConfig {
            max_processes: Some(0),
        };
        assert_eq!(effective_threads(&config), 1);
    }
}
