//! HTML rendering for the invitation page.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time templating; every
//! interpolated value is escaped, so invitation text can never inject markup.
//!
//! The page is a single document:
//!
//! ```text
//! canvas#star-canvas            starfield
//! header.hero                   #heroTitle, #names, #familyLine
//! p.notice                      only when the invitation failed to load
//! section#events                one article.event per event
//! section.gallery               strip + prev/next buttons (omitted if empty)
//! div#lightbox                  modal viewer (omitted if the gallery is empty)
//! script                        page runtime
//! ```
//!
//! Everything the runtime needs (thresholds, zoom bounds, star ranges) goes
//! out as a JSON `data-settings` attribute built from the widget models in
//! [`crate::strip`], [`crate::viewer`] and [`crate::starfield`], so the
//! script and the models work from the same numbers.

use crate::config::{FallbackConfig, SiteConfig};
use crate::gallery::ThumbnailEntry;
use crate::invitation::{EventRecord, InvitationData};
use crate::links::{mailto_rsvp, maps_url};
use crate::starfield::Starfield;
use crate::strip::Strip;
use crate::viewer::Lightbox;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::Serialize;

/// Shown in place of the event list when the invitation text can't be loaded.
pub const LOAD_FAILURE_NOTICE: &str =
    "We couldn't load the event details right now. Please check back a little later.";

/// Everything the page templates need besides the page data itself.
pub struct RenderContext<'a> {
    pub config: &'a SiteConfig,
    /// Full stylesheet (palette variables + static rules).
    pub css: &'a str,
    /// Page runtime, inlined at the end of the body.
    pub script: &'a str,
}

/// Data for one render of the page.
pub struct PageModel<'a> {
    pub invitation: &'a InvitationData,
    /// Visible notice for a failed data load.
    pub notice: Option<&'a str>,
    pub gallery: &'a [ThumbnailEntry],
}

/// Couple names with fallbacks applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Couple {
    pub groom: String,
    pub bride: String,
    pub family_name: String,
}

impl Couple {
    pub fn resolve(data: &InvitationData, fallback: &FallbackConfig) -> Self {
        let pick = |value: &str, default: &str| {
            if value.is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        };
        Self {
            groom: pick(&data.groom, &fallback.groom),
            bride: pick(&data.bride, &fallback.bride),
            family_name: pick(&data.family_name, &fallback.family_name),
        }
    }

    /// `"Groom & Bride"`, as used in the RSVP mail.
    pub fn joined(&self) -> String {
        format!("{} & {}", self.groom, self.bride)
    }

    pub fn page_title(&self) -> String {
        format!("{}'s Wedding Invitation", self.family_name)
    }
}

/// Venue text as displayed, with a known typo in the source data corrected.
pub fn display_venue(venue: &str) -> String {
    venue.replace("Appratment", "Apartment")
}

/// Row label for the venue: private homes get an address, not a venue.
pub fn venue_label(event_name: &str) -> &'static str {
    if event_name.to_lowercase().contains("home") {
        "Address"
    } else {
        "Venue"
    }
}

/// JSON for a widget's `data-settings` attribute. Falls back to an empty
/// object, which leaves the runtime on its built-in defaults.
pub fn settings_json<T: Serialize>(settings: &T) -> String {
    match serde_json::to_string(settings) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("widget settings not serializable: {e}");
            "{}".to_string()
        }
    }
}

/// Renders one event card.
pub fn render_event(event: &EventRecord, couple: &Couple) -> Markup {
    let venue = display_venue(&event.venue);
    let map_query = if venue.is_empty() {
        event.name.as_str()
    } else {
        venue.as_str()
    };

    html! {
        article.event {
            h2 { (event.name) }
            @if !event.date.is_empty() {
                div.event-row {
                    span.label { "Date" }
                    span.value { (event.date) }
                }
            }
            @if !venue.is_empty() {
                div.event-row {
                    span.label { (venue_label(&event.name)) }
                    span.value { (venue) }
                }
            }
            div.event-actions {
                a.btn.btn-primary href=(mailto_rsvp(&couple.family_name, &couple.joined(), &event.name)) {
                    "RSVP"
                }
                a.btn.btn-ghost href=(maps_url(map_query)) target="_blank" rel="noopener noreferrer" {
                    "Google Map"
                }
            }
        }
    }
}

fn render_hero(couple: &Couple) -> Markup {
    html! {
        header.hero {
            h1 #heroTitle { (couple.page_title()) }
            p #names {
                (couple.groom) " " span.amp { "&" } " " (couple.bride)
            }
            p #familyLine { "Family name: " (couple.family_name) }
        }
    }
}

/// Renders the thumbnail strip with its scroll buttons.
pub fn render_gallery(entries: &[ThumbnailEntry], ctx: &RenderContext) -> Markup {
    let strip = Strip::new(ctx.config.strip);
    html! {
        section.gallery aria-label="Photo gallery" {
            button.strip-nav.strip-prev type="button" aria-label="Scroll photos left" data-strip-prev { "‹" }
            div #gallery-strip .strip data-settings=(settings_json(&strip.runtime_settings())) {
                @for (i, entry) in entries.iter().enumerate() {
                    button.thumb type="button" id={ "thumb-" (i) } data-index=(i) data-full=(entry.full_src)
                        aria-label={ "Open photo: " (entry.alt) } {
                        img src=(entry.display_src) alt=(entry.alt) loading="lazy" draggable="false";
                    }
                }
            }
            button.strip-nav.strip-next type="button" aria-label="Scroll photos right" data-strip-next { "›" }
        }
    }
}

/// Renders the lightbox modal for `count` photos. Hidden until a thumbnail
/// is activated.
pub fn render_lightbox(count: usize, ctx: &RenderContext) -> Markup {
    let viewer = Lightbox::new(count, ctx.config.viewer);
    html! {
        div #lightbox .lightbox role="dialog" aria-modal="true" aria-label="Photo viewer" hidden
            data-settings=(settings_json(&viewer.runtime_settings())) {
            div.lightbox-backdrop data-lb-close {}
            button.lightbox-close type="button" aria-label="Close" data-lb-close data-lb-control { "×" }
            button.lightbox-prev type="button" aria-label="Previous photo" data-lb-prev data-lb-control { "‹" }
            div.lightbox-stage data-lb-stage {
                img.lightbox-image data-lb-image alt="";
            }
            button.lightbox-next type="button" aria-label="Next photo" data-lb-next data-lb-control { "›" }
        }
    }
}

/// Renders the complete invitation page.
pub fn render_page(ctx: &RenderContext, page: &PageModel) -> Markup {
    let couple = Couple::resolve(page.invitation, &ctx.config.fallback);
    let stars = Starfield::new(ctx.config.starfield);

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (couple.page_title()) }
                style { (PreEscaped(ctx.css)) }
            }
            body {
                canvas #star-canvas aria-hidden="true"
                    data-settings=(settings_json(&stars.runtime_settings())) {}
                main.page {
                    (render_hero(&couple))
                    @if let Some(notice) = page.notice {
                        p.notice role="alert" { (notice) }
                    }
                    section #events .events {
                        @for event in &page.invitation.events {
                            (render_event(event, &couple))
                        }
                    }
                    @if !page.gallery.is_empty() {
                        (render_gallery(page.gallery, ctx))
                    }
                }
                @if !page.gallery.is_empty() {
                    (render_lightbox(page.gallery.len(), ctx))
                }
                script { (PreEscaped(ctx.script)) }
            }
        }
    }
}
