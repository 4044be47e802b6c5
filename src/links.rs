//! Action links for event cards: RSVP by mail and a map search.
//!
//! Both builders are pure. Components are encoded the way a browser's
//! `encodeURIComponent` does it: spaces become `%20`, never `+`, and the
//! marks `! ' ( ) * ~` stay literal.

use url::form_urlencoded;

const MAPS_SEARCH: &str = "https://www.google.com/maps/search/?api=1&query=";

/// Percent-encode a URI component.
pub fn encode_component(s: &str) -> String {
    // byte_serialize yields each escaped byte as its own chunk, and a literal
    // '+' comes out as %2B, so a bare "+" chunk always stands for a space.
    form_urlencoded::byte_serialize(s.as_bytes())
        .map(|chunk| match chunk {
            "+" => "%20",
            "%21" => "!",
            "%27" => "'",
            "%28" => "(",
            "%29" => ")",
            "%7E" => "~",
            other => other,
        })
        .collect()
}

/// Map search URL for a venue (or, failing that, an event name).
pub fn maps_url(query: &str) -> String {
    format!("{MAPS_SEARCH}{}", encode_component(query))
}

/// Subject line of the RSVP mail.
pub fn rsvp_subject(family_name: &str, event_name: &str) -> String {
    format!("RSVP - {family_name} Wedding ({event_name})")
}

/// Body template of the RSVP mail, ready for the guest to fill in.
pub fn rsvp_body(couple: &str, event_name: &str) -> String {
    [
        format!("Couple: {couple}"),
        format!("Event: {event_name}"),
        String::new(),
        "Name:".to_string(),
        "Attending: Yes / No".to_string(),
        "Guests:".to_string(),
        String::new(),
        "Message:".to_string(),
    ]
    .join("\n")
}

/// `mailto:` link with no recipient and a prefilled subject and body.
pub fn mailto_rsvp(family_name: &str, couple: &str, event_name: &str) -> String {
    format!(
        "mailto:?subject={}&body={}",
        encode_component(&rsvp_subject(family_name, event_name)),
        encode_component(&rsvp_body(couple, event_name)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_uses_percent_twenty_for_spaces() {
        assert_eq!(encode_component("Hall X"), "Hall%20X");
    }

    #[test]
    fn encode_keeps_literal_plus_distinct() {
        assert_eq!(encode_component("a+b c"), "a%2Bb%20c");
    }

    #[test]
    fn encode_escapes_reserved_and_unicode() {
        assert_eq!(encode_component("a&b=c/d?"), "a%26b%3Dc%2Fd%3F");
        assert_eq!(encode_component("é"), "%C3%A9");
        assert_eq!(encode_component("line\nbreak"), "line%0Abreak");
    }

    #[test]
    fn encode_leaves_unreserved_marks_literal() {
        assert_eq!(encode_component("(Ceremony)"), "(Ceremony)");
        assert_eq!(encode_component("it's ~fun~!*"), "it's%20~fun~!*");
        assert_eq!(encode_component("A-Z_a.z"), "A-Z_a.z");
    }

    #[test]
    fn encode_escapes_percent_before_marks() {
        assert_eq!(encode_component("%28"), "%2528");
        assert_eq!(encode_component("100% (approx)"), "100%25%20(approx)");
    }

    #[test]
    fn maps_url_encodes_query() {
        assert_eq!(
            maps_url("Hall X, Road 3"),
            "https://www.google.com/maps/search/?api=1&query=Hall%20X%2C%20Road%203"
        );
    }

    #[test]
    fn rsvp_subject_format() {
        assert_eq!(rsvp_subject("Ravuri", "Wedding"), "RSVP - Ravuri Wedding (Wedding)");
    }

    #[test]
    fn rsvp_body_has_fixed_lines() {
        let body = rsvp_body("A & B", "Sangeet");
        let lines: Vec<&str> = body.split('\n').collect();
        assert_eq!(
            lines,
            [
                "Couple: A & B",
                "Event: Sangeet",
                "",
                "Name:",
                "Attending: Yes / No",
                "Guests:",
                "",
                "Message:",
            ]
        );
    }

    #[test]
    fn mailto_is_deterministic_and_encoded() {
        let link = mailto_rsvp("C", "A & B", "Ceremony");
        assert_eq!(link, mailto_rsvp("C", "A & B", "Ceremony"));
        assert!(link.starts_with("mailto:?subject=RSVP%20-%20C%20Wedding%20(Ceremony)&body="));
        assert!(link.contains("&body=Couple%3A%20A%20%26%20B%0AEvent%3A%20Ceremony%0A%0AName%3A"));
        assert!(!link.contains('+'));
        assert!(!link.contains(' '));
    }
}
