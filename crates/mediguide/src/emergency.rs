use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

const MAPS_SEARCH_BASE: &str = "https://www.google.com/maps/search/";

/// Escaped in the location query: everything except unreserved characters and `/`.
const LOCATION: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// Maps search link for the nearest ambulance service.
///
/// Without a location the search is relative to the user's device. Any
/// non-empty location is encoded as given, whitespace included.
pub fn ambulance_map_link(location: Option<&str>) -> String {
    match location {
        Some(location) if !location.is_empty() => format!(
            "{MAPS_SEARCH_BASE}ambulance+near+{}",
            utf8_percent_encode(location, LOCATION)
        ),
        _ => format!("{MAPS_SEARCH_BASE}ambulance+near+me"),
    }
}

#[cfg(test)]
mod tests {
    use super::ambulance_map_link;

    #[test]
    fn defaults_to_near_me() {
        assert_eq!(
            ambulance_map_link(None),
            "https://www.google.com/maps/search/ambulance+near+me"
        );
        assert_eq!(
            ambulance_map_link(Some("")),
            "https://www.google.com/maps/search/ambulance+near+me"
        );
    }

    #[test]
    fn encodes_location() {
        assert_eq!(
            ambulance_map_link(Some("Main St, Springfield")),
            "https://www.google.com/maps/search/ambulance+near+Main%20St%2C%20Springfield"
        );
    }

    #[test]
    fn keeps_slashes_and_unreserved_characters() {
        let link = ambulance_map_link(Some("Block 4/B_north-side.~"));
        assert!(link.ends_with("ambulance+near+Block%204/B_north-side.~"), "{link}");
    }

    #[test]
    fn blank_location_is_encoded_not_dropped() {
        assert_eq!(
            ambulance_map_link(Some("   ")),
            "https://www.google.com/maps/search/ambulance+near+%20%20%20"
        );
    }

    #[test]
    fn non_ascii_is_utf8_encoded() {
        assert!(ambulance_map_link(Some("Zürich")).ends_with("near+Z%C3%BCrich"));
    }
}
