/// Address placeholders the legacy trip log used to mark odometer-only entries.
const READING_MARKERS: [&str; 3] = ["odometer reading", "kilometerstand", "reading"];

pub(crate) fn normalize_label(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

pub(crate) fn is_reading_marker(value: &str) -> bool {
    let normalized = normalize_label(value);
    READING_MARKERS.contains(&normalized.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_label_removes_whitespace_and_case() {
        assert_eq!(
            normalize_label("\u{feff}  Odometer   READING "),
            "odometer reading"
        );
    }

    #[test]
    fn recognises_legacy_markers_only() {
        assert!(is_reading_marker("Kilometerstand"));
        assert!(is_reading_marker(" reading"));
        assert!(!is_reading_marker("Reading, Berkshire"));
        assert!(!is_reading_marker("Damrak 1, Amsterdam"));
    }
}
