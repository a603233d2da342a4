//! Content-type detection for uploaded attachments.

/// Fallback for filenames with no known extension.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Extension table, checked in order. `.json` must precede `.js`.
const CONTENT_TYPES: &[(&str, &str)] = &[
    (".html", "text/html"),
    (".css", "text/css"),
    (".json", "application/json"),
    (".js", "application/x-javascript"),
    (".png", "image/png"),
    (".jpg", "image/jpg"),
    (".jpeg", "image/jpeg"),
    (".gif", "image/gif"),
    (".pdf", "application/pdf"),
    (".txt", "text/plain"),
];

/// Returns the content type for a filename.
///
/// Matching is a case-insensitive substring search over the extension table;
/// the first entry found anywhere in the name wins.
#[must_use]
pub fn content_type_for(filename: &str) -> &'static str {
    let lower = filename.to_lowercase();
    CONTENT_TYPES
        .iter()
        .find(|(extension, _)| lower.contains(extension))
        .map_or(DEFAULT_CONTENT_TYPE, |&(_, content_type)| content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_extensions_case_insensitively() {
        assert_eq!(content_type_for("index.HTML"), "text/html");
        assert_eq!(content_type_for("site.css"), "text/css");
        assert_eq!(content_type_for("Screen Shot.PNG"), "image/png");
        assert_eq!(content_type_for("photo.jpg"), "image/jpg");
        assert_eq!(content_type_for("notes.txt"), "text/plain");
    }

    #[test]
    fn json_wins_over_js() {
        assert_eq!(content_type_for("data.json"), "application/json");
        assert_eq!(content_type_for("app.js"), "application/x-javascript");
    }

    #[test]
    fn first_table_entry_wins_for_substring_matches() {
        // ".html" appears in the name even though the real extension is ".png".
        assert_eq!(content_type_for("page.html.png"), "text/html");
    }

    #[test]
    fn unknown_extensions_fall_back_to_octet_stream() {
        assert_eq!(content_type_for("archive.tar.gz"), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_for("README"), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_for(""), DEFAULT_CONTENT_TYPE);
    }
}
