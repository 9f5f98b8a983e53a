//! Utility functions for string manipulation and URL handling.

use url::Url;

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` bytes with an ellipsis and byte count
/// indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…(+{} bytes)", &s[..end], s.len() - end)
    }
}

/// Derive an upload filename from an image URL's last path segment.
///
/// Query strings are ignored; a URL with no usable segment falls back to
/// `image.jpeg`.
pub fn filename_from_url(image_url: &str) -> String {
    Url::parse(image_url)
        .ok()
        .and_then(|url| {
            url.path_segments()?
                .filter(|segment| !segment.is_empty())
                .next_back()
                .map(String::from)
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "image.jpeg".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte_boundary() {
        // 3-byte characters; the cut must land on a char boundary.
        let s = "あいうえお";
        let result = truncate_for_log(s, 4);
        assert!(result.starts_with("あ"));
    }

    #[test]
    fn test_filename_from_url() {
        assert_eq!(
            filename_from_url("https://example.com/uploads/2025/06/chat-scaled.jpeg"),
            "chat-scaled.jpeg"
        );
    }

    #[test]
    fn test_filename_from_url_ignores_query() {
        assert_eq!(
            filename_from_url("https://example.com/img/photo.png?w=800"),
            "photo.png"
        );
    }

    #[test]
    fn test_filename_from_url_trailing_slash() {
        assert_eq!(filename_from_url("https://example.com/img/"), "img");
    }

    #[test]
    fn test_filename_from_url_no_path() {
        assert_eq!(filename_from_url("https://example.com"), "image.jpeg");
    }

    #[test]
    fn test_filename_from_url_unparseable() {
        assert_eq!(filename_from_url("not a url"), "image.jpeg");
    }
}
