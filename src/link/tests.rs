#[cfg(test)]
mod tests {
    use crate::link::{LinkFile, LinkType};
    use std::path::Path;

    #[test]
    fn test_encode_decode_round_trip() {
        let link = LinkFile::new("https://example.com/docs?a=1&b=2", "Docs & Friends");
        let encoded = link.encode().unwrap();
        let decoded = LinkFile::decode(encoded.as_bytes()).unwrap();
        assert_eq!(decoded.link_target, "https://example.com/docs?a=1&b=2");
        assert_eq!(decoded.display_name, "Docs & Friends");
        assert_eq!(decoded.link_type, LinkType::Url);
        assert_eq!(decoded.icon_data, None);
    }

    #[test]
    fn test_encoding_is_indented_and_readable() {
        let encoded = LinkFile::new("https://example.com/", "Example").encode().unwrap();
        assert!(encoded.contains('\n'));
        assert!(encoded.contains("\"linkType\": \"URL\""));
        // URLs survive without over-escaping.
        assert!(encoded.contains("https://example.com/"));
    }

    #[test]
    fn test_unicode_titles_survive() {
        let link = LinkFile::new("https://example.com/", "résumé ☃");
        let decoded = LinkFile::decode(link.encode().unwrap().as_bytes()).unwrap();
        assert_eq!(decoded.display_name, "résumé ☃");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(LinkFile::decode(b"not json at all").is_err());
        assert!(LinkFile::decode(b"{\"displayName\": \"missing target\"}").is_err());
    }

    #[test]
    fn test_decode_tolerates_missing_optional_fields() {
        let body = b"{\"linkTarget\": \"https://example.com/\", \"displayName\": \"E\"}";
        let decoded = LinkFile::decode(body).unwrap();
        assert_eq!(decoded.link_type, LinkType::Url);
        assert_eq!(decoded.icon_data, None);
    }

    #[test]
    fn test_link_path_detection() {
        assert!(LinkFile::is_link_path(Path::new("a/b/site.link")));
        assert!(LinkFile::is_link_path(Path::new("SITE.LINK")));
        assert!(!LinkFile::is_link_path(Path::new("a/b/site.txt")));
        assert!(!LinkFile::is_link_path(Path::new("link")));
    }
}
