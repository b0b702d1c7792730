//! Pill-shaped SVG masks for media cards

/// Data URI of a `width`×`height` SVG holding a fully rounded black rectangle
pub fn rounded_mask_uri(width: u32, height: u32) -> String {
    let svg = format!(
        r#"<svg width="{width}" height="{height}" viewBox="0 0 {width} {height}" fill="none" xmlns="http://www.w3.org/2000/svg"><rect width="{width}" height="{height}" rx="999" fill="black"/></svg>"#
    );
    format!("data:image/svg+xml;charset=utf-8,{}", urlencoding::encode(&svg))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "data:image/svg+xml;charset=utf-8,";

    #[test]
    fn test_mask_uri_is_percent_encoded() {
        let uri = rounded_mask_uri(320, 180);
        let payload = uri.strip_prefix(PREFIX).unwrap();

        assert!(!payload.contains(&['<', '>', '"', ' ', '/'][..]));
        assert!(payload.starts_with("%3Csvg%20width%3D%22320%22"));
    }

    #[test]
    fn test_mask_uri_decodes_to_rounded_rect() {
        let uri = rounded_mask_uri(64, 32);
        let svg = urlencoding::decode(uri.strip_prefix(PREFIX).unwrap()).unwrap();

        assert!(svg.contains(r#"viewBox="0 0 64 32""#));
        assert!(svg.contains(r#"<rect width="64" height="32" rx="999" fill="black"/>"#));
    }
}
