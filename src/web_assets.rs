use rust_embed::RustEmbed;
use std::borrow::Cow;

/// The frontend (`src/ui`) embedded into the binary.
#[derive(RustEmbed)]
#[folder = "src/ui"]
#[include = "*.html"]
pub struct UiAssets;

const INDEX: &str = "index.html";
const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Provides (Bytes, Content-Type) for a requested resource.
///
/// The UI is a single self-contained page, so every path resolves to `index.html`.
pub fn load(path: &str) -> Option<(Cow<'static, [u8]>, &'static str)> {
    tracing::debug!("Serving {} for {}", INDEX, path);
    UiAssets::get(INDEX).map(|file| (file.data, HTML_CONTENT_TYPE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_serves_index_html() {
        let (data, content_type) = load("/").unwrap();
        assert_eq!(content_type, "text/html; charset=utf-8");
        assert!(String::from_utf8_lossy(&data).contains("LLM-Coding Tools"));
    }

    #[test]
    fn any_path_serves_the_page() {
        let (index, _) = load("/index.html").unwrap();
        let (other, content_type) = load("/no/such/asset.js").unwrap();
        assert_eq!(content_type, "text/html; charset=utf-8");
        assert_eq!(index, other);
    }
}
