use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<title>(.*?)</title>").unwrap());
static BODY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<body.*?>(.*?)</body>").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// A page reduced to what the search needs: its title and the visible body
/// text with tags stripped and whitespace collapsed.
#[derive(Debug, Clone)]
pub struct PageDocument {
    pub title: String,
    pub text: String,
    raw: String,
}

impl PageDocument {
    /// Decodes `bytes` as UTF-8, dropping invalid sequences instead of failing.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut decoded = String::with_capacity(bytes.len());
        for chunk in bytes.utf8_chunks() {
            decoded.push_str(chunk.valid());
        }
        Self::parse(decoded)
    }

    pub fn parse(raw: String) -> Self {
        let title = TITLE_RE
            .captures(&raw)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        let text = {
            let body = BODY_RE
                .captures(&raw)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str())
                .unwrap_or(&raw);

            let stripped = TAG_RE.replace_all(body, " ");
            SPACE_RE.replace_all(&stripped, " ").trim().to_string()
        };

        Self { title, text, raw }
    }

    /// Content attribute of the first `<meta name="...">` tag called `name`.
    pub fn meta(&self, name: &str) -> Option<String> {
        let pattern = format!(
            r#"<meta\s+name=['"]{}['"]\s+content=['"](.*)['"]\s*>"#,
            regex::escape(name)
        );
        let re = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
            Ok(re) => re,
            Err(e) => {
                tracing::warn!("Cannot build meta lookup for '{}': {}", name, e);
                return None;
            }
        };

        re.captures(&self.raw)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }
}
