use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, ScanError};

/// File name marking the root directory of a package.
pub const MANIFEST_FILE: &str = "package.xml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestInfo {
    pub name: String,
}

/// Extracts package information from raw manifest text.
pub trait ManifestParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<ManifestInfo>;
}

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("unable to compile comment regex"));
static PACKAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<package\b[^>]*>").expect("unable to compile package regex"));
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<name(?:\s[^>]*)?>([^<]*)</name>").expect("unable to compile name regex")
});

/// Reads the package name from a `package.xml` manifest: the first `<name>`
/// element inside `<package>`, comments ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageXmlParser;

impl ManifestParser for PackageXmlParser {
    fn parse(&self, text: &str) -> Result<ManifestInfo> {
        let text = COMMENT_RE.replace_all(text, "");
        let body = PACKAGE_RE
            .find(&text)
            .map(|m| &text[m.end()..])
            .ok_or_else(|| ScanError::ManifestParse("missing <package> element".into()))?;

        let name = NAME_RE
            .captures(body)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ScanError::ManifestParse("missing package <name>".into()))?;

        Ok(ManifestInfo {
            name: name.to_string(),
        })
    }
}
