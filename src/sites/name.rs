//! Logical config file names.
//!
//! A logical name is what callers use to address a file, e.g.
//! `upstream.conf` or `locations/static.conf`. Validation here is purely
//! textual and never touches the filesystem; containment under the root
//! directory is verified again by the store after resolution.

use std::path::{Path, PathBuf};

use crate::error::GatewayError;

/// Naming rules shared by listing and validation.
#[derive(Debug, Clone)]
pub struct SiteLayout {
    /// The one subdirectory that may prefix a name.
    pub subdirectory: String,
    /// Recognized file suffix, including the leading dot.
    pub suffix: String,
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self {
            subdirectory: "locations".to_string(),
            suffix: ".conf".to_string(),
        }
    }
}

impl SiteLayout {
    /// True when `file_name` carries the recognized suffix and something before it.
    pub fn has_suffix(&self, file_name: &str) -> bool {
        file_name.len() > self.suffix.len() && file_name.ends_with(&self.suffix)
    }
}

/// A validated logical file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SiteName(String);

impl SiteName {
    /// Validate a caller-supplied name against the layout.
    ///
    /// The `..` check runs first and rejects any occurrence of the sequence,
    /// including inside a segment such as `a..conf`.
    pub fn parse(raw: &str, layout: &SiteLayout) -> Result<Self, GatewayError> {
        if raw.contains("..") {
            return Err(GatewayError::InvalidPath(format!(
                "'{}' contains a parent directory segment",
                raw
            )));
        }

        if raw.is_empty() {
            return Err(GatewayError::InvalidPath("empty file name".to_string()));
        }

        if raw.starts_with('/') || raw.contains('\\') || raw.contains('\0') {
            return Err(GatewayError::InvalidPath(format!(
                "'{}' is not a relative file name",
                raw
            )));
        }

        let segments: Vec<&str> = raw.split('/').collect();
        let file_name = match segments.as_slice() {
            [file] => *file,
            [dir, file] if *dir == layout.subdirectory => *file,
            [_, _] => {
                return Err(GatewayError::InvalidPath(format!(
                    "'{}' may only be nested under '{}/'",
                    raw, layout.subdirectory
                )))
            }
            _ => {
                return Err(GatewayError::InvalidPath(format!(
                    "'{}' is nested too deeply",
                    raw
                )))
            }
        };

        if !layout.has_suffix(file_name) {
            return Err(GatewayError::InvalidPath(format!(
                "'{}' does not end with '{}'",
                raw, layout.suffix
            )));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join the name onto a root directory.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        self.0.split('/').fold(root.to_path_buf(), |path, segment| path.join(segment))
    }
}

impl std::fmt::Display for SiteName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<SiteName, GatewayError> {
        SiteName::parse(raw, &SiteLayout::default())
    }

    #[test]
    fn test_accepts_root_and_subdirectory_names() {
        assert_eq!(parse("00-upstream.conf").unwrap().as_str(), "00-upstream.conf");
        assert_eq!(
            parse("locations/static.conf").unwrap().as_str(),
            "locations/static.conf"
        );
    }

    #[test]
    fn test_rejects_traversal_anywhere() {
        for raw in [
            "../../etc/passwd.conf",
            "locations/../secret.conf",
            "..",
            "a..conf",
            "locations/..hidden.conf",
        ] {
            assert!(
                matches!(parse(raw), Err(GatewayError::InvalidPath(_))),
                "{} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_rejects_malformed_names() {
        for raw in [
            "",
            ".conf",
            "upstream.txt",
            "/etc/nginx/upstream.conf",
            "other/static.conf",
            "locations/nested/static.conf",
            "locations/",
            "locations\\static.conf",
            "up\0stream.conf",
            "locations//static.conf",
        ] {
            assert!(
                matches!(parse(raw), Err(GatewayError::InvalidPath(_))),
                "{:?} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_custom_layout() {
        let layout = SiteLayout {
            subdirectory: "snippets".into(),
            suffix: ".inc".into(),
        };
        assert!(SiteName::parse("snippets/gzip.inc", &layout).is_ok());
        assert!(SiteName::parse("locations/gzip.inc", &layout).is_err());
        assert!(SiteName::parse("gzip.conf", &layout).is_err());
    }

    #[test]
    fn test_resolve_joins_segments() {
        let name = parse("locations/static.conf").unwrap();
        assert_eq!(
            name.resolve(Path::new("/srv/conf.d")),
            Path::new("/srv/conf.d/locations/static.conf")
        );
    }
}
