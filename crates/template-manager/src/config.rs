//! Path configuration for template discovery.
//!
//! A [`TemplatesPath`] names three patterns: the layout, the pages and the
//! partials. Every pattern is expanded with glob semantics against the
//! manager's filesystem, so a plain path works as well as a wildcard pattern.
//!
//! Configurations can be written inline, derived from a root directory with
//! [`TemplatesPath::under`], or loaded from YAML:
//!
//! ```rust
//! use template_manager::TemplatesPath;
//!
//! let paths = TemplatesPath::from_yaml(r#"
//! layout: templates/layout.html
//! pages: templates/pages/*.html
//! partials: templates/partials/*.html
//! "#).unwrap();
//!
//! assert_eq!(paths, TemplatesPath::under("templates"));
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TemplateError};

/// Patterns locating the layout, page and partial template files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatesPath {
    /// Layout file path or pattern. Must match at least one file.
    pub layout: String,
    /// Pattern matching page files; one template set is built per match.
    pub pages: String,
    /// Pattern matching partial files. May match nothing; empty means none.
    #[serde(default)]
    pub partials: String,
}

impl TemplatesPath {
    pub fn new(
        layout: impl Into<String>,
        pages: impl Into<String>,
        partials: impl Into<String>,
    ) -> Self {
        Self {
            layout: layout.into(),
            pages: pages.into(),
            partials: partials.into(),
        }
    }

    /// The conventional layout under `root`:
    /// `root/layout.html`, `root/pages/*.html` and `root/partials/*.html`.
    ///
    /// Glob metacharacters in `root` are escaped.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = glob::Pattern::escape(&root.as_ref().to_string_lossy());
        let root = root.trim_end_matches('/');
        Self {
            layout: format!("{}/layout.html", root),
            pages: format!("{}/pages/*.html", root),
            partials: format!("{}/partials/*.html", root),
        }
    }

    /// Parses a configuration from YAML.
    ///
    /// `layout` and `pages` are required; `partials` defaults to none.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| TemplateError::Config(e.to_string()))
    }

    /// Reads and parses a YAML configuration file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_under_builds_conventional_layout() {
        let paths = TemplatesPath::under("site/templates/");
        assert_eq!(paths.layout, "site/templates/layout.html");
        assert_eq!(paths.pages, "site/templates/pages/*.html");
        assert_eq!(paths.partials, "site/templates/partials/*.html");
    }

    #[test]
    fn test_under_escapes_metacharacters() {
        let paths = TemplatesPath::under("site[1]");
        assert_eq!(paths.pages, "site[[]1[]]/pages/*.html");
    }

    #[test]
    fn test_from_yaml_partials_optional() {
        let paths = TemplatesPath::from_yaml(
            r#"
            layout: layout.html
            pages: pages/*.html
            "#,
        )
        .unwrap();

        assert_eq!(paths.layout, "layout.html");
        assert_eq!(paths.partials, "");
    }

    #[test]
    fn test_from_yaml_missing_pages() {
        let err = TemplatesPath::from_yaml("layout: layout.html").unwrap_err();
        assert!(matches!(err, TemplateError::Config(_)));
        assert!(err.to_string().contains("pages"));
    }

    #[test]
    fn test_from_yaml_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("templates.yaml");
        std::fs::write(&path, "layout: l.html\npages: p/*.html\npartials: x/*.html\n").unwrap();

        let paths = TemplatesPath::from_yaml_file(&path).unwrap();
        assert_eq!(paths, TemplatesPath::new("l.html", "p/*.html", "x/*.html"));
    }

    #[test]
    fn test_from_yaml_file_missing() {
        let err = TemplatesPath::from_yaml_file("/nonexistent/templates.yaml").unwrap_err();
        assert!(matches!(err, TemplateError::Io(_)));
    }
}
