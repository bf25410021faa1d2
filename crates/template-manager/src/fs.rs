//! Read-only file access used to discover and load template sources.
//!
//! The manager only needs two capabilities from a filesystem: expanding a glob
//! pattern into file paths and reading a file by path. [`TemplateFs`] captures
//! exactly that, so the real filesystem and in-memory sources are
//! interchangeable.
//!
//! | Type | Paths | Use |
//! |------|-------|-----|
//! | [`OsFs`] | as given (absolute or relative to the cwd) | default when no filesystem is supplied |
//! | [`DirFs`] | relative to a root directory | templates shipped next to the binary |
//! | [`EmbeddedFs`] | `/`-separated keys | templates compiled in with `include_str!` |
//!
//! Glob semantics come from the `glob` crate; nothing here interprets
//! wildcards by hand.

use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::error::{Result, TemplateError};

/// A read-only source of template files.
pub trait TemplateFs: Send + Sync {
    /// Reads the file at `path` as UTF-8.
    fn read_to_string(&self, path: &str) -> io::Result<String>;

    /// Expands `pattern` into the paths of matching files.
    ///
    /// Paths are returned in the order the underlying glob yields them and
    /// are accepted back by [`read_to_string`](Self::read_to_string).
    fn glob(&self, pattern: &str) -> Result<Vec<String>>;
}

/// The operating system filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl TemplateFs for OsFs {
    fn read_to_string(&self, path: &str) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn glob(&self, pattern: &str) -> Result<Vec<String>> {
        glob_os(pattern, pattern, |path| Ok(path.to_string_lossy().into_owned()))
    }
}

/// A directory on disk whose files are addressed relative to its root.
///
/// ```rust,ignore
/// let fs = DirFs::new("./site");
/// // "templates/pages/*.html" matches ./site/templates/pages/*.html
/// let pages = fs.glob("templates/pages/*.html")?;
/// ```
#[derive(Debug, Clone)]
pub struct DirFs {
    root: PathBuf,
}

impl DirFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TemplateFs for DirFs {
    fn read_to_string(&self, path: &str) -> io::Result<String> {
        std::fs::read_to_string(self.root.join(normalize(path)))
    }

    fn glob(&self, pattern: &str) -> Result<Vec<String>> {
        // `glob` yields "./x/a" as "x/a", and "." as no prefix at all.
        let root = clean_root(&self.root);
        let full = if root.as_os_str().is_empty() {
            normalize(pattern).to_string()
        } else {
            let escaped = Pattern::escape(&root.to_string_lossy());
            format!("{}/{}", escaped.trim_end_matches('/'), normalize(pattern))
        };

        glob_os(pattern, &full, |path| {
            let relative = clean_root(path);
            let relative = relative.strip_prefix(&root).map_err(|_| {
                TemplateError::discovery(
                    pattern,
                    format!("{} is outside {}", path.display(), self.root.display()),
                )
            })?;
            let parts: Vec<_> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            Ok(parts.join("/"))
        })
    }
}

/// Drops `.` components so "./site", "site/." and "site" compare equal.
fn clean_root(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Runs `glob::glob` on `full`, reporting errors against the caller's `pattern`.
fn glob_os(
    pattern: &str,
    full: &str,
    to_key: impl Fn(&Path) -> Result<String>,
) -> Result<Vec<String>> {
    let entries = glob::glob(full).map_err(|e| TemplateError::discovery(pattern, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| TemplateError::compile(&e.path().display().to_string(), e.error()))?;
        paths.push(to_key(&path)?);
    }
    Ok(paths)
}

/// In-memory template files, typically embedded at compile time.
///
/// Keys are `/`-separated paths; a leading `./` is ignored. Wildcards never
/// cross a `/`, so `pages/*.html` does not match `pages/blog/post.html`.
///
/// ```rust
/// use template_manager::{EmbeddedFs, TemplateFs};
///
/// let fs = EmbeddedFs::from_entries(&[
///     ("templates/layout.html", "<main>{% block content %}{% endblock %}</main>"),
///     ("templates/pages/home.html", "{% extends \"layout\" %}"),
/// ]);
///
/// assert_eq!(fs.glob("templates/pages/*.html").unwrap(), vec!["templates/pages/home.html"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EmbeddedFs {
    files: BTreeMap<String, String>,
}

impl EmbeddedFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a filesystem from `(path, content)` pairs.
    pub fn from_entries(entries: &[(&str, &str)]) -> Self {
        let mut fs = Self::new();
        for (path, content) in entries {
            fs.insert(*path, *content);
        }
        fs
    }

    /// Adds or replaces a file.
    pub fn insert(&mut self, path: impl AsRef<str>, content: impl Into<String>) {
        self.files
            .insert(normalize(path.as_ref()).to_string(), content.into());
    }

    pub fn with_file(mut self, path: impl AsRef<str>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }
}

impl TemplateFs for EmbeddedFs {
    fn read_to_string(&self, path: &str) -> io::Result<String> {
        self.files.get(normalize(path)).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("file does not exist: {}", path))
        })
    }

    fn glob(&self, pattern: &str) -> Result<Vec<String>> {
        let compiled =
            Pattern::new(normalize(pattern)).map_err(|e| TemplateError::discovery(pattern, e))?;
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };

        Ok(self
            .files
            .keys()
            .filter(|path| compiled.matches_with(path, options))
            .cloned()
            .collect())
    }
}

fn normalize(path: &str) -> &str {
    path.trim_start_matches("./")
}
