//! The template manager: discovery, caching and buffered rendering.
//!
//! [`TemplateManager`] turns a [`TemplatesPath`] into one [`TemplateSet`] per
//! page file and renders them on request.
//!
//! # Build
//!
//! The first call that needs templates ([`render`](TemplateManager::render),
//! [`templates`](TemplateManager::templates), ...) expands the `pages`,
//! `partials` and `layout` patterns against the manager's filesystem, reads
//! every file and compiles a set for each page. Any failure aborts the whole
//! build and nothing is cached, so the next call tries again.
//!
//! A successful build is kept for the lifetime of the manager. It is never
//! rebuilt, even when files on disk change; create a new manager (or call
//! [`parse_templates`](TemplateManager::parse_templates)) to pick up edits.
//!
//! The cache belongs to the manager instance. Two managers with different
//! configurations never see each other's sets, even for identical page
//! names.
//!
//! # Concurrency
//!
//! The build is guarded by a [`OnceCell`]: concurrent first renders run the
//! build once and share the result. A manager can be wrapped in an `Arc` and
//! used from any number of threads.
//!
//! # Rendering
//!
//! Pages are executed into an in-memory buffer. The caller's writer is only
//! written after execution succeeds, so a failed render never leaves partial
//! output behind.

use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

use minijinja::{Error, Value};
use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing::{debug, trace, warn};

use super::set::{TemplateSet, TemplateSource};
use crate::config::TemplatesPath;
use crate::error::{Result, TemplateError};
use crate::fs::{OsFs, TemplateFs};
use crate::functions::FuncMap;

/// Compiled template sets keyed by page name.
pub type TemplateMap = HashMap<String, TemplateSet>;

/// Locates, compiles, caches and renders layout/page/partial template sets.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use template_manager::{EmbeddedFs, TemplateManager, TemplatesPath};
///
/// let fs = EmbeddedFs::from_entries(&[
///     ("site/layout.html", "<main>{% block content %}{% endblock %}</main>{% include \"footer.html\" %}"),
///     ("site/pages/home.html", "{% extends \"layout\" %}{% block content %}Hello {{ name }}{% endblock %}"),
///     ("site/partials/footer.html", "<footer>{{ year }}</footer>"),
/// ]);
///
/// let manager = TemplateManager::new(TemplatesPath::under("site"), Some(Arc::new(fs)));
///
/// let mut out = Vec::new();
/// manager
///     .render(&mut out, "home.html", &serde_json::json!({"name": "<Ada>", "year": 2024}))
///     .unwrap();
///
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "<main>Hello &lt;Ada&gt;</main><footer>2024</footer>"
/// );
/// ```
pub struct TemplateManager {
    templates_path: TemplatesPath,
    fsys: Option<Arc<dyn TemplateFs>>,
    functions: FuncMap,
    cache: OnceCell<TemplateMap>,
}

impl TemplateManager {
    /// Creates a manager. Without a filesystem, patterns are resolved against
    /// the operating system filesystem.
    ///
    /// Nothing is read or validated until the first build.
    pub fn new(templates_path: TemplatesPath, fsys: Option<Arc<dyn TemplateFs>>) -> Self {
        Self {
            templates_path,
            fsys,
            functions: FuncMap::new(),
            cache: OnceCell::new(),
        }
    }

    pub fn templates_path(&self) -> &TemplatesPath {
        &self.templates_path
    }

    pub fn fsys(&self) -> Option<&Arc<dyn TemplateFs>> {
        self.fsys.as_ref()
    }

    pub fn functions(&self) -> &FuncMap {
        &self.functions
    }

    /// Mutable access to the helper map.
    ///
    /// Helpers are bound when sets are compiled; changes made after the first
    /// build do not reach the cached sets.
    pub fn functions_mut(&mut self) -> &mut FuncMap {
        &mut self.functions
    }

    /// Registers a helper callable from every template.
    ///
    /// ```rust
    /// use template_manager::{TemplateManager, TemplatesPath};
    /// use minijinja::Value;
    ///
    /// let mut manager = TemplateManager::new(TemplatesPath::under("templates"), None);
    /// manager.add_function("upper", |args: &[Value]| {
    ///     let text = args.first().and_then(Value::as_str).unwrap_or_default();
    ///     Ok(Value::from(text.to_uppercase()))
    /// });
    /// ```
    pub fn add_function<F>(&mut self, name: impl Into<String>, func: F) -> &mut Self
    where
        F: Fn(&[Value]) -> std::result::Result<Value, Error> + Send + Sync + 'static,
    {
        self.functions.insert(name, func);
        self
    }

    /// Returns true once a build has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Returns the cached template sets, building them on first use.
    pub fn templates(&self) -> Result<&TemplateMap> {
        self.cache.get_or_try_init(|| self.build())
    }

    /// Builds the cache up front, surfacing configuration errors at startup
    /// instead of on the first request.
    pub fn load(&self) -> Result<()> {
        self.templates().map(|_| ())
    }

    /// Sorted names of every renderable page.
    pub fn page_names(&self) -> Result<Vec<&str>> {
        let mut names: Vec<&str> = self.templates()?.keys().map(String::as_str).collect();
        names.sort_unstable();
        Ok(names)
    }

    fn build(&self) -> Result<TemplateMap> {
        match &self.fsys {
            Some(fsys) => self.parse_templates_fs(&**fsys),
            None => self.parse_templates(),
        }
    }

    /// Builds fresh template sets from the operating system filesystem.
    ///
    /// The result is not cached.
    pub fn parse_templates(&self) -> Result<TemplateMap> {
        self.parse_templates_fs(&OsFs)
    }

    /// Builds fresh template sets from `fsys`.
    ///
    /// The result is not cached.
    pub fn parse_templates_fs(&self, fsys: &dyn TemplateFs) -> Result<TemplateMap> {
        let paths = &self.templates_path;
        debug!(
            layout = %paths.layout,
            pages = %paths.pages,
            partials = %paths.partials,
            "discovering templates"
        );

        let pages = resolve(fsys, &paths.pages)?;
        let partials = resolve(fsys, &paths.partials)?;
        let layouts = resolve(fsys, &paths.layout)?;
        if layouts.is_empty() {
            return Err(TemplateError::LayoutNotFound {
                pattern: paths.layout.clone(),
            });
        }

        let layouts = load_all(fsys, &layouts)?;
        let partials = load_all(fsys, &partials)?;

        let mut templates = TemplateMap::with_capacity(pages.len());
        for path in &pages {
            let page = TemplateSource::load(fsys, path)?;
            let set = TemplateSet::compose(&page, &layouts, &partials, &self.functions)?;
            trace!(page = %set.name(), path = %path, "compiled template set");
            if templates.insert(set.name().to_string(), set).is_some() {
                warn!(
                    page = %page.name,
                    path = %path,
                    "page replaces an earlier page with the same name"
                );
            }
        }

        debug!(
            pages = templates.len(),
            partials = partials.len(),
            layouts = layouts.len(),
            "compiled templates"
        );
        Ok(templates)
    }

    /// Renders the set for `name` into `w`.
    ///
    /// The page is executed into a buffer first; `w` is written only if
    /// execution succeeds.
    ///
    /// # Errors
    ///
    /// - [`TemplateError::Discovery`] / [`TemplateError::Compile`] /
    ///   [`TemplateError::LayoutNotFound`] if the build fails
    /// - [`TemplateError::NotFound`] if no page is called `name`
    /// - [`TemplateError::Execution`] if the template fails at runtime
    /// - [`TemplateError::Io`] if writing to `w` fails
    pub fn render<W, T>(&self, w: &mut W, name: &str, data: &T) -> Result<()>
    where
        W: Write + ?Sized,
        T: Serialize + ?Sized,
    {
        let output = self.render_to_string(name, data)?;
        w.write_all(output.as_bytes())?;
        Ok(())
    }

    /// Renders the set for `name` and returns the output.
    pub fn render_to_string<T: Serialize + ?Sized>(&self, name: &str, data: &T) -> Result<String> {
        let set = self
            .templates()?
            .get(name)
            .ok_or_else(|| TemplateError::NotFound {
                name: name.to_string(),
            })?;

        trace!(page = %name, "rendering template");
        set.execute(data)
    }
}

impl fmt::Debug for TemplateManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateManager")
            .field("templates_path", &self.templates_path)
            .field("virtual_fs", &self.fsys.is_some())
            .field("functions", &self.functions)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// Expands `pattern`; an empty pattern matches nothing.
fn resolve(fsys: &dyn TemplateFs, pattern: &str) -> Result<Vec<String>> {
    if pattern.is_empty() {
        return Ok(Vec::new());
    }
    fsys.glob(pattern)
}

fn load_all(fsys: &dyn TemplateFs, paths: &[String]) -> Result<Vec<TemplateSource>> {
    paths
        .iter()
        .map(|path| TemplateSource::load(fsys, path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::EmbeddedFs;
    use serde_json::json;

    fn embedded(entries: &[(&str, &str)]) -> TemplateManager {
        TemplateManager::new(
            TemplatesPath::under("t"),
            Some(Arc::new(EmbeddedFs::from_entries(entries))),
        )
    }

    #[test]
    fn test_new_is_lazy() {
        let manager = TemplateManager::new(TemplatesPath::under("/nonexistent"), None);
        assert!(!manager.is_loaded());
        assert!(manager.functions().is_empty());
    }

    #[test]
    fn test_layout_not_found() {
        let manager = embedded(&[("t/pages/a.html", "a")]);
        let err = manager.load().unwrap_err();
        assert!(matches!(err, TemplateError::LayoutNotFound { .. }));
        assert!(!manager.is_loaded());
    }

    #[test]
    fn test_empty_partials_pattern() {
        let manager = TemplateManager::new(
            TemplatesPath::new("t/layout.html", "t/pages/*.html", ""),
            Some(Arc::new(EmbeddedFs::from_entries(&[
                ("t/layout.html", "[{% block c %}{% endblock %}]"),
                ("t/pages/a.html", r#"{% extends "layout" %}{% block c %}a{% endblock %}"#),
            ]))),
        );
        assert_eq!(manager.render_to_string("a.html", &json!({})).unwrap(), "[a]");
    }

    #[test]
    fn test_page_names_sorted() {
        let manager = embedded(&[
            ("t/layout.html", ""),
            ("t/pages/b.html", "b"),
            ("t/pages/a.html", "a"),
        ]);
        assert_eq!(manager.page_names().unwrap(), vec!["a.html", "b.html"]);
        assert!(manager.is_loaded());
    }

    #[test]
    fn test_no_pages_means_not_found() {
        let manager = embedded(&[("t/layout.html", "")]);
        assert!(manager.templates().unwrap().is_empty());

        let err = manager.render_to_string("a.html", &json!({})).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_parse_templates_fs_is_not_cached() {
        let manager = embedded(&[("t/layout.html", ""), ("t/pages/a.html", "a")]);
        let other = EmbeddedFs::from_entries(&[("t/layout.html", ""), ("t/pages/z.html", "z")]);

        let fresh = manager.parse_templates_fs(&other).unwrap();
        assert!(fresh.contains_key("z.html"));
        assert!(!manager.is_loaded());
        assert_eq!(manager.page_names().unwrap(), vec!["a.html"]);
    }

    #[test]
    fn test_add_function_chains() {
        let mut manager = embedded(&[
            ("t/layout.html", ""),
            ("t/pages/a.html", "{{ greet(who) }}"),
        ]);
        manager
            .add_function("greet", |args: &[Value]| {
                Ok(Value::from(format!("hello {}", args[0])))
            })
            .functions_mut()
            .insert_value("unused", Value::from(true));

        assert_eq!(manager.functions().len(), 2);
        assert_eq!(
            manager.render_to_string("a.html", &json!({"who": "bob"})).unwrap(),
            "hello bob"
        );
    }

    #[test]
    fn test_debug_output() {
        let manager = embedded(&[]);
        let debug = format!("{:?}", manager);
        assert!(debug.contains("virtual_fs: true"));
        assert!(debug.contains("loaded: false"));
    }
}
