//! Compiled template sets.
//!
//! A [`TemplateSet`] is everything needed to render one page: the layout, the
//! page itself and every partial, compiled into a single MiniJinja
//! environment. Each template is registered under its file's base name
//! (`"page1.html"`, `"nav.html"`), and the first layout file is also
//! registered as [`LAYOUT_TEMPLATE`] so pages can write
//! `{% extends "layout" %}` without knowing the layout's file name.
//!
//! Sources are added in the order layout, page, partials; when two files share
//! a base name the later one replaces the earlier.
//!
//! Environment settings shared by every set:
//!
//! - HTML auto-escaping for all templates regardless of extension, via
//!   `html_formatter` (the only place escaping rules live)
//! - strict undefined behaviour, so a missing field fails execution
//! - the manager's helper functions installed as globals

use std::path::Path;

use minijinja::value::ValueKind;
use minijinja::{AutoEscape, Environment, Error, Output, State, UndefinedBehavior, Value};
use serde::Serialize;

use crate::error::{Result, TemplateError};
use crate::fs::TemplateFs;
use crate::functions::FuncMap;

/// Reserved name under which the layout is registered in every set.
pub const LAYOUT_TEMPLATE: &str = "layout";

/// A template file read from a [`TemplateFs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TemplateSource {
    /// Path as returned by the filesystem's glob
    pub path: String,
    /// Base name used as the template name
    pub name: String,
    pub content: String,
}

impl TemplateSource {
    pub(crate) fn load(fs: &dyn TemplateFs, path: &str) -> Result<Self> {
        let content = fs
            .read_to_string(path)
            .map_err(|e| TemplateError::compile(path, e))?;
        Ok(Self {
            path: path.to_string(),
            name: base_name(path),
            content,
        })
    }
}

/// The last path segment, extension included.
pub(crate) fn base_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// An executable template set for a single page.
///
/// The page is the entry point. A page wraps itself in the layout with
/// `{% extends "layout" %}` and fills the layout's blocks; a page that does
/// not extend anything renders on its own, without the layout.
#[derive(Debug)]
pub struct TemplateSet {
    name: String,
    env: Environment<'static>,
    templates: Vec<String>,
}

impl TemplateSet {
    /// Compiles `page` together with `layouts` and `partials`.
    ///
    /// Fails on the first source with invalid syntax.
    pub(crate) fn compose(
        page: &TemplateSource,
        layouts: &[TemplateSource],
        partials: &[TemplateSource],
        functions: &FuncMap,
    ) -> Result<Self> {
        let mut set = TemplateSet {
            name: page.name.clone(),
            env: new_environment(functions),
            templates: Vec::with_capacity(layouts.len() + partials.len() + 2),
        };

        if let Some(layout) = layouts.first() {
            set.add(LAYOUT_TEMPLATE, layout)?;
        }
        for layout in layouts {
            set.add(&layout.name, layout)?;
        }
        set.add(&page.name, page)?;
        for partial in partials {
            set.add(&partial.name, partial)?;
        }

        Ok(set)
    }

    fn add(&mut self, name: &str, source: &TemplateSource) -> Result<()> {
        self.env
            .add_template_owned(name.to_string(), source.content.clone())
            .map_err(|e| TemplateError::compile(&source.path, e))?;
        if !self.templates.iter().any(|existing| existing == name) {
            self.templates.push(name.to_string());
        }
        Ok(())
    }

    /// The page name this set renders, e.g. `"page1.html"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of every template registered in the set, in registration order.
    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(String::as_str)
    }

    pub fn environment(&self) -> &Environment<'static> {
        &self.env
    }

    /// Executes the page (and, through `extends`, the layout) into a new
    /// string.
    ///
    /// Nothing is written anywhere on failure; callers copy the returned
    /// buffer to their output only when this succeeds.
    pub fn execute<T: Serialize + ?Sized>(&self, data: &T) -> Result<String> {
        let template = self
            .env
            .get_template(&self.name)
            .map_err(|e| self.execution_error(e))?;
        template.render(data).map_err(|e| self.execution_error(e))
    }

    fn execution_error(&self, err: Error) -> TemplateError {
        TemplateError::Execution {
            name: self.name.clone(),
            message: err.to_string(),
        }
    }
}

fn new_environment(functions: &FuncMap) -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_name: &str| AutoEscape::Html);
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_formatter(html_formatter);
    functions.register(&mut env);
    env
}

/// HTML auto-escaping for printed values.
///
/// Text is escaped with `html_escape::encode_quoted_attribute` (`& < > " '`),
/// so output is safe in element content and in quoted attributes while `/`
/// stays readable. Strings, sequences and maps all go through the same
/// escaper; numbers, booleans, `none` and values marked `| safe` are written
/// as MiniJinja formats them.
fn html_formatter(
    out: &mut Output<'_>,
    state: &State<'_, '_>,
    value: &Value,
) -> std::result::Result<(), Error> {
    let plain = matches!(
        value.kind(),
        ValueKind::Undefined | ValueKind::None | ValueKind::Bool | ValueKind::Number
    );
    if plain || value.is_safe() || !matches!(state.auto_escape(), AutoEscape::Html) {
        return minijinja::escape_formatter(out, state, value);
    }

    let escaped = match value.as_str() {
        Some(text) => html_escape::encode_quoted_attribute(text).into_owned(),
        None => html_escape::encode_quoted_attribute(&value.to_string()).into_owned(),
    };
    out.write_str(&escaped).map_err(Error::from)
}
