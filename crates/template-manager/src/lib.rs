//! # Template Manager - layout, page and partial HTML templates
//!
//! `template-manager` locates template files by glob pattern, composes one
//! template set per page (shared layout + that page + all partials), caches
//! the compiled sets and renders them with page-specific data.
//!
//! Templates use MiniJinja (Jinja2) syntax with HTML auto-escaping.
//!
//! ## Core Concepts
//!
//! - [`TemplatesPath`]: the `layout`, `pages` and `partials` patterns
//! - [`TemplateManager`]: builds and caches the sets, renders by page name
//! - [`TemplateSet`]: a compiled layout + page + partials bundle
//! - [`TemplateFs`]: where files come from ([`OsFs`], [`DirFs`], [`EmbeddedFs`])
//! - [`FuncMap`]: helper functions available in every template
//! - [`TemplateError`]: discovery, compilation, lookup and execution failures
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use template_manager::{TemplateManager, TemplatesPath};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! #[serde(rename_all = "PascalCase")]
//! struct Page1 {
//!     page1_data: String,
//!     partial_data: String,
//! }
//!
//! // templates/layout.html, templates/pages/*.html, templates/partials/*.html
//! let manager = TemplateManager::new(TemplatesPath::under("templates"), None);
//!
//! let data = Page1 {
//!     page1_data: "page 1 data".into(),
//!     partial_data: "partial/piece data".into(),
//! };
//! manager.render(&mut std::io::stdout(), "page1.html", &data)?;
//! # Ok::<(), template_manager::TemplateError>(())
//! ```
//!
//! ## Embedded Templates
//!
//! Templates compiled into the binary work the same way through
//! [`EmbeddedFs`]:
//!
//! ```rust
//! use std::sync::Arc;
//! use template_manager::{EmbeddedFs, TemplateManager, TemplatesPath};
//!
//! let fs = EmbeddedFs::from_entries(&[
//!     ("templates/layout.html", "<p>{% block content %}{% endblock %}</p>"),
//!     ("templates/pages/about.html", "{% extends \"layout\" %}{% block content %}About{% endblock %}"),
//! ]);
//!
//! let manager = TemplateManager::new(TemplatesPath::under("templates"), Some(Arc::new(fs)));
//! let html = manager.render_to_string("about.html", &serde_json::json!({})).unwrap();
//! assert_eq!(html, "<p>About</p>");
//! ```

mod config;
mod error;
pub mod fs;
pub mod functions;
pub mod prelude;
pub mod template;

pub use config::TemplatesPath;
pub use error::{Result, TemplateError};
pub use fs::{DirFs, EmbeddedFs, OsFs, TemplateFs};
pub use functions::FuncMap;
pub use template::{TemplateManager, TemplateMap, TemplateSet, LAYOUT_TEMPLATE};
