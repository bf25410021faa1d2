//! Template set composition and the manager that caches and renders them.
//!
//! - [`TemplateSet`]: one page compiled together with the layout and partials
//! - [`TemplateManager`]: discovery, once-only build and buffered rendering
//!
//! ## Composition
//!
//! Each page becomes its own set. Inside a set every file is addressable by
//! its base name, and the layout is also available as `"layout"`:
//!
//! ```jinja
//! {# layout.html #}
//! <html><body>{% block content %}{% endblock %}{% include "footer.html" %}</body></html>
//!
//! {# pages/page1.html #}
//! {% extends "layout" %}
//! {% block content %}page 1 data: {{ Page1Data }}{% endblock %}
//!
//! {# partials/footer.html #}
//! <footer>{{ PartialData }}</footer>
//! ```
//!
//! Rendering `"page1.html"` executes the page, which pulls in the layout
//! through `extends` and the partial through `include`.

mod manager;
mod set;

pub use manager::{TemplateManager, TemplateMap};
pub use set::{TemplateSet, LAYOUT_TEMPLATE};
