//! Convenient imports for the common case:
//!
//! ```rust
//! use template_manager::prelude::*;
//!
//! let manager = TemplateManager::new(TemplatesPath::under("templates"), None);
//! # let _ = manager;
//! ```

pub use crate::config::TemplatesPath;
pub use crate::error::{Result, TemplateError};
pub use crate::fs::{DirFs, EmbeddedFs, OsFs, TemplateFs};
pub use crate::template::TemplateManager;
