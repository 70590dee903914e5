pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::TomlConfig;

pub use crate::adapters::docx::DocxEngine;
pub use crate::core::manager::DocEngine;
pub use crate::core::store::TemplateStore;
pub use crate::domain::model::{
    LayoutGroup, PlaceholderDescriptor, TemplateEntry, TemplateMetadata,
};
pub use crate::domain::ports::{ConfigProvider, TemplateEngine};
pub use crate::utils::error::{DocError, Result};
