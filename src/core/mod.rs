pub mod manager;
pub mod metadata;
pub mod provider;
pub mod sanitize;
pub mod store;

pub use crate::domain::model::{
    DirectiveKind, LayoutGroup, PlaceholderDescriptor, TemplateEntry, TemplateMetadata,
};
pub use crate::domain::ports::{ConfigProvider, EvalOutput, TemplateEngine};
pub use crate::utils::error::Result;
pub use manager::DocEngine;
pub use store::TemplateStore;
