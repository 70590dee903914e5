use crate::adapters::docx::DocxEngine;
use crate::core::metadata::{
    layout_from_captures, meta_from_captures, merge_descriptors, options_from_captures,
};
use crate::core::provider::{provider_address, PROVIDER_WORKBOOK};
use crate::core::sanitize::sanitize_map;
use crate::core::store::TemplateStore;
use crate::domain::model::{
    DirectiveKind, LayoutGroup, PlaceholderDescriptor, TemplateEntry, TemplateMetadata,
    PROVIDER_ADDR_KEY, PROVIDER_KEY,
};
use crate::domain::ports::{ConfigProvider, TemplateEngine};
use crate::utils::error::{DocError, Result};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::io::Cursor;
use std::path::PathBuf;

/// Facade over the template store and the substitution engine. One
/// instance per base directory; carries no mutable state, so concurrent
/// calls on the same instance are independent.
pub struct DocEngine<E: TemplateEngine = DocxEngine> {
    store: TemplateStore,
    engine: E,
    provider_file: String,
}

impl DocEngine<DocxEngine> {
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_engine(base_dir, DocxEngine::new())
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Ok(Self::new(config.base_dir())?.with_provider_file(config.provider_file()))
    }
}

impl<E: TemplateEngine> DocEngine<E> {
    pub fn with_engine(base_dir: impl Into<PathBuf>, engine: E) -> Result<Self> {
        Ok(Self {
            store: TemplateStore::new(base_dir)?,
            engine,
            provider_file: PROVIDER_WORKBOOK.to_string(),
        })
    }

    pub fn with_provider_file(mut self, filename: impl Into<String>) -> Self {
        self.provider_file = filename.into();
        self
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Free variables of the template: referenced but not locally bound.
    /// Includes the directive names when present; those are filtered out
    /// of the merged descriptors, not here.
    pub fn placeholders(&self, filename: &str) -> Result<HashSet<String>> {
        let path = self.store.resolve(filename)?;
        self.engine.free_variables(&path)
    }

    /// One full evaluation with an empty context, recording the requested
    /// directive's arguments in call order.
    fn collect(&self, filename: &str, kind: DirectiveKind) -> Result<Vec<Value>> {
        let path = self.store.resolve(filename)?;
        let output = self.engine.evaluate(&path, Some(kind), &Map::new())?;
        Ok(output.captured)
    }

    pub fn meta(&self, filename: &str) -> Result<TemplateMetadata> {
        Ok(meta_from_captures(&self.collect(filename, DirectiveKind::Meta)?))
    }

    pub fn options(&self, filename: &str) -> Result<Vec<Map<String, Value>>> {
        Ok(options_from_captures(
            &self.collect(filename, DirectiveKind::Options)?,
        ))
    }

    pub fn layout(&self, filename: &str) -> Result<Vec<LayoutGroup>> {
        Ok(layout_from_captures(
            &self.collect(filename, DirectiveKind::Layout)?,
        ))
    }

    /// Placeholder descriptors: free variables merged with the `options`
    /// entries, directive names excluded.
    pub fn placeholders_with_options(&self, filename: &str) -> Result<Vec<PlaceholderDescriptor>> {
        let placeholders = self.placeholders(filename)?;
        let options = self.options(filename)?;
        Ok(merge_descriptors(&placeholders, &options))
    }

    /// Stored templates with their metadata, sorted by filename. A file
    /// whose metadata cannot be read is skipped, not fatal.
    pub fn list_templates(&self) -> Result<Vec<TemplateEntry>> {
        let mut entries = Vec::new();
        for filename in self.store.list()? {
            match self.meta(&filename) {
                Ok(meta) => entries.push(TemplateEntry { filename, meta }),
                Err(err) => {
                    tracing::debug!("Skipping unreadable template {}: {}", filename, err);
                }
            }
        }
        Ok(entries)
    }

    /// Renders the template against the caller's context and returns the
    /// finished document as a byte stream positioned at its start.
    pub fn render_to_buffer(&self, filename: &str, context: Value) -> Result<Cursor<Vec<u8>>> {
        let Value::Object(mut ctx) = context else {
            return Err(DocError::InvalidContext(
                "context must be a mapping".to_string(),
            ));
        };

        let path = self.store.resolve(filename)?;
        self.inject_reserved(&mut ctx);
        let ctx = sanitize_map(&ctx);

        tracing::debug!("Rendering {} with {} context keys", filename, ctx.len());
        let output = self
            .engine
            .evaluate(&path, None, &ctx)
            .map_err(|err| DocError::Render(err.to_string()))?;

        Ok(Cursor::new(output.document))
    }

    /// Fills in `PROVIDER_ADDR` when the caller supplied a non-empty
    /// `PROVIDER`. Runs before sanitization so the injected address is
    /// escaped exactly like caller data.
    fn inject_reserved(&self, ctx: &mut Map<String, Value>) {
        let Some(provider) = ctx.get(PROVIDER_KEY) else {
            return;
        };
        if !value_is_truthy(provider) {
            return;
        }
        let provider_id = provider.as_str().unwrap_or_default().to_string();
        let workbook = self.store.base_dir().join(&self.provider_file);
        ctx.insert(
            PROVIDER_ADDR_KEY.to_string(),
            Value::String(provider_address(&workbook, &provider_id)),
        );
    }
}

fn value_is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
