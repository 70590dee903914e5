use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Directive names bound during template evaluation. They mark call-sites,
/// not data holes, and are never exposed as placeholders.
pub const RESERVED_DIRECTIVES: [&str; 3] = ["meta", "options", "layout"];

/// Context key the engine fills in when the caller supplies `PROVIDER`.
pub const PROVIDER_ADDR_KEY: &str = "PROVIDER_ADDR";

/// Context key that triggers the provider address lookup.
pub const PROVIDER_KEY: &str = "PROVIDER";

/// The three directive calls a template author can embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    Meta,
    Options,
    Layout,
}

impl DirectiveKind {
    pub const ALL: [DirectiveKind; 3] = [
        DirectiveKind::Meta,
        DirectiveKind::Options,
        DirectiveKind::Layout,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DirectiveKind::Meta => "meta",
            DirectiveKind::Options => "options",
            DirectiveKind::Layout => "layout",
        }
    }
}

/// Author-declared key/value metadata of a template, entity-unescaped.
pub type TemplateMetadata = Map<String, Value>;

/// One renderable placeholder, merged from the template's free variables
/// and its `options` directive. Free-form author keys survive in `extra`
/// and serialize flat alongside the known fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaceholderDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlaceholderDescriptor {
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: "string".to_string(),
            values: None,
            extra: Map::new(),
        }
    }
}

/// One display group from the `layout` directive, order-preserving.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayoutGroup {
    pub group: String,
    pub rows: Value,
}

/// Listing row: a stored template together with its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub filename: String,
    pub meta: TemplateMetadata,
}
