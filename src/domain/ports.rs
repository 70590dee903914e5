use crate::domain::model::DirectiveKind;
use crate::utils::error::Result;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;

/// Result of one full template evaluation: the finished document plus the
/// arguments recorded by the captured directive, in call order.
#[derive(Debug)]
pub struct EvalOutput {
    pub document: Vec<u8>,
    pub captured: Vec<Value>,
}

/// The substitution capability the core depends on. Implementations open,
/// parse and discard their own template handle per call; no state is
/// shared between calls.
pub trait TemplateEngine: Send + Sync {
    /// Names the template references but does not bind itself (loop
    /// variables, `set` bindings and macro parameters are excluded).
    /// Static scan; no directive executes.
    fn free_variables(&self, template: &Path) -> Result<HashSet<String>>;

    /// Fully evaluates the template against `context`. All three directive
    /// names are bound; `capture` selects which one records its argument.
    /// Directive calls never contribute text to the output.
    fn evaluate(
        &self,
        template: &Path,
        capture: Option<DirectiveKind>,
        context: &Map<String, Value>,
    ) -> Result<EvalOutput>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_dir(&self) -> &Path;
    fn provider_file(&self) -> &str;
    fn verbose(&self) -> bool;
}
