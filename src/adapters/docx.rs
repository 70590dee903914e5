use crate::domain::model::DirectiveKind;
use crate::domain::ports::{EvalOutput, TemplateEngine};
use crate::utils::error::Result;
use minijinja::value::{Rest, Value as TemplateValue};
use minijinja::Environment;
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};
use zip::write::{FileOptions, ZipWriter};
use zip::ZipArchive;

/// Archive entries that can carry template syntax. Everything else is
/// copied through untouched.
fn is_template_part(name: &str) -> bool {
    static PART_RE: OnceLock<Regex> = OnceLock::new();
    PART_RE
        .get_or_init(|| {
            Regex::new(r"^word/(document|footnotes|endnotes|header\d*|footer\d*)\.xml$")
                .expect("part pattern")
        })
        .is_match(name)
}

/// Word splits template expressions across formatting runs and encodes
/// special characters as XML entities. Strip markup and decode entities
/// inside `{{ }}` / `{% %}` / `{# #}` spans so the engine sees
/// contiguous source. Document structure outside the spans is untouched.
fn prepare_source(xml: &str) -> String {
    static EXPR_RE: OnceLock<Regex> = OnceLock::new();
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    let expr_re =
        EXPR_RE.get_or_init(|| Regex::new(r"(?s)\{[\{%#].*?[%#\}]\}").expect("expr pattern"));
    let tag_re = TAG_RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern"));

    expr_re
        .replace_all(xml, |caps: &Captures| {
            let joined = tag_re.replace_all(&caps[0], "");
            html_escape::decode_html_entities(&joined).into_owned()
        })
        .into_owned()
}

/// Zip + minijinja implementation of the substitution capability: a
/// `.docx` is a zip archive whose XML parts embed Jinja-style syntax.
/// Each call opens, parses and discards its own archive handle.
#[derive(Debug, Clone, Default)]
pub struct DocxEngine;

impl DocxEngine {
    pub fn new() -> Self {
        Self
    }

    fn open(template: &Path) -> Result<ZipArchive<Cursor<Vec<u8>>>> {
        let bytes = std::fs::read(template)?;
        Ok(ZipArchive::new(Cursor::new(bytes))?)
    }

    fn read_part(archive: &mut ZipArchive<Cursor<Vec<u8>>>, index: usize) -> Result<Vec<u8>> {
        let mut file = archive.by_index(index)?;
        let mut raw = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut raw)?;
        Ok(raw)
    }
}

fn part_to_string(name: &str, raw: Vec<u8>) -> Result<String> {
    String::from_utf8(raw).map_err(|err| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("part {} is not valid UTF-8: {}", name, err),
        )
        .into()
    })
}

impl TemplateEngine for DocxEngine {
    fn free_variables(&self, template: &Path) -> Result<HashSet<String>> {
        let mut archive = Self::open(template)?;
        let env = Environment::new();
        let mut names = HashSet::new();

        for index in 0..archive.len() {
            let name = archive.by_index(index)?.name().to_string();
            if !is_template_part(&name) {
                continue;
            }
            let raw = Self::read_part(&mut archive, index)?;
            let source = prepare_source(&part_to_string(&name, raw)?);
            let tmpl = env.template_from_str(&source)?;
            names.extend(tmpl.undeclared_variables(false));
        }

        Ok(names)
    }

    fn evaluate(
        &self,
        template: &Path,
        capture: Option<DirectiveKind>,
        context: &Map<String, Value>,
    ) -> Result<EvalOutput> {
        let mut archive = Self::open(template)?;
        let captured: Arc<Mutex<Vec<TemplateValue>>> = Arc::new(Mutex::new(Vec::new()));

        let mut env = Environment::new();
        for kind in DirectiveKind::ALL {
            if capture == Some(kind) {
                let sink = Arc::clone(&captured);
                env.add_function(kind.name(), move |arg: TemplateValue| -> String {
                    if let Ok(mut recorded) = sink.lock() {
                        recorded.push(arg);
                    }
                    String::new()
                });
            } else {
                env.add_function(kind.name(), |_args: Rest<TemplateValue>| String::new());
            }
        }

        let ctx = TemplateValue::from_serialize(context);
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for index in 0..archive.len() {
            let name = archive.by_index(index)?.name().to_string();
            let raw = Self::read_part(&mut archive, index)?;

            let data = if is_template_part(&name) {
                let source = prepare_source(&part_to_string(&name, raw)?);
                let tmpl = env.template_from_str(&source)?;
                tmpl.render(&ctx)?.into_bytes()
            } else {
                raw
            };

            writer.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
            writer.write_all(&data)?;
        }

        let document = writer.finish()?.into_inner();

        let recorded = captured
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default();
        let mut collected = Vec::with_capacity(recorded.len());
        for value in &recorded {
            collected.push(serde_json::to_value(value)?);
        }

        Ok(EvalOutput {
            document,
            captured: collected,
        })
    }
}
