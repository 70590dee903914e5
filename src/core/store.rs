use crate::utils::error::{DocError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Sandboxed accessor for the template directory. The base directory is
/// captured and canonicalized at construction; every resolution must end
/// up strictly inside it.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    base_dir: PathBuf,
}

impl TemplateStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = fs::canonicalize(base_dir.into())?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolves a filename to an existing `.docx` file under the base
    /// directory. Traversal outside the sandbox, missing files and wrong
    /// suffixes all come back as `TemplateNotFound`.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf> {
        let path = fs::canonicalize(self.base_dir.join(filename))
            .map_err(|_| DocError::TemplateNotFound(filename.to_string()))?;

        if !path.starts_with(&self.base_dir) || !path.is_file() || !has_docx_suffix(&path) {
            return Err(DocError::TemplateNotFound(filename.to_string()));
        }
        Ok(path)
    }

    /// Sorted filenames of the `.docx` files directly under the base
    /// directory.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.is_file() && has_docx_suffix(&path) {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

fn has_docx_suffix(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"))
}
