use crate::utils::error::{DocError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(DocError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(DocError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_dir_exists(field_name: &str, path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(DocError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.display().to_string(),
            reason: "Directory does not exist".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DocError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("base_dir", "./templates").is_ok());
        assert!(validate_path("base_dir", "").is_err());
        assert!(validate_path("base_dir", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_dir_exists() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_dir_exists("base_dir", dir.path()).is_ok());
        assert!(validate_dir_exists("base_dir", &dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("provider_file", "addresses.xlsx").is_ok());
        assert!(validate_non_empty_string("provider_file", "   ").is_err());
    }
}
