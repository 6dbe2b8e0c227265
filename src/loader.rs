//! This module provides the `DefinitionLoader` struct, responsible for loading Turing machine
//! definitions from files and strings.

use crate::parser::parse;
use crate::types::{Definition, FormatError};
use std::fs;
use std::path::Path;
use tracing::debug;

/// `DefinitionLoader` is a utility struct for loading Turing machine definitions.
pub struct DefinitionLoader;

impl DefinitionLoader {
    /// Loads a single definition from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Definition)` if the file is successfully read and parsed.
    /// * `Err(FormatError::File)` if the file cannot be read.
    /// * `Err(FormatError::Syntax)` or `Err(FormatError::Validation)` if the content is invalid.
    pub fn load(path: &Path) -> Result<Definition, FormatError> {
        debug!(path = %path.display(), "loading definition");

        let content = fs::read_to_string(path).map_err(|e| {
            FormatError::File(format!("failed to open file {}: {}", path.display(), e))
        })?;

        parse(&content)
    }

    /// Loads a single definition from the provided string content.
    pub fn load_from_string(content: &str) -> Result<Definition, FormatError> {
        parse(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const DEFINITION: &str = "#Q = {q0,q1}\n#S = {a}\n#G = {a,_}\n#q0 = q0\n#B = _\n#N = 1\nq0 a a r q1\n";

    #[test]
    fn test_load_valid_definition() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.tm");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(DEFINITION.as_bytes()).unwrap();

        let definition = DefinitionLoader::load(&file_path).unwrap();
        assert_eq!(definition.initial_state, "q0");
        assert_eq!(definition.transitions.len(), 1);
    }

    #[test]
    fn test_load_invalid_definition() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("invalid.tm");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"This is not a valid definition").unwrap();

        let result = DefinitionLoader::load(&file_path);
        assert!(matches!(result, Err(FormatError::Syntax(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = DefinitionLoader::load(&dir.path().join("missing.tm"));

        let error = result.unwrap_err();
        assert!(matches!(error, FormatError::File(_)));
        assert!(error.to_string().contains("failed to open file"));
    }

    #[test]
    fn test_load_from_string() {
        assert_eq!(
            DefinitionLoader::load_from_string(DEFINITION),
            parse(DEFINITION)
        );
    }
}
