//! File I/O operations for contract programs

use crate::error::{IoError, Result};
use crate::metadata::{ContractFile, ContractMetadata};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;
use studio_core::{ContractGraph, ProgramDescription};

/// Parse a contract payload (as delivered by the compiler or an IPC message)
pub fn parse_contract(json: &str) -> Result<(ProgramDescription, Option<ContractMetadata>)> {
    let file: ContractFile = serde_json::from_str(json)?;
    Ok((file.program, file.metadata))
}

/// Load a contract file
pub fn load_contract<P: AsRef<Path>>(
    path: P,
) -> Result<(ProgramDescription, Option<ContractMetadata>)> {
    let json = read_existing(path.as_ref())?;
    let (program, metadata) = parse_contract(&json)?;
    log::debug!(
        "loaded {} transactions from {}",
        program.len(),
        path.as_ref().display()
    );
    Ok((program, metadata))
}

/// Load a contract file and build its graph
pub fn load_contract_graph<P: AsRef<Path>>(
    path: P,
) -> Result<(ContractGraph, Option<ContractMetadata>)> {
    let (program, metadata) = load_contract(path)?;
    let graph = ContractGraph::build(&program)?;
    Ok((graph, metadata))
}

/// Save a contract file with optional metadata
///
/// Only `.json` paths are accepted. Metadata timestamps are refreshed.
pub fn save_contract<P: AsRef<Path>>(
    program: &ProgramDescription,
    metadata: Option<ContractMetadata>,
    path: P,
) -> Result<()> {
    let path_ref = path.as_ref();
    if path_ref.extension().and_then(|s| s.to_str()) != Some("json") {
        return Err(IoError::InvalidFormat(format!(
            "Unsupported file extension: {}",
            path_ref.display()
        )));
    }

    let file = match metadata {
        Some(mut meta) => {
            meta.update_timestamps();
            ContractFile::with_metadata(program.clone(), meta)
        }
        None => ContractFile::new(program.clone()),
    };

    save_json(&file, path_ref)
}

/// Load any JSON document from disk
pub fn load_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let json = read_existing(path.as_ref())?;
    Ok(serde_json::from_str(&json)?)
}

/// Save any serializable value as pretty JSON
pub fn save_json<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

fn read_existing(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(IoError::NotFound(path.display().to_string()));
    }
    Ok(fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use studio_core::{fixtures, TransactionSpec};
    use tempfile::TempDir;

    #[test]
    fn test_save_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vault.json");

        let program = fixtures::program(&fixtures::chain(3));
        let metadata = ContractMetadata::with_description("vault");
        save_contract(&program, Some(metadata), &path).unwrap();

        let (loaded, loaded_metadata) = load_contract(&path).unwrap();
        assert_eq!(loaded, program);
        let loaded_metadata = loaded_metadata.unwrap();
        assert_eq!(loaded_metadata.description.as_deref(), Some("vault"));
        assert!(loaded_metadata.created_at.is_some());
    }

    #[test]
    fn test_save_without_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("plain.json");

        let program = fixtures::program(&fixtures::chain(1));
        save_contract(&program, None, &path).unwrap();

        let (_, metadata) = load_contract(&path).unwrap();
        assert!(metadata.is_none());
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vault.psbt");

        let err = save_contract(&ProgramDescription::empty(), None, &path).unwrap_err();
        assert!(matches!(err, IoError::InvalidFormat(_)));
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_contract(temp_dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, IoError::NotFound(_)));
    }

    #[test]
    fn test_load_graph_surfaces_contract_errors() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");

        let mut program = fixtures::program(&fixtures::chain(1));
        program.program.push(TransactionSpec {
            hex: "not hex".to_string(),
            psbt: None,
            metadata: None,
            output_metadata: Vec::new(),
        });
        save_contract(&program, None, &path).unwrap();

        let err = load_contract_graph(&path).unwrap_err();
        assert!(matches!(err, IoError::Contract(studio_core::Error::MalformedProgram(_))));
    }

    #[test]
    fn test_load_graph() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("chain.json");
        save_contract(&fixtures::program(&fixtures::chain(2)), None, &path).unwrap();

        let (graph, _) = load_contract_graph(&path).unwrap();
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_parse_contract_rejects_garbage() {
        assert!(matches!(parse_contract("[1, 2"), Err(IoError::Json(_))));
    }
}
