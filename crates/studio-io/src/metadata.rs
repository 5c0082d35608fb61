//! Metadata structures for contract files
//!
//! Provides optional JSON metadata that can be stored alongside a program.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use studio_core::ProgramDescription;

/// Metadata for a contract file
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ContractMetadata {
    /// Human-readable description of the contract
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation timestamp (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<u64>,

    /// Last modified timestamp (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<u64>,

    /// Compiler or plugin that produced the program
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,

    /// Arguments the contract was created with, verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<serde_json::Value>,

    /// Custom key-value pairs
    #[serde(flatten)]
    pub custom: HashMap<String, serde_json::Value>,
}

impl ContractMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Default::default()
        }
    }

    pub fn set_creator(&mut self, creator: impl Into<String>) -> &mut Self {
        self.creator = Some(creator.into());
        self
    }

    pub fn set_arguments(&mut self, arguments: serde_json::Value) -> &mut Self {
        self.arguments = Some(arguments);
        self
    }

    pub fn add_custom(&mut self, key: impl Into<String>, value: serde_json::Value) -> &mut Self {
        self.custom.insert(key.into(), value);
        self
    }

    /// Stamp creation (once) and modification times
    pub fn update_timestamps(&mut self) {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        if self.created_at.is_none() {
            self.created_at = Some(now);
        }
        self.modified_at = Some(now);
    }
}

/// Contract file: a program plus optional metadata
///
/// The program is flattened, so a bare `{"program": [...]}` payload as sent
/// by the compiler is also a valid contract file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContractFile {
    #[serde(flatten)]
    pub program: ProgramDescription,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContractMetadata>,
}

impl ContractFile {
    pub fn new(program: ProgramDescription) -> Self {
        Self {
            program,
            metadata: None,
        }
    }

    pub fn with_metadata(program: ProgramDescription, metadata: ContractMetadata) -> Self {
        Self {
            program,
            metadata: Some(metadata),
        }
    }
}
