//! Shell configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use vellum_attestation::{CONNECT_SCHEMA_UID, DEFAULT_GRAPH_ENDPOINT, EAS_CONTRACT_ADDRESS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file
    pub database_path: PathBuf,
    /// Default directory for saved documents
    pub documents_dir: PathBuf,
    /// Attestation GraphQL endpoint
    pub attestation_endpoint: String,
    /// EAS contract address, handed to the wallet bridge
    pub attestation_contract: String,
    /// Connect attestation schema uid
    pub attestation_schema_uid: String,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        let documents_dir = dirs::document_dir().unwrap_or_else(|| data_dir.join("Documents"));

        Self {
            database_path: data_dir.join("vellum.db"),
            documents_dir,
            attestation_endpoint: DEFAULT_GRAPH_ENDPOINT.to_string(),
            attestation_contract: EAS_CONTRACT_ADDRESS.to_string(),
            attestation_schema_uid: CONNECT_SCHEMA_UID.to_string(),
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Vellum"))
            .unwrap_or_else(|| PathBuf::from(".vellum"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

// Simple dirs implementation for common directories
mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }

    pub fn document_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|h| PathBuf::from(h).join("Documents"))
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Documents"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DOCUMENTS_DIR")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join("Documents"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}
