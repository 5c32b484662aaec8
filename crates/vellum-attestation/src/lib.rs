//! Vellum Attestation Adapter
//!
//! Binds a user's signing key to their wallet identity through on-chain
//! "connect" attestations. This crate owns request construction, the
//! GraphQL lookup and response shaping, and the validity rule; schema
//! encoding, signing and transaction submission belong to the injected
//! [`AttestationSigner`].

mod client;
mod error;
mod signer;

pub use client::{
    check_connect_attestation, Attestation, AttestationClient, ConnectAttestation,
    CONNECT_RECIPIENT, CONNECT_SCHEMA_UID, DEFAULT_GRAPH_ENDPOINT, EAS_CONTRACT_ADDRESS,
};
pub use error::AttestationError;
pub use signer::{AttestationRequest, AttestationSigner, SchemaField};

pub type Result<T> = std::result::Result<T, AttestationError>;
