//! Attestation commands
use serde::Serialize;

use vellum_core::{check_connect_attestation, ConnectAttestation};

use super::tabs::CommandResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ConnectAttestationInfo {
    pub id: String,
    pub attester: String,
    pub expiration_time: u64,
    pub revoked: bool,
    pub kind: String,
    pub public_key: String,
}

impl From<ConnectAttestation> for ConnectAttestationInfo {
    fn from(attestation: ConnectAttestation) -> Self {
        Self {
            id: attestation.id,
            attester: attestation.attester,
            expiration_time: attestation.expiration_time,
            revoked: attestation.revoked,
            kind: attestation.kind,
            public_key: attestation.public_key,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConnectStatusInfo {
    pub attestation: Option<ConnectAttestationInfo>,
    pub valid: bool,
}

/// Look up the connect attestation binding `public_key` to `address`
/// and judge its validity.
pub async fn connect_status(
    state: &AppState,
    address: String,
    public_key: String,
) -> CommandResult<ConnectStatusInfo> {
    // Clone the client out so the lookup runs without holding shell state
    let client = match state.with_shell(|shell| Ok(shell.attestation_client().clone())) {
        Ok(client) => client,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    match client.connect_attestation(&address, &public_key).await {
        Ok(attestation) => {
            let valid = attestation
                .as_ref()
                .map(|a| check_connect_attestation(a, &public_key))
                .unwrap_or(false);

            CommandResult::ok(ConnectStatusInfo {
                attestation: attestation.map(ConnectAttestationInfo::from),
                valid,
            })
        }
        Err(e) => CommandResult::err(e.to_string()),
    }
}
