//! The wallet seam
//!
//! Everything cryptographic lives behind this trait: schema encoding,
//! signing, transaction submission and receipt waiting are the wallet
//! bridge's business. The shell only constructs the request.

use serde::{Deserialize, Serialize};

use crate::Result;

/// One field of an attestation schema, pre-encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    pub value: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

impl SchemaField {
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            field_type: "string".to_string(),
        }
    }
}

/// An attestation ready for the signer to encode and submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationRequest {
    /// Schema uid the data is encoded against
    pub schema: String,
    pub recipient: String,
    /// Unix time after which the attestation lapses; zero means never
    pub expiration_time: u64,
    pub revocable: bool,
    pub data: Vec<SchemaField>,
}

#[allow(async_fn_in_trait)]
pub trait AttestationSigner {
    /// Wallet address of the attester.
    fn address(&self) -> &str;

    /// Encode, sign and submit an attestation; resolves to the new
    /// attestation uid once the transaction is confirmed.
    async fn attest(&self, request: &AttestationRequest) -> Result<String>;

    /// Revoke an attestation by uid.
    async fn revoke(&self, schema_uid: &str, uid: &str) -> Result<()>;
}
