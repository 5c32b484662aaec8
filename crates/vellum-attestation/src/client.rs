//! Connect attestation client
//!
//! Looks up, creates and revokes the "connect" attestation binding a
//! public key to a wallet address. Lookups go through the EAS scan
//! GraphQL endpoint; writes go through the injected signer.

use chrono::Utc;
use serde::Deserialize;
use url::Url;

use crate::error::AttestationError;
use crate::signer::{AttestationRequest, AttestationSigner, SchemaField};
use crate::Result;

pub const EAS_CONTRACT_ADDRESS: &str = "0xAcfE09Fd03f7812F022FBf636700AdEA18Fd2A7A";
pub const CONNECT_SCHEMA_UID: &str =
    "0x26de46028d20cd4b57c75db54613232510e0ff47622b2cca47b64a83689a5b07";
pub const DEFAULT_GRAPH_ENDPOINT: &str = "https://base-goerli.easscan.org/graphql";
pub const CONNECT_RECIPIENT: &str = "0x9F7F0721335dd004D3e848Fd1202264603Bb7397";

const CONNECT_QUERY: &str = "query ConnectQuery($where: AttestationWhereInput) {\n  findFirstAttestation(where: $where) {\n    id\n    attester\n    decodedDataJson\n    revocable\n    revoked\n    expirationTime\n  }\n}\n";

/// Raw attestation row as the graph endpoint returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attestation {
    pub id: String,
    pub attester: String,
    pub expiration_time: u64,
    pub revoked: bool,
    pub decoded_data_json: String,
}

/// A shaped connect attestation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectAttestation {
    pub id: String,
    pub attester: String,
    pub expiration_time: u64,
    pub revoked: bool,
    pub kind: String,
    pub public_key: String,
}

#[derive(Deserialize)]
struct GraphResponse {
    data: Option<GraphData>,
}

#[derive(Deserialize)]
struct GraphData {
    #[serde(rename = "findFirstAttestation")]
    find_first_attestation: Option<Attestation>,
}

#[derive(Deserialize)]
struct DecodedEntry {
    name: String,
    value: DecodedValue,
}

#[derive(Deserialize)]
struct DecodedValue {
    value: serde_json::Value,
}

#[derive(Clone)]
pub struct AttestationClient {
    http: reqwest::Client,
    endpoint: Url,
    schema_uid: String,
    recipient: String,
}

impl AttestationClient {
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            schema_uid: CONNECT_SCHEMA_UID.to_string(),
            recipient: CONNECT_RECIPIENT.to_string(),
        }
    }

    pub fn with_schema(mut self, schema_uid: impl Into<String>) -> Self {
        self.schema_uid = schema_uid.into();
        self
    }

    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = recipient.into();
        self
    }

    /// The connect attestation request for a public key, ready for the
    /// signer: revocable, never expiring, `type = "connect"`.
    pub fn connect_request(&self, public_key: &str) -> AttestationRequest {
        AttestationRequest {
            schema: self.schema_uid.clone(),
            recipient: self.recipient.clone(),
            expiration_time: 0,
            revocable: true,
            data: vec![
                SchemaField::string("type", "connect"),
                SchemaField::string("publicKey", public_key),
            ],
        }
    }

    /// Create a connect attestation for `public_key` through the signer.
    pub async fn attest_connect<S: AttestationSigner>(
        &self,
        signer: &S,
        public_key: &str,
    ) -> Result<String> {
        let request = self.connect_request(public_key);
        let uid = signer.attest(&request).await?;

        tracing::info!(uid = %uid, attester = %signer.address(), "New connect attestation");
        Ok(uid)
    }

    /// Look up the unrevoked connect attestation binding `public_key` to
    /// `address`, if one exists.
    pub async fn connect_attestation(
        &self,
        address: &str,
        public_key: &str,
    ) -> Result<Option<ConnectAttestation>> {
        let body = connect_query_body(&self.schema_uid, address, public_key);

        let response: GraphResponse = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        let Some(attestation) = response.data.and_then(|data| data.find_first_attestation)
        else {
            return Ok(None);
        };

        shape_connect_attestation(attestation).map(Some)
    }

    /// Revoke a connect attestation by uid through the signer.
    pub async fn revoke_connect_attestation<S: AttestationSigner>(
        &self,
        signer: &S,
        uid: &str,
    ) -> Result<()> {
        signer.revoke(&self.schema_uid, uid).await?;

        tracing::info!(uid = %uid, "Revoked connect attestation");
        Ok(())
    }
}

/// Validity rule for a shaped connect attestation: unrevoked, the right
/// kind and key, and unexpired (zero expiration means never).
pub fn check_connect_attestation(attestation: &ConnectAttestation, public_key: &str) -> bool {
    !attestation.revoked
        && attestation.public_key == public_key
        && attestation.kind == "connect"
        && (attestation.expiration_time == 0
            || attestation.expiration_time > Utc::now().timestamp_millis() as u64)
}

fn connect_query_body(schema_uid: &str, address: &str, public_key: &str) -> serde_json::Value {
    // The scan endpoint stores decoded data as a JSON string, so the
    // public key filter is a substring match on its serialized form.
    let needle = format!(
        "{{\"name\":\"publicKey\",\"type\":\"string\",\"signature\":\"string publicKey\",\"value\":{{\"name\":\"publicKey\",\"type\":\"string\",\"value\":\"{public_key}\"}}}}"
    );

    serde_json::json!({
        "query": CONNECT_QUERY,
        "variables": {
            "where": {
                "revoked": { "equals": false },
                "attester": { "equals": address },
                "decodedDataJson": { "contains": needle },
                "schemaId": { "equals": schema_uid },
            },
        },
        "operationName": "ConnectQuery",
    })
}

fn shape_connect_attestation(attestation: Attestation) -> Result<ConnectAttestation> {
    let entries: Vec<DecodedEntry> = serde_json::from_str(&attestation.decoded_data_json)?;

    let field = |name: &str| -> Result<String> {
        entries
            .iter()
            .find(|entry| entry.name == name)
            .and_then(|entry| entry.value.value.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                AttestationError::MalformedResponse(format!(
                    "decoded data is missing \"{name}\""
                ))
            })
    };

    let public_key = field("publicKey")?;
    let kind = field("type")?;

    Ok(ConnectAttestation {
        id: attestation.id,
        attester: attestation.attester,
        expiration_time: attestation.expiration_time,
        revoked: attestation.revoked,
        kind,
        public_key,
    })
}
