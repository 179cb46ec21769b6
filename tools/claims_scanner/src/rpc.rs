//! `ClaimLogSource` backed by the Soroban RPC `getEvents` method.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::json;
use soroban_sdk::xdr::{Limits, PublicKey, ReadXdr, ScAddress, ScVal};

use crate::{
    error::{ScanError, ScanResult},
    event::{ClaimLogSource, ClaimedEvent},
};

pub const DEFAULT_PAGE_LIMIT: u32 = 200;

const CLAIMED_TOPIC: &str = "Claimed";

#[derive(Debug, Clone)]
pub struct SorobanRpcSource {
    client: reqwest::Client,
    url: String,
    contract_id: String,
    page_limit: u32,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: &'a serde_json::Value,
}

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetEventsResult {
    #[serde(default)]
    events: Vec<RpcEvent>,
    #[serde(default)]
    cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcEvent {
    pub id: String,
    pub ledger: u32,
    pub tx_hash: String,
    #[serde(default)]
    pub topic: Vec<String>,
    pub value: String,
    #[serde(default = "default_true")]
    pub in_successful_contract_call: bool,
}

fn default_true() -> bool {
    true
}

impl SorobanRpcSource {
    pub fn new(url: impl Into<String>, contract_id: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url, contract_id)
    }

    pub fn with_client(
        client: reqwest::Client,
        url: impl Into<String>,
        contract_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            contract_id: contract_id.into(),
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }

    pub fn page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = page_limit.max(1);
        self
    }

    async fn call<T: for<'de> Deserialize<'de>>(
        &self,
        method: &'static str,
        params: &serde_json::Value,
    ) -> ScanResult<T> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };
        let response: RpcResponse<T> = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match (response.result, response.error) {
            (_, Some(err)) => Err(ScanError::Rpc {
                code: err.code,
                message: err.message,
            }),
            (Some(result), None) => Ok(result),
            (None, None) => Err(ScanError::EmptyResponse),
        }
    }

    fn events_params(&self, from: u32, cursor: Option<&str>) -> serde_json::Value {
        let filters = json!([{ "type": "contract", "contractIds": [self.contract_id] }]);
        match cursor {
            Some(cursor) => json!({
                "filters": filters,
                "pagination": { "cursor": cursor, "limit": self.page_limit },
            }),
            None => json!({
                "startLedger": from,
                "filters": filters,
                "pagination": { "limit": self.page_limit },
            }),
        }
    }
}

impl ClaimLogSource for SorobanRpcSource {
    async fn claimed_events(&self, from: u32, to: u32) -> ScanResult<Vec<ClaimedEvent>> {
        let mut claimed = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let params = self.events_params(from, cursor.as_deref());
            let page: GetEventsResult = self.call("getEvents", &params).await?;
            let page_len = page.events.len();
            let mut past_window = false;

            for event in page.events {
                if event.ledger > to {
                    past_window = true;
                    break;
                }
                if event.ledger < from || !event.in_successful_contract_call {
                    continue;
                }
                if let Some(decoded) = decode_claimed(&event)? {
                    claimed.push(decoded);
                }
            }

            if past_window || page_len < self.page_limit as usize {
                break;
            }
            match page.cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        Ok(claimed)
    }
}

fn malformed(event: &RpcEvent, reason: impl Into<String>) -> ScanError {
    ScanError::MalformedEvent {
        id: event.id.clone(),
        reason: reason.into(),
    }
}

fn decode_scval(event: &RpcEvent, encoded: &str) -> ScanResult<ScVal> {
    let raw = STANDARD
        .decode(encoded)
        .map_err(|err| malformed(event, format!("base64: {err}")))?;
    ScVal::from_xdr(raw, Limits::none()).map_err(|err| malformed(event, format!("xdr: {err}")))
}

fn address_strkey(address: &ScAddress) -> String {
    match address {
        ScAddress::Account(account) => {
            let PublicKey::PublicKeyTypeEd25519(key) = &account.0;
            stellar_strkey::ed25519::PublicKey(key.0).to_string()
        }
        ScAddress::Contract(hash) => stellar_strkey::Contract(hash.0).to_string(),
    }
}

fn i128_from(value: &ScVal) -> Option<i128> {
    match value {
        ScVal::I128(parts) => Some((i128::from(parts.hi) << 64) | i128::from(parts.lo)),
        _ => None,
    }
}

/// Decodes a contract event into a `ClaimedEvent`; other events yield `None`.
///
/// Topics are `("Claimed", user_id)` and the value is
/// `(receive_address, claim_amount, total_amount)`.
pub fn decode_claimed(event: &RpcEvent) -> ScanResult<Option<ClaimedEvent>> {
    let Some(first) = event.topic.first() else {
        return Ok(None);
    };
    match decode_scval(event, first)? {
        ScVal::Symbol(symbol) if symbol.0.to_utf8_string_lossy() == CLAIMED_TOPIC => {}
        _ => return Ok(None),
    }

    let user_id = match event.topic.get(1) {
        Some(encoded) => match decode_scval(event, encoded)? {
            ScVal::U64(user_id) => user_id,
            other => return Err(malformed(event, format!("user id topic {other:?}"))),
        },
        None => return Err(malformed(event, "missing user id topic")),
    };

    let fields = match decode_scval(event, &event.value)? {
        ScVal::Vec(Some(fields)) => fields,
        other => return Err(malformed(event, format!("value {other:?}"))),
    };
    let (receive_address, claim_amount, total_amount) = match fields.0.as_slice() {
        [ScVal::Address(address), claim, total] => (
            address_strkey(address),
            i128_from(claim).ok_or_else(|| malformed(event, "claim amount is not i128"))?,
            i128_from(total).ok_or_else(|| malformed(event, "total amount is not i128"))?,
        ),
        _ => return Err(malformed(event, "expected (address, i128, i128)")),
    };

    Ok(Some(ClaimedEvent {
        ledger: event.ledger,
        tx_hash: event.tx_hash.clone(),
        user_id,
        receive_address,
        claim_amount,
        total_amount,
    }))
}
