//! JSON-RPC 2.0 request/response envelope

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{RpcError, RpcResult};

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a, P: Serialize> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: &'a P,
}

impl<'a, P: Serialize> JsonRpcRequest<'a, P> {
    pub fn new(id: u64, method: &'a str, params: &'a P) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method,
            params,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcErrorObject>,
}

impl JsonRpcResponse {
    pub fn from_slice(method: &str, body: &[u8]) -> RpcResult<Self> {
        serde_json::from_slice(body).map_err(|e| RpcError::InvalidResponse {
            method: method.to_string(),
            message: format!("malformed JSON-RPC response: {}", e),
        })
    }

    /// Error object as an [`RpcError::Remote`], if the daemon sent one
    pub fn remote_error(&self, method: &str) -> Option<RpcError> {
        self.error.as_ref().map(|err| RpcError::Remote {
            method: method.to_string(),
            code: err.code,
            message: err.message.clone(),
            data: err.data.as_ref().map(|data| match data {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
        })
    }

    /// Decode the `result` member, checking the echoed id
    pub fn into_result<T: DeserializeOwned>(self, method: &str, expected_id: u64) -> RpcResult<T> {
        if let Some(err) = self.remote_error(method) {
            return Err(err);
        }

        if let Some(id) = &self.id {
            if !id_matches(id, expected_id) {
                return Err(RpcError::InvalidResponse {
                    method: method.to_string(),
                    message: format!(
                        "response id {} does not match request id {}",
                        id, expected_id
                    ),
                });
            }
        }

        let result = self.result.ok_or_else(|| RpcError::InvalidResponse {
            method: method.to_string(),
            message: "response has neither result nor error".to_string(),
        })?;

        serde_json::from_value(result).map_err(|e| RpcError::InvalidResponse {
            method: method.to_string(),
            message: format!("unexpected result shape: {}", e),
        })
    }
}

fn id_matches(id: &Value, expected: u64) -> bool {
    match id {
        Value::Number(n) => n.as_u64() == Some(expected),
        Value::String(s) => s.parse::<u64>().ok() == Some(expected),
        _ => false,
    }
}
