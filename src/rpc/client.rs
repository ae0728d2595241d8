use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::StakerRpcConfig;
use crate::errors::{RpcError, RpcResult};
use crate::rpc::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
use crate::rpc::transport::{parse_daemon_address, HttpTransport, RpcTransport};
use crate::rpc::types::{
    HealthResponse, ListStakingTransactionsResponse, OutputsResponse, StakeResponse,
    ValidatorsResponse,
};

#[derive(Debug, Serialize)]
struct EmptyParams {}

/// Optional entries are left out entirely when absent
#[derive(Debug, Serialize)]
struct PaginationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<String>,
}

impl PaginationParams {
    fn new(offset: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            offset: offset.map(|v| v.to_string()),
            limit: limit.map(|v| v.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StakeParams<'a> {
    staker_address: &'a str,
    staking_amount: String,
    validator_pk: &'a str,
    staking_time_blocks: String,
}

/// JSON-RPC client for the staker daemon
///
/// Cloning is cheap: clones share the transport and the request id counter.
/// Each call is an independent future, so dropping it cancels only that call.
pub struct StakerServiceJsonRpcClient<T = HttpTransport> {
    transport: Arc<T>,
    next_id: Arc<AtomicU64>,
}

impl<T> Clone for StakerServiceJsonRpcClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

impl StakerServiceJsonRpcClient<HttpTransport> {
    /// Create a client for `remote_address`; nothing is sent until the first call
    pub fn new(remote_address: &str, config: &StakerRpcConfig) -> RpcResult<Self> {
        let endpoint = parse_daemon_address(remote_address)?;
        let transport = HttpTransport::new(endpoint, config.timeout())?;
        debug!(
            "Staker daemon endpoint {} (timeout: {:?})",
            transport.endpoint(),
            config.timeout()
        );

        Ok(Self::with_transport(transport))
    }
}

impl<T: RpcTransport> StakerServiceJsonRpcClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub async fn health(&self) -> RpcResult<HealthResponse> {
        self.call("health", &EmptyParams {}).await
    }

    pub async fn list_outputs(&self) -> RpcResult<OutputsResponse> {
        self.call("list_outputs", &EmptyParams {}).await
    }

    pub async fn babylon_validators(
        &self,
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> RpcResult<ValidatorsResponse> {
        self.call("babylon_validators", &PaginationParams::new(offset, limit))
            .await
    }

    /// Ask the daemon to fund, sign and send a staking transaction
    pub async fn stake(
        &self,
        staker_address: &str,
        staking_amount: i64,
        validator_pk: &str,
        staking_time_blocks: i64,
    ) -> RpcResult<StakeResponse> {
        let params = StakeParams {
            staker_address,
            staking_amount: staking_amount.to_string(),
            validator_pk,
            staking_time_blocks: staking_time_blocks.to_string(),
        };
        self.call("stake", &params).await
    }

    pub async fn list_staking_transactions(
        &self,
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> RpcResult<ListStakingTransactionsResponse> {
        self.call(
            "list_staking_transactions",
            &PaginationParams::new(offset, limit),
        )
        .await
    }

    /// Race `call` against a caller deadline
    ///
    /// On expiry the in-flight request is dropped; other calls are unaffected.
    pub async fn call_with_deadline<F, R>(
        &self,
        deadline: Duration,
        method: &str,
        call: F,
    ) -> RpcResult<R>
    where
        F: Future<Output = RpcResult<R>>,
    {
        match timeout(deadline, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!("{} exceeded caller deadline of {:?}", method, deadline);
                Err(RpcError::Timeout {
                    timeout_seconds: deadline.as_secs(),
                    method: method.to_string(),
                })
            }
        }
    }

    async fn call<P, R>(&self, method: &str, params: &P) -> RpcResult<R>
    where
        P: Serialize + Sync,
        R: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::to_vec(&JsonRpcRequest::new(id, method, params)).map_err(|e| {
            RpcError::Transport {
                method: method.to_string(),
                message: format!("failed to encode request: {}", e),
            }
        })?;

        debug!("Calling {} (id {})", method, id);
        let response = self.transport.post(method, body).await?;

        if !response.is_success() {
            // Some daemons report JSON-RPC errors with a 5xx status
            if let Ok(parsed) = JsonRpcResponse::from_slice(method, &response.body) {
                if let Some(err) = parsed.remote_error(method) {
                    return Err(err);
                }
            }
            return Err(RpcError::HttpStatus {
                status: response.status,
                method: method.to_string(),
            });
        }

        JsonRpcResponse::from_slice(method, &response.body)?.into_result(method, id)
    }
}
