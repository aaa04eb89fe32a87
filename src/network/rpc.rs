use std::time::Duration;

use alloy::{
    primitives::{Address, U256},
    providers::{Provider, ProviderBuilder},
};
use serde_json::Value;

use super::InitError;

pub const SET_BALANCE_METHOD: &str = "anvil_setBalance";

/// JSON-RPC client for the administrative methods of a local dev node
pub struct DevnetClient {
    rpc_url: String,
    timeout: Duration,
}

impl DevnetClient {
    pub fn new(rpc_url: &str, timeout: Duration) -> Self {
        Self {
            rpc_url: rpc_url.to_string(),
            timeout,
        }
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Call `anvil_setBalance` once for `address`
    pub async fn set_balance(&self, address: Address, balance: U256) -> Result<(), InitError> {
        let params = set_balance_params(address, balance);
        tracing::debug!("{} {:?} -> {}", SET_BALANCE_METHOD, params, self.rpc_url);

        let request = async {
            let provider = ProviderBuilder::new().connect(&self.rpc_url).await?;
            provider
                .raw_request::<_, Value>(SET_BALANCE_METHOD.into(), params)
                .await
        };

        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(source)) => Err(InitError::Rpc {
                url: self.rpc_url.clone(),
                method: SET_BALANCE_METHOD,
                source,
            }),
            Err(_) => Err(InitError::Timeout {
                url: self.rpc_url.clone(),
                timeout: self.timeout,
            }),
        }
    }
}

/// `[address, hex balance]`, the params shape anvil expects
pub fn set_balance_params(address: Address, balance: U256) -> (String, String) {
    (address.to_checksum(None), format!("0x{:x}", balance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    const MONK: &str = "0xA12Dd3E2049ebb0B953AD0B01914fF399955924d";

    fn ten_ether() -> U256 {
        U256::from(10_000_000_000_000_000_000u128)
    }

    #[test]
    fn test_set_balance_params() {
        let address: Address = MONK.parse().unwrap();
        assert_eq!(
            set_balance_params(address, ten_ether()),
            (MONK.to_string(), "0x8ac7230489e80000".to_string())
        );
        assert_eq!(set_balance_params(address, U256::ZERO).1, "0x0");
    }

    #[tokio::test]
    async fn test_set_balance_calls_node_once() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({
                "jsonrpc": "2.0",
                "method": "anvil_setBalance",
                "params": [MONK, "0x8ac7230489e80000"]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"jsonrpc":"2.0","id":0,"result":null}"#)
            .expect(1)
            .create_async()
            .await;

        let client = DevnetClient::new(&server.url(), Duration::from_secs(5));
        client
            .set_balance(MONK.parse().unwrap(), ten_ether())
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_set_balance_rejected_by_node() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"jsonrpc":"2.0","id":0,"error":{"code":-32601,"message":"Method not found"}}"#,
            )
            .create_async()
            .await;

        let client = DevnetClient::new(&server.url(), Duration::from_secs(5));
        let err = client
            .set_balance(MONK.parse().unwrap(), ten_ether())
            .await
            .unwrap_err();

        assert!(matches!(err, InitError::Rpc { .. }));
    }

    #[tokio::test]
    async fn test_set_balance_unreachable_node() {
        // Bind then drop to get a port nobody listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = DevnetClient::new(&url, Duration::from_secs(5));
        let err = client
            .set_balance(MONK.parse().unwrap(), ten_ether())
            .await
            .unwrap_err();

        assert!(matches!(err, InitError::Rpc { .. }));
    }

    #[tokio::test]
    async fn test_set_balance_times_out() {
        // Accepts connections but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let _server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = DevnetClient::new(&url, Duration::from_millis(200));
        let err = client
            .set_balance(MONK.parse().unwrap(), ten_ether())
            .await
            .unwrap_err();

        assert!(matches!(err, InitError::Timeout { .. }));
    }
}
