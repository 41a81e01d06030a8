//! Registry backed by the URL storage contract on an EVM chain.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ethers::contract::{ContractError, abigen};
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, H256, TransactionReceipt, U64, U256};
use ethers::utils::to_checksum;
use tracing::{debug, info, warn};

use crate::domain::entities::UrlRecord;
use crate::domain::repositories::{RegistryError, UrlRegistry};

abigen!(
    UrlStorage,
    r#"[
        function createShortUrl(string originalUrl, address creator, string shortCode) external returns (bool)
        function getUrlRecord(string shortCode) external view returns (string, address, uint256)
        function isShortCodeTaken(string shortCode) external view returns (bool)
        function getStats() external view returns (uint256, address)
        function setServerAuthorization(address server, bool authorized) external
        function authorizedServers(address server) external view returns (bool)
    ]"#
);

type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Polling interval while waiting for transaction receipts.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Contract-wide counters reported by `getStats()`.
#[derive(Debug, Clone)]
pub struct RegistryStats {
    pub total_urls: U256,
    pub owner: Address,
}

/// Registry that reads and writes the URL storage contract over JSON-RPC.
///
/// Reads go through a plain provider. Writes need a server key that the
/// contract owner has authorized via `setServerAuthorization`; without a key
/// the registry is read-only and `put` fails with
/// [`RegistryError::Unauthorized`].
///
/// Every call, including the wait for a write's receipt, is bounded by the
/// configured timeout. A timed-out write may still be mined later; nothing
/// is rolled back.
pub struct EvmRegistry {
    provider: Arc<Provider<Http>>,
    reader: UrlStorage<Provider<Http>>,
    writer: Option<UrlStorage<SignerClient>>,
    signer_address: Option<Address>,
    contract_address: Address,
    timeout: Duration,
}

impl EvmRegistry {
    /// Connects to the RPC endpoint and binds the contract.
    ///
    /// When `private_key` is given, the chain id is fetched so that signed
    /// transactions are replay-protected for the right network.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC URL, contract address or private key is
    /// malformed, or the chain id cannot be fetched.
    pub async fn connect(
        rpc_url: &str,
        contract_address: &str,
        private_key: Option<&str>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        info!("Connecting to registry RPC at {}", rpc_url);

        let provider = Provider::<Http>::try_from(rpc_url)
            .context("Failed to create HTTP provider")?
            .interval(RECEIPT_POLL_INTERVAL);
        let provider = Arc::new(provider);

        let contract_address: Address = contract_address
            .parse()
            .with_context(|| format!("Invalid contract address '{}'", contract_address))?;

        let (writer, signer_address) = match private_key {
            Some(key) => {
                let chain_id = tokio::time::timeout(timeout, provider.get_chainid())
                    .await
                    .context("Timed out fetching chain id")?
                    .context("Failed to fetch chain id")?;

                let wallet = key
                    .trim_start_matches("0x")
                    .parse::<LocalWallet>()
                    .context("Invalid server private key")?
                    .with_chain_id(chain_id.as_u64());
                let address = wallet.address();

                let client = Arc::new(SignerMiddleware::new(provider.as_ref().clone(), wallet));
                info!(
                    "Registry writes signed by {} on chain {}",
                    to_checksum(&address, None),
                    chain_id
                );

                (Some(UrlStorage::new(contract_address, client)), Some(address))
            }
            None => {
                warn!("No server key configured; registry is read-only");
                (None, None)
            }
        };

        let reader = UrlStorage::new(contract_address, provider.clone());

        Ok(Self {
            provider,
            reader,
            writer,
            signer_address,
            contract_address,
            timeout,
        })
    }

    pub fn contract_address(&self) -> Address {
        self.contract_address
    }

    /// Address this service signs writes with, if a key is configured.
    pub fn signer_address(&self) -> Option<Address> {
        self.signer_address
    }

    /// Reads total created URLs and the contract owner.
    pub async fn stats(&self) -> Result<RegistryStats, RegistryError> {
        let call = self.reader.get_stats();
        let (total_urls, owner) = self
            .bounded(async { call.call().await.map_err(|e| map_contract_error(e, "")) })
            .await?;

        Ok(RegistryStats { total_urls, owner })
    }

    /// Returns whether `server` may write to the contract.
    pub async fn is_authorized(&self, server: Address) -> Result<bool, RegistryError> {
        let call = self.reader.authorized_servers(server);
        self.bounded(async { call.call().await.map_err(|e| map_contract_error(e, "")) })
            .await
    }

    /// Grants or revokes write access for `server`.
    ///
    /// Only succeeds when the configured key belongs to the contract owner.
    /// Returns the transaction hash.
    pub async fn set_server_authorization(
        &self,
        server: Address,
        authorized: bool,
    ) -> Result<String, RegistryError> {
        let writer = self.writer()?;
        let call = writer.set_server_authorization(server, authorized);

        self.bounded(async {
            let pending = call.send().await.map_err(|e| map_contract_error(e, ""))?;
            let tx_hash = pending.tx_hash();
            let receipt = pending
                .await
                .map_err(|e| RegistryError::Transport(e.to_string()))?;
            check_receipt(receipt, tx_hash)?;
            Ok(format!("{:?}", tx_hash))
        })
        .await
    }

    fn writer(&self) -> Result<&UrlStorage<SignerClient>, RegistryError> {
        self.writer
            .as_ref()
            .ok_or_else(|| RegistryError::Unauthorized("no server key configured".to_string()))
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, RegistryError>
    where
        F: Future<Output = Result<T, RegistryError>>,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| RegistryError::Timeout(self.timeout))?
    }
}

#[async_trait]
impl UrlRegistry for EvmRegistry {
    async fn exists(&self, code: &str) -> Result<bool, RegistryError> {
        let call = self.reader.is_short_code_taken(code.to_string());
        self.bounded(async { call.call().await.map_err(|e| map_contract_error(e, code)) })
            .await
    }

    async fn put(&self, code: &str, url: &str, owner: &str) -> Result<(), RegistryError> {
        let writer = self.writer()?;
        let creator: Address = owner
            .parse()
            .map_err(|_| RegistryError::InvalidOwner(owner.to_string()))?;

        let call = writer.create_short_url(url.to_string(), creator, code.to_string());

        self.bounded(async {
            let pending = call
                .send()
                .await
                .map_err(|e| map_contract_error(e, code))?;
            let tx_hash = pending.tx_hash();
            debug!("Submitted createShortUrl for '{}' in {:?}", code, tx_hash);

            let receipt = pending
                .await
                .map_err(|e| RegistryError::Transport(e.to_string()))?;
            check_receipt(receipt, tx_hash)?;

            info!("Registered '{}' in {:?}", code, tx_hash);
            Ok(())
        })
        .await
    }

    async fn get(&self, code: &str) -> Result<Option<UrlRecord>, RegistryError> {
        let call = self.reader.get_url_record(code.to_string());
        let result = self
            .bounded(async { call.call().await.map_err(|e| map_contract_error(e, code)) })
            .await;

        match result {
            Ok((original_url, _, _)) if original_url.is_empty() => Ok(None),
            Ok((original_url, creator, created_at)) => Ok(Some(UrlRecord::new(
                original_url,
                to_checksum(&creator, None),
                timestamp_to_datetime(created_at),
            ))),
            Err(RegistryError::Rejected(reason)) if indicates_missing(&reason) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn health_check(&self) -> bool {
        match tokio::time::timeout(self.timeout, self.provider.get_block_number()).await {
            Ok(Ok(block)) => {
                debug!("Registry health check: block {}", block);
                true
            }
            Ok(Err(e)) => {
                warn!("Registry health check failed: {}", e);
                false
            }
            Err(_) => {
                warn!("Registry health check timed out");
                false
            }
        }
    }
}

/// Translates a contract call failure into a [`RegistryError`].
///
/// Reverts carrying a reason string are classified by their wording, since
/// the contract does not expose typed errors.
fn map_contract_error<M: Middleware>(err: ContractError<M>, code: &str) -> RegistryError {
    if let Some(reason) = err.decode_revert::<String>() {
        return classify_revert(&reason, code);
    }

    if err.is_revert() {
        return RegistryError::Rejected("execution reverted".to_string());
    }

    RegistryError::Transport(err.to_string())
}

fn classify_revert(reason: &str, code: &str) -> RegistryError {
    let lower = reason.to_ascii_lowercase();

    if lower.contains("already") || lower.contains("taken") {
        RegistryError::Duplicate(code.to_string())
    } else if lower.contains("not authorized") || lower.contains("unauthorized") {
        RegistryError::Unauthorized(reason.to_string())
    } else {
        RegistryError::Rejected(reason.to_string())
    }
}

fn indicates_missing(reason: &str) -> bool {
    let lower = reason.to_ascii_lowercase();
    lower.contains("not found") || lower.contains("does not exist")
}

fn check_receipt(receipt: Option<TransactionReceipt>, tx_hash: H256) -> Result<(), RegistryError> {
    match receipt {
        Some(r) if r.status == Some(U64::from(1)) => Ok(()),
        Some(_) => Err(RegistryError::Rejected(format!(
            "transaction {:?} reverted",
            tx_hash
        ))),
        None => Err(RegistryError::Transport(format!(
            "transaction {:?} dropped before confirmation",
            tx_hash
        ))),
    }
}

fn timestamp_to_datetime(seconds: U256) -> DateTime<Utc> {
    let seconds = seconds.min(U256::from(i64::MAX as u64)).as_u64() as i64;
    DateTime::from_timestamp(seconds, 0).unwrap_or_default()
}
