//! Server-side signing wallet for backend-submitted transactions

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, B256};
use alloy::signers::local::PrivateKeySigner;
use std::str::FromStr;
use tracing::info;

use crate::error::{ChainError, ChainResult};

/// Environment variable holding the server wallet's private key
pub const PRIVATE_KEY_ENV: &str = "SERVER_PRIVATE_KEY";

/// Local key used to sign pool writes
#[derive(Clone)]
pub struct ServerWallet {
    signer: PrivateKeySigner,
    address: Address,
}

impl ServerWallet {
    /// Create a wallet from a private key hex string
    pub fn from_private_key(private_key: &str) -> ChainResult<Self> {
        let key = private_key.trim();
        let key = key.strip_prefix("0x").unwrap_or(key);

        let key_bytes = B256::from_str(key)
            .map_err(|e| ChainError::Wallet(format!("Invalid private key format: {}", e)))?;

        let signer = PrivateKeySigner::from_bytes(&key_bytes)
            .map_err(|e| ChainError::Wallet(format!("Failed to create signer: {}", e)))?;

        let address = signer.address();

        info!("Loaded server wallet: {}", address);

        Ok(Self { signer, address })
    }

    /// Load the wallet from SERVER_PRIVATE_KEY, `Ok(None)` when it is unset
    pub fn from_env() -> ChainResult<Option<Self>> {
        dotenvy::dotenv().ok();

        match std::env::var(PRIVATE_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Self::from_private_key(&key).map(Some),
            _ => Ok(None),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Checksummed address string
    pub fn address_string(&self) -> String {
        self.address.to_checksum(None)
    }

    /// Wallet wrapper the provider uses to fill signatures
    pub fn ethereum_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}

impl std::fmt::Debug for ServerWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerWallet")
            .field("address", &self.address)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known local devnet key (DO NOT use in production!)
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_wallet_from_private_key() {
        let wallet = ServerWallet::from_private_key(TEST_KEY).unwrap();
        assert_eq!(
            wallet.address_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_key_without_prefix() {
        let wallet = ServerWallet::from_private_key(&TEST_KEY[2..]).unwrap();
        assert_eq!(
            wallet.address(),
            ServerWallet::from_private_key(TEST_KEY).unwrap().address()
        );
    }

    #[test]
    fn test_invalid_key() {
        assert!(matches!(
            ServerWallet::from_private_key("0x1234"),
            Err(ChainError::Wallet(_))
        ));
    }

    #[test]
    fn test_debug_hides_key() {
        let wallet = ServerWallet::from_private_key(TEST_KEY).unwrap();
        let debug = format!("{:?}", wallet);
        assert!(!debug.contains("ac0974bec39a17e3"));
    }
}
