// src/blockchain/account.rs

use crate::blockchain::provider::{AccountOnNetwork, ApiNetworkProvider, ProviderError};
use crate::blockchain::wallet::PemWallet;

/// The signing account plus its locally tracked nonce. The nonce is fetched
/// once per tool invocation and then handed out sequentially, so a tool that
/// submits several transactions never reuses or skips a value.
pub struct Account {
    pub wallet: PemWallet,
    nonce: u64,
}

impl Account {
    pub fn new(wallet: PemWallet) -> Self {
        Self { wallet, nonce: 0 }
    }

    /// Refreshes the nonce from the network and returns the full on-chain
    /// state so callers can also check the balance.
    pub async fn sync_from_network(
        &mut self,
        provider: &ApiNetworkProvider,
    ) -> Result<AccountOnNetwork, ProviderError> {
        let on_network = provider.get_account(&self.wallet.address().to_bech32()).await?;
        self.nonce = on_network.nonce;
        Ok(on_network)
    }

    /// Returns the nonce for the next transaction and advances the counter.
    pub fn get_nonce_then_increment(&mut self) -> u64 {
        let nonce = self.nonce;
        self.nonce += 1;
        nonce
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonces_are_sequential() {
        let mut account = Account::new(PemWallet::generate());
        account.nonce = 7;

        assert_eq!(account.get_nonce_then_increment(), 7);
        assert_eq!(account.get_nonce_then_increment(), 8);
        assert_eq!(account.get_nonce_then_increment(), 9);
    }
}
