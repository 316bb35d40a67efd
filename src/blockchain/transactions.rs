// src/blockchain/transactions.rs
//
// MultiversX transaction construction and signing. Payloads follow the
// `function@hexArg@hexArg...` ESDT call convention; every numeric argument
// is hex-encoded with even-length padding.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use num_bigint::BigUint;
use num_traits::Zero;
use serde::Serialize;

use crate::blockchain::address::Address;
use crate::blockchain::wallet::PemWallet;

/// Gas floor of any transaction; also the per-transfer reservation used by
/// the multi-receiver balance check.
pub const MIN_GAS_LIMIT: u64 = 50_000;
pub const GAS_PER_DATA_BYTE: u64 = 1_500;
pub const GAS_PRICE: u64 = 1_000_000_000;
const ESDT_TRANSFER_GAS: u64 = 500_000;
const ESDT_NFT_TRANSFER_GAS: u64 = 1_000_000;
const ESDT_MANAGEMENT_GAS: u64 = 60_000_000;
const NFT_CREATE_GAS: u64 = 3_000_000;
const TX_VERSION: u32 = 1;

/// The system smart contract handling all ESDT issuance and role management.
pub const ESDT_SYSTEM_SC_ADDRESS: &str =
    "erd1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqzllls8a5w6u";

/// Cost of issuing a token or collection: 0.05 EGLD in base units.
pub fn issue_cost() -> BigUint {
    BigUint::from(50_000_000_000_000_000u64)
}

/// Capability flags set on every issued token.
const FUNGIBLE_PROPERTIES: &[&str] = &[
    "canFreeze",
    "canWipe",
    "canPause",
    "canChangeOwner",
    "canUpgrade",
    "canAddSpecialRoles",
];

/// Collections additionally allow moving the NFT-create role.
const COLLECTION_PROPERTIES: &[&str] = &[
    "canFreeze",
    "canWipe",
    "canPause",
    "canChangeOwner",
    "canUpgrade",
    "canAddSpecialRoles",
    "canTransferNFTCreateRole",
];

/// Special roles granted to the issuer after an NFT collection settles.
pub const NFT_ROLES: &[&str] = &[
    "ESDTRoleNFTCreate",
    "ESDTRoleNFTBurn",
    "ESDTTransferRole",
    "ESDTRoleNFTAddURI",
    "ESDTRoleNFTUpdateAttributes",
    "ESDTRoleModifyCreator",
    "ESDTRoleModifyRoyalties",
    "ESDTRoleSetNewURI",
    "ESDTRoleNFTRecreate",
];

/// Special roles for SFT and MetaESDT collections.
pub const SFT_ROLES: &[&str] = &[
    "ESDTRoleNFTCreate",
    "ESDTRoleNFTBurn",
    "ESDTTransferRole",
    "ESDTRoleNFTAddQuantity",
];

/// Wire representation of a transaction. Field order matters: the network
/// verifies the signature against the serialized unsigned form.
#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    pub nonce: u64,
    pub value: String,
    pub receiver: String,
    pub sender: String,
    #[serde(rename = "gasPrice")]
    pub gas_price: u64,
    #[serde(rename = "gasLimit")]
    pub gas_limit: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(rename = "chainID")]
    pub chain_id: String,
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl Transaction {
    /// Signs the serialized unsigned transaction and stores the hex signature.
    pub fn sign(&mut self, wallet: &PemWallet) -> Result<(), serde_json::Error> {
        self.signature = None;
        let message = serde_json::to_vec(self)?;
        self.signature = Some(hex::encode(wallet.sign(&message)));
        Ok(())
    }
}

/// Builds signed transactions for one signing identity on one chain.
pub struct TransactionBuilder<'a> {
    wallet: &'a PemWallet,
    chain_id: &'a str,
}

impl<'a> TransactionBuilder<'a> {
    pub fn new(wallet: &'a PemWallet, chain_id: &'a str) -> Self {
        Self { wallet, chain_id }
    }

    fn build(
        &self,
        nonce: u64,
        receiver: String,
        value: BigUint,
        data: Option<String>,
        gas_limit: u64,
    ) -> Result<Transaction, serde_json::Error> {
        let mut tx = Transaction {
            nonce,
            value: value.to_string(),
            receiver,
            sender: self.wallet.address().to_bech32(),
            gas_price: GAS_PRICE,
            gas_limit,
            data: data.map(|d| BASE64.encode(d.as_bytes())),
            chain_id: self.chain_id.to_string(),
            version: TX_VERSION,
            signature: None,
        };
        tx.sign(self.wallet)?;
        Ok(tx)
    }

    pub fn native_transfer(
        &self,
        nonce: u64,
        receiver: &Address,
        amount: &BigUint,
    ) -> Result<Transaction, serde_json::Error> {
        self.build(
            nonce,
            receiver.to_bech32(),
            amount.clone(),
            None,
            MIN_GAS_LIMIT,
        )
    }

    pub fn esdt_transfer(
        &self,
        nonce: u64,
        receiver: &Address,
        token_identifier: &str,
        amount: &BigUint,
    ) -> Result<Transaction, serde_json::Error> {
        let data = format!(
            "ESDTTransfer@{}@{}",
            hex::encode(token_identifier),
            biguint_hex(amount)
        );
        let gas_limit = ESDT_TRANSFER_GAS + GAS_PER_DATA_BYTE * data.len() as u64;
        self.build(nonce, receiver.to_bech32(), BigUint::zero(), Some(data), gas_limit)
    }

    /// NFT-family transfers are addressed to the sender itself; the actual
    /// receiver rides inside the payload.
    pub fn esdt_nft_transfer(
        &self,
        nonce: u64,
        receiver: &Address,
        collection: &str,
        token_nonce: u64,
        amount: &BigUint,
    ) -> Result<Transaction, serde_json::Error> {
        let data = format!(
            "ESDTNFTTransfer@{}@{}@{}@{}",
            hex::encode(collection),
            u64_hex(token_nonce),
            biguint_hex(amount),
            receiver.hex()
        );
        let gas_limit = ESDT_NFT_TRANSFER_GAS + GAS_PER_DATA_BYTE * data.len() as u64;
        self.build(
            nonce,
            self.wallet.address().to_bech32(),
            BigUint::zero(),
            Some(data),
            gas_limit,
        )
    }

    pub fn issue_fungible(
        &self,
        nonce: u64,
        token_name: &str,
        token_ticker: &str,
        initial_supply: &BigUint,
        num_decimals: u32,
    ) -> Result<Transaction, serde_json::Error> {
        let mut data = format!(
            "issue@{}@{}@{}@{}",
            hex::encode(token_name),
            hex::encode(token_ticker),
            biguint_hex(initial_supply),
            u64_hex(num_decimals as u64)
        );
        push_properties(&mut data, FUNGIBLE_PROPERTIES);
        self.management_call(nonce, data, issue_cost())
    }

    pub fn issue_semi_fungible(
        &self,
        nonce: u64,
        token_name: &str,
        token_ticker: &str,
    ) -> Result<Transaction, serde_json::Error> {
        let mut data = format!(
            "issueSemiFungible@{}@{}",
            hex::encode(token_name),
            hex::encode(token_ticker)
        );
        push_properties(&mut data, COLLECTION_PROPERTIES);
        self.management_call(nonce, data, issue_cost())
    }

    pub fn issue_non_fungible(
        &self,
        nonce: u64,
        token_name: &str,
        token_ticker: &str,
    ) -> Result<Transaction, serde_json::Error> {
        let mut data = format!(
            "issueNonFungible@{}@{}",
            hex::encode(token_name),
            hex::encode(token_ticker)
        );
        push_properties(&mut data, COLLECTION_PROPERTIES);
        self.management_call(nonce, data, issue_cost())
    }

    pub fn register_meta_esdt(
        &self,
        nonce: u64,
        token_name: &str,
        token_ticker: &str,
        num_decimals: u32,
    ) -> Result<Transaction, serde_json::Error> {
        let mut data = format!(
            "registerMetaESDT@{}@{}@{}",
            hex::encode(token_name),
            hex::encode(token_ticker),
            u64_hex(num_decimals as u64)
        );
        push_properties(&mut data, COLLECTION_PROPERTIES);
        self.management_call(nonce, data, issue_cost())
    }

    pub fn set_special_roles(
        &self,
        nonce: u64,
        token_identifier: &str,
        user: &Address,
        roles: &[&str],
    ) -> Result<Transaction, serde_json::Error> {
        let mut data = format!(
            "setSpecialRole@{}@{}",
            hex::encode(token_identifier),
            user.hex()
        );
        for role in roles {
            data.push('@');
            data.push_str(&hex::encode(role));
        }
        self.management_call(nonce, data, BigUint::zero())
    }

    /// `ESDTNFTCreate@collection@quantity@name@royalties@hash@attributes@uri`.
    /// Hash, attributes and URI are left empty.
    pub fn nft_create(
        &self,
        nonce: u64,
        collection: &str,
        initial_quantity: &BigUint,
        name: &str,
        royalties: u64,
    ) -> Result<Transaction, serde_json::Error> {
        let data = format!(
            "ESDTNFTCreate@{}@{}@{}@{}@@@",
            hex::encode(collection),
            biguint_hex(initial_quantity),
            hex::encode(name),
            u64_hex(royalties)
        );
        let gas_limit = NFT_CREATE_GAS + GAS_PER_DATA_BYTE * data.len() as u64;
        self.build(
            nonce,
            self.wallet.address().to_bech32(),
            BigUint::zero(),
            Some(data),
            gas_limit,
        )
    }

    fn management_call(
        &self,
        nonce: u64,
        data: String,
        value: BigUint,
    ) -> Result<Transaction, serde_json::Error> {
        self.build(
            nonce,
            ESDT_SYSTEM_SC_ADDRESS.to_string(),
            value,
            Some(data),
            ESDT_MANAGEMENT_GAS,
        )
    }
}

fn push_properties(data: &mut String, properties: &[&str]) {
    for property in properties {
        data.push('@');
        data.push_str(&hex::encode(property));
        data.push('@');
        data.push_str(&hex::encode("true"));
    }
}

/// Hex with even-length padding, as ESDT call arguments require.
pub fn biguint_hex(value: &BigUint) -> String {
    pad_even(value.to_str_radix(16))
}

pub fn u64_hex(value: u64) -> String {
    pad_even(format!("{:x}", value))
}

fn pad_even(hex: String) -> String {
    if hex.len() % 2 == 1 {
        format!("0{}", hex)
    } else {
        hex
    }
}
