// src/blockchain/mod.rs

pub mod account;
pub mod address;
pub mod denominate;
pub mod provider;
pub mod token;
pub mod transactions;
pub mod validation;
pub mod wallet;
