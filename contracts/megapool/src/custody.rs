//! Token custody: the only place the pool moves assets.
//!
//! Transfers go through the token's `try_` client so a rejected transfer
//! (insufficient balance, missing authorization) surfaces as
//! `ContractError::TransferFailed` instead of trapping. Returning that error
//! from a contract entry point still reverts every storage write made earlier
//! in the same invocation.

use soroban_sdk::{token, Address, Env};

use crate::ContractError;

/// Pull `amount` of `token` from `from` into the pool.
pub fn deposit(env: &Env, token: &Address, from: &Address, amount: i128) -> Result<(), ContractError> {
    let client = token::Client::new(env, token);
    match client.try_transfer(from, &env.current_contract_address(), &amount) {
        Ok(Ok(_)) => Ok(()),
        _ => Err(ContractError::TransferFailed),
    }
}

/// Pay `amount` of `token` out of the pool to `to`.
pub fn release(env: &Env, token: &Address, to: &Address, amount: i128) -> Result<(), ContractError> {
    let client = token::Client::new(env, token);
    match client.try_transfer(&env.current_contract_address(), to, &amount) {
        Ok(Ok(_)) => Ok(()),
        _ => Err(ContractError::TransferFailed),
    }
}
