use crate::errors::{self, ContractError};
use common::data_id;
use soroban_sdk::{Address, BytesN, Env};

/// The ledger's own address is the null identity: it can never act as a
/// requester.
pub fn validate_requester(env: &Env, requester: &Address) -> Result<(), ContractError> {
    if *requester == env.current_contract_address() {
        return Err(errors::fail(env, ContractError::InvalidRequester, None));
    }
    Ok(())
}

pub fn validate_data_id(env: &Env, data_id: &BytesN<32>) -> Result<(), ContractError> {
    if data_id::is_zero(data_id) {
        return Err(errors::fail(env, ContractError::InvalidDataId, None));
    }
    Ok(())
}

/// A configured sink needs something to pay out; without a sink the
/// amount is ignored but still may not be negative.
pub fn validate_reward_config(
    env: &Env,
    sink: &Option<Address>,
    amount: i128,
) -> Result<(), ContractError> {
    if amount < 0 || (sink.is_some() && amount == 0) {
        return Err(errors::fail(env, ContractError::InvalidRewardConfig, None));
    }
    Ok(())
}
