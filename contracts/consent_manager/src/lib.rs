#![no_std]

pub mod errors;
pub mod events;
pub mod store;
pub mod validation;

use common::audit::{AuditRecord, AuditTrail};
use common::interfaces::RewardSinkClient;
use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, Address, BytesN, Env, String, Symbol, Vec,
};

pub use errors::ContractError;
pub use store::{ConsentRecord, ConsentStatus};

/// Storage keys for the contract
const ADMIN: Symbol = symbol_short!("ADMIN");
const INITIALIZED: Symbol = symbol_short!("INIT");
const REWARD_SINK: Symbol = symbol_short!("RWD_SINK");
const REWARD_AMOUNT: Symbol = symbol_short!("RWD_AMT");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

/// Reward settings applied to every grant.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardConfig {
    pub sink: Option<Address>,
    pub amount: i128,
}

#[contract]
pub struct ConsentManagerContract;

#[contractimpl]
impl ConsentManagerContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the contract.
    ///
    /// * `reward_sink`   – contract notified on every grant, if any.
    /// * `reward_amount` – amount passed to the sink for each grant.
    pub fn initialize(
        env: Env,
        admin: Address,
        reward_sink: Option<Address>,
        reward_amount: i128,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }

        admin.require_auth();
        validation::validate_reward_config(&env, &reward_sink, reward_amount)?;

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&INITIALIZED, &true);
        Self::store_reward_config(&env, &reward_sink, reward_amount);
        env.storage()
            .instance()
            .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);

        events::publish_initialized(&env, admin, reward_sink, reward_amount);

        Ok(())
    }

    /// Check if the contract is initialized
    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    /// Get the admin address
    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)
    }

    /// Replace the reward sink and amount. Admin only.
    pub fn set_reward_config(
        env: Env,
        caller: Address,
        reward_sink: Option<Address>,
        reward_amount: i128,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_admin(&env, &caller)?;
        validation::validate_reward_config(&env, &reward_sink, reward_amount)?;

        Self::store_reward_config(&env, &reward_sink, reward_amount);
        events::publish_reward_config_set(&env, reward_sink, reward_amount);

        Ok(())
    }

    pub fn get_reward_config(env: Env) -> RewardConfig {
        RewardConfig {
            sink: env.storage().instance().get(&REWARD_SINK),
            amount: env.storage().instance().get(&REWARD_AMOUNT).unwrap_or(0),
        }
    }

    // ── Consent lifecycle ───────────────────────────────────────────────────

    /// Grant `requester` access to the subject's `data_id` until
    /// `expires_at` (inclusive; `0` never expires).
    ///
    /// Identical grants are not merged: every call creates a new record with
    /// a fresh id. When a reward sink is configured it is notified last, and
    /// a sink failure fails the whole grant.
    pub fn grant(
        env: Env,
        subject: Address,
        requester: Address,
        data_id: BytesN<32>,
        expires_at: u64,
        purpose: String,
    ) -> Result<u64, ContractError> {
        Self::require_initialized(&env)?;
        subject.require_auth();

        validation::validate_requester(&env, &requester)?;
        validation::validate_data_id(&env, &data_id)?;

        let record = ConsentRecord {
            id: store::next_id(&env),
            subject: subject.clone(),
            requester,
            data_id,
            created_at: env.ledger().timestamp(),
            expires_at,
            status: ConsentStatus::Active,
            purpose,
        };
        store::insert(&env, &record);
        events::publish_consent_granted(&env, &record);

        Self::notify_reward_sink(&env, &subject)?;

        Ok(record.id)
    }

    /// Revoke consent `id`. Only the subject may revoke, and only once.
    pub fn revoke(env: Env, id: u64, caller: Address) -> Result<(), ContractError> {
        caller.require_auth();

        let mut record = store::get(&env, id)
            .ok_or_else(|| errors::fail(&env, ContractError::ConsentNotFound, Some(caller.clone())))?;

        if caller != record.subject {
            return Err(errors::fail(&env, ContractError::Unauthorized, Some(caller)));
        }
        if record.status != ConsentStatus::Active {
            return Err(errors::fail(&env, ContractError::AlreadyRevoked, Some(caller)));
        }

        record.status = ConsentStatus::Revoked;
        store::save(&env, &record);

        events::publish_consent_revoked(&env, id, record.subject);

        Ok(())
    }

    /// Earliest consent the subject granted to `requester` for `data_id`
    /// that is active and unexpired at `now`. Returns `(false, 0)` when none
    /// is.
    pub fn is_valid(
        env: Env,
        subject: Address,
        requester: Address,
        data_id: BytesN<32>,
        now: u64,
    ) -> (bool, u64) {
        match store::first_valid(&env, &subject, &requester, &data_id, now) {
            Some(id) => (true, id),
            None => (false, 0),
        }
    }

    /// [`Self::is_valid`] evaluated at the current ledger timestamp.
    pub fn is_valid_now(
        env: Env,
        subject: Address,
        requester: Address,
        data_id: BytesN<32>,
    ) -> (bool, u64) {
        let now = env.ledger().timestamp();
        Self::is_valid(env, subject, requester, data_id, now)
    }

    /// Validity of one specific consent at `now`; unknown ids are not valid.
    pub fn is_valid_by_id(env: Env, id: u64, now: u64) -> bool {
        store::get(&env, id).is_some_and(|record| record.is_valid_at(now))
    }

    /// Record that the requester accessed data under consent `id`.
    ///
    /// The consent must be valid at the current ledger timestamp.
    pub fn log_access(env: Env, id: u64, caller: Address) -> Result<(), ContractError> {
        caller.require_auth();

        let record = store::get(&env, id)
            .ok_or_else(|| errors::fail(&env, ContractError::ConsentNotFound, Some(caller.clone())))?;

        if caller != record.requester {
            return Err(errors::fail(&env, ContractError::Unauthorized, Some(caller)));
        }
        if record.status == ConsentStatus::Revoked {
            return Err(errors::fail(&env, ContractError::ConsentRevoked, Some(caller)));
        }
        if record.is_expired_at(env.ledger().timestamp()) {
            return Err(errors::fail(&env, ContractError::ConsentExpired, Some(caller)));
        }

        events::publish_access_logged(&env, &record);

        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    pub fn get_consent(env: Env, id: u64) -> Result<ConsentRecord, ContractError> {
        store::get(&env, id).ok_or(ContractError::ConsentNotFound)
    }

    /// Ids of every consent `subject` granted, oldest first.
    pub fn consents_of(env: Env, subject: Address) -> Vec<u64> {
        store::subject_index(&env, &subject)
    }

    /// Ids of every consent granted to `requester`, oldest first.
    pub fn consents_for(env: Env, requester: Address) -> Vec<u64> {
        store::requester_index(&env, &requester)
    }

    /// Total number of consents ever granted (also the last id issued).
    pub fn consent_count(env: Env) -> u64 {
        store::last_id(&env)
    }

    // ── Audit log ───────────────────────────────────────────────────────────

    pub fn audit_len(env: Env) -> u64 {
        AuditTrail::len(&env)
    }

    pub fn get_audit_record(env: Env, seq: u64) -> Result<AuditRecord, ContractError> {
        AuditTrail::get(&env, seq).ok_or(ContractError::AuditRecordNotFound)
    }

    pub fn verify_audit_chain(env: Env) -> bool {
        AuditTrail::verify_chain(&env)
    }

    /// Contract version
    pub fn version() -> u32 {
        1
    }

    // ── Internal helpers ────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    fn require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)?;
        if *caller != admin {
            return Err(errors::fail(env, ContractError::Unauthorized, Some(caller.clone())));
        }
        Ok(())
    }

    fn store_reward_config(env: &Env, reward_sink: &Option<Address>, reward_amount: i128) {
        match reward_sink {
            Some(sink) => env.storage().instance().set(&REWARD_SINK, sink),
            None => env.storage().instance().remove(&REWARD_SINK),
        }
        env.storage().instance().set(&REWARD_AMOUNT, &reward_amount);
    }

    fn notify_reward_sink(env: &Env, subject: &Address) -> Result<(), ContractError> {
        let sink: Option<Address> = env.storage().instance().get(&REWARD_SINK);
        let Some(sink) = sink else {
            return Ok(());
        };
        let amount: i128 = env.storage().instance().get(&REWARD_AMOUNT).unwrap_or(0);

        match RewardSinkClient::new(env, &sink).try_notify(subject, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(errors::fail(
                env,
                ContractError::RewardSinkFailed,
                Some(subject.clone()),
            )),
        }
    }
}

#[cfg(test)]
mod test;
