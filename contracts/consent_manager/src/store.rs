//! Consent records and the per-subject / per-requester indices.
//!
//! Records live in persistent storage under `(CONSENT, id)`; each index is a
//! `Vec<u64>` of ids in grant order. Nothing here is ever deleted.

use soroban_sdk::{contracttype, symbol_short, Address, BytesN, Env, String, Symbol, Vec};

const CONSENT: Symbol = symbol_short!("CONSENT");
const SUBJECT_IDX: Symbol = symbol_short!("SUBJ_IDX");
const REQUESTER_IDX: Symbol = symbol_short!("REQ_IDX");
const CONSENT_CTR: Symbol = symbol_short!("CST_CTR");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

/// Stored consent status. Expiry is never stored; see
/// [`ConsentRecord::is_valid_at`].
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConsentStatus {
    Active,
    Revoked,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConsentRecord {
    pub id: u64,
    pub subject: Address,
    pub requester: Address,
    pub data_id: BytesN<32>,
    pub created_at: u64,
    /// `0` means the consent never expires.
    pub expires_at: u64,
    pub status: ConsentStatus,
    pub purpose: String,
}

impl ConsentRecord {
    pub fn is_expired_at(&self, now: u64) -> bool {
        self.expires_at != 0 && now > self.expires_at
    }

    /// Active and not expired. `now == expires_at` is still valid.
    pub fn is_valid_at(&self, now: u64) -> bool {
        self.status == ConsentStatus::Active && !self.is_expired_at(now)
    }
}

fn extend_ttl_index_key(env: &Env, key: &(Symbol, Address)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Last id handed out, `0` before the first grant.
pub fn last_id(env: &Env) -> u64 {
    env.storage().instance().get(&CONSENT_CTR).unwrap_or(0)
}

/// Allocates the next consent id.
pub fn next_id(env: &Env) -> u64 {
    let id = last_id(env).saturating_add(1);
    env.storage().instance().set(&CONSENT_CTR, &id);
    id
}

pub fn get(env: &Env, id: u64) -> Option<ConsentRecord> {
    env.storage().persistent().get(&(CONSENT, id))
}

/// Overwrites an existing record (status flips only).
pub fn save(env: &Env, record: &ConsentRecord) {
    let key = (CONSENT, record.id);
    env.storage().persistent().set(&key, record);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Stores a freshly granted record and appends its id to both indices.
pub fn insert(env: &Env, record: &ConsentRecord) {
    save(env, record);
    push_index(env, (SUBJECT_IDX, record.subject.clone()), record.id);
    push_index(env, (REQUESTER_IDX, record.requester.clone()), record.id);
}

fn push_index(env: &Env, key: (Symbol, Address), id: u64) {
    let mut ids: Vec<u64> = env
        .storage()
        .persistent()
        .get(&key)
        .unwrap_or(Vec::new(env));
    ids.push_back(id);
    env.storage().persistent().set(&key, &ids);
    extend_ttl_index_key(env, &key);
}

pub fn subject_index(env: &Env, subject: &Address) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&(SUBJECT_IDX, subject.clone()))
        .unwrap_or(Vec::new(env))
}

pub fn requester_index(env: &Env, requester: &Address) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&(REQUESTER_IDX, requester.clone()))
        .unwrap_or(Vec::new(env))
}

/// Keeps a consent that is still being relied on, and the subject index that
/// finds it, from being archived.
fn touch(env: &Env, id: u64, subject: &Address) {
    env.storage()
        .persistent()
        .extend_ttl(&(CONSENT, id), TTL_THRESHOLD, TTL_EXTEND_TO);
    extend_ttl_index_key(env, &(SUBJECT_IDX, subject.clone()));
}

/// First consent, in the subject's grant order, that matches `requester`
/// and `data_id` and is valid at `now`. A match has its TTL extended.
///
/// Linear in the number of consents the subject has ever granted. The
/// earliest surviving grant wins even when later ones are also valid.
pub fn first_valid(
    env: &Env,
    subject: &Address,
    requester: &Address,
    data_id: &BytesN<32>,
    now: u64,
) -> Option<u64> {
    for id in subject_index(env, subject).iter() {
        if let Some(record) = get(env, id) {
            if record.requester == *requester
                && record.data_id == *data_id
                && record.is_valid_at(now)
            {
                touch(env, id, subject);
                return Some(id);
            }
        }
    }
    None
}
