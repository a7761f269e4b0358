#![allow(deprecated)] // events().publish migration tracked separately

use crate::store::ConsentRecord;
use common::audit::{
    AccessLoggedEvent, AuditEvent, AuditTrail, ConsentGrantedEvent, ConsentRevokedEvent,
};
use soroban_sdk::{symbol_short, Address, Env};

/// Fired once when the contract is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub reward_sink: Option<Address>,
    pub reward_amount: i128,
    pub timestamp: u64,
}

/// Fired when the admin changes the reward configuration.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardConfigSetEvent {
    pub reward_sink: Option<Address>,
    pub reward_amount: i128,
    pub timestamp: u64,
}

pub fn publish_initialized(
    env: &Env,
    admin: Address,
    reward_sink: Option<Address>,
    reward_amount: i128,
) {
    let topics = (symbol_short!("INIT"),);
    let data = InitializedEvent {
        admin,
        reward_sink,
        reward_amount,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_reward_config_set(env: &Env, reward_sink: Option<Address>, reward_amount: i128) {
    let topics = (symbol_short!("RWD_CFG"),);
    let data = RewardConfigSetEvent {
        reward_sink,
        reward_amount,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

/// Publishes a grant and appends it to the audit log.
/// Topics carry the subject and requester so indexers can filter by party.
pub fn publish_consent_granted(env: &Env, record: &ConsentRecord) {
    let topics = (
        symbol_short!("CST_GRT"),
        record.subject.clone(),
        record.requester.clone(),
    );
    let data = ConsentGrantedEvent {
        id: record.id,
        subject: record.subject.clone(),
        requester: record.requester.clone(),
        data_id: record.data_id.clone(),
        expires_at: record.expires_at,
        purpose: record.purpose.clone(),
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data.clone());
    AuditTrail::append(env, AuditEvent::Granted(data));
}

/// Publishes a revocation and appends it to the audit log.
pub fn publish_consent_revoked(env: &Env, id: u64, subject: Address) {
    let topics = (symbol_short!("CST_REV"), subject.clone());
    let data = ConsentRevokedEvent {
        id,
        subject,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data.clone());
    AuditTrail::append(env, AuditEvent::Revoked(data));
}

pub fn publish_access_logged(env: &Env, record: &ConsentRecord) {
    let topics = (
        symbol_short!("ACC_LOG"),
        record.subject.clone(),
        record.requester.clone(),
    );
    let data = AccessLoggedEvent {
        id: record.id,
        subject: record.subject.clone(),
        requester: record.requester.clone(),
        data_id: record.data_id.clone(),
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data.clone());
    AuditTrail::append(env, AuditEvent::AccessLogged(data));
}
