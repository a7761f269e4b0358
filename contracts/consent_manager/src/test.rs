#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::arithmetic_side_effects
)]

use super::*;
use common::audit::AuditEvent;
use common::data_id;
use soroban_sdk::testutils::storage::Persistent as _;
use soroban_sdk::testutils::{Address as _, Events as _, Ledger as _};
use soroban_sdk::{contract, contracterror, contractimpl, xdr, Env, IntoVal, TryFromVal};

// ── Stub reward sinks ───────────────────────────────────────────────────────

const NOTIFIED: Symbol = symbol_short!("NOTIFIED");

#[contract]
pub struct CountingSink;

#[contractimpl]
impl CountingSink {
    pub fn notify(env: Env, _subject: Address, amount: i128) {
        let total: i128 = env.storage().instance().get(&NOTIFIED).unwrap_or(0);
        env.storage().instance().set(&NOTIFIED, &(total + amount));
    }

    pub fn notified(env: Env) -> i128 {
        env.storage().instance().get(&NOTIFIED).unwrap_or(0)
    }
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum SinkError {
    Closed = 1,
}

#[contract]
pub struct ClosedSink;

#[contractimpl]
impl ClosedSink {
    pub fn notify(_env: Env, _subject: Address, _amount: i128) -> Result<(), SinkError> {
        Err(SinkError::Closed)
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn setup() -> (Env, ConsentManagerContractClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();

    let contract_id = env.register(ConsentManagerContract, ());
    let client = ConsentManagerContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin, &None, &0);

    (env, client, admin)
}

fn purpose(env: &Env) -> String {
    String::from_str(env, "treatment")
}

/// Number of `ERROR` events published so far.
fn error_events(env: &Env) -> usize {
    let error: soroban_sdk::Val = symbol_short!("ERROR").into_val(env);
    let error = xdr::ScVal::try_from_val(env, &error).unwrap();
    env.events()
        .all()
        .events()
        .iter()
        .filter(|e| match &e.body {
            xdr::ContractEventBody::V0(body) => body.topics.first() == Some(&error),
        })
        .count()
}

// ── Initialisation ──────────────────────────────────────────────────────────

#[test]
fn test_initialize() {
    let (_env, client, admin) = setup();

    assert!(client.is_initialized());
    assert_eq!(client.get_admin(), admin);
    assert_eq!(
        client.get_reward_config(),
        RewardConfig {
            sink: None,
            amount: 0
        }
    );
    assert_eq!(client.consent_count(), 0);
    assert_eq!(client.version(), 1);
}

#[test]
fn test_double_initialize_fails() {
    let (env, client, _admin) = setup();

    let result = client.try_initialize(&Address::generate(&env), &None, &0);
    assert_eq!(result, Err(Ok(ContractError::AlreadyInitialized)));
}

#[test]
fn test_grant_requires_initialization() {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(ConsentManagerContract, ());
    let client = ConsentManagerContractClient::new(&env, &contract_id);

    assert!(!client.is_initialized());
    assert_eq!(client.try_get_admin(), Err(Ok(ContractError::NotInitialized)));

    let result = client.try_grant(
        &Address::generate(&env),
        &Address::generate(&env),
        &data_id::for_data_type(&env, 7),
        &0,
        &purpose(&env),
    );
    assert_eq!(result, Err(Ok(ContractError::NotInitialized)));
}

#[test]
fn test_sink_without_amount_is_rejected() {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(ConsentManagerContract, ());
    let client = ConsentManagerContractClient::new(&env, &contract_id);
    let sink = env.register(CountingSink, ());

    let result = client.try_initialize(&Address::generate(&env), &Some(sink), &0);
    assert_eq!(result, Err(Ok(ContractError::InvalidRewardConfig)));

    let result = client.try_initialize(&Address::generate(&env), &None, &-5);
    assert_eq!(result, Err(Ok(ContractError::InvalidRewardConfig)));
    assert!(!client.is_initialized());
}

// ── Grant validation ────────────────────────────────────────────────────────

#[test]
fn test_grant_rejects_ledger_as_requester() {
    let (env, client, _admin) = setup();
    let subject = Address::generate(&env);

    let result = client.try_grant(
        &subject,
        &client.address,
        &data_id::for_data_type(&env, 7),
        &0,
        &purpose(&env),
    );
    assert_eq!(result, Err(Ok(ContractError::InvalidRequester)));
    assert_eq!(client.consent_count(), 0);
}

#[test]
fn test_grant_rejects_zero_data_id() {
    let (env, client, _admin) = setup();

    let result = client.try_grant(
        &Address::generate(&env),
        &Address::generate(&env),
        &BytesN::from_array(&env, &[0u8; 32]),
        &0,
        &purpose(&env),
    );
    assert_eq!(result, Err(Ok(ContractError::InvalidDataId)));
}

#[test]
fn test_grant_accepts_long_purpose() {
    let (env, client, _admin) = setup();
    let subject = Address::generate(&env);
    let long = String::from_bytes(&env, &[b'x'; 1_024]);

    let id = client.grant(
        &subject,
        &Address::generate(&env),
        &data_id::for_data_type(&env, 7),
        &0,
        &long,
    );
    assert_eq!(client.get_consent(&id).purpose, long);
}

#[test]
fn test_validation_failures_publish_error_event() {
    let (env, client, _admin) = setup();
    let zero = BytesN::from_array(&env, &[0u8; 32]);

    env.as_contract(&client.address, || {
        let before = error_events(&env);

        assert_eq!(
            validation::validate_data_id(&env, &zero),
            Err(ContractError::InvalidDataId)
        );
        assert_eq!(
            validation::validate_requester(&env, &env.current_contract_address()),
            Err(ContractError::InvalidRequester)
        );
        assert_eq!(
            validation::validate_reward_config(&env, &None, -1),
            Err(ContractError::InvalidRewardConfig)
        );

        assert_eq!(error_events(&env), before + 3);
    });
}

#[test]
fn test_grant_stores_record() {
    let (env, client, _admin) = setup();
    env.ledger().set_timestamp(1_000);

    let subject = Address::generate(&env);
    let requester = Address::generate(&env);
    let data = data_id::for_data_type(&env, 3);

    let id = client.grant(&subject, &requester, &data, &5_000, &purpose(&env));
    let record = client.get_consent(&id);

    assert_eq!(record.id, 1);
    assert_eq!(record.subject, subject);
    assert_eq!(record.requester, requester);
    assert_eq!(record.data_id, data);
    assert_eq!(record.created_at, 1_000);
    assert_eq!(record.expires_at, 5_000);
    assert_eq!(record.status, ConsentStatus::Active);
    assert_eq!(record.purpose, purpose(&env));
}

#[test]
fn test_get_consent_unknown_id() {
    let (_env, client, _admin) = setup();
    assert_eq!(client.try_get_consent(&0), Err(Ok(ContractError::ConsentNotFound)));
    assert_eq!(client.try_get_consent(&42), Err(Ok(ContractError::ConsentNotFound)));
    assert!(!client.is_valid_by_id(&0, &0));
}

// ── log_access ──────────────────────────────────────────────────────────────

#[test]
fn test_log_access_rules() {
    let (env, client, _admin) = setup();
    env.ledger().set_timestamp(100);

    let subject = Address::generate(&env);
    let requester = Address::generate(&env);
    let id = client.grant(
        &subject,
        &requester,
        &data_id::for_data_type(&env, 7),
        &200,
        &purpose(&env),
    );

    assert_eq!(
        client.try_log_access(&id, &subject),
        Err(Ok(ContractError::Unauthorized))
    );
    assert_eq!(
        client.try_log_access(&99, &requester),
        Err(Ok(ContractError::ConsentNotFound))
    );

    client.log_access(&id, &requester);

    env.ledger().set_timestamp(200);
    client.log_access(&id, &requester);

    env.ledger().set_timestamp(201);
    assert_eq!(
        client.try_log_access(&id, &requester),
        Err(Ok(ContractError::ConsentExpired))
    );
}

#[test]
fn test_log_access_after_revoke() {
    let (env, client, _admin) = setup();
    let subject = Address::generate(&env);
    let requester = Address::generate(&env);
    let id = client.grant(
        &subject,
        &requester,
        &data_id::for_data_type(&env, 7),
        &0,
        &purpose(&env),
    );

    client.revoke(&id, &subject);
    assert_eq!(
        client.try_log_access(&id, &requester),
        Err(Ok(ContractError::ConsentRevoked))
    );
}

// ── Reward configuration ────────────────────────────────────────────────────

#[test]
fn test_set_reward_config_admin_only() {
    let (env, client, admin) = setup();
    let sink = env.register(CountingSink, ());

    let outsider = Address::generate(&env);
    assert_eq!(
        client.try_set_reward_config(&outsider, &Some(sink.clone()), &10),
        Err(Ok(ContractError::Unauthorized))
    );

    client.set_reward_config(&admin, &Some(sink.clone()), &10);
    assert_eq!(
        client.get_reward_config(),
        RewardConfig {
            sink: Some(sink),
            amount: 10
        }
    );

    client.set_reward_config(&admin, &None, &0);
    assert_eq!(client.get_reward_config().sink, None);
}

#[test]
fn test_grant_notifies_sink() {
    let (env, client, admin) = setup();
    let sink = env.register(CountingSink, ());
    let sink_client = CountingSinkClient::new(&env, &sink);
    client.set_reward_config(&admin, &Some(sink), &25);

    let subject = Address::generate(&env);
    client.grant(
        &subject,
        &Address::generate(&env),
        &data_id::for_data_type(&env, 1),
        &0,
        &purpose(&env),
    );
    client.grant(
        &subject,
        &Address::generate(&env),
        &data_id::for_data_type(&env, 2),
        &0,
        &purpose(&env),
    );

    assert_eq!(sink_client.notified(), 50);
}

#[test]
fn test_failing_sink_rolls_back_grant() {
    let (env, client, admin) = setup();
    let sink = env.register(ClosedSink, ());
    client.set_reward_config(&admin, &Some(sink), &25);

    let subject = Address::generate(&env);
    let requester = Address::generate(&env);
    let data = data_id::for_data_type(&env, 1);

    let result = client.try_grant(&subject, &requester, &data, &0, &purpose(&env));
    assert_eq!(result, Err(Ok(ContractError::RewardSinkFailed)));

    assert_eq!(client.consent_count(), 0);
    assert_eq!(client.consents_of(&subject).len(), 0);
    assert_eq!(client.is_valid_now(&subject, &requester, &data), (false, 0));
    assert_eq!(client.audit_len(), 0);
}

// ── Audit log ───────────────────────────────────────────────────────────────

#[test]
fn test_audit_log_records_lifecycle() {
    let (env, client, _admin) = setup();
    let subject = Address::generate(&env);
    let requester = Address::generate(&env);

    let id = client.grant(
        &subject,
        &requester,
        &data_id::for_data_type(&env, 7),
        &0,
        &purpose(&env),
    );
    client.log_access(&id, &requester);
    client.revoke(&id, &subject);

    assert_eq!(client.audit_len(), 3);
    assert!(client.verify_audit_chain());

    match client.get_audit_record(&0).event {
        AuditEvent::Granted(e) => {
            assert_eq!(e.id, id);
            assert_eq!(e.requester, requester);
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert!(matches!(
        client.get_audit_record(&1).event,
        AuditEvent::AccessLogged(_)
    ));
    match client.get_audit_record(&2).event {
        AuditEvent::Revoked(e) => assert_eq!(e.subject, subject),
        other => panic!("unexpected event {:?}", other),
    }
    assert_eq!(
        client.try_get_audit_record(&3),
        Err(Ok(ContractError::AuditRecordNotFound))
    );
}

#[test]
fn test_failed_revoke_leaves_audit_log_untouched() {
    let (env, client, _admin) = setup();
    let subject = Address::generate(&env);
    let id = client.grant(
        &subject,
        &Address::generate(&env),
        &data_id::for_data_type(&env, 7),
        &0,
        &purpose(&env),
    );
    client.revoke(&id, &subject);

    let _ = client.try_revoke(&id, &subject);
    let _ = client.try_revoke(&id, &Address::generate(&env));

    assert_eq!(client.audit_len(), 2);
    assert!(client.verify_audit_chain());
}

// ── Error metadata ──────────────────────────────────────────────────────────

#[test]
fn test_error_categories() {
    use common::errors::{ErrorCategory, ErrorDetails, ErrorSeverity};

    assert_eq!(
        ContractError::InvalidRequester.category(),
        ErrorCategory::Validation
    );
    assert_eq!(
        ContractError::Unauthorized.category(),
        ErrorCategory::Authorization
    );
    assert_eq!(
        ContractError::AlreadyRevoked.category(),
        ErrorCategory::StateConflict
    );
    assert_eq!(
        ContractError::ConsentNotFound.category(),
        ErrorCategory::NotFound
    );
    assert_eq!(
        ContractError::RewardSinkFailed.severity(),
        ErrorSeverity::High
    );
    assert_eq!(ContractError::ConsentExpired.code(), 10);
    assert!(!ContractError::ConsentExpired.retryable());
}

#[test]
fn test_validity_check_extends_record_ttl() {
    let (env, client, _admin) = setup();
    let subject = Address::generate(&env);
    let requester = Address::generate(&env);
    let data = data_id::for_data_type(&env, 7);
    let id = client.grant(&subject, &requester, &data, &0, &purpose(&env));

    let key = (symbol_short!("CONSENT"), id);
    let ttl = || env.as_contract(&client.address, || env.storage().persistent().get_ttl(&key));

    let granted = ttl();
    env.ledger().with_mut(|l| l.sequence_number += 2_000_000);
    let aged = ttl();
    assert!(aged < granted);

    assert_eq!(client.is_valid_now(&subject, &requester, &data), (true, id));
    assert!(ttl() > aged);
}
