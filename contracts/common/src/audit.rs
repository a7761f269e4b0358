use soroban_sdk::{contracttype, symbol_short, xdr::ToXdr, Address, BytesN, Env, String, Symbol};

const AUDIT: Symbol = symbol_short!("AUDIT");
const AUDIT_LEN: Symbol = symbol_short!("AUD_LEN");
const AUDIT_HEAD: Symbol = symbol_short!("AUD_HEAD");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

// ── Event payloads ──────────────────────────────────────────────────────────

/// Published when a subject grants consent to a requester.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConsentGrantedEvent {
    pub id: u64,
    pub subject: Address,
    pub requester: Address,
    pub data_id: BytesN<32>,
    pub expires_at: u64,
    pub purpose: String,
    pub timestamp: u64,
}

/// Published when a subject revokes one of their consents.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConsentRevokedEvent {
    pub id: u64,
    pub subject: Address,
    pub timestamp: u64,
}

/// Published when a requester records an access against a specific consent.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessLoggedEvent {
    pub id: u64,
    pub subject: Address,
    pub requester: Address,
    pub data_id: BytesN<32>,
    pub timestamp: u64,
}

/// Published when a subject registers a new data pointer.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordRegisteredEvent {
    pub subject: Address,
    pub data_type: u32,
    pub hash: String,
    pub uri: String,
    pub timestamp: u64,
}

/// Published when the access gate hands out a storage uri.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessGrantedEvent {
    pub subject: Address,
    pub requester: Address,
    pub data_type: u32,
    pub uri: String,
    pub timestamp: u64,
}

/// Published when the access gate refuses a request.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessDeniedEvent {
    pub subject: Address,
    pub requester: Address,
    pub data_type: u32,
    pub reason: String,
    pub timestamp: u64,
}

/// Every decision the suite records in its audit log.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AuditEvent {
    Granted(ConsentGrantedEvent),
    Revoked(ConsentRevokedEvent),
    AccessLogged(AccessLoggedEvent),
    Registered(RecordRegisteredEvent),
    AccessGranted(AccessGrantedEvent),
    AccessDenied(AccessDeniedEvent),
}

/// One entry of a contract's audit log.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuditRecord {
    /// Position in the log, starting at zero.
    pub seq: u64,
    pub event: AuditEvent,
    /// Ledger timestamp at which the record was appended.
    pub timestamp: u64,
    /// Hash of the previous record (zero for the first record).
    pub prev_hash: BytesN<32>,
}

fn zero_hash(env: &Env) -> BytesN<32> {
    BytesN::from_array(env, &[0u8; 32])
}

/// SHA-256 over the XDR encoding of a record.
fn hash_record(env: &Env, record: &AuditRecord) -> BytesN<32> {
    let encoded = record.clone().to_xdr(env);
    env.crypto().sha256(&encoded).into()
}

/// Append-only audit log kept in the calling contract's storage.
///
/// Records are never rewritten; each one is chained to its predecessor via
/// `prev_hash` so a replayed log can be checked for gaps or tampering.
pub struct AuditTrail;

impl AuditTrail {
    /// Appends `event` and returns its sequence number.
    pub fn append(env: &Env, event: AuditEvent) -> u64 {
        let seq = Self::len(env);
        let prev_hash: BytesN<32> = env
            .storage()
            .instance()
            .get(&AUDIT_HEAD)
            .unwrap_or_else(|| zero_hash(env));

        let record = AuditRecord {
            seq,
            event,
            timestamp: env.ledger().timestamp(),
            prev_hash,
        };

        let key = (AUDIT, seq);
        env.storage().persistent().set(&key, &record);
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);

        env.storage()
            .instance()
            .set(&AUDIT_HEAD, &hash_record(env, &record));
        env.storage()
            .instance()
            .set(&AUDIT_LEN, &seq.saturating_add(1));
        env.storage()
            .instance()
            .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);

        seq
    }

    /// Number of records appended so far.
    pub fn len(env: &Env) -> u64 {
        env.storage().instance().get(&AUDIT_LEN).unwrap_or(0)
    }

    pub fn get(env: &Env, seq: u64) -> Option<AuditRecord> {
        env.storage().persistent().get(&(AUDIT, seq))
    }

    /// Verifies that the audit chain is intact.
    /// Returns `true` if every record's `prev_hash` matches the hash of its
    /// predecessor, the first record has a zero `prev_hash`, and no record
    /// between zero and `len` is missing.
    pub fn verify_chain(env: &Env) -> bool {
        let mut expected = zero_hash(env);
        for seq in 0..Self::len(env) {
            let record = match Self::get(env, seq) {
                Some(record) => record,
                None => return false,
            };
            if record.seq != seq || record.prev_hash != expected {
                return false;
            }
            expected = hash_record(env, &record);
        }
        true
    }
}
