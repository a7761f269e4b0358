//! Capability interfaces between the contracts of the suite.
//!
//! Each trait only generates a client; any contract exposing functions with
//! the same names and argument types can be wired in, which is how tests
//! substitute stub collaborators.

use soroban_sdk::{contractclient, contracttype, Address, BytesN, Env};

/// Roles an identity oracle can attach to an address.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Role {
    None = 0,
    Subject = 1,
    Clinician = 2,
    Researcher = 3,
    Insurer = 4,
}

/// Notified by the consent ledger every time a subject grants consent.
///
/// A failing `notify` fails the grant that triggered it.
#[contractclient(name = "RewardSinkClient")]
pub trait RewardSink {
    fn notify(env: Env, subject: Address, amount: i128);
}

/// Keyed identity/role store used for integration-level bookkeeping.
/// Access decisions never depend on it.
#[contractclient(name = "IdentityOracleClient")]
pub trait IdentityOracle {
    fn is_registered(env: Env, identity: Address) -> bool;
    fn get_role(env: Env, identity: Address) -> Role;
}

/// The part of the consent ledger the access gate relies on.
#[contractclient(name = "ConsentLedgerClient")]
pub trait ConsentLedger {
    /// Returns `(true, id)` for the earliest active, unexpired consent that
    /// matches, or `(false, 0)`.
    fn is_valid(
        env: Env,
        subject: Address,
        requester: Address,
        data_id: BytesN<32>,
        now: u64,
    ) -> (bool, u64);
}
