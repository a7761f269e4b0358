#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

/// Error categories shared by every contract in the suite.
///
/// # Code ranges
/// | Category      | Meaning                                              |
/// |---------------|------------------------------------------------------|
/// | Validation    | malformed input (null identity, empty hash/uri, ...) |
/// | Authorization | caller is not the party allowed to act              |
/// | NotFound      | lookup of an id or key that was never written        |
/// | StateConflict | operation not allowed in the record's current state  |
/// | AccessDenied  | well-formed request refused by the access gate       |
/// | External      | a collaborator contract rejected the call            |
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorCategory {
    Validation = 1,
    Authorization = 2,
    NotFound = 3,
    StateConflict = 4,
    AccessDenied = 5,
    External = 6,
}

/// Error severity levels indicating the impact and urgency of errors
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorSeverity {
    /// Non-critical errors, usually bad input
    Low = 1,
    /// Refused operations worth surfacing to monitoring
    Medium = 2,
    /// Refusals or failures that need attention
    High = 3,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ErrorContext {
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
    pub message: String,
    pub user: Option<Address>,
    pub timestamp: u64,
    pub retryable: bool,
}

/// Classification every contract error enum provides.
pub trait ErrorDetails: Copy {
    /// Stable numeric code (the `#[repr(u32)]` discriminant).
    fn code(&self) -> u32;
    fn category(&self) -> ErrorCategory;
    fn severity(&self) -> ErrorSeverity;
    fn message(&self) -> &'static str;

    /// Whether retrying the same call later may succeed.
    fn retryable(&self) -> bool {
        false
    }
}

/// Creates an ErrorContext from an error and the user it concerns.
pub fn create_error_context<E: ErrorDetails>(
    env: &Env,
    error: &E,
    user: Option<Address>,
) -> ErrorContext {
    ErrorContext {
        category: error.category(),
        severity: error.severity(),
        message: String::from_str(env, error.message()),
        user,
        timestamp: env.ledger().timestamp(),
        retryable: error.retryable(),
    }
}

/// Publishes an error event for monitoring and indexing.
/// Topics carry the `ERROR` marker and the category; the payload carries
/// the numeric code and the full context.
pub fn publish_error<E: ErrorDetails>(env: &Env, error: &E, user: Option<Address>) {
    let context = create_error_context(env, error, user);
    let topics = (symbol_short!("ERROR"), context.category);
    env.events().publish(topics, (error.code(), context));
}
