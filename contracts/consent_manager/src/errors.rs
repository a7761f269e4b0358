use common::errors::{publish_error, ErrorCategory, ErrorDetails, ErrorSeverity};
use soroban_sdk::{Address, Env};

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    ConsentNotFound = 4,
    InvalidRequester = 5,
    InvalidDataId = 6,
    AlreadyRevoked = 8,
    ConsentRevoked = 9,
    ConsentExpired = 10,
    RewardSinkFailed = 11,
    InvalidRewardConfig = 12,
    AuditRecordNotFound = 13,
}

impl ErrorDetails for ContractError {
    fn code(&self) -> u32 {
        *self as u32
    }

    fn category(&self) -> ErrorCategory {
        match self {
            ContractError::InvalidRequester
            | ContractError::InvalidDataId
            | ContractError::InvalidRewardConfig => ErrorCategory::Validation,
            ContractError::Unauthorized => ErrorCategory::Authorization,
            ContractError::ConsentNotFound | ContractError::AuditRecordNotFound => {
                ErrorCategory::NotFound
            }
            ContractError::NotInitialized
            | ContractError::AlreadyInitialized
            | ContractError::AlreadyRevoked
            | ContractError::ConsentRevoked
            | ContractError::ConsentExpired => ErrorCategory::StateConflict,
            ContractError::RewardSinkFailed => ErrorCategory::External,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::NotFound => ErrorSeverity::Low,
            ErrorCategory::External => ErrorSeverity::High,
            _ => ErrorSeverity::Medium,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ContractError::NotInitialized => "Contract has not been initialized",
            ContractError::AlreadyInitialized => "Contract is already initialized",
            ContractError::Unauthorized => "Caller is not authorized for this consent",
            ContractError::ConsentNotFound => "Consent not found",
            ContractError::InvalidRequester => "Requester is not a valid identity",
            ContractError::InvalidDataId => "Data id must not be zero",
            ContractError::AlreadyRevoked => "Consent is already revoked",
            ContractError::ConsentRevoked => "Consent has been revoked",
            ContractError::ConsentExpired => "Consent has expired",
            ContractError::RewardSinkFailed => "Reward sink rejected the notification",
            ContractError::InvalidRewardConfig => "Reward sink requires a positive amount",
            ContractError::AuditRecordNotFound => "Audit record not found",
        }
    }
}

/// Publishes an `ERROR` event for `error` and hands it back for returning.
pub fn fail(env: &Env, error: ContractError, user: Option<Address>) -> ContractError {
    publish_error(env, &error, user);
    error
}
