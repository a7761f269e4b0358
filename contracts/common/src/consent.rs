//! Host-side consent bookkeeping that mirrors the on-chain ledger.
//!
//! This module is `std`-only and does not touch Soroban storage, so it can
//! be used from off-chain simulations and as the reference model the
//! property tests compare the contract against.

use std::collections::HashMap;
use std::string::String;
use std::vec::Vec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentStatus {
    Active,
    Revoked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentRecord {
    pub id: u64,
    pub subject: String,
    pub requester: String,
    pub data_id: u32,
    pub created_at: u64,
    /// `0` means the consent never expires.
    pub expires_at: u64,
    pub status: ConsentStatus,
}

impl ConsentRecord {
    /// Active and, unless open-ended, not past `expires_at`.
    /// The boundary second itself is still valid.
    pub fn is_valid_at(&self, now: u64) -> bool {
        self.status == ConsentStatus::Active && (self.expires_at == 0 || now <= self.expires_at)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentBookError {
    InvalidDataId,
    NotFound,
    Unauthorized,
    AlreadyRevoked,
}

#[derive(Default)]
pub struct ConsentBook {
    records: Vec<ConsentRecord>,
    by_subject: HashMap<String, Vec<u64>>,
    by_requester: HashMap<String, Vec<u64>>,
}

impl ConsentBook {
    /// Grant consent using an externally supplied timestamp.
    ///
    /// Callers must provide the current time (`now`) rather than relying
    /// on `SystemTime`. In a Soroban contract context this is the ledger
    /// timestamp; in off-chain tooling it is `SystemTime::now()` converted
    /// to seconds since the UNIX epoch.
    pub fn grant(
        &mut self,
        subject: &str,
        requester: &str,
        data_id: u32,
        expires_at: u64,
        now: u64,
    ) -> Result<u64, ConsentBookError> {
        if data_id == 0 {
            return Err(ConsentBookError::InvalidDataId);
        }
        let id = self.records.len() as u64 + 1;
        self.records.push(ConsentRecord {
            id,
            subject: String::from(subject),
            requester: String::from(requester),
            data_id,
            created_at: now,
            expires_at,
            status: ConsentStatus::Active,
        });
        self.by_subject
            .entry(String::from(subject))
            .or_default()
            .push(id);
        self.by_requester
            .entry(String::from(requester))
            .or_default()
            .push(id);
        Ok(id)
    }

    pub fn revoke(&mut self, id: u64, caller: &str) -> Result<(), ConsentBookError> {
        let record = self
            .records
            .get_mut(id.wrapping_sub(1) as usize)
            .ok_or(ConsentBookError::NotFound)?;
        if record.subject != caller {
            return Err(ConsentBookError::Unauthorized);
        }
        if record.status != ConsentStatus::Active {
            return Err(ConsentBookError::AlreadyRevoked);
        }
        record.status = ConsentStatus::Revoked;
        Ok(())
    }

    /// Earliest consent in the subject's grant order that is valid at `now`.
    pub fn is_valid(&self, subject: &str, requester: &str, data_id: u32, now: u64) -> (bool, u64) {
        let ids = match self.by_subject.get(subject) {
            Some(ids) => ids,
            None => return (false, 0),
        };
        ids.iter()
            .filter_map(|id| self.get(*id))
            .find(|r| r.requester == requester && r.data_id == data_id && r.is_valid_at(now))
            .map_or((false, 0), |r| (true, r.id))
    }

    pub fn is_valid_by_id(&self, id: u64, now: u64) -> bool {
        self.get(id).is_some_and(|r| r.is_valid_at(now))
    }

    pub fn get(&self, id: u64) -> Option<&ConsentRecord> {
        self.records.get(id.checked_sub(1)? as usize)
    }

    pub fn consents_of(&self, subject: &str) -> &[u64] {
        self.by_subject
            .get(subject)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn consents_for(&self, requester: &str) -> &[u64] {
        self.by_requester
            .get(requester)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
