//! Carbon credit record and its operation requests.
//!
//! A credit is issued against a project, traded between users, optionally
//! re-verified along the way, and finally retired. Retirement is terminal
//! for trading: a retired credit can no longer change owners.

use serde::{Deserialize, Serialize};

use carbonharvest_core::{CreditId, LedgerError, LedgerResult, ProjectId, UserId};

/// Upper bound on the ownership provenance window.
///
/// The history is a sliding window, not a cap on total transfers: once the
/// bound is exceeded the oldest entries are dropped.
pub const OWNERSHIP_HISTORY_LIMIT: usize = 100;

/// A unit record of verified carbon offset, owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credit {
    pub credit_id: CreditId,
    pub project_id: ProjectId,
    /// Caller-supplied issuance date, stored verbatim (provenance display).
    pub issuance_date: String,
    /// Tonnes of CO₂e offset. Always positive.
    pub quantity: f64,
    pub verification_status: String,
    /// Opaque attestation payload. May be empty.
    pub verification_data: String,
    pub owner_id: UserId,
    /// Prior and current owners, oldest first. Non-empty; the last element
    /// equals `owner_id` after any successful transfer.
    pub ownership_history: Vec<UserId>,
    pub retirement_status: bool,
    /// Set exactly once, when the credit is retired.
    pub retirer_id: Option<UserId>,
}

impl Credit {
    /// Build the initial record for a validated issuance request.
    ///
    /// The initial owner is seeded into the ownership history.
    pub fn issue(req: IssueCredit) -> LedgerResult<Self> {
        req.validate()?;

        let owner = req.owner_id;
        Ok(Self {
            credit_id: req.credit_id,
            project_id: req.project_id,
            issuance_date: req.issuance_date,
            quantity: req.quantity,
            verification_status: req.verification_status,
            verification_data: req.verification_data,
            owner_id: owner.clone(),
            ownership_history: vec![owner],
            retirement_status: false,
            retirer_id: None,
        })
    }

    pub fn is_retired(&self) -> bool {
        self.retirement_status
    }

    /// Reject callers who are not the owner of record.
    pub fn ensure_owned_by(&self, caller: &UserId) -> LedgerResult<()> {
        if &self.owner_id != caller {
            return Err(LedgerError::Unauthorized);
        }
        Ok(())
    }

    /// Move ownership to `new_owner` and append it to the provenance window,
    /// dropping the oldest entries once the window exceeds its bound.
    pub fn record_transfer(&mut self, new_owner: UserId) {
        self.owner_id = new_owner.clone();
        self.ownership_history.push(new_owner);

        if self.ownership_history.len() > OWNERSHIP_HISTORY_LIMIT {
            let excess = self.ownership_history.len() - OWNERSHIP_HISTORY_LIMIT;
            self.ownership_history.drain(..excess);
        }
    }

    /// Mark the credit as consumed by `retirer`.
    ///
    /// Re-retiring by the owner of record re-sets the same fields.
    pub fn record_retirement(&mut self, retirer: UserId) {
        self.retirement_status = true;
        self.retirer_id = Some(retirer);
    }

    /// Overwrite the verification axis (status + attestation payload).
    pub fn record_verification(&mut self, status: String, data: String) {
        self.verification_status = status;
        self.verification_data = data;
    }
}

/// Request: issue a new credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueCredit {
    pub credit_id: CreditId,
    pub project_id: ProjectId,
    pub issuance_date: String,
    pub quantity: f64,
    pub verification_status: String,
    /// Opaque payload; an empty string is a legal initial attestation.
    pub verification_data: String,
    pub owner_id: UserId,
}

impl IssueCredit {
    pub fn validate(&self) -> LedgerResult<()> {
        if self.credit_id.is_blank() {
            return Err(LedgerError::validation("credit_id is required"));
        }
        if self.project_id.is_blank() {
            return Err(LedgerError::validation("project_id is required"));
        }
        if self.issuance_date.trim().is_empty() {
            return Err(LedgerError::validation("issuance_date is required"));
        }
        if !(self.quantity > 0.0) {
            return Err(LedgerError::validation("quantity must be positive"));
        }
        if self.verification_status.trim().is_empty() {
            return Err(LedgerError::validation("verification_status is required"));
        }
        if self.owner_id.is_blank() {
            return Err(LedgerError::validation("owner_id is required"));
        }
        Ok(())
    }
}

/// Request: transfer a credit to a new owner.
///
/// `current_owner_id` identifies who claims to be transferring; the ledger
/// rejects the request unless it matches the owner of record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCredit {
    pub credit_id: CreditId,
    pub current_owner_id: UserId,
    pub new_owner_id: UserId,
}

impl TransferCredit {
    pub fn validate(&self) -> LedgerResult<()> {
        if self.credit_id.is_blank() {
            return Err(LedgerError::validation("credit_id is required"));
        }
        if self.current_owner_id.is_blank() {
            return Err(LedgerError::validation("current_owner_id is required"));
        }
        if self.new_owner_id.is_blank() {
            return Err(LedgerError::validation("new_owner_id is required"));
        }
        Ok(())
    }
}

/// Request: retire (permanently consume) a credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetireCredit {
    pub credit_id: CreditId,
    pub retirer_id: UserId,
}

impl RetireCredit {
    pub fn validate(&self) -> LedgerResult<()> {
        if self.credit_id.is_blank() {
            return Err(LedgerError::validation("credit_id is required"));
        }
        if self.retirer_id.is_blank() {
            return Err(LedgerError::validation("retirer_id is required"));
        }
        Ok(())
    }
}

/// Request: update a credit's verification status and attestation payload.
///
/// The ledger performs no ownership check here; restricting who may verify
/// is left to the calling layer's policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyCredit {
    pub credit_id: CreditId,
    pub verification_status: String,
    pub verification_data: String,
}

impl VerifyCredit {
    pub fn validate(&self) -> LedgerResult<()> {
        if self.credit_id.is_blank() {
            return Err(LedgerError::validation("credit_id is required"));
        }
        if self.verification_status.trim().is_empty() {
            return Err(LedgerError::validation("verification_status is required"));
        }
        if self.verification_data.trim().is_empty() {
            return Err(LedgerError::validation("verification_data is required"));
        }
        Ok(())
    }
}
