use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{
    Account, AccountId, CaseDraft, CaseId, ExistingCase, Money, PaymentStatus, TenantId,
};

/// Stored case: an admitted draft plus the identity the store assigned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseRecord {
    pub case_id: CaseId,
    pub account_id: AccountId,
    pub draft: CaseDraft,
    pub created_at: DateTime<Utc>,
}

impl CaseRecord {
    pub fn ledger_entry(&self) -> ExistingCase {
        self.draft.ledger_entry(self.case_id.clone())
    }

    pub fn status_view(&self) -> CaseStatusView {
        CaseStatusView {
            case_id: self.case_id.clone(),
            tenant_id: self.draft.tenant_id().clone(),
            status: self.draft.status().label(),
            payment_status: self.draft.payment_status(),
            amount_owed: self.draft.amount_owed(),
            price: self.draft.price(),
            document_required: self.draft.document_required(),
        }
    }
}

/// Account store lookup.
pub trait AccountDirectory: Send + Sync {
    fn account(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError>;
}

/// Case store so the service can be exercised in isolation.
pub trait CaseRepository: Send + Sync {
    /// Every case created for the account, oldest first.
    fn ledger(&self, account_id: &AccountId) -> Result<Vec<ExistingCase>, RepositoryError>;
    fn insert(&self, record: CaseRecord) -> Result<CaseRecord, RepositoryError>;
    fn fetch(&self, id: &CaseId) -> Result<Option<CaseRecord>, RepositoryError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Sanitized representation of a stored case for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct CaseStatusView {
    pub case_id: CaseId,
    pub tenant_id: TenantId,
    pub status: &'static str,
    pub payment_status: PaymentStatus,
    pub amount_owed: Money,
    pub price: Money,
    pub document_required: bool,
}
