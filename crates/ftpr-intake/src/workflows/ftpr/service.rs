use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::catalog::PropertyCatalog;
use super::clock::{IntakeClock, SystemClock};
use super::domain::{Account, AccountId, CaseId, SubmissionForm, TenantId};
use super::engine::{unauthenticated, IntakeDecision, IntakeEngine, IntakeRequest};
use super::policy::IntakePolicy;
use super::pricing::Quote;
use super::repository::{AccountDirectory, CaseRecord, CaseRepository, RepositoryError};
use super::violation::{Violation, ViolationCode};

/// Service gathering the account, ledger and catalog snapshot for each intake decision and
/// storing admitted drafts.
pub struct FtprIntakeService<D, R> {
    accounts: Arc<D>,
    cases: Arc<R>,
    catalog: Arc<dyn PropertyCatalog>,
    clock: Arc<dyn IntakeClock>,
    engine: Arc<IntakeEngine>,
    sequence: AtomicU64,
}

impl<D, R> FtprIntakeService<D, R>
where
    D: AccountDirectory + 'static,
    R: CaseRepository + 'static,
{
    pub fn new(
        accounts: Arc<D>,
        cases: Arc<R>,
        catalog: Arc<dyn PropertyCatalog>,
        policy: IntakePolicy,
    ) -> Self {
        let clock = Arc::new(SystemClock::from_policy(&policy));
        Self::with_clock(accounts, cases, catalog, clock, policy)
    }

    pub fn with_clock(
        accounts: Arc<D>,
        cases: Arc<R>,
        catalog: Arc<dyn PropertyCatalog>,
        clock: Arc<dyn IntakeClock>,
        policy: IntakePolicy,
    ) -> Self {
        Self {
            accounts,
            cases,
            catalog,
            clock,
            engine: Arc::new(IntakeEngine::new(&policy)),
            sequence: AtomicU64::new(1),
        }
    }

    /// Decide a submission and store it when admitted.
    pub fn submit(
        &self,
        account_id: Option<&AccountId>,
        form: SubmissionForm,
    ) -> Result<CaseRecord, IntakeServiceError> {
        let account = match self.authenticate(account_id) {
            Err(err) if err.is_unauthenticated() => {
                warn!(
                    account = account_id.map(|id| id.0.as_str()).unwrap_or("anonymous"),
                    "ftpr submission without a known account"
                );
                return Err(err);
            }
            other => other?,
        };
        let ledger = self.cases.ledger(&account.id)?;

        let decision = self.engine.decide(IntakeRequest {
            submission: &form,
            account: Some(&account),
            catalog: self.catalog.as_ref(),
            ledger: &ledger,
            today: self.clock.today(),
        });

        let draft = match decision {
            IntakeDecision::Admitted(draft) => draft,
            IntakeDecision::Rejected(violations) => {
                warn!(
                    account = %account.id,
                    violations = violations.len(),
                    first = ?violations.first().map(|violation| violation.code),
                    "ftpr submission rejected"
                );
                return Err(IntakeServiceError::Rejected(violations));
            }
        };

        let record = CaseRecord {
            case_id: self.next_case_id(),
            account_id: account.id,
            draft,
            created_at: Utc::now(),
        };
        let stored = self.cases.insert(record)?;

        info!(
            case_id = %stored.case_id,
            account = %stored.account_id,
            tenant = %stored.draft.tenant_id(),
            price = %stored.draft.price(),
            "ftpr case draft stored"
        );
        Ok(stored)
    }

    /// Preview the filing price for a tenant.
    pub fn quote(
        &self,
        account_id: Option<&AccountId>,
        tenant_id: &TenantId,
    ) -> Result<Quote, IntakeServiceError> {
        let account = self.authenticate(account_id)?;
        self.engine
            .quote(Some(&account), tenant_id, self.catalog.as_ref())
            .map_err(|violation| IntakeServiceError::Rejected(vec![violation]))
    }

    /// Fetch a stored case. Cases owned by another account read as not found.
    pub fn get(
        &self,
        account_id: Option<&AccountId>,
        case_id: &CaseId,
    ) -> Result<CaseRecord, IntakeServiceError> {
        let account = self.authenticate(account_id)?;
        let record = self
            .cases
            .fetch(case_id)?
            .filter(|record| record.account_id == account.id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    fn authenticate(&self, account_id: Option<&AccountId>) -> Result<Account, IntakeServiceError> {
        let account = match account_id {
            Some(id) => self.accounts.account(id)?,
            None => None,
        };
        account.ok_or_else(|| IntakeServiceError::Rejected(vec![unauthenticated()]))
    }

    fn next_case_id(&self) -> CaseId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        CaseId(format!("ftpr-{id:06}"))
    }
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum IntakeServiceError {
    #[error("submission rejected with {} violation(s)", .0.len())]
    Rejected(Vec<Violation>),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl IntakeServiceError {
    /// True when the caller never established an account.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            IntakeServiceError::Rejected(violations)
                if violations.len() == 1 && violations[0].code == ViolationCode::Unauthenticated
        )
    }
}
