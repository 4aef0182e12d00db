use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{Duration, NaiveDate};
use serde_json::Value;

use crate::workflows::ftpr::catalog::InMemoryCatalog;
use crate::workflows::ftpr::clock::FixedClock;
use crate::workflows::ftpr::domain::{
    Account, AccountId, CaseId, CaseStatus, ExistingCase, Money, PaymentStatus, Property,
    PropertyId, PropertyType, RegionPrice, SubmissionForm, SubsidyType, Tenant, TenantId,
};
use crate::workflows::ftpr::engine::{IntakeDecision, IntakeEngine, IntakeRequest};
use crate::workflows::ftpr::repository::{
    AccountDirectory, CaseRecord, CaseRepository, RepositoryError,
};
use crate::workflows::ftpr::{FtprIntakeService, IntakePolicy};

pub(super) const ACCOUNT: &str = "acct-riverside";
pub(super) const OTHER_ACCOUNT: &str = "acct-lakeside";

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).expect("valid date")
}

pub(super) fn days_from_today(days: i64) -> String {
    (today() + Duration::days(days)).format("%Y-%m-%d").to_string()
}

pub(super) fn policy() -> IntakePolicy {
    IntakePolicy::default()
}

pub(super) fn engine() -> IntakeEngine {
    IntakeEngine::new(&policy())
}

fn region(price_dollars: i64, unlocked: bool) -> RegionPrice {
    RegionPrice {
        price: Money::from_dollars(price_dollars),
        unlocked,
    }
}

/// Polk priced at $150 with a referral code on file, Story locked, Dallas unpriced.
pub(super) fn account() -> Account {
    let mut price_table = BTreeMap::new();
    price_table.insert("Polk County".to_string(), region(150, true));
    price_table.insert("Story County".to_string(), region(95, false));
    price_table.insert("Linn County".to_string(), region(20, true));
    Account {
        id: AccountId(ACCOUNT.to_string()),
        price_table,
        referral_code: Some("FRIEND-2026".to_string()),
    }
}

pub(super) fn account_without_referral() -> Account {
    Account {
        referral_code: None,
        ..account()
    }
}

fn property(id: &str, region: &str, property_type: PropertyType) -> Property {
    Property {
        id: PropertyId(id.to_string()),
        region: region.to_string(),
        property_type,
    }
}

pub(super) fn tenant(id: &str, property_id: &str, subsidy: Option<&str>, rent: i64) -> Tenant {
    Tenant {
        id: TenantId(id.to_string()),
        property_id: PropertyId(property_id.to_string()),
        subsidized: subsidy.is_some(),
        subsidy_type: subsidy.map(SubsidyType::new),
        monthly_rent: Some(Money::from_dollars(rent)),
    }
}

pub(super) fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::new(SubsidyType::standard_catalog())
        .with_property(property("p-maple", "Polk County", PropertyType::Residential))
        .with_property(property("p-plaza", "Polk County", PropertyType::Commercial))
        .with_property(property("p-campus", "Story County", PropertyType::Residential))
        .with_property(property("p-metro", "Dallas County", PropertyType::Residential))
        .with_property(property("p-cedar", "Linn County", PropertyType::Residential))
        .with_tenant(tenant("t-standard", "p-maple", None, 1000))
        .with_tenant(tenant("t-default-subsidy", "p-maple", Some("None"), 1000))
        .with_tenant(tenant("t-section8", "p-maple", Some("Section8"), 1000))
        .with_tenant(tenant("t-section8-shop", "p-plaza", Some("Section8"), 1000))
        .with_tenant(tenant("t-campus", "p-campus", None, 800))
        .with_tenant(tenant("t-metro", "p-metro", None, 900))
        .with_tenant(tenant("t-cedar", "p-cedar", None, 700))
        .with_tenant(tenant("t-orphan", "p-demolished", None, 700))
}

/// Valid non-waived submission for `t-standard`, evicting exactly at the minimum lead time.
pub(super) fn form() -> SubmissionForm {
    SubmissionForm {
        tenant_id: Some("t-standard".to_string()),
        no_right_of_redemption: false,
        amount_owed: Some("500".to_string()),
        court_case_number: Some("CV-2026-0412".to_string()),
        warrant_order_date: Some("2026-10-01".to_string()),
        scheduled_eviction_date: Some(days_from_today(17)),
        signer_name: Some("Dana Whitfield".to_string()),
        supporting_document: None,
    }
}

pub(super) fn form_for(tenant_id: &str) -> SubmissionForm {
    SubmissionForm {
        tenant_id: Some(tenant_id.to_string()),
        ..form()
    }
}

pub(super) fn existing(
    tenant_id: &str,
    payment_status: PaymentStatus,
    status: CaseStatus,
) -> ExistingCase {
    ExistingCase {
        case_id: CaseId(format!("ftpr-prior-{tenant_id}")),
        tenant_id: TenantId(tenant_id.to_string()),
        payment_status,
        status,
    }
}

pub(super) fn decide(
    form: &SubmissionForm,
    account: Option<&Account>,
    ledger: &[ExistingCase],
) -> IntakeDecision {
    let catalog = catalog();
    engine().decide(IntakeRequest {
        submission: form,
        account,
        catalog: &catalog,
        ledger,
        today: today(),
    })
}

pub(super) fn build_service() -> (
    FtprIntakeService<MemoryAccounts, MemoryCases>,
    Arc<MemoryCases>,
) {
    let cases = Arc::new(MemoryCases::default());
    let service = service_with(cases.clone());
    (service, cases)
}

pub(super) fn service_with<R>(cases: Arc<R>) -> FtprIntakeService<MemoryAccounts, R>
where
    R: CaseRepository + 'static,
{
    FtprIntakeService::with_clock(
        Arc::new(MemoryAccounts::seeded()),
        cases,
        Arc::new(catalog()),
        Arc::new(FixedClock(today())),
        policy(),
    )
}

#[derive(Default, Clone)]
pub(super) struct MemoryAccounts {
    accounts: HashMap<AccountId, Account>,
}

impl MemoryAccounts {
    pub(super) fn seeded() -> Self {
        let account = account();
        let other = Account {
            id: AccountId(OTHER_ACCOUNT.to_string()),
            ..account.clone()
        };
        let mut accounts = HashMap::new();
        accounts.insert(account.id.clone(), account);
        accounts.insert(other.id.clone(), other);
        Self { accounts }
    }
}

impl AccountDirectory for MemoryAccounts {
    fn account(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError> {
        Ok(self.accounts.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryCases {
    pub(super) records: Arc<Mutex<Vec<CaseRecord>>>,
    pub(super) prior: Arc<Mutex<Vec<ExistingCase>>>,
}

impl MemoryCases {
    pub(super) fn with_prior(case: ExistingCase) -> Self {
        let cases = Self::default();
        cases.prior.lock().expect("ledger mutex poisoned").push(case);
        cases
    }

    pub(super) fn stored(&self) -> Vec<CaseRecord> {
        self.records.lock().expect("repository mutex poisoned").clone()
    }
}

impl CaseRepository for MemoryCases {
    fn ledger(&self, account_id: &AccountId) -> Result<Vec<ExistingCase>, RepositoryError> {
        let mut ledger = self.prior.lock().expect("ledger mutex poisoned").clone();
        let records = self.records.lock().expect("repository mutex poisoned");
        ledger.extend(
            records
                .iter()
                .filter(|record| &record.account_id == account_id)
                .map(CaseRecord::ledger_entry),
        );
        Ok(ledger)
    }

    fn insert(&self, record: CaseRecord) -> Result<CaseRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.case_id == record.case_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &CaseId) -> Result<Option<CaseRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|record| &record.case_id == id).cloned())
    }
}

pub(super) struct UnavailableCases;

impl CaseRepository for UnavailableCases {
    fn ledger(&self, _account_id: &AccountId) -> Result<Vec<ExistingCase>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert(&self, _record: CaseRecord) -> Result<CaseRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &CaseId) -> Result<Option<CaseRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
