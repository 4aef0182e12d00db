use chrono::NaiveDate;
use ftpr_intake::error::AppError;
use ftpr_intake::workflows::ftpr::{
    Account, AccountDirectory, AccountId, CaseId, CaseRecord, CaseRepository, CaseStatus,
    ExistingCase, InMemoryCatalog, Money, PaymentStatus, Property, PropertyId, PropertyType,
    RegionPrice, RepositoryError, SubsidyType, Tenant, TenantId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

pub(crate) const DEMO_ACCOUNT: &str = "acct-demo";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAccountDirectory {
    accounts: Arc<Mutex<HashMap<AccountId, Account>>>,
}

impl InMemoryAccountDirectory {
    pub(crate) fn with_account(self, account: Account) -> Self {
        self.accounts
            .lock()
            .expect("account mutex poisoned")
            .insert(account.id.clone(), account);
        self
    }
}

impl AccountDirectory for InMemoryAccountDirectory {
    fn account(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError> {
        let guard = self.accounts.lock().expect("account mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

/// Case store holding drafts created by this process plus cases imported from earlier filings.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCaseRepository {
    records: Arc<Mutex<Vec<CaseRecord>>>,
    imported: Arc<Mutex<HashMap<AccountId, Vec<ExistingCase>>>>,
}

impl InMemoryCaseRepository {
    pub(crate) fn with_existing(self, account_id: AccountId, cases: Vec<ExistingCase>) -> Self {
        self.imported
            .lock()
            .expect("ledger mutex poisoned")
            .entry(account_id)
            .or_default()
            .extend(cases);
        self
    }
}

impl CaseRepository for InMemoryCaseRepository {
    fn ledger(&self, account_id: &AccountId) -> Result<Vec<ExistingCase>, RepositoryError> {
        let mut ledger = self
            .imported
            .lock()
            .expect("ledger mutex poisoned")
            .get(account_id)
            .cloned()
            .unwrap_or_default();
        let guard = self.records.lock().expect("repository mutex poisoned");
        ledger.extend(
            guard
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

pub(crate) fn demo_account() -> Account {
    let mut price_table = BTreeMap::new();
    price_table.insert(
        "Polk County".to_string(),
        RegionPrice {
            price: Money::from_dollars(150),
            unlocked: true,
        },
    );
    price_table.insert(
        "Story County".to_string(),
        RegionPrice {
            price: Money::from_dollars(110),
            unlocked: false,
        },
    );
    Account {
        id: AccountId(DEMO_ACCOUNT.to_string()),
        price_table,
        referral_code: Some("WELCOME-2026".to_string()),
    }
}

pub(crate) fn demo_catalog() -> InMemoryCatalog {
    let residential = |id: &str, region: &str| Property {
        id: PropertyId(id.to_string()),
        region: region.to_string(),
        property_type: PropertyType::Residential,
    };
    let tenant = |id: &str, property: &str, subsidy: Option<&str>, rent: i64| Tenant {
        id: TenantId(id.to_string()),
        property_id: PropertyId(property.to_string()),
        subsidized: subsidy.is_some(),
        subsidy_type: subsidy.map(SubsidyType::new),
        monthly_rent: Some(Money::from_dollars(rent)),
    };

    InMemoryCatalog::default()
        .with_property(residential("p-oakwood", "Polk County"))
        .with_property(residential("p-lincoln", "Polk County"))
        .with_property(residential("p-college", "Story County"))
        .with_tenant(tenant("t-alvarez", "p-oakwood", None, 1_150))
        .with_tenant(tenant("t-brooks", "p-oakwood", Some("None"), 950))
        .with_tenant(tenant("t-chen", "p-lincoln", Some("Section8"), 1_000))
        .with_tenant(tenant("t-dubois", "p-lincoln", None, 1_300))
        .with_tenant(tenant("t-evans", "p-lincoln", Some("Section8"), 1_000))
        .with_tenant(tenant("t-fischer", "p-college", None, 875))
}

/// Earlier filings the demo account already has on record.
pub(crate) fn demo_ledger() -> Vec<ExistingCase> {
    vec![ExistingCase {
        case_id: CaseId("ftpr-legacy-0042".to_string()),
        tenant_id: TenantId("t-dubois".to_string()),
        payment_status: PaymentStatus::Unpaid,
        status: CaseStatus::InReview,
    }]
}

pub(crate) fn demo_repositories() -> (InMemoryAccountDirectory, InMemoryCaseRepository) {
    let accounts = InMemoryAccountDirectory::default().with_account(demo_account());
    let cases = InMemoryCaseRepository::default()
        .with_existing(AccountId(DEMO_ACCOUNT.to_string()), demo_ledger());
    (accounts, cases)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
