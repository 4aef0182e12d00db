use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Currency amount held in whole cents so pricing arithmetic stays exact.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn from_dollars(dollars: i64) -> Self {
        Self(dollars.saturating_mul(100))
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub const fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }

    pub fn clamp_non_negative(self) -> Money {
        Money(self.0.max(0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

/// Identifier wrapper for tenants in the property catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TenantId(pub String);

/// Identifier wrapper for catalog properties.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PropertyId(pub String);

/// Identifier wrapper for landlord accounts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

/// Identifier wrapper for stored cases.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CaseId(pub String);

macro_rules! display_id {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        })*
    };
}

display_id!(TenantId, PropertyId, AccountId, CaseId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Residential,
    Commercial,
}

impl PropertyType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "residential" => Some(Self::Residential),
            "commercial" => Some(Self::Commercial),
            _ => None,
        }
    }
}

/// Subsidy program name as listed in the catalog's subsidy-type table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubsidyType(pub String);

impl SubsidyType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Default catalog table; the first entry means "no special notice required".
    pub fn standard_catalog() -> Vec<SubsidyType> {
        ["None", "Section8", "PublicHousing", "Other"]
            .into_iter()
            .map(SubsidyType::new)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub property_id: PropertyId,
    pub subsidized: bool,
    #[serde(default)]
    pub subsidy_type: Option<SubsidyType>,
    #[serde(default)]
    pub monthly_rent: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    /// County or service region used to key the account price table.
    pub region: String,
    pub property_type: PropertyType,
}

/// Per-region price entry configured on a landlord account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionPrice {
    pub price: Money,
    pub unlocked: bool,
}

/// Landlord account snapshot supplied by the account store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    #[serde(default)]
    pub price_table: BTreeMap<String, RegionPrice>,
    #[serde(default)]
    pub referral_code: Option<String>,
}

impl Account {
    /// Look a region up ignoring surrounding whitespace and ASCII case.
    pub fn region_price(&self, region: &str) -> Option<&RegionPrice> {
        let wanted = region.trim();
        self.price_table
            .iter()
            .find(|(key, _)| key.trim().eq_ignore_ascii_case(wanted))
            .map(|(_, entry)| entry)
    }

    pub fn has_referral(&self) -> bool {
        self.referral_code
            .as_deref()
            .map(|code| !code.trim().is_empty())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

/// Lifecycle of a filed case from draft through court completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Draft,
    InReview,
    NoticeIssued,
    Filed,
    Complete,
}

impl CaseStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::InReview => "in review",
            Self::NoticeIssued => "notice issued",
            Self::Filed => "filed",
            Self::Complete => "complete",
        }
    }
}

/// Entry of the account's case ledger as read by duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingCase {
    pub case_id: CaseId,
    pub tenant_id: TenantId,
    pub payment_status: PaymentStatus,
    pub status: CaseStatus,
}

impl ExistingCase {
    /// Unpaid, and neither complete nor still a draft.
    pub fn is_in_flight(&self) -> bool {
        self.payment_status != PaymentStatus::Paid
            && !matches!(self.status, CaseStatus::Complete | CaseStatus::Draft)
    }
}

/// Raw Failure To Pay Rent request exactly as the user entered it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionForm {
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub no_right_of_redemption: bool,
    #[serde(default, deserialize_with = "text_or_number")]
    pub amount_owed: Option<String>,
    #[serde(default)]
    pub court_case_number: Option<String>,
    #[serde(default)]
    pub warrant_order_date: Option<String>,
    #[serde(default)]
    pub scheduled_eviction_date: Option<String>,
    #[serde(default)]
    pub signer_name: Option<String>,
    #[serde(default)]
    pub supporting_document: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<TextOrNumber>::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Number(number) => number.to_string(),
    }))
}

/// Validated, priced case awaiting persistence.
///
/// Only the intake engine builds drafts, so a value of this type always carries a positive
/// price, a zero amount exactly when redemption is waived, a document reference whenever one is
/// required, and the minimum eviction lead time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseDraft {
    pub(super) tenant_id: TenantId,
    pub(super) property_id: PropertyId,
    pub(super) region: String,
    pub(super) amount_owed: Money,
    pub(super) price: Money,
    pub(super) no_right_of_redemption: bool,
    pub(super) court_case_number: String,
    pub(super) warrant_order_date: NaiveDate,
    pub(super) scheduled_eviction_date: NaiveDate,
    pub(super) signer_name: String,
    pub(super) supporting_document: Option<String>,
    pub(super) document_required: bool,
    pub(super) payment_status: PaymentStatus,
    pub(super) status: CaseStatus,
}

impl CaseDraft {
    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    pub fn property_id(&self) -> &PropertyId {
        &self.property_id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn amount_owed(&self) -> Money {
        self.amount_owed
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn no_right_of_redemption(&self) -> bool {
        self.no_right_of_redemption
    }

    pub fn court_case_number(&self) -> &str {
        &self.court_case_number
    }

    pub fn warrant_order_date(&self) -> NaiveDate {
        self.warrant_order_date
    }

    pub fn scheduled_eviction_date(&self) -> NaiveDate {
        self.scheduled_eviction_date
    }

    pub fn signer_name(&self) -> &str {
        &self.signer_name
    }

    pub fn supporting_document(&self) -> Option<&str> {
        self.supporting_document.as_deref()
    }

    pub fn document_required(&self) -> bool {
        self.document_required
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    pub fn status(&self) -> CaseStatus {
        self.status
    }

    /// Ledger view of this draft once stored under `case_id`.
    pub fn ledger_entry(&self, case_id: CaseId) -> ExistingCase {
        ExistingCase {
            case_id,
            tenant_id: self.tenant_id.clone(),
            payment_status: self.payment_status,
            status: self.status,
        }
    }
}
