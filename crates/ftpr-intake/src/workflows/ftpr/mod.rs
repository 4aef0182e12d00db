//! Failure To Pay Rent case intake.
//!
//! [`IntakeEngine`] is the decision function: field validators, the record schema, the pricing
//! resolver and the eligibility gates run against an immutable snapshot and yield either a
//! [`CaseDraft`] or an ordered list of [`Violation`]s. The service and router wrap the engine
//! with snapshot gathering, storage and HTTP.

pub mod catalog;
pub mod clock;
pub mod domain;
pub mod eligibility;
pub mod engine;
pub mod fields;
mod policy;
pub mod pricing;
pub mod repository;
pub mod router;
pub mod schema;
pub mod service;
pub mod violation;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogImportError, CatalogImporter, InMemoryCatalog, PropertyCatalog};
pub use clock::{FixedClock, IntakeClock, SystemClock};
pub use domain::{
    Account, AccountId, CaseDraft, CaseId, CaseStatus, ExistingCase, Money, PaymentStatus,
    Property, PropertyId, PropertyType, RegionPrice, SubmissionForm, SubsidyType, Tenant,
    TenantId,
};
pub use eligibility::{EligibilityChecker, EligibilityContext, EligibilityRule};
pub use engine::{IntakeDecision, IntakeEngine, IntakeRequest};
pub use policy::IntakePolicy;
pub use pricing::{PricingResolver, Quote};
pub use repository::{
    AccountDirectory, CaseRecord, CaseRepository, CaseStatusView, RepositoryError,
};
pub use router::{intake_router, ACCOUNT_HEADER};
pub use schema::{RecordRule, SubmissionSchema, ValidatedSubmission};
pub use service::{FtprIntakeService, IntakeServiceError};
pub use violation::{Violation, ViolationCode, ViolationKind};
