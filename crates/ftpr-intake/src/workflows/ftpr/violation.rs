use serde::{Deserialize, Serialize};

/// Machine-checkable reason attached to every intake violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    Required,
    TooShort,
    TooLong,
    InvalidFormat,
    InvalidDate,
    InvalidAmount,
    OutOfRange,
    Mismatch,
    UnknownTenant,
    AmountRequired,
    InsufficientLeadTime,
    RegionUnpriced,
    RegionLocked,
    NonPositivePrice,
    DuplicateRequest,
    RedemptionCapExceeded,
    DocumentRequired,
    UnknownProperty,
    Unauthenticated,
}

/// Taxonomy bucket a violation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Field,
    CrossField,
    Pricing,
    Eligibility,
    Context,
}

impl ViolationCode {
    pub const fn kind(self) -> ViolationKind {
        match self {
            Self::Required
            | Self::TooShort
            | Self::TooLong
            | Self::InvalidFormat
            | Self::InvalidDate
            | Self::InvalidAmount
            | Self::OutOfRange
            | Self::Mismatch
            | Self::UnknownTenant => ViolationKind::Field,
            Self::AmountRequired | Self::InsufficientLeadTime => ViolationKind::CrossField,
            Self::RegionUnpriced | Self::RegionLocked | Self::NonPositivePrice => {
                ViolationKind::Pricing
            }
            Self::DuplicateRequest | Self::RedemptionCapExceeded | Self::DocumentRequired => {
                ViolationKind::Eligibility
            }
            Self::UnknownProperty | Self::Unauthenticated => ViolationKind::Context,
        }
    }
}

/// User-facing reason a submission was not admitted.
///
/// `field` is `None` for domain-level findings such as a duplicate request or a locked region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: Option<String>,
    pub code: ViolationCode,
    pub message: String,
}

impl Violation {
    pub fn field(field: impl Into<String>, code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            code,
            message: message.into(),
        }
    }

    pub fn domain(code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            field: None,
            code,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ViolationKind {
        self.code.kind()
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}
