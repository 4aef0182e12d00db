use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{Property, PropertyId, PropertyType, SubsidyType, Tenant, TenantId};
use super::fields::parse_money;

/// Read-only tenant/property lookup owned by the property catalog.
pub trait PropertyCatalog: Send + Sync {
    fn tenant(&self, id: &TenantId) -> Option<Tenant>;
    fn property(&self, id: &PropertyId) -> Option<Property>;
    /// Subsidy-type table in catalog order; the first entry is the default.
    fn subsidy_types(&self) -> Vec<SubsidyType>;
}

/// Immutable catalog snapshot held in memory.
#[derive(Debug, Clone)]
pub struct InMemoryCatalog {
    tenants: HashMap<TenantId, Tenant>,
    properties: HashMap<PropertyId, Property>,
    subsidy_types: Vec<SubsidyType>,
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new(SubsidyType::standard_catalog())
    }
}

impl InMemoryCatalog {
    pub fn new(subsidy_types: Vec<SubsidyType>) -> Self {
        Self {
            tenants: HashMap::new(),
            properties: HashMap::new(),
            subsidy_types,
        }
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.insert(property.id.clone(), property);
        self
    }

    pub fn with_tenant(mut self, tenant: Tenant) -> Self {
        self.tenants.insert(tenant.id.clone(), tenant);
        self
    }

    pub fn tenant_count(&self) -> usize {
        self.tenants.len()
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }
}

impl PropertyCatalog for InMemoryCatalog {
    fn tenant(&self, id: &TenantId) -> Option<Tenant> {
        self.tenants.get(id).cloned()
    }

    fn property(&self, id: &PropertyId) -> Option<Property> {
        self.properties.get(id).cloned()
    }

    fn subsidy_types(&self) -> Vec<SubsidyType> {
        self.subsidy_types.clone()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogImportError {
    #[error("failed to read catalog export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("catalog row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },
}

/// Loads a catalog snapshot from a tenant roster CSV export.
pub struct CatalogImporter;

impl CatalogImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        subsidy_types: Vec<SubsidyType>,
    ) -> Result<InMemoryCatalog, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, subsidy_types)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        subsidy_types: Vec<SubsidyType>,
    ) -> Result<InMemoryCatalog, CatalogImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut catalog = InMemoryCatalog::new(subsidy_types);

        for (index, record) in csv_reader.deserialize::<CatalogRow>().enumerate() {
            // Header is row 1.
            let row = index + 2;
            let entry = record?;
            let (tenant, property) = entry.into_models(row)?;

            if let Some(existing) = catalog.properties.get(&property.id) {
                if existing != &property {
                    return Err(CatalogImportError::InvalidRow {
                        row,
                        reason: format!(
                            "property {} conflicts with an earlier row (region or type differs)",
                            property.id
                        ),
                    });
                }
            }
            if catalog.tenants.contains_key(&tenant.id) {
                return Err(CatalogImportError::InvalidRow {
                    row,
                    reason: format!("tenant {} appears more than once", tenant.id),
                });
            }

            catalog = catalog.with_property(property).with_tenant(tenant);
        }

        Ok(catalog)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Tenant ID")]
    tenant_id: String,
    #[serde(rename = "Property ID")]
    property_id: String,
    #[serde(rename = "Region")]
    region: String,
    #[serde(rename = "Property Type")]
    property_type: String,
    #[serde(rename = "Subsidized", default, deserialize_with = "empty_string_as_none")]
    subsidized: Option<String>,
    #[serde(rename = "Subsidy Type", default, deserialize_with = "empty_string_as_none")]
    subsidy_type: Option<String>,
    #[serde(rename = "Monthly Rent", default, deserialize_with = "empty_string_as_none")]
    monthly_rent: Option<String>,
}

impl CatalogRow {
    fn into_models(self, row: usize) -> Result<(Tenant, Property), CatalogImportError> {
        let invalid = |reason: String| CatalogImportError::InvalidRow { row, reason };

        if self.tenant_id.is_empty() || self.property_id.is_empty() {
            return Err(invalid("tenant and property ids are required".to_string()));
        }

        let property_type = PropertyType::parse(&self.property_type)
            .ok_or_else(|| invalid(format!("unknown property type '{}'", self.property_type)))?;

        let subsidized = match self.subsidized.as_deref() {
            None => false,
            Some(raw) => parse_flag(raw)
                .ok_or_else(|| invalid(format!("unrecognized subsidized flag '{raw}'")))?,
        };

        let monthly_rent = self
            .monthly_rent
            .as_deref()
            .map(|raw| parse_money(raw).ok_or_else(|| invalid(format!("invalid rent '{raw}'"))))
            .transpose()?;

        let property_id = PropertyId(self.property_id);
        let property = Property {
            id: property_id.clone(),
            region: self.region,
            property_type,
        };
        let tenant = Tenant {
            id: TenantId(self.tenant_id),
            property_id,
            subsidized,
            subsidy_type: self.subsidy_type.map(SubsidyType),
            monthly_rent,
        };

        Ok((tenant, property))
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
