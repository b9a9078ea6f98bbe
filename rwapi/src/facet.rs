use serde::Serialize;
use strum::{Display, EnumString};

use crate::errors::RwApiError;
use crate::filter::Filter;

/// Sort direction used by query sorts and facet sorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Bucket size of a date facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DateInterval {
    Year,
    Month,
    Day,
}

/// What a facet is computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FacetScope {
    /// The main query and its filters.
    Global,
    /// The full text search only, ignoring the main filters. Usually combined
    /// with a facet filter to build "OR" facets.
    Query,
}

/// Aggregation computed alongside a query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Facet {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    interval: Option<DateInterval>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<FacetScope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<Filter>,
}

impl Facet {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..Self::default()
        }
    }

    /// Name under which the facet appears in the results. Defaults to the field.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.name = (!name.is_empty()).then_some(name);
        self
    }

    pub fn set_field(&mut self, field: impl Into<String>) -> &mut Self {
        self.field = field.into();
        self
    }

    /// Maximum number of buckets. Term facets only, incompatible with an interval.
    pub fn set_limit(&mut self, limit: u32) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    /// Date facets only, incompatible with a limit.
    pub fn set_interval(&mut self, interval: DateInterval) -> &mut Self {
        self.interval = Some(interval);
        self
    }

    /// `field` is either "count" or "value".
    pub fn set_sort(&mut self, field: &str, direction: SortDirection) -> &mut Self {
        self.sort = Some(format!("{}:{}", field, direction));
        self
    }

    pub fn set_scope(&mut self, scope: FacetScope) -> &mut Self {
        self.scope = Some(scope);
        self
    }

    /// Restricts the documents the facet is computed on. Only applies to this
    /// facet, not to the main query.
    pub fn set_filter(&mut self, filter: Filter) -> &mut Self {
        self.filter = Some(filter.canonicalize());
        self
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.field)
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn interval(&self) -> Option<DateInterval> {
        self.interval
    }

    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    pub fn scope(&self) -> Option<FacetScope> {
        self.scope
    }

    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    pub fn validate(&self) -> Result<(), RwApiError> {
        if self.field.is_empty() {
            return Err(RwApiError::InvalidFacet {
                field: self.field.clone(),
                reason: "field is required".to_string(),
            });
        }
        if self.limit.is_some() && self.interval.is_some() {
            return Err(RwApiError::InvalidFacet {
                field: self.field.clone(),
                reason: "limit and interval are mutually exclusive".to_string(),
            });
        }
        Ok(())
    }
}
