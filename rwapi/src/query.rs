use serde::Serialize;

use crate::errors::RwApiError;
use crate::facet::{Facet, SortDirection};
use crate::filter::{Filter, Operator};

/// Fields to include in or exclude from each result item.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryFields {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

impl QueryFields {
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}

/// Full text search clause.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchQuery {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
}

/// Request payload of an API query.
///
/// Members left unset are omitted from the JSON payload. Numbers are only
/// omitted when never set, so an explicit `limit` or `offset` of 0 is sent.
///
/// A `Query` must only be mutated by one writer at a time; build it, then
/// hand it to a [`crate::Client`] by reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Query {
    #[serde(skip_serializing_if = "QueryFields::is_empty")]
    fields: QueryFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sort: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    preset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile: Option<String>,
    #[serde(rename = "query", skip_serializing_if = "Option::is_none")]
    search: Option<SearchQuery>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<Filter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    facets: Vec<Facet>,
}

fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    (!value.is_empty()).then_some(value)
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fields to include/exclude. A non-empty list replaces the
    /// previous one, an empty list leaves it as it was.
    pub fn set_fields(&mut self, include: Vec<String>, exclude: Vec<String>) -> &mut Self {
        if !include.is_empty() {
            self.fields.include = include;
        }
        if !exclude.is_empty() {
            self.fields.exclude = exclude;
        }
        self
    }

    pub fn set_range(&mut self, limit: u32, offset: u32) -> &mut Self {
        self.set_limit(limit).set_offset(offset)
    }

    pub fn set_limit(&mut self, limit: u32) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn set_offset(&mut self, offset: u32) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    /// Appends a sort criterion. Criteria apply in the order they were added.
    pub fn add_sort(&mut self, field: &str, direction: SortDirection) -> &mut Self {
        self.sort.push(format!("{}:{}", field, direction));
        self
    }

    pub fn set_preset(&mut self, preset: impl Into<String>) -> &mut Self {
        self.preset = non_empty(preset);
        self
    }

    pub fn set_profile(&mut self, profile: impl Into<String>) -> &mut Self {
        self.profile = non_empty(profile);
        self
    }

    /// Sets the full text search. The value is always replaced; `fields` only
    /// when non-empty and `operator` only when given.
    pub fn set_query(
        &mut self,
        value: impl Into<String>,
        fields: Vec<String>,
        operator: Option<Operator>,
    ) -> &mut Self {
        let search = self.search.get_or_insert_with(SearchQuery::default);
        search.value = value.into();
        if !fields.is_empty() {
            search.fields = fields;
        }
        if operator.is_some() {
            search.operator = operator;
        }
        self
    }

    pub fn set_filter(&mut self, filter: Filter) -> &mut Self {
        self.filter = Some(filter.canonicalize());
        self
    }

    pub fn add_facet(&mut self, facet: Facet) -> &mut Self {
        self.facets.push(facet);
        self
    }

    pub fn fields(&self) -> &QueryFields {
        &self.fields
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn offset(&self) -> Option<u32> {
        self.offset
    }

    pub fn sort(&self) -> &[String] {
        &self.sort
    }

    pub fn preset(&self) -> Option<&str> {
        self.preset.as_deref()
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    pub fn search(&self) -> Option<&SearchQuery> {
        self.search.as_ref()
    }

    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    pub fn validate(&self) -> Result<(), RwApiError> {
        self.facets.iter().try_for_each(Facet::validate)
    }

    /// Validates the facets and renders the request payload.
    pub fn to_json(&self) -> Result<String, RwApiError> {
        self.validate()?;
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, RwApiError> {
        self.validate()?;
        Ok(serde_json::to_value(self)?)
    }
}
