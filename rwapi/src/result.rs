use std::collections::HashMap;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;

use crate::errors::RwApiError;

/// Decoded response of an API query.
///
/// Item fields are kept as raw JSON until [`ResultEnvelope::materialize`] or
/// [`ResultItem::decode_fields`] is called with the type the caller expects.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope {
    pub total_count: u64,
    pub count: u64,
    #[serde(rename = "data", default, deserialize_with = "null_as_empty")]
    pub items: Vec<ResultItem>,
    #[serde(default)]
    pub embedded: Option<ResultEmbedded>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResultItem {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub href: String,
    /// `None` when the item carries no fields or `null`.
    #[serde(default)]
    pub fields: Option<Box<RawValue>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultEmbedded {
    #[serde(default)]
    pub facets: HashMap<String, ResultFacet>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetKind {
    Date,
    Term,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResultFacet {
    #[serde(rename = "type")]
    pub kind: FacetKind,
    #[serde(default)]
    pub data: Vec<FacetBucket>,
    #[serde(default)]
    pub missing: u64,
    /// Whether more buckets exist than the facet limit allowed.
    #[serde(default)]
    pub more: bool,
}

/// A facet value and the number of matching documents carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FacetBucket {
    #[serde(deserialize_with = "string_or_number")]
    pub value: String,
    pub count: u64,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(serde_json::Number),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}

impl ResultEnvelope {
    pub fn from_slice(body: &[u8]) -> Result<Self, RwApiError> {
        serde_json::from_slice(body).map_err(|source| RwApiError::EnvelopeDecode {
            body: String::from_utf8_lossy(body).into_owned(),
            source,
        })
    }

    /// Decodes the fields of every item into `T`, keeping the item order.
    /// Stops at the first item that does not decode and returns its error.
    pub fn materialize<T: DeserializeOwned>(&self) -> Result<Vec<T>, RwApiError> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.decode_fields()
                    .map_err(|source| RwApiError::ItemDecode {
                        index,
                        id: item.id.clone(),
                        source,
                    })
            })
            .collect()
    }

    pub fn facet(&self, name: &str) -> Option<&ResultFacet> {
        self.embedded.as_ref()?.facets.get(name)
    }

    pub fn facets(&self) -> impl Iterator<Item = (&str, &ResultFacet)> {
        self.embedded
            .iter()
            .flat_map(|embedded| embedded.facets.iter())
            .map(|(name, facet)| (name.as_str(), facet))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromStr for ResultEnvelope {
    type Err = RwApiError;

    fn from_str(body: &str) -> Result<Self, Self::Err> {
        Self::from_slice(body.as_bytes())
    }
}

impl ResultItem {
    /// Decodes the item fields into `T`. Missing fields decode as JSON `null`.
    pub fn decode_fields<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(self.raw_fields())
    }

    pub fn raw_fields(&self) -> &str {
        self.fields.as_deref().map_or("null", RawValue::get)
    }
}
