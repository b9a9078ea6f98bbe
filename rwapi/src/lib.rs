//! Client for a ReliefWeb style search API.
//!
//! Build a [`Query`] from [`Filter`]s and [`Facet`]s, send it with a
//! [`Client`] and decode the item fields of the returned [`ResultEnvelope`]
//! into your own types with [`ResultEnvelope::materialize`].
//!
//! Builders are plain owned values. Mutate each one from a single place at a
//! time and treat it as read-only once it has been sent.

pub mod client;
pub mod config;
pub mod errors;
pub mod facet;
pub mod filter;
pub mod query;
pub mod result;
pub mod transport;

pub use client::Client;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use errors::RwApiError;
pub use facet::{DateInterval, Facet, FacetScope, SortDirection};
pub use filter::{Filter, FilterValue, Operator, RangeValue, Scalar};
pub use query::{Query, QueryFields, SearchQuery};
pub use result::{
    FacetBucket, FacetKind, ResultEmbedded, ResultEnvelope, ResultFacet, ResultItem,
};
pub use transport::{HttpTransport, Transport, TransportResponse};
