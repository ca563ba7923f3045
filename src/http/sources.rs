//! HTTP-backed page sources
//!
//! Bridge between the sequencers and `VendorClient`: a fetch plan becomes a
//! `PageQuery`, a `VendorResponse` becomes a `RawPage`.

use super::client::{Endpoint, PageQuery, VendorClient, VendorResponse};
use crate::cursor::CursorToken;
use crate::error::Result;
use crate::pagination::{FetchPlan, FlatSource, NestedSource, RawPage};
use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;

fn query_for<T: CursorToken>(plan: &FetchPlan<T>) -> PageQuery {
    PageQuery {
        position: T::query_value(plan.position.as_ref()),
        token_type: T::TOKEN_TYPE,
        limit: plan.limit,
    }
}

fn into_raw_page<T: CursorToken>(endpoint: &Endpoint, response: VendorResponse) -> Result<RawPage<T>> {
    // Offsets advance by the record count; a vendor token is ignored
    let next_token = if T::VENDOR_DRIVEN {
        let field = endpoint.next_token_path.as_deref().unwrap_or("next_token");
        response
            .next_token
            .map(|raw| T::from_vendor_token(field, &raw))
            .transpose()?
    } else {
        None
    };
    Ok(RawPage {
        objects: response.objects,
        next_token,
        has_more: response.has_more,
    })
}

/// One vendor collection served over HTTP
pub struct HttpFlatSource<T> {
    client: Arc<VendorClient>,
    endpoint: Endpoint,
    _token: PhantomData<fn() -> T>,
}

impl<T> HttpFlatSource<T> {
    /// Create a source reading `endpoint` through `client`
    pub fn new(client: Arc<VendorClient>, endpoint: Endpoint) -> Self {
        Self {
            client,
            endpoint,
            _token: PhantomData,
        }
    }

    /// Endpoint read by this source
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

#[async_trait]
impl<T: CursorToken> FlatSource for HttpFlatSource<T> {
    type Token = T;

    async fn fetch_page(&self, plan: &FetchPlan<T>) -> Result<RawPage<T>> {
        let response = self.client.fetch(&self.endpoint, &query_for(plan)).await?;
        into_raw_page(&self.endpoint, response)
    }
}

/// Outer collection plus a per-item inner collection served over HTTP
///
/// The inner endpoint path carries a `{collection_id}` placeholder.
pub struct HttpNestedSource<T> {
    client: Arc<VendorClient>,
    outer: Endpoint,
    inner: Endpoint,
    _token: PhantomData<fn() -> T>,
}

impl<T> HttpNestedSource<T> {
    /// Create a nested source
    pub fn new(client: Arc<VendorClient>, outer: Endpoint, inner: Endpoint) -> Self {
        Self {
            client,
            outer,
            inner,
            _token: PhantomData,
        }
    }
}

#[async_trait]
impl<T: CursorToken> NestedSource for HttpNestedSource<T> {
    type Token = T;

    async fn fetch_outer(&self, plan: &FetchPlan<T>) -> Result<RawPage<T>> {
        let response = self.client.fetch(&self.outer, &query_for(plan)).await?;
        into_raw_page(&self.outer, response)
    }

    async fn fetch_inner(&self, collection_id: &str, plan: &FetchPlan<T>) -> Result<RawPage<T>> {
        let endpoint = self.inner.for_collection(collection_id)?;
        let response = self.client.fetch(&endpoint, &query_for(plan)).await?;
        into_raw_page(&endpoint, response)
    }
}
