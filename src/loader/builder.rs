//! Turns an adapter definition into a ready page handler

use crate::cursor::CursorToken;
use crate::engine::{FlatEntity, HandlerConfig, NestedEntity, PageHandler};
use crate::error::Result;
use crate::http::{HttpFlatSource, HttpNestedSource, VendorClient, VendorClientConfig};
use crate::identity::IdentityDeriver;
use crate::loader::types::{AdapterDefinition, EntityDefinition};
use crate::types::PaginationMode;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Build a page handler serving every entity of `def`
pub fn build_handler(def: &AdapterDefinition) -> Result<PageHandler> {
    let timeout = Duration::from_secs(def.timeout_secs);

    let mut client_config = VendorClientConfig::builder()
        .base_url(&def.base_url)
        .timeout(timeout);
    for (key, value) in &def.headers {
        client_config = client_config.header(key, value);
    }
    let client = Arc::new(VendorClient::new(client_config.build())?);

    let config = HandlerConfig::default()
        .with_timeout(timeout)
        .with_max_page_size(def.max_page_size);
    let mut handler = PageHandler::new(config);

    for entity in &def.entities {
        match entity.pagination {
            PaginationMode::Offset => register::<i64>(&mut handler, &client, entity)?,
            PaginationMode::Token => register::<String>(&mut handler, &client, entity)?,
        }
    }

    info!(
        adapter = %def.name,
        entities = def.entities.len(),
        "Adapter handler built"
    );
    Ok(handler)
}

fn register<T: CursorToken>(
    handler: &mut PageHandler,
    client: &Arc<VendorClient>,
    entity: &EntityDefinition,
) -> Result<()> {
    let identity = entity
        .identity
        .as_ref()
        .map(|def| {
            IdentityDeriver::new(&entity.id, def.fields.iter(), def.delimiter.as_str())
                .map(|deriver| deriver.with_target(&def.target))
        })
        .transpose()?;

    match &entity.nested {
        Some(nested) => {
            let source = HttpNestedSource::<T>::new(
                Arc::clone(client),
                nested.outer.to_endpoint(),
                entity.request.to_endpoint(),
            );
            let mut pager = NestedEntity::new(&entity.id, source, &nested.id_field);
            if let Some(deriver) = identity {
                pager = pager.with_identity(deriver);
            }
            handler.register(pager)
        }
        None => {
            let source = HttpFlatSource::<T>::new(Arc::clone(client), entity.request.to_endpoint());
            let mut pager = FlatEntity::new(&entity.id, source);
            if let Some(deriver) = identity {
                pager = pager.with_identity(deriver);
            }
            handler.register(pager)
        }
    }
}
