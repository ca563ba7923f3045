//! Page request handler
//!
//! Stateless dispatcher from a `PageRequest` to the registered entity. All
//! traversal state travels in the cursor, so one handler serves any number
//! of concurrent requests without locking.

use super::pager::EntityPager;
use super::types::{HandlerConfig, Page, PageRequest};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Dispatches page requests to entity pagers
#[derive(Clone, Default)]
pub struct PageHandler {
    entities: HashMap<String, Arc<dyn EntityPager>>,
    config: HandlerConfig,
}

impl PageHandler {
    /// Create an empty handler
    pub fn new(config: HandlerConfig) -> Self {
        Self {
            entities: HashMap::new(),
            config,
        }
    }

    /// Register an entity; names must be unique
    pub fn register(&mut self, pager: impl EntityPager + 'static) -> Result<()> {
        let name = pager.entity_id().to_string();
        if self.entities.contains_key(&name) {
            return Err(Error::config(format!("Entity '{name}' is registered twice")));
        }
        debug!(entity = %name, nested = pager.allows_nesting(), "Registered entity");
        self.entities.insert(name, Arc::new(pager));
        Ok(())
    }

    /// Register an entity, builder style
    pub fn with_entity(mut self, pager: impl EntityPager + 'static) -> Result<Self> {
        self.register(pager)?;
        Ok(self)
    }

    /// Handler configuration
    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Registered entity names, sorted
    pub fn entity_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entities.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Whether cursors of `entity` may carry collection fields
    pub fn allows_nesting(&self, entity: &str) -> Option<bool> {
        self.entities.get(entity).map(|pager| pager.allows_nesting())
    }

    /// Handle a request under the configured timeout
    pub async fn handle(&self, request: &PageRequest) -> Result<Page> {
        self.handle_with_timeout(request, self.config.timeout).await
    }

    /// Handle a request under a caller-supplied timeout
    ///
    /// On timeout the in-flight vendor call is dropped and no cursor is
    /// produced; resubmitting the same request is always safe.
    pub async fn handle_with_timeout(&self, request: &PageRequest, timeout: Duration) -> Result<Page> {
        let pager = self.resolve(request)?;
        let started = Instant::now();

        let result = tokio::time::timeout(timeout, pager.page(&request.cursor, request.page_size))
            .await
            .unwrap_or_else(|_| Err(Error::timeout(timeout)));

        log_outcome(request, &result, started);
        result
    }

    /// Handle a request that is abandoned as soon as `cancel` resolves
    pub async fn handle_with_cancel<F>(&self, request: &PageRequest, cancel: F) -> Result<Page>
    where
        F: Future<Output = ()> + Send,
    {
        tokio::select! {
            result = self.handle(request) => result,
            () = cancel => {
                warn!(entity = %request.entity, "Page request cancelled");
                Err(Error::Cancelled)
            }
        }
    }

    fn resolve(&self, request: &PageRequest) -> Result<&Arc<dyn EntityPager>> {
        if request.page_size == 0 {
            return Err(Error::InvalidPageSize {
                page_size: 0,
                message: "page size must be at least 1".to_string(),
            });
        }
        if request.page_size > self.config.max_page_size {
            return Err(Error::InvalidPageSize {
                page_size: request.page_size,
                message: format!("page size must not exceed {}", self.config.max_page_size),
            });
        }
        self.entities
            .get(&request.entity)
            .ok_or_else(|| Error::EntityNotFound {
                entity: request.entity.clone(),
            })
    }
}

impl std::fmt::Debug for PageHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageHandler")
            .field("entities", &self.entity_names())
            .field("config", &self.config)
            .finish()
    }
}

fn log_outcome(request: &PageRequest, result: &Result<Page>, started: Instant) {
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    match result {
        Ok(page) => info!(
            entity = %request.entity,
            records = page.objects.len(),
            done = page.is_last(),
            elapsed_ms,
            "Page served"
        ),
        Err(e) => warn!(
            entity = %request.entity,
            category = ?e.category(),
            retryable = e.is_retryable(),
            elapsed_ms,
            error = %e,
            "Page request failed"
        ),
    }
}
