//! YAML parser for adapter definitions
//!
//! Parses and validates adapter YAML files.

use crate::error::{Error, Result};
use crate::identity::IdentityDeriver;
use crate::loader::types::{AdapterDefinition, EndpointDefinition, EntityDefinition};
use crate::types::PaginationMode;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Placeholder for the outer item id in a nested entity's path
pub const COLLECTION_ID_PLACEHOLDER: &str = "{collection_id}";

/// Load an adapter definition from a YAML file
pub fn load_adapter(path: impl AsRef<Path>) -> Result<AdapterDefinition> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_adapter_from_str(&content)
}

/// Load an adapter definition from a YAML string
pub fn load_adapter_from_str(yaml: &str) -> Result<AdapterDefinition> {
    let def: AdapterDefinition = serde_yaml::from_str(yaml)?;
    validate_adapter(&def)?;
    Ok(def)
}

/// Validate an adapter definition
fn validate_adapter(def: &AdapterDefinition) -> Result<()> {
    if def.name.is_empty() {
        return Err(Error::config("Adapter name cannot be empty"));
    }

    if def.base_url.is_empty() {
        return Err(Error::config("Adapter base_url cannot be empty"));
    }
    url::Url::parse(&def.base_url)
        .map_err(|e| Error::config(format!("Adapter base_url '{}' is invalid: {e}", def.base_url)))?;

    if def.timeout_secs == 0 {
        return Err(Error::config("Adapter timeout_secs must be at least 1"));
    }

    if def.max_page_size == 0 {
        return Err(Error::config("Adapter max_page_size must be at least 1"));
    }

    if def.entities.is_empty() {
        return Err(Error::config("Adapter must have at least one entity"));
    }

    let ids: HashSet<_> = def.entities.iter().map(|e| &e.id).collect();
    if ids.len() != def.entities.len() {
        return Err(Error::config("Duplicate entity ids found"));
    }

    for entity in &def.entities {
        validate_entity(entity)?;
    }

    Ok(())
}

/// Validate an entity definition
fn validate_entity(entity: &EntityDefinition) -> Result<()> {
    if entity.id.is_empty() {
        return Err(Error::config("Entity id cannot be empty"));
    }

    validate_endpoint(&entity.id, "request", &entity.request, entity.pagination)?;

    let has_placeholder = entity.request.path.contains(COLLECTION_ID_PLACEHOLDER);
    match &entity.nested {
        Some(nested) => {
            validate_endpoint(&entity.id, "nested.outer", &nested.outer, entity.pagination)?;
            if nested.id_field.is_empty() {
                return Err(Error::config(format!(
                    "Entity '{}' nested.id_field cannot be empty",
                    entity.id
                )));
            }
            if !has_placeholder {
                return Err(Error::config(format!(
                    "Entity '{}' request path must contain {COLLECTION_ID_PLACEHOLDER}",
                    entity.id
                )));
            }
        }
        None if has_placeholder => {
            return Err(Error::config(format!(
                "Entity '{}' uses {COLLECTION_ID_PLACEHOLDER} but has no nested section",
                entity.id
            )));
        }
        None => {}
    }

    if let Some(identity) = &entity.identity {
        IdentityDeriver::new(&entity.id, identity.fields.iter(), identity.delimiter.as_str())?;
        if identity.target.is_empty() {
            return Err(Error::config(format!(
                "Entity '{}' identity target cannot be empty",
                entity.id
            )));
        }
    }

    Ok(())
}

/// Validate one endpoint of an entity
fn validate_endpoint(
    entity_id: &str,
    section: &str,
    endpoint: &EndpointDefinition,
    mode: PaginationMode,
) -> Result<()> {
    if endpoint.path.is_empty() {
        return Err(Error::config(format!(
            "Entity '{entity_id}' {section} path cannot be empty"
        )));
    }

    if mode == PaginationMode::Token && endpoint.next_token_path.is_none() {
        return Err(Error::config(format!(
            "Entity '{entity_id}' {section} uses token pagination but has no next_token_path"
        )));
    }

    Ok(())
}
