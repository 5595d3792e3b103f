//! Relation completion and title resolution
//!
//! Relations come back from a database query as bare page ids, and a query
//! inlines at most 25 of them per property. Truncated relations are completed
//! from the page property endpoint before conversion. When enabled, each
//! referenced page is then fetched once and the id is replaced by its title.

use crate::adapters::notion::models::RelationRef;
use crate::adapters::notion::{NotionSource, Page, PropertyValue};
use crate::config::DailyLogSchema;
use crate::domain::{CollectorError, DailyLogRecord, NotionError, PageId, RelationField, Result};
use std::collections::HashMap;

/// Fetches the full reference list of every truncated relation
///
/// Only the relation properties named by `schema` are completed. A page that
/// has been removed or cannot be read keeps its inline references and stays
/// marked as truncated. Authentication and network failures abort.
///
/// Returns the number of relation properties that were completed.
pub async fn complete_truncated_relations(
    pages: &mut [Page],
    schema: &DailyLogSchema,
    source: &dyn NotionSource,
) -> Result<usize> {
    let mut completed = 0;

    for page in pages.iter_mut() {
        for field in RelationField::ALL {
            let property = schema.relation_property(field);
            let Some(PropertyValue::Relation {
                id: Some(property_id),
                relation,
                has_more,
            }) = page.properties.get_mut(property)
            else {
                continue;
            };
            if !*has_more {
                continue;
            }

            let page_id = match PageId::new(&page.id) {
                Ok(page_id) => page_id,
                Err(e) => {
                    tracing::warn!(page_id = %page.id, error = %e, "Cannot complete relation of unparseable page id");
                    continue;
                }
            };

            match source.relation_ids(&page_id, property_id).await {
                Ok(ids) => {
                    tracing::debug!(
                        page_id = %page_id,
                        property = %property,
                        inline = relation.len(),
                        total = ids.len(),
                        "Completed truncated relation"
                    );
                    *relation = ids.into_iter().map(|id| RelationRef { id }).collect();
                    *has_more = false;
                    completed += 1;
                }
                Err(CollectorError::Notion(
                    e @ (NotionError::NotFound(_) | NotionError::Client { .. }),
                )) => {
                    tracing::warn!(page_id = %page_id, property = %property, error = %e, "Keeping inline relation references");
                }
                Err(e) => return Err(e),
            }
        }
    }

    Ok(completed)
}

/// Replaces relation page ids with the linked pages' titles
///
/// Every distinct id is looked up once. Ids that cannot be resolved (the page
/// is gone, not shared with the integration, or untitled) are kept as they
/// are. Authentication and network failures abort the resolution.
///
/// Returns the number of distinct ids that were resolved to a title.
pub async fn resolve_relation_titles(
    records: &mut [DailyLogRecord],
    source: &dyn NotionSource,
) -> Result<usize> {
    let mut titles: HashMap<String, Option<String>> = HashMap::new();

    for record in records.iter() {
        for field in RelationField::ALL {
            for id in record.relation(field) {
                if titles.contains_key(id) {
                    continue;
                }
                let title = lookup_title(source, id).await?;
                titles.insert(id.clone(), title);
            }
        }
    }

    for record in records.iter_mut() {
        for field in RelationField::ALL {
            for entry in record.relation_mut(field).iter_mut() {
                if let Some(Some(title)) = titles.get(entry.as_str()) {
                    *entry = title.clone();
                }
            }
        }
    }

    let resolved = titles.values().filter(|t| t.is_some()).count();
    tracing::debug!(
        references = titles.len(),
        resolved = resolved,
        "Resolved relation titles"
    );
    Ok(resolved)
}

async fn lookup_title(source: &dyn NotionSource, id: &str) -> Result<Option<String>> {
    let page_id = match PageId::new(id) {
        Ok(page_id) => page_id,
        Err(e) => {
            tracing::warn!(reference = %id, error = %e, "Keeping unparseable relation id");
            return Ok(None);
        }
    };

    match source.page_title(&page_id).await {
        Ok(title) => Ok(title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())),
        Err(CollectorError::Notion(e @ (NotionError::NotFound(_) | NotionError::Client { .. }))) => {
            tracing::warn!(page_id = %page_id, error = %e, "Keeping relation id, page title unavailable");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
