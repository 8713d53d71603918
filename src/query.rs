//! Bulk claim resolution.
//!
//! Before a large run it is often cheaper to ask one bulk question — "which
//! entities already hold any of these property/value claims?" — than to
//! fetch every entity. [`QueryService`] is the seam to whatever answers
//! that question (typically a SPARQL endpoint); the free functions here
//! shape its raw matches into the lookup tables bots actually want.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::entity::{EntityId, PropertyId};
use crate::error::EngineError;
use crate::store::StoreError;

/// One raw match from a claim-holder query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimMatch {
    /// Concept URI of the entity holding the claim.
    pub entity_url: String,
    /// The property the claim is recorded under.
    pub property: PropertyId,
    /// The claim's value as a plain string, or `None` for the
    /// unknown-value sentinel.
    pub value: Option<String>,
}

/// Answers bulk claim-holder queries.
pub trait QueryService {
    /// Returns every entity holding any of the given claims.
    ///
    /// The request maps each property to the set of values of interest;
    /// the result is one [`ClaimMatch`] per (entity, property, value) hit.
    /// Backends may also return unknown-value hits (`value: None`); the
    /// shaping helpers drop those.
    ///
    /// # Errors
    ///
    /// Backend failures (network, malformed response) surface as
    /// [`StoreError`].
    fn find_claim_holders(
        &self,
        request: &BTreeMap<PropertyId, BTreeSet<String>>,
    ) -> Result<Vec<ClaimMatch>, StoreError>;
}

/// Resolves which entities hold each requested claim.
///
/// Returns a map from `(property, value)` to the concept URIs of the
/// entities holding that exact claim. Requested claims held by no entity
/// are absent from the map; unknown-value hits are dropped.
///
/// # Errors
///
/// Propagates query-backend failures.
pub fn resolve_multiple_property_claims<Q: QueryService>(
    service: &Q,
    request: &BTreeMap<PropertyId, BTreeSet<String>>,
) -> Result<HashMap<(PropertyId, String), BTreeSet<String>>, EngineError> {
    let matches = service.find_claim_holders(request)?;
    let mut resolved: HashMap<(PropertyId, String), BTreeSet<String>> = HashMap::new();
    for m in matches {
        let Some(value) = m.value else {
            continue;
        };
        resolved
            .entry((m.property, value))
            .or_default()
            .insert(m.entity_url);
    }
    Ok(resolved)
}

/// Resolves which of the given entities hold any of the requested claims.
///
/// A membership variant of [`resolve_multiple_property_claims`]: the
/// result is the subset of `entity_ids` that hold at least one requested
/// claim.
///
/// # Errors
///
/// Propagates query-backend failures and concept-URI parse failures.
pub fn resolve_entities_holding_claims<Q: QueryService>(
    service: &Q,
    request: &BTreeMap<PropertyId, BTreeSet<String>>,
    entity_ids: &BTreeSet<EntityId>,
) -> Result<BTreeSet<EntityId>, EngineError> {
    let matches = service.find_claim_holders(request)?;
    let mut holders = BTreeSet::new();
    for m in matches {
        if m.value.is_none() {
            continue;
        }
        let id = EntityId::from_entity_url(&m.entity_url)?;
        if entity_ids.contains(&id) {
            holders.insert(id);
        }
    }
    Ok(holders)
}

/// Resolves, per entity, the requested claim values it already holds.
///
/// Returns a map from entity ID to `(property, value)` pairs. Entities
/// holding none of the requested claims are absent.
///
/// # Errors
///
/// Propagates query-backend failures and concept-URI parse failures.
pub fn resolve_claims_per_entity<Q: QueryService>(
    service: &Q,
    request: &BTreeMap<PropertyId, BTreeSet<String>>,
) -> Result<HashMap<EntityId, BTreeSet<(PropertyId, String)>>, EngineError> {
    let matches = service.find_claim_holders(request)?;
    let mut per_entity: HashMap<EntityId, BTreeSet<(PropertyId, String)>> = HashMap::new();
    for m in matches {
        let Some(value) = m.value else {
            continue;
        };
        let id = EntityId::from_entity_url(&m.entity_url)?;
        per_entity.entry(id).or_default().insert((m.property, value));
    }
    Ok(per_entity)
}

/// An in-memory query service backed by a fixed claim table.
///
/// Intended for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryQueryService {
    // (property, value or unknown sentinel) -> holder concept URIs
    claims: Vec<(PropertyId, Option<String>, String)>,
}

impl MemoryQueryService {
    /// Creates an empty service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that the entity at `entity_url` holds the claim.
    pub fn record(
        &mut self,
        property: impl Into<PropertyId>,
        value: impl Into<String>,
        entity_url: impl Into<String>,
    ) {
        self.claims
            .push((property.into(), Some(value.into()), entity_url.into()));
    }

    /// Records an unknown-value claim for the entity at `entity_url`.
    pub fn record_unknown(
        &mut self,
        property: impl Into<PropertyId>,
        entity_url: impl Into<String>,
    ) {
        self.claims.push((property.into(), None, entity_url.into()));
    }
}

impl QueryService for MemoryQueryService {
    fn find_claim_holders(
        &self,
        request: &BTreeMap<PropertyId, BTreeSet<String>>,
    ) -> Result<Vec<ClaimMatch>, StoreError> {
        let mut matches = Vec::new();
        for (property, value, entity_url) in &self.claims {
            let Some(wanted) = request.get(property) else {
                continue;
            };
            // Unknown-value claims surface for any query on the property.
            let hit = value.as_ref().is_none_or(|v| wanted.contains(v));
            if hit {
                matches.push(ClaimMatch {
                    entity_url: entity_url.clone(),
                    property: property.clone(),
                    value: value.clone(),
                });
            }
        }
        Ok(matches)
    }
}
