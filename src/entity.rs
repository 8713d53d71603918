//! Entities and identity management.
//!
//! An [`Entity`] is the record being reconciled: a stable ID plus an ordered
//! mapping from property ID to the statements recorded under it. The engine
//! borrows one entity exclusively for the duration of a reconciliation pass;
//! fetching and persisting entities is the job of the
//! [`EntityStore`](crate::store::EntityStore) collaborator.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::statement::Statement;

static ENTITY_URL_RE: OnceLock<Regex> = OnceLock::new();

fn entity_url_re() -> &'static Regex {
    ENTITY_URL_RE.get_or_init(|| {
        // Concept URI form: http(s)://[www.]<host>/entity/<letter><digits>
        Regex::new(r"^https?://(?:www\.)?[^/]+/entity/([A-Za-z]\d+)$")
            .unwrap_or_else(|e| unreachable!("static regex must compile: {e}"))
    })
}

/// A property identifier (e.g. `P31`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(String);

impl PropertyId {
    /// Creates a property ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PropertyId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PropertyId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A stable entity identifier (item `Q...`, property `P...`, or lexeme `L...`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Creates an entity ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Extracts an entity ID from a concept URI.
    ///
    /// Accepts `http` or `https`, with or without a `www.` prefix, and
    /// requires the trailing path segment to be a letter followed by at
    /// least one digit. A trailing slash or a bare letter is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use claimsync::EntityId;
    ///
    /// let id = EntityId::from_entity_url("http://www.wikidata.org/entity/Q1").unwrap();
    /// assert_eq!(id.as_str(), "Q1");
    /// assert!(EntityId::from_entity_url("http://www.wikidata.org/entity/Q1/").is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidEntityUrl`] when the URL does not match
    /// the concept URI form.
    pub fn from_entity_url(url: &str) -> Result<Self, ParseError> {
        entity_url_re()
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| Self(m.as_str().to_string()))
            .ok_or_else(|| ParseError::InvalidEntityUrl {
                url: url.to_string(),
            })
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A cheap, stable handle to one statement inside an entity.
///
/// The engine threads the current working statement through each
/// reconciliation tier as a handle instead of a mutable reference, so a
/// split mid-pass simply yields a new handle rather than an aliased pointer.
/// Handles are invalidated by any mutation that reorders or removes
/// statements for the property; the engine re-derives them after such
/// mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementHandle {
    /// The property the statement lives under.
    pub property: PropertyId,
    /// Position within the property's statement list.
    pub index: usize,
}

impl StatementHandle {
    /// Creates a handle.
    pub fn new(property: impl Into<PropertyId>, index: usize) -> Self {
        Self {
            property: property.into(),
            index,
        }
    }
}

/// The record being reconciled.
///
/// # Examples
///
/// ```
/// use claimsync::{Entity, Statement, Value};
///
/// let mut entity = Entity::new("Q42");
/// entity.push_statement(Statement::new("P31", Value::item("Q5")));
/// assert_eq!(entity.statements(&"P31".into()).len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// The stable identifier of this entity.
    pub id: EntityId,
    /// Statements keyed by property, in stored order within each property.
    #[serde(default)]
    pub claims: BTreeMap<PropertyId, Vec<Statement>>,
}

impl Entity {
    /// Creates an entity with no statements.
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            claims: BTreeMap::new(),
        }
    }

    /// Returns the statements recorded under `property`.
    #[must_use]
    pub fn statements(&self, property: &PropertyId) -> &[Statement] {
        self.claims.get(property).map_or(&[], Vec::as_slice)
    }

    /// Returns true if any statement exists for `property`.
    #[must_use]
    pub fn has_property(&self, property: &PropertyId) -> bool {
        !self.statements(property).is_empty()
    }

    /// Appends a statement under its own property, returning its handle.
    pub fn push_statement(&mut self, statement: Statement) -> StatementHandle {
        let property = statement.property.clone();
        let list = self.claims.entry(property.clone()).or_default();
        list.push(statement);
        StatementHandle::new(property, list.len() - 1)
    }

    /// Resolves a handle to the statement it points at.
    #[must_use]
    pub fn statement(&self, handle: &StatementHandle) -> Option<&Statement> {
        self.claims.get(&handle.property)?.get(handle.index)
    }

    /// Resolves a handle to a mutable statement.
    pub fn statement_mut(&mut self, handle: &StatementHandle) -> Option<&mut Statement> {
        self.claims.get_mut(&handle.property)?.get_mut(handle.index)
    }

    /// Computes a stable content hash over the entity's statements.
    ///
    /// The reconciliation loop compares hashes between passes to tell a
    /// productive re-cycle request from a spinning one. The hash covers the
    /// full statement set (values, ranks, qualifiers, references) via its
    /// canonical JSON serialization.
    ///
    /// # Errors
    ///
    /// Returns the underlying serialization error if the statement set
    /// cannot be serialized.
    pub fn content_hash(&self) -> Result<blake3::Hash, serde_json::Error> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.id.as_str().as_bytes());
        hasher.update(&serde_json::to_vec(&self.claims)?);
        Ok(hasher.finalize())
    }
}
