//! Statements, qualifiers, and reference groups.
//!
//! A [`Statement`] is a main fact on an entity: a property, a value, a rank,
//! plus contextual qualifiers and provenance reference groups. Identity for
//! reconciliation purposes is (property, value) only; rank, qualifiers, and
//! references never participate in statement equality.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::PropertyId;
use crate::value::Value;

/// Relative validity of parallel statements for the same property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    /// The default rank.
    Normal,
    /// The statement supersedes its normal-ranked siblings.
    Preferred,
    /// The statement is known to be outdated or wrong.
    Deprecated,
}

impl Default for Rank {
    fn default() -> Self {
        Self::Normal
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Preferred => write!(f, "preferred"),
            Self::Deprecated => write!(f, "deprecated"),
        }
    }
}

/// A bare property-value pair.
///
/// Claims appear as qualifiers on statements and as source claims inside
/// reference groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// The property this claim is about.
    pub property: PropertyId,
    /// The claimed value.
    pub value: Value,
}

impl Claim {
    /// Creates a claim from a property ID and a value.
    pub fn new(property: impl Into<PropertyId>, value: impl Into<Value>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

/// A bundle of provenance claims supporting a statement's truth.
///
/// Reference groups map a property ID to the source claims recorded under it;
/// claim order within a property is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceGroup {
    /// Source claims keyed by property.
    pub claims: BTreeMap<PropertyId, Vec<Claim>>,
}

impl ReferenceGroup {
    /// Creates an empty reference group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a reference group from a list of source claims.
    #[must_use]
    pub fn from_claims(claims: impl IntoIterator<Item = Claim>) -> Self {
        let mut group = Self::new();
        for claim in claims {
            group.push(claim);
        }
        group
    }

    /// Appends a source claim under its property.
    pub fn push(&mut self, claim: Claim) {
        self.claims.entry(claim.property.clone()).or_default().push(claim);
    }

    /// Returns true if the group records any claim for `property`.
    #[must_use]
    pub fn has_property(&self, property: &PropertyId) -> bool {
        self.claims.get(property).is_some_and(|v| !v.is_empty())
    }

    /// Returns true if the group holds no claims at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claims.values().all(Vec::is_empty)
    }
}

/// A main fact attached to an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// The property this statement is about.
    pub property: PropertyId,
    /// The stated value.
    pub value: Value,
    /// Relative validity among sibling statements.
    #[serde(default)]
    pub rank: Rank,
    /// Contextual qualifiers, keyed by property, in attachment order.
    #[serde(default)]
    pub qualifiers: BTreeMap<PropertyId, Vec<Claim>>,
    /// Provenance reference groups, in attachment order.
    #[serde(default)]
    pub references: Vec<ReferenceGroup>,
}

impl Statement {
    /// Creates a normal-ranked statement with no qualifiers or references.
    pub fn new(property: impl Into<PropertyId>, value: impl Into<Value>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            rank: Rank::Normal,
            qualifiers: BTreeMap::new(),
            references: Vec::new(),
        }
    }

    /// Sets the rank, consuming and returning the statement.
    #[must_use]
    pub fn with_rank(mut self, rank: Rank) -> Self {
        self.rank = rank;
        self
    }

    /// Returns the qualifiers recorded under `property`, if any.
    #[must_use]
    pub fn qualifiers_for(&self, property: &PropertyId) -> &[Claim] {
        self.qualifiers.get(property).map_or(&[], Vec::as_slice)
    }

    /// Returns true if the statement carries at least one qualifier for
    /// `property`.
    #[must_use]
    pub fn has_qualifier_property(&self, property: &PropertyId) -> bool {
        !self.qualifiers_for(property).is_empty()
    }

    /// Returns true if this statement states the same (property, value) fact.
    ///
    /// Rank, qualifiers, and references are ignored.
    #[must_use]
    pub fn same_fact(&self, other: &Self) -> bool {
        self.property == other.property && self.value == other.value
    }
}
