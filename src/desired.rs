//! The desired-state model fed into the reconciliation engine.
//!
//! Callers describe what an entity *should* say as a set of
//! [`DesiredStatement`]s, each carrying per-statement policy flags plus the
//! qualifiers and references that should accompany it. These objects are
//! built fresh for every reconciliation pass; after processing, a desired
//! statement records the handle of the statement it ended up merged into.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use regex::Regex;

use crate::entity::{PropertyId, StatementHandle};
use crate::statement::{Claim, ReferenceGroup, Statement};
use crate::value::Value;
use crate::vocab;

/// A qualifier the caller wants on a statement, plus merge policy flags.
#[derive(Debug, Clone)]
pub struct DesiredQualifier {
    /// The qualifier to attach.
    pub claim: Claim,
    /// If a qualifier with a conflicting value exists, don't add this one.
    pub skip_if_conflicting_exists: bool,
    /// If a qualifier with a conflicting value exists, overwrite it.
    pub replace_if_conflicting_exists: bool,
    /// When replacing and multiple values exist for the property, delete
    /// all but the replaced one.
    pub delete_other_if_replacing: bool,
    /// If a qualifier with the same language already exists, don't add it.
    pub skip_if_conflicting_language_exists: bool,
    /// If a qualifier with a conflicting value exists, split the working
    /// statement into a new parallel statement instead.
    pub make_new_if_conflicting: bool,
    /// Never attach this qualifier; it exists only to inform references.
    pub reference_only: bool,
}

impl DesiredQualifier {
    /// Creates a qualifier with all policy flags off.
    pub fn new(property: impl Into<PropertyId>, value: impl Into<Value>) -> Self {
        Self::from_claim(Claim::new(property, value))
    }

    /// Wraps an existing claim with all policy flags off.
    #[must_use]
    pub const fn from_claim(claim: Claim) -> Self {
        Self {
            claim,
            skip_if_conflicting_exists: false,
            replace_if_conflicting_exists: false,
            delete_other_if_replacing: false,
            skip_if_conflicting_language_exists: false,
            make_new_if_conflicting: false,
            reference_only: false,
        }
    }

    /// Creates one qualifier per value, all for the same property.
    pub fn many(
        property: impl Into<PropertyId>,
        values: impl IntoIterator<Item = Value>,
    ) -> Vec<Self> {
        let property = property.into();
        values
            .into_iter()
            .map(|value| Self::new(property.clone(), value))
            .collect()
    }

    /// Creates one qualifier per value from a property-to-values mapping.
    pub fn from_map<P, V>(entries: impl IntoIterator<Item = (P, V)>) -> Vec<Self>
    where
        P: Into<PropertyId>,
        V: IntoIterator<Item = Value>,
    {
        entries
            .into_iter()
            .flat_map(|(property, values)| {
                let property = property.into();
                values
                    .into_iter()
                    .map(move |value| Self::new(property.clone(), value))
            })
            .collect()
    }

    /// Like [`Self::from_map`], but the values are item IDs.
    pub fn from_item_map<P, V, I>(entries: impl IntoIterator<Item = (P, V)>) -> Vec<Self>
    where
        P: Into<PropertyId>,
        V: IntoIterator<Item = I>,
        I: Into<String>,
    {
        Self::from_map(
            entries
                .into_iter()
                .map(|(property, ids)| (property, ids.into_iter().map(Value::item))),
        )
    }

    /// Sets `skip_if_conflicting_exists`, consuming and returning self.
    #[must_use]
    pub fn skip_if_conflicting(mut self) -> Self {
        self.skip_if_conflicting_exists = true;
        self
    }

    /// Sets `replace_if_conflicting_exists`, consuming and returning self.
    #[must_use]
    pub fn replace_if_conflicting(mut self) -> Self {
        self.replace_if_conflicting_exists = true;
        self
    }

    /// Sets `make_new_if_conflicting`, consuming and returning self.
    #[must_use]
    pub fn make_new_if_conflicting(mut self) -> Self {
        self.make_new_if_conflicting = true;
        self
    }
}

/// Desired qualifiers for one qualifier property, in insertion order.
#[derive(Debug, Clone)]
pub struct QualifierGroup {
    /// The qualifier property shared by every entry.
    pub property: PropertyId,
    /// The desired qualifiers, in the order they were added.
    pub entries: Vec<DesiredQualifier>,
}

impl QualifierGroup {
    /// Returns true if any entry wants a statement split on conflict.
    #[must_use]
    pub fn makes_new(&self) -> bool {
        self.entries.iter().any(|q| q.make_new_if_conflicting)
    }
}

/// When to stamp a retrieved-on claim into a reference payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retrieved {
    /// Use today's date (the default).
    Today,
    /// Use a specific date.
    On(NaiveDate),
    /// Do not add a retrieved-on claim.
    Suppress,
}

impl Default for Retrieved {
    fn default() -> Self {
        Self::Today
    }
}

/// A reference the caller wants on a statement: a matcher plus a payload.
///
/// The matcher decides whether an existing reference group is "the same
/// source" (compatibility is an OR across all matcher terms); the payload
/// is what gets merged into a compatible group or appended as a new group.
#[derive(Debug, Clone)]
pub struct DesiredReference {
    /// Exact values to match against existing groups, per property.
    pub match_values: BTreeMap<PropertyId, Value>,
    /// A pattern matched against reference URLs of existing groups.
    pub url_pattern: Option<Regex>,
    /// Claims to record, keyed by property.
    pub payload: BTreeMap<PropertyId, Claim>,
}

impl DesiredReference {
    /// Creates a reference with an empty matcher and, unless suppressed, a
    /// retrieved-on claim in the payload.
    #[must_use]
    pub fn new(retrieved: Retrieved) -> Self {
        let mut payload = BTreeMap::new();
        let date = match retrieved {
            Retrieved::Today => Some(Utc::now().date_naive()),
            Retrieved::On(date) => Some(date),
            Retrieved::Suppress => None,
        };
        if let Some(date) = date {
            payload.insert(
                PropertyId::from(vocab::RETRIEVED_PROP),
                Claim::new(vocab::RETRIEVED_PROP, Value::Date(date)),
            );
        }
        Self {
            match_values: BTreeMap::new(),
            url_pattern: None,
            payload,
        }
    }

    /// Creates a reference holding one payload claim.
    ///
    /// When `also_match` is set, the claim's value doubles as a matcher
    /// term for its property.
    #[must_use]
    pub fn from_claim(claim: Claim, also_match: bool) -> Self {
        let mut reference = Self::new(Retrieved::Today);
        reference.add_claim(claim, also_match);
        reference
    }

    /// Adds a payload claim, optionally using it as a matcher term too.
    pub fn add_claim(&mut self, claim: Claim, also_match: bool) {
        if also_match {
            self.match_values
                .insert(claim.property.clone(), claim.value.clone());
        }
        self.payload.insert(claim.property.clone(), claim);
    }

    /// Sets the URL matcher pattern, consuming and returning self.
    #[must_use]
    pub fn with_url_pattern(mut self, pattern: Regex) -> Self {
        self.url_pattern = Some(pattern);
        self
    }

    /// Tests whether an existing reference group is the same source.
    ///
    /// True when the group's reference URL matches [`Self::url_pattern`]
    /// at the start of the URL, or when any existing claim exactly equals
    /// one of [`Self::match_values`].
    #[must_use]
    pub fn is_compatible(&self, group: &ReferenceGroup) -> bool {
        if let Some(pattern) = &self.url_pattern {
            let url_prop = PropertyId::from(vocab::URL_PROP);
            for claim in group.claims.get(&url_prop).map_or(&[][..], Vec::as_slice) {
                if let Some(url) = claim.value.as_url() {
                    // Anchored: a hit anywhere later in the URL is not the
                    // same source.
                    if pattern.find(url).is_some_and(|m| m.start() == 0) {
                        return true;
                    }
                }
            }
        }
        for (property, value) in &self.match_values {
            for claim in group.claims.get(property).map_or(&[][..], Vec::as_slice) {
                if &claim.value == value {
                    return true;
                }
            }
        }
        false
    }
}

/// A statement the caller wants on the entity, plus merge policy flags.
#[derive(Debug, Clone)]
pub struct DesiredStatement {
    /// The statement to add. Qualifiers and references ride separately on
    /// this wrapper; the inner statement stays bare.
    pub statement: Statement,
    /// If a statement with a conflicting value exists, don't add this one.
    pub skip_if_conflicting_exists: bool,
    /// If a statement with a conflicting value exists, overwrite it.
    pub replace_if_conflicting_exists: bool,
    /// When replacing and multiple statements exist for the property,
    /// delete all but the replaced one.
    pub delete_other_if_replacing: bool,
    /// Skip entirely if a monolingual statement in the same language (but
    /// with different text) already exists.
    pub skip_if_conflicting_language_exists: bool,
    /// Never add the statement itself; only attach references to an
    /// existing match.
    pub reference_only: bool,
    /// Desired qualifiers, grouped by property.
    pub qualifiers: Vec<QualifierGroup>,
    /// Desired references.
    pub references: Vec<DesiredReference>,
    /// After processing: the statement this one resolved to (added,
    /// adopted, replaced, or split onto).
    pub resolved: Option<StatementHandle>,
}

impl DesiredStatement {
    /// Creates a desired statement with all policy flags off.
    pub fn new(property: impl Into<PropertyId>, value: impl Into<Value>) -> Self {
        Self::from_statement(Statement::new(property, value))
    }

    /// Wraps an existing statement with all policy flags off.
    #[must_use]
    pub fn from_statement(statement: Statement) -> Self {
        Self {
            statement,
            skip_if_conflicting_exists: false,
            replace_if_conflicting_exists: false,
            delete_other_if_replacing: false,
            skip_if_conflicting_language_exists: false,
            reference_only: false,
            qualifiers: Vec::new(),
            references: Vec::new(),
            resolved: None,
        }
    }

    /// Creates one desired statement per value, all for the same property.
    pub fn many(
        property: impl Into<PropertyId>,
        values: impl IntoIterator<Item = Value>,
    ) -> Vec<Self> {
        let property = property.into();
        values
            .into_iter()
            .map(|value| Self::new(property.clone(), value))
            .collect()
    }

    /// Creates one desired statement per value from a property-to-values
    /// mapping.
    pub fn from_map<P, V>(entries: impl IntoIterator<Item = (P, V)>) -> Vec<Self>
    where
        P: Into<PropertyId>,
        V: IntoIterator<Item = Value>,
    {
        entries
            .into_iter()
            .flat_map(|(property, values)| {
                let property = property.into();
                values
                    .into_iter()
                    .map(move |value| Self::new(property.clone(), value))
            })
            .collect()
    }

    /// Like [`Self::from_map`], but the values are item IDs.
    pub fn from_item_map<P, V, I>(entries: impl IntoIterator<Item = (P, V)>) -> Vec<Self>
    where
        P: Into<PropertyId>,
        V: IntoIterator<Item = I>,
        I: Into<String>,
    {
        Self::from_map(
            entries
                .into_iter()
                .map(|(property, ids)| (property, ids.into_iter().map(Value::item))),
        )
    }

    /// Sets `skip_if_conflicting_exists`, consuming and returning self.
    #[must_use]
    pub fn skip_if_conflicting(mut self) -> Self {
        self.skip_if_conflicting_exists = true;
        self
    }

    /// Sets `replace_if_conflicting_exists`, consuming and returning self.
    #[must_use]
    pub fn replace_if_conflicting(mut self) -> Self {
        self.replace_if_conflicting_exists = true;
        self
    }

    /// Sets `reference_only`, consuming and returning self.
    #[must_use]
    pub fn reference_only(mut self) -> Self {
        self.reference_only = true;
        self
    }

    /// Adds a desired qualifier to the group for its property.
    pub fn add_qualifier(&mut self, qualifier: DesiredQualifier) {
        let property = qualifier.claim.property.clone();
        match self.qualifiers.iter_mut().find(|g| g.property == property) {
            Some(group) => group.entries.push(qualifier),
            None => self.qualifiers.push(QualifierGroup {
                property,
                entries: vec![qualifier],
            }),
        }
    }

    /// Adds several desired qualifiers.
    pub fn add_qualifiers(&mut self, qualifiers: impl IntoIterator<Item = DesiredQualifier>) {
        for qualifier in qualifiers {
            self.add_qualifier(qualifier);
        }
    }

    /// Adds a qualifier from a bare property and value.
    pub fn add_qualifier_value(
        &mut self,
        property: impl Into<PropertyId>,
        value: impl Into<Value>,
    ) {
        self.add_qualifier(DesiredQualifier::new(property, value));
    }

    /// Adds a desired reference.
    pub fn add_reference(&mut self, reference: DesiredReference) {
        self.references.push(reference);
    }

    /// Sorts qualifier groups so the ones containing a
    /// `make_new_if_conflicting` entry run first.
    ///
    /// The sort is stable: groups that compare equal keep their insertion
    /// order. Ordering matters because a statement split resets which
    /// qualifiers have already been attached to the working statement.
    pub fn sort_qualifier_groups(&mut self) {
        self.qualifiers.sort_by_key(|group| !group.makes_new());
    }
}

/// The desired-output mapping produced by a bot's
/// [`run_item`](crate::Bot::run_item): property ID to desired statements,
/// in order.
#[derive(Debug, Clone, Default)]
pub struct DesiredOutput {
    groups: BTreeMap<PropertyId, Vec<DesiredStatement>>,
}

impl DesiredOutput {
    /// Creates an empty output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a desired statement under its own property.
    pub fn add(&mut self, statement: DesiredStatement) {
        self.groups
            .entry(statement.statement.property.clone())
            .or_default()
            .push(statement);
    }

    /// Adds several desired statements.
    pub fn extend(&mut self, statements: impl IntoIterator<Item = DesiredStatement>) {
        for statement in statements {
            self.add(statement);
        }
    }

    /// Returns true if no statements are desired.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }

    /// Number of desired statements across all properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Iterates property groups in property order.
    pub fn iter(&self) -> impl Iterator<Item = (&PropertyId, &Vec<DesiredStatement>)> {
        self.groups.iter()
    }

    /// Iterates property groups mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&PropertyId, &mut Vec<DesiredStatement>)> {
        self.groups.iter_mut()
    }
}

impl FromIterator<DesiredStatement> for DesiredOutput {
    fn from_iter<I: IntoIterator<Item = DesiredStatement>>(iter: I) -> Self {
        let mut output = Self::new();
        output.extend(iter);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualifier_group_sorting_is_stable() {
        let mut desired = DesiredStatement::new("P1", Value::string("v"));
        desired.add_qualifier(DesiredQualifier::new("P10", Value::string("a")));
        desired.add_qualifier(DesiredQualifier::new("P11", Value::string("b")));
        desired.add_qualifier(
            DesiredQualifier::new("P12", Value::string("c")).make_new_if_conflicting(),
        );
        desired.add_qualifier(
            DesiredQualifier::new("P13", Value::string("d")).make_new_if_conflicting(),
        );

        desired.sort_qualifier_groups();
        let order: Vec<&str> = desired
            .qualifiers
            .iter()
            .map(|g| g.property.as_str())
            .collect();
        assert_eq!(order, ["P12", "P13", "P10", "P11"]);
    }

    #[test]
    fn test_add_qualifier_groups_by_property() {
        let mut desired = DesiredStatement::new("P1", Value::string("v"));
        desired.add_qualifier_value("P10", Value::string("a"));
        desired.add_qualifier_value("P10", Value::string("b"));
        desired.add_qualifier_value("P11", Value::string("c"));

        assert_eq!(desired.qualifiers.len(), 2);
        assert_eq!(desired.qualifiers[0].entries.len(), 2);
    }

    #[test]
    fn test_reference_retrieved_default() {
        let reference = DesiredReference::new(Retrieved::Today);
        assert!(reference
            .payload
            .contains_key(&PropertyId::from(vocab::RETRIEVED_PROP)));

        let suppressed = DesiredReference::new(Retrieved::Suppress);
        assert!(suppressed.payload.is_empty());

        let date = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
        let pinned = DesiredReference::new(Retrieved::On(date));
        let claim = &pinned.payload[&PropertyId::from(vocab::RETRIEVED_PROP)];
        assert_eq!(claim.value, Value::Date(date));
    }

    #[test]
    fn test_reference_compatibility_by_value() {
        let mut reference = DesiredReference::new(Retrieved::Suppress);
        reference.add_claim(Claim::new("P248", Value::item("Q36578")), true);

        let matching = ReferenceGroup::from_claims([Claim::new("P248", Value::item("Q36578"))]);
        let other = ReferenceGroup::from_claims([Claim::new("P248", Value::item("Q1"))]);

        assert!(reference.is_compatible(&matching));
        assert!(!reference.is_compatible(&other));
    }

    #[test]
    fn test_reference_compatibility_by_url_pattern() {
        let reference = DesiredReference::new(Retrieved::Suppress)
            .with_url_pattern(Regex::new(r"^https?://catalogue\.bnf\.fr/").unwrap());

        let matching = ReferenceGroup::from_claims([Claim::new(
            vocab::URL_PROP,
            Value::url("https://catalogue.bnf.fr/ark:/12148/cb123"),
        )]);
        let other = ReferenceGroup::from_claims([Claim::new(
            vocab::URL_PROP,
            Value::url("https://example.com/"),
        )]);

        assert!(reference.is_compatible(&matching));
        assert!(!reference.is_compatible(&other));
    }

    #[test]
    fn test_output_groups_by_property() {
        let mut output = DesiredOutput::new();
        output.add(DesiredStatement::new("P31", Value::item("Q5")));
        output.add(DesiredStatement::new("P31", Value::item("Q6")));
        output.add(DesiredStatement::new("P569", Value::string("x")));

        assert_eq!(output.len(), 3);
        assert!(!output.is_empty());
        let sizes: Vec<usize> = output.iter().map(|(_, v)| v.len()).collect();
        assert_eq!(sizes, [2, 1]);
    }

    #[test]
    fn test_url_pattern_match_is_anchored() {
        let reference = DesiredReference::new(Retrieved::Suppress)
            .with_url_pattern(Regex::new(r"https?://catalogue\.bnf\.fr/").unwrap());

        // The pattern occurring later in the URL is a different source.
        let wrapped = ReferenceGroup::from_claims([Claim::new(
            vocab::URL_PROP,
            Value::url("https://proxy.example/fetch?u=https://catalogue.bnf.fr/cb123"),
        )]);
        assert!(!reference.is_compatible(&wrapped));

        let direct = ReferenceGroup::from_claims([Claim::new(
            vocab::URL_PROP,
            Value::url("https://catalogue.bnf.fr/cb123"),
        )]);
        assert!(reference.is_compatible(&direct));
    }

    #[test]
    fn test_from_map_builders() {
        let statements = DesiredStatement::from_map([
            ("P31", vec![Value::item("Q5")]),
            ("P106", vec![Value::item("Q36180"), Value::item("Q82955")]),
        ]);
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0].statement.property, PropertyId::from("P31"));
        assert_eq!(statements[2].statement.value, Value::item("Q82955"));

        let qualifiers =
            DesiredQualifier::from_map([("P580", vec![Value::Int(1), Value::Int(2)])]);
        assert_eq!(qualifiers.len(), 2);
        assert_eq!(qualifiers[1].claim.value, Value::Int(2));
    }

    #[test]
    fn test_from_item_map_builders() {
        let statements = DesiredStatement::from_item_map([("P31", ["Q5", "Q4167410"])]);
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].statement.value, Value::item("Q5"));
        assert_eq!(statements[1].statement.value, Value::item("Q4167410"));

        let qualifiers = DesiredQualifier::from_item_map([("P2241", ["Q1193907"])]);
        assert_eq!(qualifiers.len(), 1);
        assert_eq!(qualifiers[0].claim.value, Value::item("Q1193907"));
    }

    #[test]
    fn test_many_builders() {
        let statements =
            DesiredStatement::many("P31", [Value::item("Q5"), Value::item("Q6")]);
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[1].statement.value, Value::item("Q6"));

        let qualifiers = DesiredQualifier::many("P580", [Value::Int(1), Value::Int(2)]);
        assert_eq!(qualifiers.len(), 2);
    }
}
