//! Pure in-memory mutation primitives.
//!
//! These helpers change only the entity or statement passed in; nothing
//! here touches a store or fires a hook. The engine composes them into the
//! reconciliation tiers.

use crate::entity::{Entity, StatementHandle};
use crate::statement::{Claim, ReferenceGroup, Statement};

/// Appends a statement to the entity under its own property.
///
/// Returns the handle of the appended statement.
pub fn attach_statement(entity: &mut Entity, statement: Statement) -> StatementHandle {
    entity.push_statement(statement)
}

/// Appends a qualifier to a statement under the qualifier's property.
pub fn attach_qualifier(statement: &mut Statement, qualifier: Claim) {
    statement
        .qualifiers
        .entry(qualifier.property.clone())
        .or_default()
        .push(qualifier);
}

/// Removes specific qualifiers (matched by property and value) from a
/// statement. Emptied qualifier properties are dropped entirely.
pub fn detach_qualifiers(statement: &mut Statement, qualifiers: &[Claim]) {
    for claim in qualifiers {
        if let Some(list) = statement.qualifiers.get_mut(&claim.property) {
            list.retain(|existing| existing.value != claim.value);
        }
    }
    statement.qualifiers.retain(|_, list| !list.is_empty());
}

/// Appends a brand-new reference group built from the given claims.
///
/// Returns the index of the new group.
pub fn attach_reference_group(
    statement: &mut Statement,
    claims: impl IntoIterator<Item = Claim>,
) -> usize {
    statement.references.push(ReferenceGroup::from_claims(claims));
    statement.references.len() - 1
}

/// Merges claims into an existing reference group.
///
/// A claim is appended only when the group records nothing for its
/// property. Returns the claims that were actually added, in order.
pub fn merge_reference_group(
    group: &mut ReferenceGroup,
    claims: impl IntoIterator<Item = Claim>,
) -> Vec<Claim> {
    let mut added = Vec::new();
    for claim in claims {
        if !group.has_property(&claim.property) {
            group.push(claim.clone());
            added.push(claim);
        }
    }
    added
}
