//! Mutation events reported through the processed hook.
//!
//! Every category of change the engine can make to an entity has exactly
//! one variant here, carrying the context of what changed. Bots receive
//! these through [`Bot::processed_hook`](crate::Bot::processed_hook)
//! immediately after the corresponding mutation is applied, and may return
//! `true` to request another reconciliation pass.

use crate::entity::StatementHandle;
use crate::statement::{Claim, Rank, Statement};
use crate::value::Value;

/// One mutation the engine performed, with its context.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    /// The entity had no statements at all for the property; the desired
    /// statement was added as the first one.
    MissingProperty {
        /// The statement that was added.
        handle: StatementHandle,
    },
    /// The entity had statements for the property but none with the
    /// desired value; the desired statement was added alongside them.
    MissingValue {
        /// The statement that was added.
        handle: StatementHandle,
    },
    /// A statement with the desired value existed, but with a different
    /// rank; the desired rank was copied onto it.
    DifferentRank {
        /// The statement whose rank changed.
        handle: StatementHandle,
        /// The rank it had before.
        old_rank: Rank,
    },
    /// No statement matched the desired value and replacement was
    /// requested; the first conflicting statement's value was overwritten.
    ReplaceValue {
        /// The statement whose value changed.
        handle: StatementHandle,
        /// The value it had before.
        old_value: Value,
    },
    /// After a replacement, the remaining sibling statements for the
    /// property were deleted. Always reported directly after
    /// [`ProcessEvent::ReplaceValue`].
    DeleteValues {
        /// The surviving statement.
        handle: StatementHandle,
        /// The statements that were removed.
        deleted: Vec<Statement>,
    },
    /// The working statement had no qualifier at all for the property; the
    /// desired qualifier was attached as the first one.
    MissingQualifierProperty {
        /// The statement the qualifier was attached to.
        handle: StatementHandle,
        /// The qualifier that was attached.
        qualifier: Claim,
    },
    /// The working statement had qualifiers for the property but none with
    /// the desired value; the desired qualifier was attached alongside
    /// them.
    MissingQualifierValue {
        /// The statement the qualifier was attached to.
        handle: StatementHandle,
        /// The qualifier that was attached.
        qualifier: Claim,
    },
    /// No qualifier matched the desired value and replacement was
    /// requested; the first existing qualifier's value was overwritten.
    ReplaceQualifierValue {
        /// The statement carrying the qualifier.
        handle: StatementHandle,
        /// The qualifier after replacement.
        qualifier: Claim,
        /// The value it had before.
        old_value: Value,
    },
    /// After a qualifier replacement, the remaining qualifier values for
    /// the property were deleted. Always reported directly after
    /// [`ProcessEvent::ReplaceQualifierValue`].
    DeleteQualifierValues {
        /// The statement carrying the qualifier.
        handle: StatementHandle,
        /// The surviving qualifier.
        qualifier: Claim,
        /// The qualifiers that were removed.
        deleted: Vec<Claim>,
    },
    /// A qualifier conflicted on the adopted statement and
    /// `make_new_if_conflicting` was set: the desired statement was re-added
    /// as a new parallel statement and the qualifiers accumulated this pass
    /// moved onto it. The triggering qualifier is attached to the new
    /// statement without a separate
    /// [`ProcessEvent::MissingQualifierValue`] report.
    NewClaimFromQualifier {
        /// The new parallel statement.
        handle: StatementHandle,
        /// Snapshot of the statement that was split away from.
        old_statement: Statement,
        /// The qualifier that triggered the split.
        qualifier: Claim,
    },
    /// A compatible reference group existed; payload claims missing from it
    /// were appended. Only reported when at least one claim was added.
    MergedReference {
        /// The statement carrying the reference.
        handle: StatementHandle,
        /// Index of the merged group among the statement's references.
        group_index: usize,
        /// The claims that were appended.
        added: Vec<Claim>,
    },
    /// No compatible reference group existed; the payload was appended as
    /// a brand-new group.
    MissingReference {
        /// The statement carrying the reference.
        handle: StatementHandle,
        /// Index of the new group among the statement's references.
        group_index: usize,
    },
    /// The post-output hook reported a change of its own.
    PostOutput,
}

impl ProcessEvent {
    /// Returns true if the event means a new statement was added.
    #[must_use]
    pub const fn added_new_statement(&self) -> bool {
        matches!(
            self,
            Self::MissingProperty { .. }
                | Self::MissingValue { .. }
                | Self::NewClaimFromQualifier { .. }
        )
    }

    /// Returns true if the event means a statement was added or modified.
    #[must_use]
    pub const fn statement_modified(&self) -> bool {
        self.added_new_statement()
            || matches!(
                self,
                Self::DifferentRank { .. } | Self::ReplaceValue { .. } | Self::DeleteValues { .. }
            )
    }

    /// Returns true if the event means a new qualifier was attached.
    #[must_use]
    pub const fn added_new_qualifier(&self) -> bool {
        matches!(
            self,
            Self::MissingQualifierProperty { .. } | Self::MissingQualifierValue { .. }
        )
    }

    /// Returns true if the event means a qualifier was added or modified.
    #[must_use]
    pub const fn qualifier_modified(&self) -> bool {
        self.added_new_qualifier()
            || matches!(
                self,
                Self::ReplaceQualifierValue { .. } | Self::DeleteQualifierValues { .. }
            )
    }

    /// Returns true if the event means a reference was added or merged.
    #[must_use]
    pub const fn reference_modified(&self) -> bool {
        matches!(self, Self::MissingReference { .. } | Self::MergedReference { .. })
    }
}
