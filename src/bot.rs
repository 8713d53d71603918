//! The hook surface implemented by concrete bots.
//!
//! The engine drives reconciliation; a [`Bot`] supplies everything that is
//! specific to one job: the desired output for an entity, the edit
//! summary, custom equality, and the processing hooks. Every hook has a
//! default matching the stock behavior, so a minimal bot implements just
//! [`Bot::edit_summary`] and [`Bot::run_item`].

use crate::desired::{DesiredOutput, DesiredStatement};
use crate::entity::Entity;
use crate::error::EngineError;
use crate::event::ProcessEvent;
use crate::statement::{Claim, Statement};

/// Generates a random edit-group identifier.
///
/// Edit groups correlate the commits of one logical run; bots that want
/// one typically generate it at construction time and return it from
/// [`Bot::edit_group_id`].
#[must_use]
pub fn random_edit_group_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Hook surface for one reconciliation job.
pub trait Bot {
    /// The edit summary for a commit to this entity.
    fn edit_summary(&self, entity: &Entity) -> String;

    /// Produces the desired output for one entity.
    ///
    /// # Errors
    ///
    /// Implementations may fail (e.g. an upstream data source is down);
    /// the failure is surfaced for this entity only.
    fn run_item(&mut self, entity: &Entity) -> Result<DesiredOutput, EngineError>;

    /// The edit-group ID to append to commit summaries, if any.
    fn edit_group_id(&self) -> Option<String> {
        None
    }

    /// Whether the desired statement itself may be created or edited.
    ///
    /// The default refuses reference-only statements.
    fn can_add_main_statement(&self, desired: &DesiredStatement) -> bool {
        !desired.reference_only
    }

    /// Whether an existing statement states the same fact as a desired one.
    ///
    /// The default compares values exactly; override for fuzzy matching
    /// (e.g. treating normalized URLs as equal).
    fn same_main_value(&self, existing: &Statement, desired: &Statement) -> bool {
        existing.value == desired.value
    }

    /// Whether an existing qualifier matches a desired one.
    ///
    /// The default compares values exactly.
    fn same_qualifier(&self, existing: &Claim, desired: &Claim) -> bool {
        existing.value == desired.value
    }

    /// Called directly after every mutation the engine applies.
    ///
    /// Return `true` to request another reconciliation pass. Only do so
    /// when the hook changed something at the same tier or higher than the
    /// reported mutation; the engine's cycle guard stops a re-cycle that
    /// produced no actual change.
    fn processed_hook(&mut self, entity: &Entity, event: &ProcessEvent) -> bool {
        let _ = (entity, event);
        false
    }

    /// Called once after the reconciliation loop settles.
    ///
    /// Return `true` to report that the hook itself changed the entity;
    /// the run then counts as acted even if the engine made no mutation.
    fn post_output_process_hook(&mut self, output: &DesiredOutput, entity: &Entity) -> bool {
        let _ = (output, entity);
        false
    }

    /// Called just before the commit driver persists the entity.
    ///
    /// Only fires when a commit will actually happen.
    fn pre_edit_process_hook(&mut self, output: &DesiredOutput, entity: &Entity) {
        let _ = (output, entity);
    }

    /// Called after the entity was successfully persisted.
    fn post_edit_process_hook(&mut self, output: &DesiredOutput, entity: &Entity) {
        let _ = (output, entity);
    }
}
