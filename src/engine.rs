//! The reconciliation engine and commit driver.
//!
//! [`Reconciler`] compares a bot's desired output against an entity's
//! existing statements and applies the minimal set of local mutations to
//! bring them into agreement, reporting every mutation through the bot's
//! processed hook. The whole pass runs inside a cycle-guarded loop; when
//! anything changed, the commit driver persists the entity with bounded
//! retry.
//!
//! The engine owns no entity state: it borrows one [`Entity`] exclusively
//! per pass and threads the current working statement through the tiers as
//! a [`StatementHandle`] rather than a shared mutable reference, so the
//! split case simply produces a new handle.

use std::mem;

use crate::bot::Bot;
use crate::config::Config;
use crate::desired::{DesiredOutput, DesiredQualifier, DesiredReference, DesiredStatement};
use crate::entity::{Entity, EntityId, PropertyId, StatementHandle};
use crate::error::EngineError;
use crate::event::ProcessEvent;
use crate::mutate;
use crate::statement::Statement;
use crate::store::EntityStore;
use crate::transform::dearchive_url_statement;
use crate::value::Value;

/// Additional commit attempts after the first one fails retryably.
const COMMIT_RETRIES: u32 = 3;

/// Bookkeeping for one reconciliation pass.
#[derive(Debug, Default)]
struct PassState {
    /// Some hook requested another pass.
    re_cycle: bool,
    /// Some mutation was applied (across all passes so far).
    acted: bool,
}

/// Where the statement-tier scan landed for one desired statement.
enum ScanOutcome {
    /// An existing statement states the desired fact; adopt it.
    Adopt(usize),
    /// Overwrite this statement's value with the desired one.
    Replace(usize),
    /// Nothing matched and nothing was replaced.
    Fallthrough,
}

/// Outcome of one entity in a batch feed.
#[derive(Debug, Default)]
pub struct FeedSummary {
    /// Entities handed to the bot.
    pub processed: usize,
    /// Entities that resulted in a commit.
    pub edited: usize,
    /// Per-entity failures (only collected when skipping errored items).
    pub errors: Vec<(EntityId, EngineError)>,
}

/// The reconciliation engine.
///
/// Holds the frozen [`Config`] and the entity store; bots are passed into
/// each call so one engine can drive several jobs.
#[derive(Debug)]
pub struct Reconciler<S> {
    config: Config,
    store: S,
}

impl<S: EntityStore> Reconciler<S> {
    /// Creates an engine with the given configuration and store.
    pub const fn new(config: Config, store: S) -> Self {
        Self { config, store }
    }

    /// Returns the engine configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the entity store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Fetches an entity, reconciles it, and commits if anything changed.
    ///
    /// # Errors
    ///
    /// Propagates fetch failures, bot failures, commit failures (after
    /// retry), and the no-progress-cycle error when configured to raise it.
    pub fn act_on_id<B: Bot>(&self, bot: &mut B, id: &EntityId) -> Result<bool, EngineError> {
        let mut entity = self.store.fetch(id)?;
        self.act_on_entity(bot, &mut entity)
    }

    /// Reconciles one already-fetched entity and commits if anything
    /// changed.
    ///
    /// # Errors
    ///
    /// Propagates bot failures, commit failures (after retry), and the
    /// no-progress-cycle error when configured to raise it.
    pub fn act_on_entity<B: Bot>(
        &self,
        bot: &mut B,
        entity: &mut Entity,
    ) -> Result<bool, EngineError> {
        tracing::debug!(entity = %entity.id, "producing desired output");
        let mut output = bot.run_item(entity)?;
        self.process(bot, &mut output, entity)
    }

    /// Feeds a stream of entities through the engine sequentially.
    ///
    /// With `skip_errored` set, per-entity failures are logged and recorded
    /// in the returned [`FeedSummary`] and the batch continues; otherwise
    /// the first failure stops the batch.
    ///
    /// # Errors
    ///
    /// Only when `skip_errored` is unset: the first per-entity failure.
    pub fn feed_entities<B: Bot>(
        &self,
        bot: &mut B,
        entities: impl IntoIterator<Item = Entity>,
        skip_errored: bool,
    ) -> Result<FeedSummary, EngineError> {
        let mut summary = FeedSummary::default();
        for mut entity in entities {
            summary.processed += 1;
            let id = entity.id.clone();
            match self.act_on_entity(bot, &mut entity) {
                Ok(true) => summary.edited += 1,
                Ok(false) => {}
                Err(e) if skip_errored => {
                    tracing::warn!(entity = %id, error = %e, "skipping errored entity");
                    summary.errors.push((id, e));
                }
                Err(e) => return Err(e),
            }
        }
        Ok(summary)
    }

    /// Reconciles the desired output against the entity.
    ///
    /// Runs the statement/qualifier/reference tiers inside the
    /// cycle-guarded loop, fires the post-output hook, and, if anything
    /// changed, drives the commit. Returns whether an edit was made.
    ///
    /// # Errors
    ///
    /// Propagates commit failures (after retry), serialization failures
    /// from content hashing, and the no-progress-cycle error when
    /// configured to raise it.
    pub fn process<B: Bot>(
        &self,
        bot: &mut B,
        output: &mut DesiredOutput,
        entity: &mut Entity,
    ) -> Result<bool, EngineError> {
        let mut state = PassState::default();
        let mut last_hash = entity.content_hash()?;
        loop {
            state.re_cycle = false;
            for (_, desired_list) in output.iter_mut() {
                for desired in desired_list.iter_mut() {
                    self.process_desired_statement(bot, entity, desired, &mut state);
                }
            }
            if !state.re_cycle {
                break;
            }
            // A hook asked for another pass; only grant it when the entity
            // actually changed since the previous pass.
            let hash = entity.content_hash()?;
            if hash == last_hash {
                if self.config.throw_on_no_edit_cycle {
                    return Err(EngineError::NoProgressCycle {
                        entity: entity.id.clone(),
                    });
                }
                tracing::warn!(entity = %entity.id, "re-cycle requested without progress; stopping");
                if self.config.act_on_no_edit_cycle {
                    state.acted = true;
                }
                break;
            }
            last_hash = hash;
        }

        if bot.post_output_process_hook(output, entity) {
            bot.processed_hook(entity, &ProcessEvent::PostOutput);
            state.acted = true;
        }

        if state.acted {
            bot.pre_edit_process_hook(output, entity);
            self.commit_with_retry(bot, entity)?;
            bot.post_edit_process_hook(output, entity);
        }
        Ok(state.acted)
    }

    /// Runs all three tiers for one desired statement.
    fn process_desired_statement<B: Bot>(
        &self,
        bot: &mut B,
        entity: &mut Entity,
        desired: &mut DesiredStatement,
        state: &mut PassState,
    ) {
        if self.config.auto_dearchive_urls && desired.statement.value.is_url() {
            dearchive_url_statement(desired, self.config.auto_deprecate_dearchived_urls);
        }
        // The pre-merge statement: what a split re-adds.
        let original = desired.statement.clone();

        let Some(handle) = self.resolve_statement(bot, entity, desired, state) else {
            // The desired statement was skipped; its qualifiers and
            // references are skipped with it.
            return;
        };
        let handle = self.process_qualifiers(bot, entity, desired, handle, &original, state);
        self.process_references(bot, entity, desired, &handle, state);
        desired.resolved = Some(handle);
    }

    /// Statement tier: find, add, adopt, or replace the working statement.
    ///
    /// Returns the working-statement handle, or `None` when the desired
    /// statement is skipped entirely.
    fn resolve_statement<B: Bot>(
        &self,
        bot: &mut B,
        entity: &mut Entity,
        desired: &DesiredStatement,
        state: &mut PassState,
    ) -> Option<StatementHandle> {
        let property = desired.statement.property.clone();

        if !entity.has_property(&property) {
            if bot.can_add_main_statement(desired) && self.whitelisted_statement(desired) {
                let handle = mutate::attach_statement(entity, desired.statement.clone());
                state.re_cycle |= bot.processed_hook(
                    entity,
                    &ProcessEvent::MissingProperty {
                        handle: handle.clone(),
                    },
                );
                state.acted = true;
                return Some(handle);
            }
            return None;
        }

        // Scan in stored order. The value-match test precedes the replace
        // test for each statement, and a replacement stops the scan.
        let mut outcome = ScanOutcome::Fallthrough;
        for (index, existing) in entity.statements(&property).iter().enumerate() {
            if bot.same_main_value(existing, &desired.statement) {
                outcome = ScanOutcome::Adopt(index);
                break;
            }
            if desired.replace_if_conflicting_exists && self.whitelisted_statement(desired) {
                outcome = ScanOutcome::Replace(index);
                break;
            }
        }

        match outcome {
            ScanOutcome::Adopt(index) => {
                let handle = StatementHandle::new(property, index);
                let old_rank = entity
                    .statement(&handle)
                    .filter(|s| s.rank != desired.statement.rank)
                    .map(|s| s.rank);
                if let Some(old_rank) = old_rank {
                    if self.whitelisted_statement(desired)
                        || self.config.copy_ranks_for_nonwhitelisted_main_properties
                    {
                        if let Some(statement) = entity.statement_mut(&handle) {
                            statement.rank = desired.statement.rank;
                        }
                        state.re_cycle |= bot.processed_hook(
                            entity,
                            &ProcessEvent::DifferentRank {
                                handle: handle.clone(),
                                old_rank,
                            },
                        );
                        state.acted = true;
                    }
                }
                Some(handle)
            }
            ScanOutcome::Replace(index) => {
                let mut handle = StatementHandle::new(property.clone(), index);
                let old_value = {
                    let statement = entity.statement_mut(&handle)?;
                    // Rank is copied silently as part of the replacement.
                    statement.rank = desired.statement.rank;
                    mem::replace(&mut statement.value, desired.statement.value.clone())
                };
                state.re_cycle |= bot.processed_hook(
                    entity,
                    &ProcessEvent::ReplaceValue {
                        handle: handle.clone(),
                        old_value,
                    },
                );
                state.acted = true;

                if desired.delete_other_if_replacing && entity.statements(&property).len() > 1 {
                    let deleted = {
                        let list = entity.claims.get_mut(&property)?;
                        let survivor = list.remove(index);
                        mem::replace(list, vec![survivor])
                    };
                    handle = StatementHandle::new(property, 0);
                    state.re_cycle |= bot.processed_hook(
                        entity,
                        &ProcessEvent::DeleteValues {
                            handle: handle.clone(),
                            deleted,
                        },
                    );
                }
                Some(handle)
            }
            ScanOutcome::Fallthrough => {
                if desired.skip_if_conflicting_language_exists {
                    if let Value::Monolingual { language, .. } = &desired.statement.value {
                        let conflicting = entity.statements(&property).iter().any(|existing| {
                            existing.value.language() == Some(language)
                                && existing.value != desired.statement.value
                        });
                        if conflicting {
                            return None;
                        }
                    }
                }
                if desired.skip_if_conflicting_exists {
                    return None;
                }
                if bot.can_add_main_statement(desired) && self.whitelisted_statement(desired) {
                    let handle = mutate::attach_statement(entity, desired.statement.clone());
                    state.re_cycle |= bot.processed_hook(
                        entity,
                        &ProcessEvent::MissingValue {
                            handle: handle.clone(),
                        },
                    );
                    state.acted = true;
                    Some(handle)
                } else {
                    None
                }
            }
        }
    }

    /// Qualifier tier.
    ///
    /// Returns the (possibly new, after a split) working-statement handle.
    fn process_qualifiers<B: Bot>(
        &self,
        bot: &mut B,
        entity: &mut Entity,
        desired: &mut DesiredStatement,
        mut handle: StatementHandle,
        original: &Statement,
        state: &mut PassState,
    ) -> StatementHandle {
        desired.sort_qualifier_groups();
        // Qualifiers attached to the working statement during this pass;
        // a split moves them all onto the new statement.
        let mut added_this_pass = Vec::new();

        for group_index in 0..desired.qualifiers.len() {
            for entry_index in 0..desired.qualifiers[group_index].entries.len() {
                let dq = desired.qualifiers[group_index].entries[entry_index].clone();
                if dq.reference_only {
                    continue;
                }
                let property = dq.claim.property.clone();
                let allowed =
                    self.whitelisted_statement(desired) || self.whitelisted_qualifier(&dq);

                let has_property = entity
                    .statement(&handle)
                    .is_some_and(|s| s.has_qualifier_property(&property));
                if !has_property {
                    if allowed {
                        if let Some(statement) = entity.statement_mut(&handle) {
                            mutate::attach_qualifier(statement, dq.claim.clone());
                        }
                        added_this_pass.push(dq.claim.clone());
                        state.re_cycle |= bot.processed_hook(
                            entity,
                            &ProcessEvent::MissingQualifierProperty {
                                handle: handle.clone(),
                                qualifier: dq.claim.clone(),
                            },
                        );
                        state.acted = true;
                    }
                    continue;
                }

                let matched = entity.statement(&handle).is_some_and(|s| {
                    s.qualifiers_for(&property)
                        .iter()
                        .any(|existing| bot.same_qualifier(existing, &dq.claim))
                });
                if matched {
                    continue;
                }

                if dq.replace_if_conflicting_exists && allowed {
                    self.replace_qualifier(bot, entity, &handle, &dq, state);
                } else if dq.skip_if_conflicting_exists {
                    continue;
                } else if dq.make_new_if_conflicting && self.whitelisted_statement(desired) {
                    if !bot.can_add_main_statement(desired) {
                        continue;
                    }
                    handle = self.split_statement(
                        bot,
                        entity,
                        handle,
                        original,
                        &dq,
                        &mut added_this_pass,
                        state,
                    );
                } else {
                    if let Some(statement) = entity.statement_mut(&handle) {
                        mutate::attach_qualifier(statement, dq.claim.clone());
                    }
                    added_this_pass.push(dq.claim.clone());
                    state.re_cycle |= bot.processed_hook(
                        entity,
                        &ProcessEvent::MissingQualifierValue {
                            handle: handle.clone(),
                            qualifier: dq.claim.clone(),
                        },
                    );
                    state.acted = true;
                }
            }
        }
        handle
    }

    /// Overwrites the first existing qualifier's value, optionally
    /// collapsing its siblings.
    fn replace_qualifier<B: Bot>(
        &self,
        bot: &mut B,
        entity: &mut Entity,
        handle: &StatementHandle,
        dq: &DesiredQualifier,
        state: &mut PassState,
    ) {
        let property = &dq.claim.property;
        let Some((old_value, replaced)) = entity.statement_mut(handle).and_then(|statement| {
            let list = statement.qualifiers.get_mut(property)?;
            let first = list.first_mut()?;
            let old = mem::replace(&mut first.value, dq.claim.value.clone());
            Some((old, first.clone()))
        }) else {
            return;
        };
        state.re_cycle |= bot.processed_hook(
            entity,
            &ProcessEvent::ReplaceQualifierValue {
                handle: handle.clone(),
                qualifier: replaced.clone(),
                old_value,
            },
        );
        state.acted = true;

        let sibling_count = entity
            .statement(handle)
            .map_or(0, |s| s.qualifiers_for(property).len());
        if dq.delete_other_if_replacing && sibling_count > 1 {
            let deleted = entity
                .statement_mut(handle)
                .and_then(|statement| statement.qualifiers.get_mut(property))
                .map_or_else(Vec::new, |list| list.split_off(1));
            state.re_cycle |= bot.processed_hook(
                entity,
                &ProcessEvent::DeleteQualifierValues {
                    handle: handle.clone(),
                    qualifier: replaced,
                    deleted,
                },
            );
        }
    }

    /// The split case: re-add the pre-merge statement as a new parallel
    /// statement and move this pass's qualifiers onto it.
    #[allow(clippy::too_many_arguments)]
    fn split_statement<B: Bot>(
        &self,
        bot: &mut B,
        entity: &mut Entity,
        old_handle: StatementHandle,
        original: &Statement,
        dq: &DesiredQualifier,
        added_this_pass: &mut Vec<crate::statement::Claim>,
        state: &mut PassState,
    ) -> StatementHandle {
        let old_statement = match entity.statement_mut(&old_handle) {
            Some(old) => {
                mutate::detach_qualifiers(old, added_this_pass);
                old.clone()
            }
            None => original.clone(),
        };

        let mut fresh = original.clone();
        for claim in added_this_pass.iter() {
            mutate::attach_qualifier(&mut fresh, claim.clone());
        }
        let handle = mutate::attach_statement(entity, fresh);

        state.re_cycle |= bot.processed_hook(
            entity,
            &ProcessEvent::NewClaimFromQualifier {
                handle: handle.clone(),
                old_statement,
                qualifier: dq.claim.clone(),
            },
        );
        // The triggering qualifier lands on the new statement; the split
        // report subsumes its missing-value report.
        if let Some(statement) = entity.statement_mut(&handle) {
            mutate::attach_qualifier(statement, dq.claim.clone());
        }
        added_this_pass.push(dq.claim.clone());
        state.acted = true;
        handle
    }

    /// Reference tier.
    fn process_references<B: Bot>(
        &self,
        bot: &mut B,
        entity: &mut Entity,
        desired: &DesiredStatement,
        handle: &StatementHandle,
        state: &mut PassState,
    ) {
        for reference in &desired.references {
            let allowed =
                self.whitelisted_statement(desired) || self.whitelisted_reference(reference);
            if !allowed {
                continue;
            }

            let compatible_index = entity.statement(handle).and_then(|statement| {
                statement
                    .references
                    .iter()
                    .position(|group| reference.is_compatible(group))
            });

            match compatible_index {
                Some(group_index) => {
                    let added = entity
                        .statement_mut(handle)
                        .and_then(|statement| statement.references.get_mut(group_index))
                        .map_or_else(Vec::new, |group| {
                            mutate::merge_reference_group(
                                group,
                                reference.payload.values().cloned(),
                            )
                        });
                    if !added.is_empty() {
                        state.re_cycle |= bot.processed_hook(
                            entity,
                            &ProcessEvent::MergedReference {
                                handle: handle.clone(),
                                group_index,
                                added,
                            },
                        );
                        state.acted = true;
                    }
                }
                None => {
                    let Some(group_index) = entity.statement_mut(handle).map(|statement| {
                        mutate::attach_reference_group(
                            statement,
                            reference.payload.values().cloned(),
                        )
                    }) else {
                        continue;
                    };
                    state.re_cycle |= bot.processed_hook(
                        entity,
                        &ProcessEvent::MissingReference {
                            handle: handle.clone(),
                            group_index,
                        },
                    );
                    state.acted = true;
                }
            }
        }
    }

    /// Persists the entity, retrying retryable store failures.
    fn commit_with_retry<B: Bot>(&self, bot: &B, entity: &Entity) -> Result<(), EngineError> {
        let summary = self.full_summary(bot, entity);
        let mut retries_left = COMMIT_RETRIES;
        loop {
            match self.store.commit(entity, &summary, true) {
                Ok(()) => {
                    tracing::debug!(entity = %entity.id, %summary, "committed entity");
                    return Ok(());
                }
                Err(e) if e.is_retryable() && retries_left > 0 => {
                    retries_left -= 1;
                    tracing::warn!(
                        entity = %entity.id,
                        error = %e,
                        retries_left,
                        "retrying commit"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// The edit summary plus the edit-group trailer, when one is set.
    fn full_summary<B: Bot>(&self, bot: &B, entity: &Entity) -> String {
        let base = bot.edit_summary(entity);
        match bot.edit_group_id() {
            Some(id) => format!("{base} ([[:toolforge:editgroups/b/CB/{id}|details]])"),
            None => base,
        }
    }

    fn whitelisted_statement(&self, desired: &DesiredStatement) -> bool {
        !self.config.main_property_whitelist_enabled
            || self
                .config
                .main_property_whitelist
                .contains(&desired.statement.property)
    }

    fn whitelisted_qualifier(&self, qualifier: &DesiredQualifier) -> bool {
        !self.config.qualifier_whitelist_enabled
            || self
                .config
                .qualifier_whitelist
                .contains(&qualifier.claim.property)
    }

    /// A reference passes the whitelist only when every payload property
    /// does.
    fn whitelisted_reference(&self, reference: &DesiredReference) -> bool {
        !self.config.reference_whitelist_enabled
            || reference
                .payload
                .keys()
                .all(|p: &PropertyId| self.config.reference_whitelist.contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    struct StaticBot {
        output: Vec<DesiredStatement>,
        hook_result: bool,
        events: Vec<ProcessEvent>,
    }

    impl StaticBot {
        fn new(output: Vec<DesiredStatement>) -> Self {
            Self {
                output,
                hook_result: false,
                events: Vec::new(),
            }
        }
    }

    impl Bot for StaticBot {
        fn edit_summary(&self, _entity: &Entity) -> String {
            "test edit".to_string()
        }

        fn run_item(&mut self, _entity: &Entity) -> Result<DesiredOutput, EngineError> {
            Ok(self.output.iter().cloned().collect())
        }

        fn processed_hook(&mut self, _entity: &Entity, event: &ProcessEvent) -> bool {
            self.events.push(event.clone());
            self.hook_result
        }
    }

    fn engine() -> Reconciler<MemoryStore> {
        Reconciler::new(Config::default(), MemoryStore::new())
    }

    #[test]
    fn test_missing_property_is_added() {
        let engine = engine();
        let mut bot = StaticBot::new(vec![DesiredStatement::new("P31", Value::item("Q5"))]);
        let mut entity = Entity::new("Q1");

        let acted = engine.act_on_entity(&mut bot, &mut entity).unwrap();
        assert!(acted);
        assert_eq!(entity.statements(&"P31".into()).len(), 1);
        assert!(matches!(
            bot.events[0],
            ProcessEvent::MissingProperty { .. }
        ));
    }

    #[test]
    fn test_reference_only_statement_is_skipped_when_absent() {
        let engine = engine();
        let mut bot = StaticBot::new(vec![
            DesiredStatement::new("P31", Value::item("Q5")).reference_only()
        ]);
        let mut entity = Entity::new("Q1");

        let acted = engine.act_on_entity(&mut bot, &mut entity).unwrap();
        assert!(!acted);
        assert!(entity.claims.is_empty());
        assert!(bot.events.is_empty());
    }

    #[test]
    fn test_cycle_guard_terminates_spinning_hook() {
        let engine = engine();
        let mut bot = StaticBot::new(vec![DesiredStatement::new("P31", Value::item("Q5"))]);
        bot.hook_result = true;

        let mut entity = Entity::new("Q1");
        // Pass 1 adds the statement (hash changes, loop grants a re-run);
        // pass 2 changes nothing, so the guard stops the loop.
        let acted = engine.act_on_entity(&mut bot, &mut entity).unwrap();
        assert!(acted);
        assert_eq!(entity.statements(&"P31".into()).len(), 1);
    }

    /// A bot whose equality never matches, so a replace-flagged statement
    /// keeps overwriting an identical value: a spinning hook with no
    /// content change.
    struct SpinningBot;

    impl Bot for SpinningBot {
        fn edit_summary(&self, _entity: &Entity) -> String {
            "spin".to_string()
        }

        fn run_item(&mut self, _entity: &Entity) -> Result<DesiredOutput, EngineError> {
            Ok(
                [DesiredStatement::new("P31", Value::item("Q5")).replace_if_conflicting()]
                    .into_iter()
                    .collect(),
            )
        }

        fn same_main_value(&self, _existing: &Statement, _desired: &Statement) -> bool {
            false
        }

        fn processed_hook(&mut self, _entity: &Entity, _event: &ProcessEvent) -> bool {
            true
        }
    }

    fn entity_with_q5() -> Entity {
        let mut entity = Entity::new("Q1");
        entity.push_statement(Statement::new("P31", Value::item("Q5")));
        entity
    }

    #[test]
    fn test_no_progress_cycle_can_throw() {
        let config = Config {
            throw_on_no_edit_cycle: true,
            ..Config::default()
        };
        let engine = Reconciler::new(config, MemoryStore::new());

        let mut entity = entity_with_q5();
        let err = engine.act_on_entity(&mut SpinningBot, &mut entity).unwrap_err();
        assert!(matches!(err, EngineError::NoProgressCycle { .. }));
    }

    #[test]
    fn test_no_progress_cycle_stops_silently_by_default() {
        let engine = engine();
        let mut entity = entity_with_q5();
        // The value-overwrite counts as acted even though content never
        // changed, so the run still commits.
        assert!(engine.act_on_entity(&mut SpinningBot, &mut entity).unwrap());
        assert_eq!(entity.statements(&"P31".into()).len(), 1);
    }

    #[test]
    fn test_full_summary_with_edit_group() {
        struct GroupBot;
        impl Bot for GroupBot {
            fn edit_summary(&self, _entity: &Entity) -> String {
                "base".to_string()
            }
            fn run_item(&mut self, _entity: &Entity) -> Result<DesiredOutput, EngineError> {
                Ok(DesiredOutput::new())
            }
            fn edit_group_id(&self) -> Option<String> {
                Some("abc123".to_string())
            }
        }

        let engine = engine();
        let entity = Entity::new("Q1");
        let summary = engine.full_summary(&GroupBot, &entity);
        assert_eq!(
            summary,
            "base ([[:toolforge:editgroups/b/CB/abc123|details]])"
        );
    }

    #[test]
    fn test_whitelist_blocks_statement_creation() {
        let config = Config {
            main_property_whitelist_enabled: true,
            main_property_whitelist: vec![PropertyId::from("P999")],
            ..Config::default()
        };
        let engine = Reconciler::new(config, MemoryStore::new());
        let mut bot = StaticBot::new(vec![DesiredStatement::new("P31", Value::item("Q5"))]);
        let mut entity = Entity::new("Q1");

        let acted = engine.act_on_entity(&mut bot, &mut entity).unwrap();
        assert!(!acted);
        assert!(entity.claims.is_empty());
    }
}
