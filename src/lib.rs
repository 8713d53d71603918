//! claimsync — a reconciliation engine for claim-bearing entities.
//!
//! A bot declares what an entity *should* say (statements, qualifiers,
//! references, each with merge-policy flags); the engine fetches the
//! entity, merges the desired state into it with the minimum set of
//! changes, reports every change through the bot's hooks, and commits the
//! result with bounded retry. Running the same bot twice never produces a
//! second edit.
//!
//! # Quick start
//!
//! ```
//! use claimsync::{
//!     Bot, Config, DesiredOutput, DesiredStatement, Entity, EngineError,
//!     MemoryStore, Reconciler, Value,
//! };
//!
//! struct HumanBot;
//!
//! impl Bot for HumanBot {
//!     fn edit_summary(&self, _entity: &Entity) -> String {
//!         "adding instance-of human".to_string()
//!     }
//!
//!     fn run_item(&mut self, _entity: &Entity) -> Result<DesiredOutput, EngineError> {
//!         Ok([DesiredStatement::new("P31", Value::item("Q5"))]
//!             .into_iter()
//!             .collect())
//!     }
//! }
//!
//! let store = MemoryStore::new();
//! store.seed(Entity::new("Q42")).unwrap();
//! let engine = Reconciler::new(Config::default(), store);
//!
//! let mut bot = HumanBot;
//! assert!(engine.act_on_id(&mut bot, &"Q42".into()).unwrap());
//! // A second run finds nothing to do.
//! assert!(!engine.act_on_id(&mut bot, &"Q42".into()).unwrap());
//! ```
//!
//! # Layout
//!
//! - [`value`], [`statement`], [`entity`]: the data model.
//! - [`desired`]: what a bot wants an entity to say, plus policy flags.
//! - [`bot`]: the hook surface bots implement.
//! - [`engine`]: the three-tier reconciler, cycle guard, and commit driver.
//! - [`event`]: the mutation reports fed to the processed hook.
//! - [`store`], [`query`]: the persistence and bulk-lookup seams.
//! - [`transform`]: desired-statement pre-processing (archive-URL rewrite).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bot;
pub mod config;
pub mod desired;
pub mod entity;
pub mod error;
pub mod event;
pub mod mutate;
pub mod query;
pub mod statement;
pub mod store;
pub mod transform;
pub mod value;
pub mod vocab;

pub mod engine;

pub use bot::{random_edit_group_id, Bot};
pub use config::Config;
pub use desired::{
    DesiredOutput, DesiredQualifier, DesiredReference, DesiredStatement, QualifierGroup, Retrieved,
};
pub use engine::{FeedSummary, Reconciler};
pub use entity::{Entity, EntityId, PropertyId, StatementHandle};
pub use error::{EngineError, ParseError};
pub use event::ProcessEvent;
pub use query::{
    resolve_claims_per_entity, resolve_entities_holding_claims,
    resolve_multiple_property_claims, ClaimMatch, MemoryQueryService, QueryService,
};
pub use statement::{Claim, Rank, ReferenceGroup, Statement};
pub use store::{CommitRecord, EntityStore, MemoryStore, StoreError};
pub use transform::dearchive_url_statement;
pub use value::Value;
