//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::entity::PropertyId;

/// Frozen set of toggles controlling whitelist enforcement and automatic
/// transforms.
///
/// Construct once and hand to [`Reconciler::new`](crate::Reconciler::new);
/// the engine never mutates its configuration mid-run.
///
/// The three whitelists are independent: when the main-property whitelist
/// blocks a statement, its qualifiers and references may still be edited if
/// their own whitelists allow it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Rewrite web-archive mirror URLs into the original URL plus
    /// provenance qualifiers before reconciling.
    pub auto_dearchive_urls: bool,
    /// Mark de-archived URL statements as deprecated.
    pub auto_deprecate_dearchived_urls: bool,

    /// Enforce [`Config::main_property_whitelist`].
    pub main_property_whitelist_enabled: bool,
    /// Properties whose statements may be created or edited.
    pub main_property_whitelist: Vec<PropertyId>,
    /// Copy ranks onto matching statements even when the main-property
    /// whitelist blocks other edits for the property.
    pub copy_ranks_for_nonwhitelisted_main_properties: bool,

    /// Enforce [`Config::qualifier_whitelist`] when the main property is
    /// blocked.
    pub qualifier_whitelist_enabled: bool,
    /// Qualifier properties that may be created or edited on statements of
    /// non-whitelisted main properties.
    pub qualifier_whitelist: Vec<PropertyId>,

    /// Enforce [`Config::reference_whitelist`] when the main property is
    /// blocked.
    pub reference_whitelist_enabled: bool,
    /// Reference properties that may be created or edited on statements of
    /// non-whitelisted main properties.
    pub reference_whitelist: Vec<PropertyId>,

    /// Count a halted no-progress re-cycle request as an edit, so the
    /// commit driver still runs.
    pub act_on_no_edit_cycle: bool,
    /// Raise [`EngineError::NoProgressCycle`](crate::EngineError::NoProgressCycle)
    /// instead of silently stopping when a hook requests a re-cycle without
    /// any statement change.
    pub throw_on_no_edit_cycle: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auto_dearchive_urls: true,
            auto_deprecate_dearchived_urls: true,
            main_property_whitelist_enabled: false,
            main_property_whitelist: Vec::new(),
            copy_ranks_for_nonwhitelisted_main_properties: true,
            qualifier_whitelist_enabled: false,
            qualifier_whitelist: Vec::new(),
            reference_whitelist_enabled: false,
            reference_whitelist: Vec::new(),
            act_on_no_edit_cycle: false,
            throw_on_no_edit_cycle: false,
        }
    }
}
