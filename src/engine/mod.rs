//! Engine modules: the flow-graph core.
//!
//! The engine layer sits between the static catalog (what can be booked) and
//! presentation (what the user sees). It owns the selection, navigation and
//! session transition logic; everything it produces is a pure function of the
//! current state.
//!
//! # Modules
//!
//! - `index` - Option id to owning step lookup
//! - `selection` - Selection toggling and cascade invalidation
//! - `navigator` - Step-group history and next-group derivation
//! - `session` - Event transition function tying the pieces together

pub mod index;
pub mod navigator;
pub mod selection;
pub mod session;
