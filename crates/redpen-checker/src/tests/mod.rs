//! Crate-level test harness: shared doubles and BDD scenarios.

mod behaviour;
pub(crate) mod support;
