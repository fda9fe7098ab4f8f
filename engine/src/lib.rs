mod apply;
mod builder;
mod compose;
mod pending;
mod schedule;
mod state;
mod store;

pub use {
  apply::{validate, Error as ApplyError},
  builder::{Error as BuildError, UpdateBuilder},
  compose::{compose, Error as ComposeError},
  pending::PendingBundle,
  schedule::BundleRefs,
  state::{InMemoryStateStore, State, StateDiff},
  store::{Ledger, Snapshot},
};
