use {
  calyx_primitives::{AccountUpdate, Bundle},
  thiserror::Error,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
  #[error("A transaction must contain at least one account update")]
  EmptyTransaction,
}

/// Orders closed account updates into an atomic bundle.
///
/// Composition is pure and re-entrant: no preconditions are evaluated
/// here and nothing is locked, so speculatively built transactions
/// can be composed and discarded without any ledger effect. Update
/// order is preserved exactly; it determines the replay order and
/// which write wins when two updates in the bundle touch the same
/// slot.
pub fn compose(updates: Vec<AccountUpdate>) -> Result<Bundle, Error> {
  if updates.is_empty() {
    return Err(Error::EmptyTransaction);
  }
  Ok(Bundle::new(updates))
}
