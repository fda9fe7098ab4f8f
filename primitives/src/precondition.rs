use {
  crate::FieldElement,
  serde::{Deserialize, Serialize},
  std::fmt::Display,
};

/// A check recorded while an account update is being built.
///
/// Preconditions are evaluated twice. The builder checks them against
/// the snapshot it reads from, catching logic errors immediately. The
/// applier re-evaluates every recorded precondition against the
/// committed state at apply time, which is what turns a bundle built
/// from a state that has since moved on into a rejection instead of a
/// lost update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Precondition {
  /// The slot at `index` must hold exactly `expected`.
  SlotEquals { index: u8, expected: FieldElement },

  /// The account's proved-state flag, lowered into the field as
  /// 0 = false and 1 = true, must equal `expected`. Values other
  /// than 0 or 1 make the precondition malformed rather than failed.
  ProvedState { expected: FieldElement },
}

impl Precondition {
  /// What this precondition constrains, for errors and logs.
  pub fn subject(&self) -> Subject {
    match self {
      Precondition::SlotEquals { index, .. } => Subject::Slot(*index),
      Precondition::ProvedState { .. } => Subject::ProvedState,
    }
  }
}

/// Names the part of an account a precondition constrains.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Subject {
  Slot(u8),
  ProvedState,
}

impl Display for Subject {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Subject::Slot(index) => write!(f, "slot {index}"),
      Subject::ProvedState => write!(f, "proved-state flag"),
    }
  }
}
