use {
  crate::{FieldElement, Permissions},
  serde::{Deserialize, Serialize},
};

/// Number of state slots every account carries.
pub const NUM_SLOTS: usize = 8;

/// A single account as committed to the ledger.
///
/// Accounts own a fixed-arity sequence of field-element state slots
/// plus the metadata that gates how those slots may change. They are
/// mutated exclusively through a successfully applied bundle; builds
/// in flight only ever observe committed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
  /// Application state. A contract decides what each slot means, the
  /// engine only guarantees fixed arity and field arithmetic.
  pub slots: [FieldElement; NUM_SLOTS],

  /// True while every mutation applied to this account so far was
  /// authorized by proof. Any non-proof mutation clears the flag.
  pub proved_state: bool,

  /// Required authorization kind per action.
  pub permissions: Permissions,

  /// Count of updates applied to this account.
  pub nonce: u64,
}

impl Account {
  /// A fresh account with zeroed slots, an unproven state flag and
  /// the given permission profile.
  pub fn new(permissions: Permissions) -> Self {
    Self {
      slots: [FieldElement::zero(); NUM_SLOTS],
      proved_state: false,
      permissions,
      nonce: 0,
    }
  }

  /// Reads a slot, `None` when the index is out of range.
  pub fn slot(&self, index: u8) -> Option<&FieldElement> {
    self.slots.get(index as usize)
  }
}

impl Default for Account {
  fn default() -> Self {
    Self::new(Permissions::default())
  }
}
