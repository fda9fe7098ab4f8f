use {
  calyx_primitives::{Account, Address},
  serde::{Deserialize, Serialize},
  std::collections::{BTreeMap, HashMap},
};

/// Represents a change in committed account state.
///
/// Diffs accumulate: the entire ledger state is logically the result
/// of applying consecutive state diffs, one per committed bundle.
/// Applying a merged diff is equivalent to applying the merged parts
/// in order, which is what the broadcast layer relies on when it
/// batches diffs for propagation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateDiff {
  upserts: BTreeMap<Address, Account>,
}

impl StateDiff {
  /// Inserts or replaces an account under a given address.
  ///
  /// Returns the previously staged value for this address, if any.
  pub fn set(&mut self, address: Address, account: Account) -> Option<Account> {
    self.upserts.insert(address, account)
  }

  /// Merges a state diff with a newer diff.
  ///
  /// Applying the resulting diff is equivalent to applying the two
  /// merged diffs consecutively on any state store.
  pub fn merge(self, newer: StateDiff) -> StateDiff {
    let mut upserts = self.upserts;
    for (addr, acc) in newer.upserts {
      upserts.insert(addr, acc);
    }
    StateDiff { upserts }
  }

  /// Iterates over all account changes in this diff.
  pub fn iter(&self) -> impl Iterator<Item = (&Address, &Account)> {
    self.upserts.iter()
  }

  pub fn len(&self) -> usize {
    self.upserts.len()
  }

  pub fn is_empty(&self) -> bool {
    self.upserts.is_empty()
  }
}

impl State for StateDiff {
  fn get(&self, address: &Address) -> Option<Account> {
    self.upserts.get(address).cloned()
  }

  fn apply(&mut self, diff: StateDiff) {
    *self = std::mem::take(self).merge(diff);
  }
}

/// Read and write access to committed account state.
///
/// `apply` is the raw, unchecked mutation path. It exists for state
/// storage backends and for the bootstrap harness that seeds genesis
/// accounts; everything else mutates state through `Ledger::commit`.
pub trait State {
  fn get(&self, address: &Address) -> Option<Account>;
  fn apply(&mut self, diff: StateDiff);
}

/// Plain unversioned account map. Used as a lightweight test double
/// and for assembling genesis state before it is handed to a ledger.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
  data: HashMap<Address, Account>,
}

impl InMemoryStateStore {
  pub fn iter(&self) -> impl Iterator<Item = (&Address, &Account)> {
    self.data.iter()
  }
}

impl State for InMemoryStateStore {
  fn get(&self, address: &Address) -> Option<Account> {
    self.data.get(address).cloned()
  }

  fn apply(&mut self, diff: StateDiff) {
    for (addr, acc) in diff.upserts {
      self.data.insert(addr, acc);
    }
  }
}
