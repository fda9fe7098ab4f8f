use {
  calyx_primitives::{Address, Bundle},
  std::collections::HashSet,
};

/// The sets of accounts that a bundle writes and reads.
///
/// Used when scheduling bundle validation: bundles whose sets are
/// pairwise disjoint can be validated in parallel against the same
/// committed state without changing the outcome, while the apply
/// order stays globally serialized.
#[derive(Debug)]
pub struct BundleRefs {
  reads: HashSet<Address>,
  writes: HashSet<Address>,
}

impl BundleRefs {
  pub fn new(bundle: &Bundle) -> Self {
    let mut reads = HashSet::new();
    let mut writes = HashSet::new();

    // an account that is both read and written belongs to the write
    // set, that is what matters for conflict detection
    for update in &bundle.updates {
      if update.mutates() {
        writes.insert(update.address);
      }
    }

    // updates that only carry preconditions are pure reads, like a
    // contract whose state another contract in the bundle consumes
    for update in &bundle.updates {
      if !writes.contains(&update.address) {
        reads.insert(update.address);
      }
    }

    Self { reads, writes }
  }

  pub fn reads(&self) -> impl Iterator<Item = &Address> {
    self.reads.iter()
  }

  pub fn writes(&self) -> impl Iterator<Item = &Address> {
    self.writes.iter()
  }

  /// Two bundles conflict when either one writes an account the
  /// other touches in any way.
  pub fn conflicts_with(&self, other: &BundleRefs) -> bool {
    self
      .writes
      .iter()
      .any(|addr| other.writes.contains(addr) || other.reads.contains(addr))
      || other
        .writes
        .iter()
        .any(|addr| self.reads.contains(addr))
  }
}
