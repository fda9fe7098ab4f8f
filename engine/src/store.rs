use {
  crate::{
    apply,
    schedule::BundleRefs,
    state::{State, StateDiff},
  },
  calyx_primitives::{Account, Address, Bundle, ToBase58String},
  parking_lot::{Mutex, RwLock},
  rayon::prelude::*,
  std::collections::BTreeMap,
  tracing::debug,
};

/// Immutable view of the ledger at the version it was captured.
///
/// Every read made while a transaction is being built comes from one
/// snapshot, never from writes staged by the transaction itself or
/// by sibling builders. A nested contract call later in the same
/// transaction therefore still observes the pre-transaction value of
/// every account.
#[derive(Debug, Clone)]
pub struct Snapshot {
  version: u64,
  accounts: BTreeMap<Address, Account>,
}

impl Snapshot {
  pub fn version(&self) -> u64 {
    self.version
  }

  pub fn get(&self, address: &Address) -> Option<&Account> {
    self.accounts.get(address)
  }
}

#[derive(Debug, Default)]
struct Committed {
  accounts: BTreeMap<Address, Account>,
  version: u64,
}

impl Committed {
  fn snapshot(&self) -> Snapshot {
    Snapshot {
      version: self.version,
      accounts: self.accounts.clone(),
    }
  }
}

impl State for Committed {
  fn get(&self, address: &Address) -> Option<Account> {
    self.accounts.get(address).cloned()
  }

  fn apply(&mut self, diff: StateDiff) {
    for (addr, acc) in diff.iter() {
      self.accounts.insert(*addr, acc.clone());
    }
  }
}

/// The committed account state shared by all transaction builds.
///
/// This is the only shared mutable resource in the engine. All
/// checked mutation goes through `commit`, which validates a bundle
/// against the current committed state and applies it atomically in
/// a single global apply order. Readers and snapshot capture never
/// block on in-flight builds, only on an in-flight apply.
#[derive(Debug, Default)]
pub struct Ledger {
  committed: RwLock<Committed>,

  /// Serializes validate-then-apply critical sections across
  /// commits. Two bundles touching the same account must not race
  /// between their precondition checks and their writes.
  apply_lock: Mutex<()>,
}

impl Ledger {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, address: &Address) -> Option<Account> {
    self.committed.read().get(address)
  }

  pub fn version(&self) -> u64 {
    self.committed.read().version
  }

  /// Captures an immutable snapshot of the committed state for a
  /// transaction build to read from.
  pub fn snapshot(&self) -> Snapshot {
    self.committed.read().snapshot()
  }

  /// Validates a bundle against the current committed state and
  /// applies it, advancing the ledger version.
  ///
  /// Validation and apply form one critical section, so a concurrent
  /// commit can not invalidate this bundle's preconditions between
  /// the two steps. Either every update in the bundle is applied or
  /// none are.
  pub fn commit(&self, bundle: &Bundle) -> Result<Snapshot, apply::Error> {
    let _guard = self.apply_lock.lock();
    self.commit_under_lock(bundle)
  }

  /// Commits a sequence of bundles in submission order.
  ///
  /// Consecutive bundles whose read/write account sets are pairwise
  /// disjoint are validated in parallel against the same committed
  /// state; every bundle still applies at its submission position,
  /// preserving the single global apply order.
  pub fn commit_many(
    &self,
    bundles: Vec<Bundle>,
  ) -> Vec<Result<Snapshot, apply::Error>> {
    let _guard = self.apply_lock.lock();

    let mut results = Vec::with_capacity(bundles.len());
    let mut batch = Vec::new();
    let mut batch_refs: Vec<BundleRefs> = Vec::new();

    for bundle in bundles {
      let refs = BundleRefs::new(&bundle);
      if batch_refs.iter().any(|prior| prior.conflicts_with(&refs)) {
        results.extend(self.commit_batch(std::mem::take(&mut batch)));
        batch_refs.clear();
      }
      batch_refs.push(refs);
      batch.push(bundle);
    }
    results.extend(self.commit_batch(batch));
    results
  }

  fn commit_under_lock(
    &self,
    bundle: &Bundle,
  ) -> Result<Snapshot, apply::Error> {
    let validated = {
      let committed = self.committed.read();
      apply::validate(&*committed, bundle)
    };

    let diff = match validated {
      Ok(diff) => diff,
      Err(e) => {
        debug!("bundle {} rejected: {e}", bundle.signing_hash().to_b58());
        return Err(e);
      }
    };

    let mut committed = self.committed.write();
    committed.apply(diff);
    committed.version += 1;
    debug!(
      "bundle {} applied at version {}",
      bundle.signing_hash().to_b58(),
      committed.version
    );
    Ok(committed.snapshot())
  }

  /// Validates a batch of pairwise disjoint bundles in parallel,
  /// then applies the surviving diffs serially in batch order.
  fn commit_batch(
    &self,
    batch: Vec<Bundle>,
  ) -> Vec<Result<Snapshot, apply::Error>> {
    let validated: Vec<_> = {
      let committed = self.committed.read();
      let state = &*committed;
      batch
        .par_iter()
        .map(|bundle| apply::validate(state, bundle))
        .collect()
    };

    batch
      .iter()
      .zip(validated)
      .map(|(bundle, result)| match result {
        Ok(diff) => {
          let mut committed = self.committed.write();
          committed.apply(diff);
          committed.version += 1;
          debug!(
            "bundle {} applied at version {}",
            bundle.signing_hash().to_b58(),
            committed.version
          );
          Ok(committed.snapshot())
        }
        Err(e) => {
          debug!("bundle {} rejected: {e}", bundle.signing_hash().to_b58());
          Err(e)
        }
      })
      .collect()
  }
}

impl State for Ledger {
  fn get(&self, address: &Address) -> Option<Account> {
    self.committed.read().get(address)
  }

  /// Unchecked mutation path used by the bootstrap harness to seed
  /// genesis accounts. Committed bundles go through `commit`.
  fn apply(&mut self, diff: StateDiff) {
    let mut committed = self.committed.write();
    committed.apply(diff);
    committed.version += 1;
  }
}
