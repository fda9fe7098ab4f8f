use {
  crate::{b58::ToBase58String, AccountUpdate, Address},
  multihash::{Hasher, Multihash, MultihashDigest, Sha3_256},
  once_cell::sync::OnceCell,
  serde::{Deserialize, Serialize},
  std::fmt::Debug,
};

/// An ordered sequence of account updates forming one atomic
/// transaction.
///
/// The order is the order in which the updates were composed and is
/// preserved through apply, so replaying a bundle is deterministic.
/// A bundle either applies in full or is rejected in full; partially
/// applied bundles are never observable.
#[derive(Clone, Serialize, Deserialize)]
pub struct Bundle {
  pub updates: Vec<AccountUpdate>,

  #[serde(skip)]
  signing_hash_cache: OnceCell<Multihash>,
}

impl Bundle {
  pub fn new(updates: Vec<AccountUpdate>) -> Self {
    Self {
      updates,
      signing_hash_cache: OnceCell::new(),
    }
  }

  /// Accounts targeted by this bundle, in update order.
  pub fn addresses(&self) -> impl Iterator<Item = &Address> {
    self.updates.iter().map(|update| &update.address)
  }

  /// Hash of the bundle contents without authorization artifacts.
  ///
  /// This is the message that signatures sign and proof artifacts
  /// attest to, so it must be identical before and after the
  /// artifacts are attached.
  pub fn signing_hash(&self) -> &Multihash {
    self.signing_hash_cache.get_or_init(|| {
      let mut hasher = Sha3_256::default();
      for update in &self.updates {
        hasher.update(&rmp_serde::to_vec(&update.address).unwrap());
        hasher.update(&rmp_serde::to_vec(&update.snapshot_version).unwrap());
        hasher.update(&rmp_serde::to_vec(&update.authorization_kind).unwrap());
        hasher.update(&rmp_serde::to_vec(&update.preconditions).unwrap());
        hasher.update(&rmp_serde::to_vec(&update.writes).unwrap());
        hasher.update(&rmp_serde::to_vec(&update.new_permissions).unwrap());
      }
      multihash::Code::Sha3_256.wrap(hasher.finalize()).unwrap()
    })
  }
}

impl Debug for Bundle {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Bundle")
      .field("updates", &self.updates)
      .field("hash", &self.signing_hash().to_b58())
      .finish()
  }
}
