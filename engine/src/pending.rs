use {
  crate::{
    apply,
    store::{Ledger, Snapshot},
  },
  calyx_primitives::{
    Address,
    Auth,
    Authorization,
    Bundle,
    ProofHandle,
    ToBase58String,
  },
  ed25519_dalek::{Keypair, Signer},
  multihash::Multihash,
  tracing::debug,
};

/// A composed bundle waiting for its authorization artifacts.
///
/// This type owns the bundle across the asynchronous gap between
/// composing a transaction and applying it, while the external
/// prover or signer produces artifacts for the bundle's signing
/// hash. Dropping the value before `commit` cancels the transaction
/// with no ledger effect. Once `commit` starts, the apply is atomic
/// and can not be interrupted.
#[derive(Debug)]
pub struct PendingBundle {
  bundle: Bundle,
}

impl PendingBundle {
  pub fn new(bundle: Bundle) -> Self {
    Self { bundle }
  }

  /// The message external provers and signers must authorize.
  pub fn signing_hash(&self) -> &Multihash {
    self.bundle.signing_hash()
  }

  pub fn bundle(&self) -> &Bundle {
    &self.bundle
  }

  /// Attaches a signature over the signing hash to every update that
  /// is addressed to this keypair's public key and asked for
  /// signature authorization when it was built.
  pub fn sign(mut self, keypair: &Keypair) -> Self {
    let address = Address::from(keypair.public);
    let signature = keypair.sign(&self.bundle.signing_hash().to_bytes());

    for update in &mut self.bundle.updates {
      if update.address == address
        && update.authorization_kind == Auth::Signature
      {
        update.authorization = Authorization::Signature(signature);
      }
    }
    self
  }

  /// Attaches a prover artifact to every update addressed to
  /// `address` that asked for proof authorization when it was built.
  pub fn prove(mut self, address: Address, proof: ProofHandle) -> Self {
    for update in &mut self.bundle.updates {
      if update.address == address && update.authorization_kind == Auth::Proof
      {
        update.authorization = Authorization::Proof(proof.clone());
      }
    }
    self
  }

  /// Commits the bundle to the ledger, consuming it.
  pub fn commit(self, ledger: &Ledger) -> Result<Snapshot, apply::Error> {
    ledger.commit(&self.bundle)
  }

  /// Cancels the transaction before apply. Equivalent to dropping
  /// the value; the ledger is untouched.
  pub fn discard(self) {
    debug!(
      "bundle {} discarded before apply",
      self.bundle.signing_hash().to_b58()
    );
  }
}
