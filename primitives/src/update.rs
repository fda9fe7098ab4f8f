use {
  crate::{Action, Address, Auth, FieldElement, Permissions, Precondition},
  multihash::Multihash,
  serde::{Deserialize, Serialize},
  std::collections::BTreeMap,
};

/// Authorization artifact carried by an account update.
///
/// Signatures authorize on behalf of the account's ed25519 key.
/// Proofs are opaque artifacts produced by the external proving
/// system; the engine only ever checks what an artifact claims to
/// authorize, never its internals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Authorization {
  Unauthorized,
  Signature(ed25519_dalek::Signature),
  Proof(ProofHandle),
}

impl Authorization {
  /// The requirement kind an artifact of this shape can satisfy.
  pub fn kind(&self) -> Auth {
    match self {
      Authorization::Unauthorized => Auth::None,
      Authorization::Signature(_) => Auth::Signature,
      Authorization::Proof(_) => Auth::Proof,
    }
  }
}

impl Default for Authorization {
  fn default() -> Self {
    Self::Unauthorized
  }
}

/// Opaque handle to a proof produced by the external proving system.
///
/// The handle binds the proof to the hash of the bundle contents it
/// was produced for. Verifying the proof itself is the proving
/// system's job; the applier checks only this binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofHandle {
  claim: Multihash,
}

impl ProofHandle {
  pub fn attesting(claim: Multihash) -> Self {
    Self { claim }
  }

  pub fn claim(&self) -> &Multihash {
    &self.claim
  }
}

/// Staged mutations of a single account, produced by one contract
/// method invocation against a snapshot.
///
/// A transaction may contain several updates for the same account,
/// one per method call. They compose in bundle order rather than
/// overwrite each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountUpdate {
  pub address: Address,

  /// Version of the snapshot this update's preconditions were
  /// checked against when it was built.
  pub snapshot_version: u64,

  /// The authorization kind this update intends to be finalized
  /// with. Contract methods run under proof, deployment-style
  /// updates under the account's signature.
  pub authorization_kind: Auth,

  /// Checks re-evaluated by the applier against committed state.
  pub preconditions: Vec<Precondition>,

  /// Proposed slot writes. When several updates in a bundle write
  /// the same slot, the later update wins.
  pub writes: BTreeMap<u8, FieldElement>,

  /// Proposed replacement of the permission set. Applied after all
  /// slot writes in the bundle and always validated against the
  /// pre-bundle permissions.
  pub new_permissions: Option<Permissions>,

  /// Artifact attached during transaction finalization. Not part of
  /// the bundle's signing hash.
  pub authorization: Authorization,
}

impl AccountUpdate {
  /// Actions that applying this update implies, derived from its
  /// contents.
  pub fn implied_actions(&self) -> impl Iterator<Item = Action> + '_ {
    let edits = (!self.writes.is_empty()).then_some(Action::EditState);
    let perms = self
      .new_permissions
      .is_some()
      .then_some(Action::SetPermissions);
    edits.into_iter().chain(perms)
  }

  /// Whether applying this update mutates the account at all.
  pub fn mutates(&self) -> bool {
    !self.writes.is_empty() || self.new_permissions.is_some()
  }
}
