use {
  serde::{Deserialize, Serialize},
  std::fmt::Display,
};

/// The kind of authorization that must accompany an account update
/// for a given action to be accepted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Auth {
  /// The action needs no authorization artifact at all.
  None,

  /// The action must carry a signature by the account's key.
  Signature,

  /// The action must carry a proof artifact.
  Proof,

  /// The action can never be performed.
  Impossible,
}

impl Auth {
  /// Whether an artifact of the supplied kind meets this requirement.
  ///
  /// Signature and proof requirements are exact: a signature never
  /// stands in for a proof and vice versa.
  pub fn admits(self, supplied: Auth) -> bool {
    match self {
      Auth::None => true,
      Auth::Signature => supplied == Auth::Signature,
      Auth::Proof => supplied == Auth::Proof,
      Auth::Impossible => false,
    }
  }
}

/// Actions implied by the contents of an account update.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
  /// Writing to one or more state slots.
  EditState,

  /// Replacing the account's permission set.
  SetPermissions,
}

impl Display for Action {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Action::EditState => write!(f, "edit-state"),
      Action::SetPermissions => write!(f, "set-permissions"),
    }
  }
}

/// Per-account map from action to the authorization kind it requires.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
  pub edit_state: Auth,
  pub set_permissions: Auth,
}

impl Permissions {
  /// Locks every action behind a proof. Application accounts switch
  /// to this profile at deploy time so that only proven transitions
  /// can touch them afterwards.
  pub fn proof_only() -> Self {
    Self {
      edit_state: Auth::Proof,
      set_permissions: Auth::Proof,
    }
  }

  /// Profile for externally owned accounts, every action authorized
  /// by the account's own signature.
  pub fn signature_only() -> Self {
    Self {
      edit_state: Auth::Signature,
      set_permissions: Auth::Signature,
    }
  }

  pub fn required_for(&self, action: Action) -> Auth {
    match action {
      Action::EditState => self.edit_state,
      Action::SetPermissions => self.set_permissions,
    }
  }
}

impl Default for Permissions {
  /// The profile freshly seeded application accounts start with:
  /// state is writable only by proof, while the account's key may
  /// still reconfigure permissions during deployment.
  fn default() -> Self {
    Self {
      edit_state: Auth::Proof,
      set_permissions: Auth::Signature,
    }
  }
}
