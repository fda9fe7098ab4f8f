use {
  crate::state::{State, StateDiff},
  calyx_primitives::{
    Account,
    AccountUpdate,
    Action,
    Address,
    Auth,
    Authorization,
    Bundle,
    Precondition,
    Subject,
  },
  ed25519_dalek::{PublicKey, Verifier},
  rayon::prelude::*,
  std::sync::atomic::{AtomicBool, Ordering},
  thiserror::Error,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
  #[error("Account {0} does not exist")]
  NotFound(Address),

  #[error(
    "Precondition on {subject} of account {address} failed against \
     committed state"
  )]
  PreconditionFailed { address: Address, subject: Subject },

  #[error(
    "Permission denied for {action} on account {address}: requires \
     {required:?}, update supplied {supplied:?}"
  )]
  PermissionDenied {
    address: Address,
    action: Action,
    required: Auth,
    supplied: Auth,
  },

  #[error(
    "Authorization artifact for account {0} does not verify against the \
     bundle's signing hash"
  )]
  BadAuthorization(Address),

  #[error(
    "Malformed boolean flag in a precondition on account {0}: the value is \
     neither 0 nor 1"
  )]
  MalformedFlag(Address),

  #[error("Slot index {index} is out of range for account {address}")]
  OutOfRangeSlot { address: Address, index: u8 },

  #[error("Validation cancelled by another failed update")]
  Cancelled,
}

/// Validates a bundle against committed state and produces the state
/// diff that applying it yields.
///
/// Nothing is mutated here. Every precondition recorded at build
/// time is re-evaluated against `state`; permissions are checked
/// against the pre-bundle permission sets, so a permission change
/// staged in the bundle never gates the bundle that carries it; and
/// authorization artifacts are checked against the bundle's signing
/// hash. Any failure rejects the whole bundle.
pub fn validate<S>(state: &S, bundle: &Bundle) -> Result<StateDiff, Error>
where
  S: State + Sync,
{
  // Updates are all validated against the same pre-bundle state, so
  // they are independent of each other and can be checked in
  // parallel. The first failure cancels the remaining checks.
  let cancelled = AtomicBool::new(false);
  bundle
    .updates
    .par_iter()
    .map(|update| {
      if cancelled.load(Ordering::Acquire) {
        return Err(Error::Cancelled);
      }
      let result = validate_update(state, bundle, update);
      if result.is_err() {
        cancelled.store(true, Ordering::Release);
      }
      result
    })
    .reduce_with(|a, b| match (a, b) {
      (Ok(()), Ok(())) => Ok(()),
      (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
      (Err(Error::Cancelled), Err(e)) => Err(e), // skip cancelled
      (Err(e), Err(_)) => Err(e),
    })
    .unwrap_or(Ok(()))?;

  fold(state, bundle)
}

fn validate_update(
  state: &impl State,
  bundle: &Bundle,
  update: &AccountUpdate,
) -> Result<(), Error> {
  let account = state
    .get(&update.address)
    .ok_or(Error::NotFound(update.address))?;

  for precondition in &update.preconditions {
    check_precondition(&account, update.address, precondition)?;
  }

  let supplied = update.authorization.kind();
  for action in update.implied_actions() {
    let required = account.permissions.required_for(action);
    if !required.admits(supplied) {
      return Err(Error::PermissionDenied {
        address: update.address,
        action,
        required,
        supplied,
      });
    }
  }

  verify_authorization(bundle, update)
}

/// Re-evaluates one recorded precondition against committed state.
///
/// A mismatch here, after the same check passed at build time, means
/// another bundle committed between snapshot capture and apply.
fn check_precondition(
  account: &Account,
  address: Address,
  precondition: &Precondition,
) -> Result<(), Error> {
  match precondition {
    Precondition::SlotEquals { index, expected } => {
      let actual = account.slot(*index).ok_or(Error::OutOfRangeSlot {
        address,
        index: *index,
      })?;
      if actual != expected {
        return Err(Error::PreconditionFailed {
          address,
          subject: Subject::Slot(*index),
        });
      }
    }
    Precondition::ProvedState { expected } => {
      let expected =
        expected.as_bool().ok_or(Error::MalformedFlag(address))?;
      if account.proved_state != expected {
        return Err(Error::PreconditionFailed {
          address,
          subject: Subject::ProvedState,
        });
      }
    }
  }
  Ok(())
}

/// Checks that the artifact attached to an update actually authorizes
/// this bundle.
///
/// A signature must verify over the bundle's signing hash under the
/// account's ed25519 key; a proof handle must claim that same hash.
/// Proof internals are the proving system's concern and are never
/// inspected here.
fn verify_authorization(
  bundle: &Bundle,
  update: &AccountUpdate,
) -> Result<(), Error> {
  match &update.authorization {
    Authorization::Unauthorized => Ok(()),
    Authorization::Signature(signature) => {
      let key = PublicKey::from_bytes(update.address.as_ref())
        .map_err(|_| Error::BadAuthorization(update.address))?;
      key
        .verify(&bundle.signing_hash().to_bytes(), signature)
        .map_err(|_| Error::BadAuthorization(update.address))
    }
    Authorization::Proof(handle) => {
      if handle.claim() != bundle.signing_hash() {
        return Err(Error::BadAuthorization(update.address));
      }
      Ok(())
    }
  }
}

/// Folds a validated bundle into a single state diff, in update
/// order.
///
/// Slot writes land first with later updates winning on the same
/// slot, permission changes land last, and each applied update bumps
/// its account's nonce. The proved-state flag follows the
/// authorization of the last mutating update: true after a proven
/// mutation, false after any other.
fn fold(state: &impl State, bundle: &Bundle) -> Result<StateDiff, Error> {
  let mut diff = StateDiff::default();

  for update in &bundle.updates {
    let mut account = diff
      .get(&update.address)
      .or_else(|| state.get(&update.address))
      .ok_or(Error::NotFound(update.address))?;

    for (&index, &value) in &update.writes {
      *account
        .slots
        .get_mut(index as usize)
        .ok_or(Error::OutOfRangeSlot {
          address: update.address,
          index,
        })? = value;
    }

    if update.mutates() {
      account.proved_state =
        matches!(update.authorization, Authorization::Proof(_));
    }
    account.nonce += 1;
    diff.set(update.address, account);
  }

  // permission changes apply last, after every slot write in the
  // bundle; they were validated against pre-bundle permissions
  for update in &bundle.updates {
    if let Some(permissions) = update.new_permissions {
      let mut account = diff
        .get(&update.address)
        .expect("every update folded an account record above");
      account.permissions = permissions;
      diff.set(update.address, account);
    }
  }

  Ok(diff)
}
