use {
  crate::store::Snapshot,
  calyx_primitives::{
    Account,
    AccountUpdate,
    Address,
    Auth,
    Authorization,
    FieldElement,
    Permissions,
    Precondition,
    Subject,
    NUM_SLOTS,
  },
  std::collections::BTreeMap,
  thiserror::Error,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
  #[error("Account {0} does not exist in the snapshot")]
  NotFound(Address),

  #[error(
    "Stale precondition on {subject} of account {address}: expected \
     {expected}, snapshot holds {actual}"
  )]
  StalePrecondition {
    address: Address,
    subject: Subject,
    expected: FieldElement,
    actual: FieldElement,
  },

  #[error("Slot index {index} is out of range for account {address}")]
  OutOfRangeSlot { address: Address, index: u8 },
}

/// Stages the mutations of one account while a transaction body runs.
///
/// Every read goes through the snapshot the builder was opened with.
/// Nothing staged here, or in a sibling builder of the same
/// transaction, is visible to any read until the composed bundle
/// commits. Failing calls abort only this builder; sibling builders
/// of the same transaction are unaffected.
#[derive(Debug)]
pub struct UpdateBuilder {
  address: Address,
  snapshot_version: u64,
  account: Account,
  authorization_kind: Auth,
  preconditions: Vec<Precondition>,
  writes: BTreeMap<u8, FieldElement>,
  new_permissions: Option<Permissions>,
}

impl UpdateBuilder {
  /// Opens a builder for an account that exists in the snapshot.
  ///
  /// The update defaults to proof authorization, the kind contract
  /// methods run under. Deployment-style updates switch to signature
  /// authorization with `require_signature`.
  pub fn open(snapshot: &Snapshot, address: Address) -> Result<Self, Error> {
    let account = snapshot
      .get(&address)
      .cloned()
      .ok_or(Error::NotFound(address))?;

    Ok(Self {
      address,
      snapshot_version: snapshot.version(),
      account,
      authorization_kind: Auth::Proof,
      preconditions: Vec::new(),
      writes: BTreeMap::new(),
      new_permissions: None,
    })
  }

  pub fn address(&self) -> Address {
    self.address
  }

  /// Reads a slot value as of the snapshot. Staged writes, including
  /// this builder's own, are never visible through reads.
  pub fn slot(&self, index: u8) -> Result<FieldElement, Error> {
    self
      .account
      .slot(index)
      .copied()
      .ok_or(Error::OutOfRangeSlot {
        address: self.address,
        index,
      })
  }

  pub fn proved_state(&self) -> bool {
    self.account.proved_state
  }

  pub fn permissions(&self) -> &Permissions {
    &self.account.permissions
  }

  pub fn nonce(&self) -> u64 {
    self.account.nonce
  }

  /// Records an equality precondition on a slot and checks it
  /// immediately against the snapshot.
  ///
  /// The immediate check catches logic errors against the builder's
  /// own snapshot. The applier re-checks the recorded precondition
  /// against committed state at apply time, which catches a bundle
  /// that another commit has raced between snapshot capture and
  /// apply.
  pub fn require_slot(
    &mut self,
    index: u8,
    expected: FieldElement,
  ) -> Result<(), Error> {
    let actual = self.slot(index)?;
    if actual != expected {
      return Err(Error::StalePrecondition {
        address: self.address,
        subject: Subject::Slot(index),
        expected,
        actual,
      });
    }
    self
      .preconditions
      .push(Precondition::SlotEquals { index, expected });
    Ok(())
  }

  /// Records a precondition that the account's proved-state flag
  /// equals `expected` and checks it against the snapshot.
  pub fn require_proved(&mut self, expected: bool) -> Result<(), Error> {
    let actual = self.account.proved_state;
    if actual != expected {
      return Err(Error::StalePrecondition {
        address: self.address,
        subject: Subject::ProvedState,
        expected: FieldElement::from_bool(expected),
        actual: FieldElement::from_bool(actual),
      });
    }
    self.preconditions.push(Precondition::ProvedState {
      expected: FieldElement::from_bool(expected),
    });
    Ok(())
  }

  /// Asserts that the proved-state flag holds the given value.
  ///
  /// Shorthand for the require-then-assert pair contract methods
  /// open with; the boolean is lowered to a single recorded
  /// field-equality precondition.
  pub fn assert_proved(&mut self, expected: bool) -> Result<(), Error> {
    self.require_proved(expected)
  }

  /// Stages a slot write. Not observable through any read until the
  /// bundle commits.
  pub fn write_slot(
    &mut self,
    index: u8,
    value: FieldElement,
  ) -> Result<(), Error> {
    if index as usize >= NUM_SLOTS {
      return Err(Error::OutOfRangeSlot {
        address: self.address,
        index,
      });
    }
    self.writes.insert(index, value);
    Ok(())
  }

  /// Stages a replacement of the account's permission set. Applied
  /// after all slot writes in the bundle and validated against the
  /// pre-bundle permissions.
  pub fn set_permissions(&mut self, permissions: Permissions) {
    self.new_permissions = Some(permissions);
  }

  /// Marks the update for signature authorization instead of the
  /// default proof authorization.
  pub fn require_signature(&mut self) {
    self.authorization_kind = Auth::Signature;
  }

  /// Consumes the builder into a closed account update, ready to be
  /// composed into a bundle.
  pub fn close(self) -> AccountUpdate {
    AccountUpdate {
      address: self.address,
      snapshot_version: self.snapshot_version,
      authorization_kind: self.authorization_kind,
      preconditions: self.preconditions,
      writes: self.writes,
      new_permissions: self.new_permissions,
      authorization: Authorization::Unauthorized,
    }
  }
}
