use {
  calyx_engine::{
    compose,
    Ledger,
    PendingBundle,
    Snapshot,
    State,
    StateDiff,
    UpdateBuilder,
  },
  calyx_primitives::{
    Account,
    AccountUpdate,
    Address,
    FieldElement,
    Permissions,
    ProofHandle,
  },
  ed25519_dalek::Keypair,
};

/// Slot holding a contract's counter value.
pub const NUM_SLOT: u8 = 0;

/// Slot counting how many times the contract's methods ran.
pub const CALLS_SLOT: u8 = 1;

pub fn generate_keypair() -> Keypair {
  Keypair::generate(&mut rand::thread_rng())
}

/// Seeds a fresh application account under the default permission
/// profile, the way the bootstrap harness funds new accounts before
/// any transaction is built.
pub fn seed(ledger: &mut Ledger, address: Address) {
  seed_with(ledger, address, Permissions::default());
}

pub fn seed_with(
  ledger: &mut Ledger,
  address: Address,
  permissions: Permissions,
) {
  let mut diff = StateDiff::default();
  diff.set(address, Account::new(permissions));
  ledger.apply(diff);
}

/// Builds the deploy + init updates of the counter app. Deployment
/// tightens permissions to proof-only under the account's signature;
/// initialization asserts the state was never proven yet and writes
/// the initial counter values under proof.
pub fn deploy_and_init_updates(
  snapshot: &Snapshot,
  address: Address,
  initial_num: u64,
) -> anyhow::Result<Vec<AccountUpdate>> {
  let mut deploy = UpdateBuilder::open(snapshot, address)?;
  deploy.require_signature();
  deploy.set_permissions(Permissions::proof_only());

  let mut init = UpdateBuilder::open(snapshot, address)?;
  init.assert_proved(false)?;
  init.write_slot(NUM_SLOT, FieldElement::from(initial_num))?;
  init.write_slot(CALLS_SLOT, FieldElement::zero())?;

  Ok(vec![deploy.close(), init.close()])
}

/// Builds the add(increment) transaction: the `add` method bumps the
/// counter and then `increment_calls` bumps the call counter, two
/// composing updates against the same account.
pub fn add_updates(
  snapshot: &Snapshot,
  address: Address,
  increment: u64,
) -> anyhow::Result<Vec<AccountUpdate>> {
  let mut add = UpdateBuilder::open(snapshot, address)?;
  add.assert_proved(true)?;
  let num = add.slot(NUM_SLOT)?;
  add.require_slot(NUM_SLOT, num)?;
  add.write_slot(NUM_SLOT, num + FieldElement::from(increment))?;

  Ok(vec![add.close(), increment_calls_update(snapshot, address)?])
}

/// The `increment_calls` method as its own account update.
pub fn increment_calls_update(
  snapshot: &Snapshot,
  address: Address,
) -> anyhow::Result<AccountUpdate> {
  let mut builder = UpdateBuilder::open(snapshot, address)?;
  builder.assert_proved(true)?;
  let calls = builder.slot(CALLS_SLOT)?;
  builder.require_slot(CALLS_SLOT, calls)?;
  builder.write_slot(CALLS_SLOT, calls + FieldElement::one())?;
  Ok(builder.close())
}

/// Prove-then-sign finalization of a composed transaction: every
/// proof-authorized update gets an artifact attesting the bundle's
/// signing hash, then every signer signs the updates addressed to
/// its key.
pub fn finalize(
  updates: Vec<AccountUpdate>,
  signers: &[&Keypair],
) -> anyhow::Result<PendingBundle> {
  let bundle = compose(updates)?;
  let mut pending = PendingBundle::new(bundle);

  let proof = ProofHandle::attesting(*pending.signing_hash());
  let addresses: Vec<_> = pending.bundle().addresses().copied().collect();
  for address in addresses {
    pending = pending.prove(address, proof.clone());
  }
  for signer in signers {
    pending = pending.sign(signer);
  }
  Ok(pending)
}

/// Seeds, deploys and initializes a counter app account, returning
/// the ledger state right after deployment.
pub fn install_app(
  ledger: &mut Ledger,
  keypair: &Keypair,
  initial_num: u64,
) -> anyhow::Result<Snapshot> {
  let address = Address::from(keypair.public);
  seed(ledger, address);

  let snapshot = ledger.snapshot();
  let updates = deploy_and_init_updates(&snapshot, address, initial_num)?;
  let pending = finalize(updates, &[keypair])?;
  Ok(pending.commit(ledger)?)
}
