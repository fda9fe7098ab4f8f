mod common;

use {
  calyx_engine::{compose, ApplyError, Ledger, PendingBundle, UpdateBuilder},
  calyx_primitives::{
    Action,
    Address,
    Auth,
    Authorization,
    FieldElement,
    Permissions,
  },
  common::NUM_SLOT,
  ed25519_dalek::Signer,
};

#[test]
fn proof_gated_write_without_artifact_is_denied() -> anyhow::Result<()> {
  let keypair = common::generate_keypair();
  let address = Address::from(keypair.public);

  let mut ledger = Ledger::new();
  common::install_app(&mut ledger, &keypair, 1)?;
  let version = ledger.version();

  let mut builder = UpdateBuilder::open(&ledger.snapshot(), address)?;
  builder.write_slot(NUM_SLOT, FieldElement::from(9))?;
  let bundle = compose(vec![builder.close()])?;

  // submitted without proving or signing anything
  let err = ledger.commit(&bundle).unwrap_err();
  assert_eq!(err, ApplyError::PermissionDenied {
    address,
    action: Action::EditState,
    required: Auth::Proof,
    supplied: Auth::None,
  });

  // the rejection left the store untouched
  assert_eq!(ledger.version(), version);
  assert_eq!(
    *ledger.get(&address).unwrap().slot(NUM_SLOT).unwrap(),
    FieldElement::from(1)
  );
  Ok(())
}

#[test]
fn signature_does_not_satisfy_a_proof_requirement() -> anyhow::Result<()> {
  let keypair = common::generate_keypair();
  let address = Address::from(keypair.public);

  let mut ledger = Ledger::new();
  common::install_app(&mut ledger, &keypair, 1)?;

  let mut builder = UpdateBuilder::open(&ledger.snapshot(), address)?;
  builder.require_signature();
  builder.write_slot(NUM_SLOT, FieldElement::from(9))?;

  let pending =
    PendingBundle::new(compose(vec![builder.close()])?).sign(&keypair);

  let err = pending.commit(&ledger).unwrap_err();
  assert_eq!(err, ApplyError::PermissionDenied {
    address,
    action: Action::EditState,
    required: Auth::Proof,
    supplied: Auth::Signature,
  });
  Ok(())
}

#[test]
fn foreign_signature_fails_verification() -> anyhow::Result<()> {
  let keypair = common::generate_keypair();
  let address = Address::from(keypair.public);
  let intruder = common::generate_keypair();

  let mut ledger = Ledger::new();
  common::seed(&mut ledger, address);

  let mut builder = UpdateBuilder::open(&ledger.snapshot(), address)?;
  builder.require_signature();
  builder.set_permissions(Permissions::proof_only());

  // a signature by the wrong key, forced onto the update
  let mut forged = compose(vec![builder.close()])?;
  let message = forged.signing_hash().to_bytes();
  forged.updates[0].authorization =
    Authorization::Signature(intruder.sign(&message));

  let err = ledger.commit(&forged).unwrap_err();
  assert_eq!(err, ApplyError::BadAuthorization(address));
  Ok(())
}

#[test]
fn old_permissions_gate_their_own_bundle() -> anyhow::Result<()> {
  let keypair = common::generate_keypair();
  let address = Address::from(keypair.public);

  let mut ledger = Ledger::new();
  common::seed(&mut ledger, address);

  // two permission changes in one bundle, both signature-authorized.
  // both validate against the pre-bundle permission set even though
  // the first one, once applied, would require a proof.
  let snapshot = ledger.snapshot();

  let mut first = UpdateBuilder::open(&snapshot, address)?;
  first.require_signature();
  first.set_permissions(Permissions::proof_only());

  let mut second = UpdateBuilder::open(&snapshot, address)?;
  second.require_signature();
  second.set_permissions(Permissions::signature_only());

  let pending = common::finalize(vec![first.close(), second.close()], &[
    &keypair,
  ])?;
  pending.commit(&ledger)?;

  // permission changes applied in order, the later one wins
  let account = ledger.get(&address).unwrap();
  assert_eq!(account.permissions, Permissions::signature_only());
  Ok(())
}

#[test]
fn permission_changes_gate_later_bundles() -> anyhow::Result<()> {
  let keypair = common::generate_keypair();
  let address = Address::from(keypair.public);

  let mut ledger = Ledger::new();
  common::seed(&mut ledger, address);

  let mut deploy = UpdateBuilder::open(&ledger.snapshot(), address)?;
  deploy.require_signature();
  deploy.set_permissions(Permissions::proof_only());
  common::finalize(vec![deploy.close()], &[&keypair])?.commit(&ledger)?;

  // reconfiguring permissions now requires a proof, a signature is
  // no longer enough
  let mut revert = UpdateBuilder::open(&ledger.snapshot(), address)?;
  revert.require_signature();
  revert.set_permissions(Permissions::signature_only());

  let err = common::finalize(vec![revert.close()], &[&keypair])?
    .commit(&ledger)
    .unwrap_err();
  assert_eq!(err, ApplyError::PermissionDenied {
    address,
    action: Action::SetPermissions,
    required: Auth::Proof,
    supplied: Auth::Signature,
  });
  Ok(())
}

#[test]
fn open_permission_needs_no_artifact_and_impossible_denies_all(
) -> anyhow::Result<()> {
  let keypair = common::generate_keypair();
  let address = Address::from(keypair.public);

  let mut ledger = Ledger::new();
  common::seed_with(&mut ledger, address, Permissions {
    edit_state: Auth::None,
    set_permissions: Auth::Impossible,
  });

  // an unauthorized write is fine under an open edit permission
  let mut write = UpdateBuilder::open(&ledger.snapshot(), address)?;
  write.write_slot(NUM_SLOT, FieldElement::from(3))?;
  let mut update = write.close();
  update.authorization_kind = Auth::None;
  ledger.commit(&compose(vec![update])?)?;
  assert_eq!(
    *ledger.get(&address).unwrap().slot(NUM_SLOT).unwrap(),
    FieldElement::from(3)
  );

  // while no artifact whatsoever can change the permission set
  let mut reconfigure = UpdateBuilder::open(&ledger.snapshot(), address)?;
  reconfigure.require_signature();
  reconfigure.set_permissions(Permissions::signature_only());

  let err = common::finalize(vec![reconfigure.close()], &[&keypair])?
    .commit(&ledger)
    .unwrap_err();
  assert_eq!(err, ApplyError::PermissionDenied {
    address,
    action: Action::SetPermissions,
    required: Auth::Impossible,
    supplied: Auth::Signature,
  });
  Ok(())
}
