mod account;
mod address;
mod b58;
mod bundle;
mod field;
mod permission;
mod precondition;
mod update;

pub use {
  account::{Account, NUM_SLOTS},
  address::Address,
  b58::ToBase58String,
  bundle::Bundle,
  field::FieldElement,
  permission::{Action, Auth, Permissions},
  precondition::{Precondition, Subject},
  update::{AccountUpdate, Authorization, ProofHandle},
};
