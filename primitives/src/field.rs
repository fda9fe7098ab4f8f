use {
  curve25519_dalek::scalar::Scalar,
  serde::{Deserialize, Serialize},
  std::{
    fmt::{Debug, Display},
    ops::{Add, Mul, Sub},
  },
};

/// An element of the prime field that account state slots are made of.
///
/// Values are integers modulo the field prime. All arithmetic wraps
/// around the prime and never traps, so contracts can freely add and
/// multiply slot values without overflow checks.
#[derive(Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldElement(Scalar);

impl FieldElement {
  pub fn zero() -> Self {
    Self(Scalar::zero())
  }

  pub fn one() -> Self {
    Self(Scalar::one())
  }

  /// Reduces an arbitrary 32-byte little-endian integer into the field.
  pub fn from_bytes_mod_order(bytes: [u8; 32]) -> Self {
    Self(Scalar::from_bytes_mod_order(bytes))
  }

  pub fn to_bytes(&self) -> [u8; 32] {
    self.0.to_bytes()
  }

  /// Lowers a boolean into the field as 0 or 1.
  pub fn from_bool(value: bool) -> Self {
    match value {
      true => Self::one(),
      false => Self::zero(),
    }
  }

  /// Interprets the value as a boolean.
  ///
  /// Only exactly zero and exactly one carry a boolean meaning. Any
  /// other field element yields `None` and is treated by callers as a
  /// malformed flag, which is a different failure than a flag that
  /// holds the wrong boolean.
  pub fn as_bool(&self) -> Option<bool> {
    if self.0 == Scalar::zero() {
      Some(false)
    } else if self.0 == Scalar::one() {
      Some(true)
    } else {
      None
    }
  }
}

impl From<u64> for FieldElement {
  fn from(value: u64) -> Self {
    Self(Scalar::from(value))
  }
}

impl Default for FieldElement {
  fn default() -> Self {
    Self::zero()
  }
}

impl Add for FieldElement {
  type Output = Self;

  fn add(self, rhs: Self) -> Self {
    Self(self.0 + rhs.0)
  }
}

impl Sub for FieldElement {
  type Output = Self;

  fn sub(self, rhs: Self) -> Self {
    Self(self.0 - rhs.0)
  }
}

impl Mul for FieldElement {
  type Output = Self;

  fn mul(self, rhs: Self) -> Self {
    Self(self.0 * rhs.0)
  }
}

impl Display for FieldElement {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", hex::encode(self.to_bytes()))
  }
}

impl Debug for FieldElement {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "field({})", hex::encode(self.to_bytes()))
  }
}
