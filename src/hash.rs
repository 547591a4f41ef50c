//! Leaf and internal-node hashing with domain separation.
//!
//! Leaves are hashed as `H("leaf:" || payload)` and internal nodes as
//! `H("node:" || left || right)`. The distinct tags keep a leaf digest from ever
//! being accepted in place of an internal node.

use sha2::Digest as _;
use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use crate::error::{Error, Result};

pub const DIGEST_SIZE: usize = 32;

pub const LEAF_TAG: &[u8] = b"leaf:";
pub const NODE_TAG: &[u8] = b"node:";

/// Fixed-length output of the node hasher.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Digest([u8; DIGEST_SIZE]);

impl Digest {
  /// All-zero digest used to pad a level up to a power of two.
  pub const ZERO: Digest = Digest([0u8; DIGEST_SIZE]);

  pub const fn new(bytes: [u8; DIGEST_SIZE]) -> Self {
    Digest(bytes)
  }

  pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
    &self.0
  }

  /// Lowercase hexadecimal form, the external representation of a digest.
  pub fn to_hex(&self) -> String {
    hex::encode(self.0)
  }

  pub fn from_hex(s: &str) -> Result<Self> {
    let bytes = hex::decode(s).map_err(|e| Error::InvalidDigest(format!("{s:?}: {e}")))?;
    let bytes: [u8; DIGEST_SIZE] = bytes
      .try_into()
      .map_err(|b: Vec<u8>| Error::InvalidDigest(format!("expected {DIGEST_SIZE} bytes, got {}", b.len())))?;
    Ok(Digest(bytes))
  }
}

impl From<[u8; DIGEST_SIZE]> for Digest {
  fn from(bytes: [u8; DIGEST_SIZE]) -> Self {
    Digest(bytes)
  }
}

impl AsRef<[u8]> for Digest {
  fn as_ref(&self) -> &[u8] {
    &self.0
  }
}

impl Display for Digest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.to_hex())
  }
}

impl Debug for Digest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Digest({})", self.to_hex())
  }
}

impl FromStr for Digest {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Digest::from_hex(s)
  }
}

/// Hash primitive used for both leaves and internal nodes.
///
/// A tree and every proof derived from it must use the same implementation;
/// the roots of different hashers are unrelated.
pub trait NodeHasher: Send + Sync {
  fn name(&self) -> &'static str;

  /// Hash of a leaf payload, prefixed with [`LEAF_TAG`].
  fn hash_leaf(&self, payload: &[u8]) -> Digest;

  /// Hash of two encoded children, prefixed with [`NODE_TAG`]. The children are
  /// taken as raw bytes so that padding placeholders narrower than a digest can
  /// be fed in unchanged.
  fn hash_node(&self, left: &[u8], right: &[u8]) -> Digest;

  /// Hash of an internal node. Order matters: `left` is always hashed first.
  fn hash_internal(&self, left: &Digest, right: &Digest) -> Digest {
    self.hash_node(left.as_bytes(), right.as_bytes())
  }
}

/// SHA-256, the default primitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256;

impl NodeHasher for Sha256 {
  fn name(&self) -> &'static str {
    "sha256"
  }

  fn hash_leaf(&self, payload: &[u8]) -> Digest {
    let mut hasher = sha2::Sha256::new();
    hasher.update(LEAF_TAG);
    hasher.update(payload);
    Digest(hasher.finalize().into())
  }

  fn hash_node(&self, left: &[u8], right: &[u8]) -> Digest {
    let mut hasher = sha2::Sha256::new();
    hasher.update(NODE_TAG);
    hasher.update(left);
    hasher.update(right);
    Digest(hasher.finalize().into())
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3;

impl NodeHasher for Blake3 {
  fn name(&self) -> &'static str {
    "blake3"
  }

  fn hash_leaf(&self, payload: &[u8]) -> Digest {
    let mut hasher = blake3::Hasher::new();
    hasher.update(LEAF_TAG);
    hasher.update(payload);
    Digest(*hasher.finalize().as_bytes())
  }

  fn hash_node(&self, left: &[u8], right: &[u8]) -> Digest {
    let mut hasher = blake3::Hasher::new();
    hasher.update(NODE_TAG);
    hasher.update(left);
    hasher.update(right);
    Digest(*hasher.finalize().as_bytes())
  }
}

/// `hash_leaf` with the default [`Sha256`] primitive.
pub fn hash_leaf(payload: &[u8]) -> Digest {
  Sha256.hash_leaf(payload)
}

/// `hash_internal` with the default [`Sha256`] primitive.
pub fn hash_internal(left: &Digest, right: &Digest) -> Digest {
  Sha256.hash_internal(left, right)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn leaf_hash_matches_known_value() {
    // sha256("leaf:")
    assert_eq!("08679e383d66dbc4192bae473a37843066188e42635077349d1c7db7cf25b20c", hash_leaf(b"").to_hex());
    assert_eq!(
      "625527f217fa2b23eb296d7b108420f7f210473301a43eddfb24b00b6785b61a",
      hash_internal(&Digest::ZERO, &Digest::ZERO).to_hex()
    );
  }

  #[test]
  fn leaf_and_node_domains_are_separated() {
    let hashers: [&dyn NodeHasher; 2] = [&Sha256, &Blake3];
    for hasher in hashers {
      let a = hasher.hash_leaf(b"a");
      let b = hasher.hash_leaf(b"b");
      let node = hasher.hash_internal(&a, &b);

      // The same bytes hashed as a leaf must not collide with the node.
      let mut concat = a.as_bytes().to_vec();
      concat.extend_from_slice(b.as_bytes());
      assert_ne!(node, hasher.hash_leaf(&concat), "{}", hasher.name());
      assert_ne!(hasher.hash_leaf(b""), hasher.hash_node(b"", b""), "{}", hasher.name());
    }
  }

  #[test]
  fn internal_hash_is_order_sensitive() {
    let hashers: [&dyn NodeHasher; 2] = [&Sha256, &Blake3];
    for hasher in hashers {
      let a = hasher.hash_leaf(b"left");
      let b = hasher.hash_leaf(b"right");
      assert_ne!(hasher.hash_internal(&a, &b), hasher.hash_internal(&b, &a), "{}", hasher.name());
      assert_eq!(hasher.hash_internal(&a, &b), hasher.hash_node(a.as_bytes(), b.as_bytes()));
    }
  }

  #[test]
  fn hashers_disagree() {
    assert_ne!(Sha256.hash_leaf(b"x"), Blake3.hash_leaf(b"x"));
  }

  #[test]
  fn hex_representation() {
    let digest = hash_leaf(b"data item 0");
    let hex = digest.to_string();
    assert_eq!(64, hex.len());
    assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    assert_eq!(digest, hex.parse::<Digest>().unwrap());
    assert_eq!(digest, Digest::from_hex(&hex.to_uppercase()).unwrap());

    assert!(matches!("zz".parse::<Digest>(), Err(Error::InvalidDigest(_))));
    assert!(matches!("00ff".parse::<Digest>(), Err(Error::InvalidDigest(_))));
  }
}
