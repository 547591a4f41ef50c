use crate::hash::Digest;
use crate::proof::Proof;

pub mod binary;

/// Core hash tree abstraction
pub trait HashTree {
  type Error;

  /// Get the number of leaf nodes
  fn size(&self) -> u64;

  /// Number of levels above the leaves
  fn height(&self) -> u32;

  /// Get the root hash
  fn root_hash(&self) -> Result<Digest, Self::Error>;

  /// Generate an inclusion proof for the leaf at the given position
  fn generate_proof(&self, position: u64) -> Result<Proof, Self::Error>;
}
