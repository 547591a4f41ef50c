//! Binary Merkle hash trees with single-leaf inclusion proofs.
//!
//! The tree is never stored: [`build_root`] and [`generate_proof`] fold the leaves
//! level by level and keep only what they return. [`verify_proof`] recomputes a
//! root from a [`Proof`] alone; the caller accepts the proof only if that root is
//! equal to a root it already trusts.

pub mod config;
pub mod error;
pub mod hash;
pub mod hashtree;
pub mod proof;

pub use config::{Padding, TreeOptions};
pub use error::{Error, Result};
pub use hash::{Blake3, DIGEST_SIZE, Digest, NodeHasher, Sha256, hash_internal, hash_leaf};
pub use hashtree::HashTree;
pub use hashtree::binary::{BinaryHashTree, compute_height};
pub use proof::Proof;

/// Root of the tree over `leaves`, with SHA-256 and default options.
pub fn build_root<L: AsRef<[u8]> + Sync>(leaves: &[L]) -> Result<Digest> {
  build_root_with(leaves, &Sha256, TreeOptions::default())
}

/// Inclusion proof for `leaves[position]`, with SHA-256 and default options.
pub fn generate_proof<L: AsRef<[u8]> + Sync>(leaves: &[L], position: u64) -> Result<Proof> {
  generate_proof_with(leaves, position, &Sha256, TreeOptions::default())
}

/// Root recomputed from `proof`, with SHA-256 and default options.
pub fn verify_proof(proof: &Proof) -> Digest {
  proof.compute_root(&Sha256, TreeOptions::default().padding)
}

pub fn build_root_with<L, H>(leaves: &[L], hasher: &H, options: TreeOptions) -> Result<Digest>
where
  L: AsRef<[u8]> + Sync,
  H: NodeHasher + ?Sized,
{
  BinaryHashTree::new(leaves, hasher, options)?.root_hash()
}

pub fn generate_proof_with<L, H>(leaves: &[L], position: u64, hasher: &H, options: TreeOptions) -> Result<Proof>
where
  L: AsRef<[u8]> + Sync,
  H: NodeHasher + ?Sized,
{
  BinaryHashTree::new(leaves, hasher, options)?.generate_proof(position)
}

pub fn verify_proof_with<H: NodeHasher + ?Sized>(proof: &Proof, hasher: &H, options: TreeOptions) -> Digest {
  proof.compute_root(hasher, options.padding)
}

/// Sample payloads `"data item 0"`, `"data item 1"`, ...
pub fn gen_leaves(num_leaves: u64) -> Vec<Vec<u8>> {
  (0..num_leaves).map(|i| format!("data item {i}").into_bytes()).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn known_root_of_a_thousand_leaves() {
    let leaves = gen_leaves(1000);
    let root = build_root_with(&leaves, &Sha256, TreeOptions::compat()).unwrap();
    assert_eq!("d6a21bb2fb85e85ae1363303e29d3ab2b5327ba1b815f1483430e435f294a53b", root.to_hex());

    let proof = generate_proof_with(&leaves, 95, &Sha256, TreeOptions::compat()).unwrap();
    assert_eq!(10, proof.path.len());
    assert_eq!(b"data item 95".to_vec(), proof.leaf);
    assert_eq!(root, verify_proof_with(&proof, &Sha256, TreeOptions::compat()));
  }

  #[test]
  fn default_interface_roundtrip() {
    let leaves = gen_leaves(1000);
    let root = build_root(&leaves).unwrap();
    assert_eq!("c4c522dd3544e32bca5e80385ebb26cf0d0eb5be753f19e38855ea3f0a2f5f28", root.to_hex());

    let proof = generate_proof(&leaves, 95).unwrap();
    assert_eq!(10, proof.path.len());
    assert_eq!(root, verify_proof(&proof));
  }

  #[test]
  fn interface_errors() {
    let empty: Vec<Vec<u8>> = vec![];
    assert!(matches!(build_root(&empty), Err(Error::EmptyTree)));
    assert!(matches!(generate_proof(&empty, 0), Err(Error::EmptyTree)));

    let leaves = gen_leaves(3);
    assert!(matches!(generate_proof(&leaves, 3), Err(Error::OutOfRange { position: 3, size: 3 })));
    assert!(matches!(generate_proof(&leaves, u64::MAX), Err(Error::OutOfRange { .. })));
  }

  #[test]
  fn leaves_may_be_any_byte_container() {
    let strs = ["data item 0", "data item 1", "data item 2"];
    let vecs = gen_leaves(3);
    assert_eq!(build_root(&strs).unwrap(), build_root(&vecs).unwrap());
  }
}
