use log::{debug, trace};

use crate::config::TreeOptions;
use crate::error::{Error, Result};
use crate::hash::{Digest, NodeHasher};
use crate::hashtree::HashTree;
use crate::proof::Proof;

/// Binary hash tree over a borrowed, ordered sequence of leaves.
///
/// Nothing is retained between calls: every root or proof request rebuilds the
/// levels from the leaves, keeping only the current level in memory.
pub struct BinaryHashTree<'a, L, H: NodeHasher + ?Sized> {
  leaves: &'a [L],
  hasher: &'a H,
  options: TreeOptions,
}

impl<'a, L, H> BinaryHashTree<'a, L, H>
where
  L: AsRef<[u8]> + Sync,
  H: NodeHasher + ?Sized,
{
  pub fn new(leaves: &'a [L], hasher: &'a H, options: TreeOptions) -> Result<Self> {
    if leaves.is_empty() {
      return Err(Error::EmptyTree);
    }
    Ok(BinaryHashTree { leaves, hasher, options })
  }

  fn hash_leaves(&self) -> Vec<Digest> {
    #[cfg(feature = "parallel")]
    if self.leaves.len() >= self.options.parallel_threshold {
      use rayon::prelude::*;
      return self.leaves.par_iter().map(|leaf| self.hasher.hash_leaf(leaf.as_ref())).collect();
    }
    self.leaves.iter().map(|leaf| self.hasher.hash_leaf(leaf.as_ref())).collect()
  }

  /// Fold the levels bottom-up into the root. When `target` is given, the sibling
  /// of the target's slot is recorded at every level, leaf to root.
  fn fold(&self, target: Option<usize>) -> (Digest, Vec<Digest>) {
    let height = self.height() as usize;
    let width = 1usize << height;
    let padding = self.options.padding;

    let mut state = self.hash_leaves();
    debug!(
      "folding {} leaves: height={height}, padding={} ({:?}), hasher={}",
      self.leaves.len(),
      width - state.len(),
      padding,
      self.hasher.name()
    );
    state.resize(width, Digest::ZERO);

    let mut path = Vec::with_capacity(if target.is_some() { height } else { 0 });
    let mut level_pos = target.unwrap_or(0);
    for level in 0..height {
      if target.is_some() {
        let sibling = if level_pos & 1 == 1 { state[level_pos - 1] } else { state[level_pos + 1] };
        path.push(sibling);
      }
      let len = state.len();
      for i in (0..len).step_by(2) {
        let left = padding.encode(level, &state[i]);
        let right = padding.encode(level, &state[i + 1]);
        state[i / 2] = self.hasher.hash_node(left, right);
      }
      state.truncate(len / 2);
      level_pos >>= 1;
      trace!("level {} -> {} nodes", level + 1, state.len());
    }
    debug_assert_eq!(1, state.len());
    (state[0], path)
  }
}

impl<L, H> HashTree for BinaryHashTree<'_, L, H>
where
  L: AsRef<[u8]> + Sync,
  H: NodeHasher + ?Sized,
{
  type Error = Error;

  fn size(&self) -> u64 {
    self.leaves.len() as u64
  }

  fn height(&self) -> u32 {
    compute_height(self.size())
  }

  fn root_hash(&self) -> Result<Digest> {
    let (root, _) = self.fold(None);
    Ok(root)
  }

  fn generate_proof(&self, position: u64) -> Result<Proof> {
    if position >= self.size() {
      return Err(Error::OutOfRange { position, size: self.size() });
    }
    let index = position as usize;
    let (_, path) = self.fold(Some(index));
    Ok(Proof::new(self.leaves[index].as_ref().to_vec(), position, path))
  }
}

/// `ceil(log2(num_leaves))`, the number of levels above the leaves. A single
/// leaf is its own root and has height 0.
pub fn compute_height(num_leaves: u64) -> u32 {
  u64::BITS - num_leaves.saturating_sub(1).leading_zeros()
}
