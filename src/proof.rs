use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fmt::Write as _;
use std::io::{self, Cursor, ErrorKind, Read, Write};

use crate::config::Padding;
use crate::error::{Error, Result};
use crate::hash::{DIGEST_SIZE, Digest, NodeHasher};
use crate::hashtree::binary::compute_height;

/// Longest path a serialized proof may carry: one entry per bit of a position.
pub const MAX_PATH_LEN: usize = u64::BITS as usize;

/// Inclusion proof for a single leaf.
///
/// `path[i]` is the sibling needed to move from level `i` to level `i + 1`.
/// The proof owns its leaf and path so it can be transmitted on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof {
  pub leaf: Vec<u8>,
  pub position: u64,
  pub path: Vec<Digest>,
}

impl Proof {
  pub fn new(leaf: Vec<u8>, position: u64, path: Vec<Digest>) -> Self {
    Proof { leaf, position, path }
  }

  /// Recompute the root from the leaf, its position and the path.
  ///
  /// The parity of the position at each level says whether the subject is a left
  /// (even) or right (odd) child, which fixes the order the sibling is hashed in.
  /// The result is only meaningful once compared against a trusted root.
  pub fn compute_root<H: NodeHasher + ?Sized>(&self, hasher: &H, padding: Padding) -> Digest {
    let mut current = hasher.hash_leaf(&self.leaf);
    let mut pos = self.position;
    for (level, sibling) in self.path.iter().enumerate() {
      let sibling = padding.encode(level, sibling);
      current = if pos & 1 == 1 {
        hasher.hash_node(sibling, current.as_bytes())
      } else {
        hasher.hash_node(current.as_bytes(), sibling)
      };
      pos >>= 1;
    }
    current
  }

  /// Like [`Proof::compute_root`], for proofs of untrusted origin claimed to
  /// belong to a tree of `num_leaves` leaves.
  pub fn compute_root_checked<H: NodeHasher + ?Sized>(
    &self,
    hasher: &H,
    padding: Padding,
    num_leaves: u64,
  ) -> Result<Digest> {
    if num_leaves == 0 {
      return Err(Error::EmptyTree);
    }
    if self.position >= num_leaves {
      return Err(Error::OutOfRange { position: self.position, size: num_leaves });
    }
    let expected = compute_height(num_leaves) as usize;
    if self.path.len() != expected {
      return Err(Error::MalformedProof { expected, actual: self.path.len() });
    }
    Ok(self.compute_root(hasher, padding))
  }

  /// Whether the recomputed root is byte-for-byte equal to `trusted_root`.
  pub fn verify<H: NodeHasher + ?Sized>(&self, hasher: &H, padding: Padding, trusted_root: &Digest) -> bool {
    self.compute_root(hasher, padding) == *trusted_root
  }

  /// Serialize as `position(u64) | leaf_len(u32) | leaf | path_len(u8) | path`,
  /// little-endian. Returns the number of bytes written.
  pub fn write<W: Write>(&self, w: &mut W) -> Result<usize> {
    if self.path.len() > MAX_PATH_LEN {
      return Err(Error::MalformedProof { expected: MAX_PATH_LEN, actual: self.path.len() });
    }
    let leaf_len = u32::try_from(self.leaf.len())
      .map_err(|_| io::Error::new(ErrorKind::InvalidInput, format!("leaf too large: {} bytes", self.leaf.len())))?;

    // Position (8 bytes)
    w.write_u64::<LittleEndian>(self.position)?;

    // Leaf length and leaf
    w.write_u32::<LittleEndian>(leaf_len)?;
    w.write_all(&self.leaf)?;

    // Path length and sibling digests (32 bytes each)
    w.write_u8(self.path.len() as u8)?;
    for sibling in self.path.iter() {
      w.write_all(sibling.as_bytes())?;
    }
    Ok(8 + 4 + self.leaf.len() + 1 + self.path.len() * DIGEST_SIZE)
  }

  pub fn read<R: Read>(r: &mut R) -> Result<Self> {
    let position = r.read_u64::<LittleEndian>()?;

    let leaf_len = r.read_u32::<LittleEndian>()? as usize;
    let mut leaf = Vec::new();
    r.by_ref().take(leaf_len as u64).read_to_end(&mut leaf)?;
    if leaf.len() != leaf_len {
      return Err(io::Error::new(ErrorKind::UnexpectedEof, "truncated leaf").into());
    }

    let path_len = r.read_u8()? as usize;
    if path_len > MAX_PATH_LEN {
      return Err(Error::MalformedProof { expected: MAX_PATH_LEN, actual: path_len });
    }
    let mut path = Vec::with_capacity(path_len);
    for _ in 0..path_len {
      let mut bytes = [0u8; DIGEST_SIZE];
      r.read_exact(&mut bytes)?;
      path.push(Digest::new(bytes));
    }
    Ok(Proof { leaf, position, path })
  }

  pub fn to_bytes(&self) -> Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(8 + 4 + self.leaf.len() + 1 + self.path.len() * DIGEST_SIZE);
    self.write(&mut buffer)?;
    Ok(buffer)
  }

  pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
    let mut cursor = Cursor::new(bytes);
    let proof = Proof::read(&mut cursor)?;
    if cursor.position() != bytes.len() as u64 {
      let trailing = bytes.len() as u64 - cursor.position();
      return Err(io::Error::new(ErrorKind::InvalidData, format!("{trailing} trailing bytes after proof")).into());
    }
    Ok(proof)
  }

  /// One `index:hex` line per path entry, leaf to root.
  pub fn hashes_display(&self) -> String {
    let mut s = String::new();
    for (i, sibling) in self.path.iter().enumerate() {
      let _ = writeln!(s, "    {i}:{sibling}");
    }
    s
  }
}
