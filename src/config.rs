use crate::hash::Digest;

/// How the leaf level is filled up to the next power of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Padding {
  /// Pad entries are full-width all-zero digests.
  #[default]
  ZeroDigest,

  /// Pad entries enter the first level of node hashing as a single `0x00` byte.
  /// Trees built this way reproduce roots published by older tooling. Proofs
  /// still carry the pad sibling as [`Digest::ZERO`].
  ZeroByte,
}

const ZERO_BYTE: &[u8] = &[0u8];

impl Padding {
  /// Bytes that represent `digest` when it is fed into a node hash at `level`.
  pub fn encode(self, level: usize, digest: &Digest) -> &[u8] {
    match self {
      Padding::ZeroByte if level == 0 && *digest == Digest::ZERO => ZERO_BYTE,
      _ => digest.as_bytes(),
    }
  }
}

pub const DEFAULT_PARALLEL_THRESHOLD: usize = 16 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeOptions {
  pub padding: Padding,

  /// Leaf count from which leaf hashing is spread over worker threads.
  pub parallel_threshold: usize,
}

impl TreeOptions {
  /// Options matching the historical zero-byte padding.
  pub fn compat() -> Self {
    Self::default().with_padding(Padding::ZeroByte)
  }

  pub fn with_padding(mut self, padding: Padding) -> Self {
    self.padding = padding;
    self
  }

  pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
    self.parallel_threshold = threshold;
    self
  }
}

impl Default for TreeOptions {
  fn default() -> Self {
    TreeOptions { padding: Padding::default(), parallel_threshold: DEFAULT_PARALLEL_THRESHOLD }
  }
}
