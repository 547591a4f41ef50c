use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
  /// Construction was asked to commit to zero leaves.
  #[error("cannot build a hash tree from an empty leaf sequence")]
  EmptyTree,

  #[error("position {position} is out of range for a tree of {size} leaves")]
  OutOfRange { position: u64, size: u64 },

  /// The proof path does not have one entry per tree level.
  #[error("malformed proof: expected {expected} path entries, got {actual}")]
  MalformedProof { expected: usize, actual: usize },

  #[error("invalid digest: {0}")]
  InvalidDigest(String),

  #[error(transparent)]
  Io(#[from] std::io::Error),
}
