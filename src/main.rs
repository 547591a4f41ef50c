use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, error, info};
use merkle_proof::{
  BinaryHashTree, Digest, HashTree, NodeHasher, Padding, Proof, Result, TreeOptions, build_root_with, gen_leaves,
  generate_proof_with, verify_proof_with,
};
use rand::Rng;
use std::fs::{File, create_dir_all, read_to_string};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use crate::stat::Report;

mod stat;

/// Reference trees over `"data item {i}"` leaves. The roots were produced with
/// SHA-256 and zero-byte padding.
const TREES: [(u64, &str); 5] = [
  (100, "95b882a4c3bc97ff001e447e9b60b6a97f08e2daf15bdb5d42dfff733748c061"),
  (1_000, "d6a21bb2fb85e85ae1363303e29d3ab2b5327ba1b815f1483430e435f294a53b"),
  (10_000, "158f34804e0558f7295ac414a4658e12a1605025ff82f5338b7f046295f865a9"),
  (100_000, "ea4f9fd75feccfd05f50f6da2b30360bf198c0adb6fbcbe77083e815c6dc5481"),
  (1_000_000, "eaec013bcbd90a05957492a98c997aee5f0ea0b0b612bd3782538af710d82c65"),
];

#[derive(Parser)]
#[command(name = "merkle-proof")]
#[command(author, version, about = "Build Merkle roots and single-leaf inclusion proofs")]
struct Args {
  /// Hash primitive for leaves and internal nodes
  #[arg(long, value_enum, global = true, default_value_t = HashKind::Sha256)]
  hash: HashKind,

  /// How the leaf level is padded to a power of two
  #[arg(long, value_enum, global = true, default_value_t = PaddingKind::ZeroDigest)]
  padding: PaddingKind,

  /// Log filter used when RUST_LOG is not set
  #[arg(long, global = true, default_value = "info")]
  log_level: String,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Generate, prove and verify over the reference trees, timing each phase
  Run {
    #[arg(short, long, default_value_t = 1)]
    trials: usize,

    /// Skip reference trees with more leaves than this
    #[arg(long)]
    max_leaves: Option<u64>,

    /// Directory to write the timing report to
    #[arg(long)]
    csv: Option<PathBuf>,

    #[arg(short, long, default_value_t = Local::now().format("%Y%m%d%H%M%S").to_string())]
    session: String,
  },

  /// Print the root and the proof for one line of a text file
  Prove {
    /// Text file with one leaf per line
    leaves: PathBuf,

    position: u64,

    /// Write the binary proof to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
  },

  /// Recompute the root from a binary proof and compare it with a trusted root
  Verify {
    proof: PathBuf,

    /// Trusted root, lowercase hex
    root: Digest,

    /// Number of leaves of the tree the proof claims to belong to
    #[arg(long)]
    size: Option<u64>,
  },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum HashKind {
  Sha256,
  Blake3,
}

impl HashKind {
  fn hasher(self) -> &'static dyn NodeHasher {
    match self {
      HashKind::Sha256 => &merkle_proof::Sha256,
      HashKind::Blake3 => &merkle_proof::Blake3,
    }
  }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PaddingKind {
  ZeroDigest,
  ZeroByte,
}

impl From<PaddingKind> for Padding {
  fn from(kind: PaddingKind) -> Self {
    match kind {
      PaddingKind::ZeroDigest => Padding::ZeroDigest,
      PaddingKind::ZeroByte => Padding::ZeroByte,
    }
  }
}

fn main() -> Result<ExitCode> {
  let args = Args::parse();
  env_logger::init_from_env(env_logger::Env::default().default_filter_or(&args.log_level));

  let options = TreeOptions::default().with_padding(args.padding.into());
  let accepted = match args.command {
    Command::Run { trials, max_leaves, csv, session } => {
      run(args.hash, options, trials, max_leaves, csv, &session)?
    }
    Command::Prove { leaves, position, output } => prove(args.hash.hasher(), options, leaves, position, output)?,
    Command::Verify { proof, root, size } => verify(args.hash.hasher(), options, proof, root, size)?,
  };
  Ok(if accepted { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

const PHASES: [&str; 3] = ["leaves", "prove", "verify"];

fn run(
  hash: HashKind,
  options: TreeOptions,
  trials: usize,
  max_leaves: Option<u64>,
  csv: Option<PathBuf>,
  session: &str,
) -> Result<bool> {
  let hasher = hash.hasher();
  let reference = hash == HashKind::Sha256 && options.padding == Padding::ZeroByte;
  let mut report = Report::new();
  let mut rng = rand::rng();
  let mut accepted = true;

  let trees = TREES.iter().filter(|(n, _)| max_leaves.is_none_or(|max| *n <= max)).collect::<Vec<_>>();
  for &&(num_leaves, root_hex) in trees.iter() {
    for _ in 0..trials {
      let position = rng.random_range(0..num_leaves);

      let t0 = Instant::now();
      let leaves = gen_leaves(num_leaves);
      let elapsed = t0.elapsed();
      report.add(num_leaves, "leaves", elapsed);
      info!("Generated {num_leaves} leaves for a Merkle tree. {{ elapsed time: {:.3} ms }}", ms(elapsed));

      let t0 = Instant::now();
      let proof = generate_proof_with(&leaves, position, hasher, options)?;
      let elapsed = t0.elapsed();
      report.add(num_leaves, "prove", elapsed);
      info!("Generated a Merkle proof for leaf #{}. {{ elapsed time: {:.3} ms }}", proof.position, ms(elapsed));

      let t0 = Instant::now();
      let computed = verify_proof_with(&proof, hasher, options);
      let elapsed = t0.elapsed();
      report.add(num_leaves, "verify", elapsed);
      info!("Computed a root hash from proof. {{ elapsed time: {:.3} ms }}", ms(elapsed));

      info!(
        "  Leaf {{ position: {}, value: '{}', hash: {} }}",
        proof.position,
        String::from_utf8_lossy(&proof.leaf),
        hasher.hash_leaf(&proof.leaf)
      );
      debug!("  Hash values:\n{}", proof.hashes_display());

      let expected = if reference { root_hex.parse::<Digest>()? } else { build_root_with(&leaves, hasher, options)? };
      if computed != expected {
        error!("Verify failed! computed={computed}, expected={expected}");
        accepted = false;
      }
    }
  }

  info!("[{}::{:?}]", hasher.name(), options.padding);
  for &&(num_leaves, _) in trees.iter() {
    for phase in PHASES {
      info!("  n={num_leaves} {phase}: {}", report.single(num_leaves, phase));
    }
  }

  if let Some(dir) = csv {
    create_dir_all(&dir)?;
    let path = dir.join(format!("{session}-merkle-proof.csv"));
    report.save_to_csv(&path)?;
    info!("==> {}", path.to_string_lossy());
  }
  Ok(accepted)
}

fn prove(
  hasher: &dyn NodeHasher,
  options: TreeOptions,
  leaves: PathBuf,
  position: u64,
  output: Option<PathBuf>,
) -> Result<bool> {
  let text = read_to_string(&leaves)?;
  let leaves = text.lines().collect::<Vec<_>>();
  let tree = BinaryHashTree::new(&leaves, hasher, options)?;
  let root = tree.root_hash()?;
  let proof = tree.generate_proof(position)?;

  println!("root: {root}");
  println!("leaves: {}, height: {}", tree.size(), tree.height());
  println!("leaf #{}: '{}'", proof.position, String::from_utf8_lossy(&proof.leaf));
  print!("{}", proof.hashes_display());

  if let Some(path) = output {
    let mut w = BufWriter::new(File::create(&path)?);
    let len = proof.write(&mut w)?;
    w.flush()?;
    info!("wrote {len} bytes to {}", path.to_string_lossy());
  }
  Ok(true)
}

fn verify(
  hasher: &dyn NodeHasher,
  options: TreeOptions,
  proof: PathBuf,
  root: Digest,
  size: Option<u64>,
) -> Result<bool> {
  let proof = Proof::read(&mut BufReader::new(File::open(&proof)?))?;
  let computed = match size {
    Some(num_leaves) => proof.compute_root_checked(hasher, options.padding, num_leaves)?,
    None => proof.compute_root(hasher, options.padding),
  };
  println!("computed root: {computed}");
  let accepted = computed == root;
  println!("{}", if accepted { "ACCEPT" } else { "REJECT" });
  Ok(accepted)
}

fn ms(d: std::time::Duration) -> f64 {
  d.as_secs_f64() * 1e3
}
