use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::filter::EnvFilter;

use crate::compiler::{compile, CompileError};
use crate::marker::{strip_lines, VersionMarker};
use crate::parser::parse_markers;
use crate::report::generate_report;
use crate::table::RangeTable;
use crate::targets::{describe_target, emit, list_targets, resolve_target, IntType, RustOptions};

pub const CONFIG_FILE: &str = "verrange.config.json";

#[derive(Parser)]
#[command(name = "verrange", version, about = "Compile version markers into an exhaustive range table")]
pub struct Cli {
  /// Raise log verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  verbose: u8,
  #[command(subcommand)]
  cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
  /// Compile a marker file and emit the table
  Build {
    input: PathBuf,
    #[arg(long)]
    target: Option<String>,
    #[arg(long)]
    int_type: Option<String>,
    #[arg(long)]
    scrutinee: Option<String>,
    /// Write to this file instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,
  },
  /// Validate a marker file and print a summary
  Check { input: PathBuf },
  /// Print the label the table assigns to one version
  Lookup {
    input: PathBuf,
    #[arg(allow_negative_numbers = true)]
    version: i64,
  },
  Target {
    #[command(subcommand)]
    cmd: TargetCommand,
  },
}

#[derive(Subcommand)]
pub enum TargetCommand {
  List,
  Describe {
    #[arg(long)]
    target: String,
  },
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct Config {
  pub target: Option<String>,
  pub int_type: Option<String>,
  pub scrutinee: Option<String>,
}

pub fn run() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbose);
  match cli.cmd {
    Command::Build { input, target, int_type, scrutinee, out } => {
      build(&input, target, int_type, scrutinee, out.as_deref())
    }
    Command::Check { input } => check(&input),
    Command::Lookup { input, version } => lookup(&input, version),
    Command::Target { cmd } => match cmd {
      TargetCommand::List => target_list(),
      TargetCommand::Describe { target } => target_describe(&target),
    },
  }
}

fn init_logging(verbose: u8) {
  let default = match verbose {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .compact()
    .try_init();
}

fn build(
  input: &Path,
  target: Option<String>,
  int_type: Option<String>,
  scrutinee: Option<String>,
  out: Option<&Path>,
) -> Result<()> {
  let config = load_config(Path::new(CONFIG_FILE));
  let target = target.or(config.target).unwrap_or_else(|| "rust".to_string());
  let kind = resolve_target(&target)?;
  let mut options = RustOptions::default();
  if let Some(ty) = int_type.or(config.int_type) {
    options.int_type = ty.parse::<IntType>()?;
  }
  if let Some(s) = scrutinee.or(config.scrutinee) {
    options.scrutinee = s;
  }

  let (_, table) = load_table(input)?;
  let rendered = emit(kind, &table, &options)?;

  match out {
    Some(path) => {
      fs::write(path, format!("{rendered}\n")).with_context(|| format!("Failed to write {:?}", path))?;
      info!(format = kind.as_str(), entries = table.len(), out = %path.display(), "wrote table");
    }
    None => println!("{rendered}"),
  }
  Ok(())
}

fn check(input: &Path) -> Result<()> {
  let (markers, table) = load_table(input)?;
  print!("{}", generate_report(&markers, &table));
  Ok(())
}

fn lookup(input: &Path, version: i64) -> Result<()> {
  let (_, table) = load_table(input)?;
  let label = table
    .lookup(version)
    .with_context(|| format!("no entry covers version {version}"))?;
  println!("{label}");
  Ok(())
}

fn target_list() -> Result<()> {
  println!("Available targets:");
  for t in list_targets() {
    println!("  {}", t.as_str());
  }
  Ok(())
}

fn target_describe(target: &str) -> Result<()> {
  let kind = resolve_target(target)?;
  println!("{}", serde_json::to_string_pretty(&describe_target(kind))?);
  Ok(())
}

/// Read, parse and compile a marker file. Ordering errors are reported
/// against the source line of the offending marker.
pub fn load_table(input: &Path) -> Result<(Vec<VersionMarker>, RangeTable)> {
  let src = fs::read_to_string(input).with_context(|| format!("Failed to read {:?}", input))?;
  let parsed = parse_markers(&src).with_context(|| format!("Failed to parse {}", input.display()))?;
  let (markers, lines) = strip_lines(parsed);
  debug!(markers = markers.len(), input = %input.display(), "parsed markers");

  let table = compile(&markers).map_err(|err| {
    let location = match &err {
      CompileError::OrderingViolation { position, .. } => lines
        .get(position - 1)
        .map(|line| format!("{}:{}", input.display(), line))
        .unwrap_or_else(|| input.display().to_string()),
      CompileError::Empty => input.display().to_string(),
    };
    anyhow::Error::new(err).context(format!("{location}: invalid version markers"))
  })?;
  Ok((markers, table))
}

pub fn load_config(path: &Path) -> Config {
  let Ok(data) = fs::read_to_string(path) else {
    return Config::default();
  };
  match serde_json::from_str::<Config>(&data) {
    Ok(cfg) => cfg,
    Err(err) => {
      warn!("ignoring malformed {}: {}", path.display(), err);
      Config::default()
    }
  }
}
