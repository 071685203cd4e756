//! Engine message inspector entry point.
//!
//! ```text
//! engine-inspect message.bin
//! engine-inspect --lazy message.bin
//! engine-inspect --replay 1000000 --config inspect.toml message.bin
//! ```
//!
//! Exit status is non-zero when the file cannot be read or the message is
//! rejected by the strict decoder.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use engine_inspect::{load_config, render, replay, AlignedBuffer, InspectConfig};
use engine_protocol::Message;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Decode and display one engine protocol message.
#[derive(Debug, Parser)]
#[command(
    name = "engine-inspect",
    about = "Decode and display an engine protocol message buffer",
    version
)]
struct Cli {
    /// File holding exactly one message buffer.
    path: PathBuf,

    /// Optional TOML configuration file.
    #[arg(long, env = "ENGINE_INSPECT_CONFIG")]
    config: Option<PathBuf>,

    /// Skip precomputing parameter offsets (header only).
    #[arg(long)]
    lazy: bool,

    /// Replay the validated message this many times through the unchecked
    /// decoder and report the mean cost.
    #[arg(long, env = "ENGINE_INSPECT_REPLAY")]
    replay: Option<u32>,

    /// Maximum payload bytes shown per parameter.
    #[arg(long)]
    preview: Option<usize>,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration.
    fn apply(&self, mut config: InspectConfig) -> InspectConfig {
        if self.lazy {
            config.precompute = false;
        }
        if let Some(replay) = self.replay {
            config.replay = replay;
        }
        if let Some(preview) = self.preview {
            config.preview_bytes = preview;
        }
        config
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())
        .with_context(|| format!("loading config {:?}", cli.config))?;
    let config = cli.apply(config);

    // `RUST_LOG` wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let buffer = AlignedBuffer::read_file(&cli.path)
        .with_context(|| format!("reading message from {}", cli.path.display()))?;
    info!(path = %cli.path.display(), len = buffer.len(), "loaded message buffer");

    let msg = Message::with_precompute(buffer.as_bytes(), config.precompute)
        .with_context(|| format!("decoding {}", cli.path.display()))?;

    println!("{}", render(&msg, config.preview_bytes)?);

    if config.replay > 0 {
        if !config.precompute {
            warn!("replaying without precompute reads the header only");
        }
        let stats = replay(&msg, config.replay);
        info!(
            iterations = stats.iterations,
            checksum = stats.checksum,
            "replay finished in {:?} ({:?} per message)",
            stats.elapsed,
            stats.per_iteration()
        );
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
