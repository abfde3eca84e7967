//! respack CLI
//!
//! Packs a command with either strategy and prints its layout, or sends it
//! to a RESP server.

use clap::{Parser, Subcommand};
use respack::{Argument, CommandWriter, Config, PackedCommand, SendStrategy};
use respack::transport::transport_for;
use tracing_subscriber::{fmt, EnvFilter};

/// Longest chunk rendered in full by `pack`
const PREVIEW_LEN: usize = 64;

/// respack CLI
#[derive(Parser, Debug)]
#[command(name = "respack-cli")]
#[command(about = "Pack and send RESP commands")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:6379")]
    server: String,

    /// Send strategy (monolithic or chunked)
    #[arg(long, default_value = "chunked")]
    strategy: SendStrategy,

    /// Chunk threshold in bytes
    #[arg(short, long, default_value = "6000")]
    threshold: usize,

    /// Connect timeout in milliseconds (0 = OS default)
    #[arg(long, default_value = "0")]
    connect_timeout_ms: u64,

    /// Write timeout in milliseconds (0 = none)
    #[arg(long, default_value = "0")]
    write_timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack a command and print its chunk layout
    Pack {
        /// Command name and arguments
        #[arg(required = true)]
        args: Vec<String>,
    },

    /// Pack a command and write it to the server
    Send {
        /// Command name and arguments
        #[arg(required = true)]
        args: Vec<String>,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,respack=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .server_addr(&args.server)
        .strategy(args.strategy)
        .chunk_threshold(args.threshold)
        .connect_timeout_ms(args.connect_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms)
        .build();

    if let Err(e) = config.validate() {
        tracing::error!("{}", e);
        std::process::exit(2);
    }

    let result = match args.command {
        Commands::Pack { args } => pack(&config, &to_arguments(args)),
        Commands::Send { args } => send(&config, &to_arguments(args)),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn to_arguments(args: Vec<String>) -> Vec<Argument> {
    args.into_iter().map(Argument::from).collect()
}

fn pack(config: &Config, args: &[Argument]) -> respack::Result<()> {
    let packed = transport_for(config).pack(args)?;
    print_layout(&packed);
    Ok(())
}

fn send(config: &Config, args: &[Argument]) -> respack::Result<()> {
    let mut writer = CommandWriter::from_config(config)?;
    let written = writer.write_command(args)?;
    tracing::info!(
        "Wrote {} bytes to {} ({})",
        written,
        config.server_addr,
        writer.strategy()
    );
    Ok(())
}

fn print_layout(packed: &PackedCommand) {
    println!("{} bytes in {} chunk(s)", packed.len(), packed.chunk_count());
    for (i, chunk) in packed.chunks().enumerate() {
        let shown = &chunk[..chunk.len().min(PREVIEW_LEN)];
        let escaped: String = shown
            .iter()
            .flat_map(|b| std::ascii::escape_default(*b))
            .map(char::from)
            .collect();
        if chunk.len() > PREVIEW_LEN {
            println!("  [{}] {:>8}  \"{}\"...", i, chunk.len(), escaped);
        } else {
            println!("  [{}] {:>8}  \"{}\"", i, chunk.len(), escaped);
        }
    }
}
