use std::path::PathBuf;

use clap::{Parser, Subcommand};

use real_ip::config::load_config;
use real_ip::{Evaluator, EvaluatorOptions, FieldValue, RealIpFilter, TrustedNetworks};

#[derive(Parser)]
#[command(name = "real-ip-cli")]
#[command(about = "Inspect real IP resolution and configuration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one peer address and forwarded-for chain
    Resolve {
        /// Trusted network (CIDR or bare address), repeatable
        #[arg(short, long = "trusted")]
        trusted: Vec<String>,

        /// Directly observed peer address
        #[arg(short, long)]
        peer: Option<String>,

        /// Forwarded-for entry, repeatable, left-most first
        #[arg(short, long = "xff")]
        xff: Vec<String>,

        /// Treat the forwarded-for value as one comma-delimited string
        #[arg(long)]
        string_mode: bool,

        /// Do not use the peer address as a trust gate
        #[arg(long)]
        no_peer_check: bool,

        /// Collect every valid chain address
        #[arg(long)]
        collect: bool,
    },
    /// Validate a configuration file
    CheckConfig {
        path: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            trusted,
            peer,
            xff,
            string_mode,
            no_peer_check,
            collect,
        } => {
            let evaluator = Evaluator::new(
                TrustedNetworks::parse(&trusted)?,
                EvaluatorOptions {
                    require_peer_trust_check: !no_peer_check,
                    chain_is_delimited_string: string_mode,
                    collect_all_valid_addresses: collect,
                },
            );

            let chain = match (xff.is_empty(), string_mode) {
                (true, _) => FieldValue::Absent,
                (false, true) => FieldValue::Single(xff.join(",")),
                (false, false) => FieldValue::Sequence(xff),
            };

            let evaluation = evaluator.evaluate(&FieldValue::from(peer), &chain);
            println!("{}", serde_json::to_string_pretty(&evaluation)?);
        }
        Commands::CheckConfig { path } => {
            let config = load_config(&path)?;
            let filter = RealIpFilter::from_config(&config.filter)?;
            println!(
                "{}: OK ({} trusted networks: {})",
                path.display(),
                filter.trusted_networks().len(),
                filter.trusted_networks()
            );
        }
    }

    Ok(())
}
