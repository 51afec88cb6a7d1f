use clap::{Parser, Subcommand};
use radv::config;
use radv::telemetry::init_logging;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "radv")]
#[command(about = "IPv6 Router Advertisement session configuration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate radv.toml and print diagnostics
    Check {
        /// Path to radv.toml
        #[arg(short, long, default_value = "radv.toml")]
        config: PathBuf,
    },
    /// Build the session from radv.toml and print what it would advertise
    Show {
        /// Path to radv.toml
        #[arg(short, long, default_value = "radv.toml")]
        config: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { config } => cmd_check(&config),
        Commands::Show { config } => cmd_show(&config),
    };

    if let Err(e) = result {
        eprintln!("[ERROR] {}", e);
        std::process::exit(1);
    }
}

fn cmd_check(config_path: &Path) -> Result<(), String> {
    println!("[INFO] Validating {}...", config_path.display());

    let cfg = config::load(config_path).map_err(|e| format!("Failed to load config: {}", e))?;

    let validation = config::validate(&cfg);
    validation.print_diagnostics();

    if validation.has_errors() {
        Err("Validation failed".to_string())
    } else {
        println!("[INFO] Configuration is valid");
        Ok(())
    }
}

fn cmd_show(config_path: &Path) -> Result<(), String> {
    let cfg = config::load(config_path).map_err(|e| format!("Failed to load config: {}", e))?;
    init_logging(cfg.log.as_ref());

    let validation = config::validate(&cfg);
    if validation.has_errors() {
        validation.print_diagnostics();
        return Err("Validation failed".to_string());
    }

    let radv = config::build(&cfg).map_err(|e| format!("Failed to build session: {}", e))?;
    radv.attach_event(None, 0)
        .map_err(|e| format!("Failed to attach event loop: {}", e))?;
    radv.start().map_err(|e| format!("Failed to start: {}", e))?;

    info!(
        ifindex = radv.ifindex(),
        prefixes = radv.n_prefixes(),
        "Session ready"
    );

    println!("ifindex:         {}", radv.ifindex());
    match radv.mac() {
        Some(mac) => println!("mac:             {} (link-local {})", mac, mac.link_local()),
        None => println!("mac:             -"),
    }
    match radv.mtu() {
        Some(mtu) => println!("mtu:             {}", mtu),
        None => println!("mtu:             -"),
    }
    println!("hop limit:       {}", radv.hop_limit());
    println!("router lifetime: {}s", radv.router_lifetime());
    println!(
        "flags:           0x{:02x} {:?}",
        radv.advertised_flags_byte(),
        radv.router_flags()
    );

    for prefix in radv.prefixes() {
        let opt = prefix.option();
        let hex: String = opt.to_bytes().iter().map(|b| format!("{:02x}", b)).collect();
        println!(
            "prefix {:<24} L={} A={} valid={} preferred={}",
            prefix.to_string(),
            opt.on_link as u8,
            opt.autonomous as u8,
            opt.valid_lifetime,
            opt.preferred_lifetime
        );
        println!("  {}", hex);
    }

    radv.stop();
    Ok(())
}
