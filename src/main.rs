use clap::{Parser, Subcommand};
use sanat_motion::{config, logging, output};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "sanat-motion")]
#[command(about = "Authoring helper for the gallery motion script")]
#[command(long_about = "\
Authoring helper for the gallery motion script

The motion script (compiled to WebAssembly) reads its settings from TOML
embedded in the page:

  <script type=\"application/toml\" data-motion-config>
  [menu]
  close_delay_ms = 250
  </script>

Blocks are applied in document order on top of the stock defaults. This
tool prints the documented defaults, validates files before they ship, and
prints the stylesheet the script injects.

Run 'sanat-motion gen-config' to generate a documented motion.toml.")]
#[command(version)]
struct Cli {
    /// Log decisions at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a stock motion.toml with all options documented
    GenConfig,
    /// Load, layer and validate config files, then summarize the result
    Check {
        /// Config files, later ones overriding earlier ones
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Print the stylesheet injected at startup
    Css {
        /// Config files to layer over the stock defaults
        #[arg(long = "config")]
        configs: Vec<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_cli(cli.verbose);

    match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Check { paths } => {
            debug!(files = paths.len(), "checking config");
            let resolved = config::load_config(&paths)?;
            output::print_check_output(&paths, &resolved);
            println!("==> Config is valid");
        }
        Command::Css { configs } => {
            let resolved = config::load_config(&configs)?;
            println!("{}", config::generate_stylesheet(&resolved));
        }
    }

    Ok(())
}
