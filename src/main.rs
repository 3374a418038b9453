use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tfc_datagen::config::{self, CleanPolicy, DatagenConfig};
use tfc_datagen::domain::Domain;
use tfc_datagen::generators;
use tfc_datagen::output;
use tfc_datagen::pipeline::{GenerationRun, Generator, RunOptions};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "tfc-datagen")]
#[command(about = "Generate TFC data and asset JSON resources")]
#[command(long_about = "\
Generate TFC data and asset JSON resources

Every resource is written under <output>/<namespace>/<category>/<path>.json:

  generated/
  ├── tfc/
  │   ├── ore_veins/normal_native_copper.json
  │   ├── rocks/granite.json
  │   ├── tags/rock.json               # {\"replace\": false, \"values\": [...]}
  │   ├── lang/en_us.json              # one table per namespace and locale
  │   └── recipes/collapse/granite.json
  └── minecraft/
      └── tags/blocks/mineable/pickaxe.json

Files the run did not produce are deleted afterwards, and emptied directories
are removed. Files whose content is unchanged are left untouched.

Run 'tfc-datagen gen-config' to generate a documented datagen.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (missing file means stock defaults)
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// Output directory, overriding `output.root`
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Clean policy, overriding `output.clean`
    #[arg(long, value_enum, global = true)]
    clean: Option<CleanPolicy>,

    /// Run only the ore vein, rock, metal and name generators
    #[arg(long, global = true)]
    core: bool,

    /// Log debug output and list unchanged files
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run every generator and flush the output tree (default)
    Generate,
    /// Report what `generate` would change without writing anything
    Check,
    /// Print a stock datagen.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let domain = Domain::tfc();

    match cli.command.as_ref().unwrap_or(&Command::Generate) {
        Command::Generate => {
            let config = resolve_config(&cli)?;
            println!("==> Generating into {}", config.output.root.display());
            let report = new_run(&domain, &config, cli.core).run()?;
            output::print_run_report(&report, cli.verbose);
        }
        Command::Check => {
            let config = resolve_config(&cli)?;
            println!("==> Checking {}", config.output.root.display());
            let report = new_run(&domain, &config, cli.core).dry_run()?;
            output::print_run_report(&report, cli.verbose);
            if !output::is_up_to_date(&report) {
                return Err("output is out of date; run 'tfc-datagen generate'".into());
            }
            println!("==> Output is up to date");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn new_run<'a>(domain: &'a Domain, config: &'a DatagenConfig, core: bool) -> GenerationRun<'a> {
    let generators: Vec<Box<dyn Generator + 'a>> = if core {
        generators::core(domain, &config.domain)
    } else {
        generators::standard(domain, &config.domain)
    };
    GenerationRun::new(RunOptions::from(config), generators)
}

/// Load the config file and apply CLI overrides on top.
fn resolve_config(cli: &Cli) -> Result<DatagenConfig, config::ConfigError> {
    let mut config = config::load_config(&cli.config)?;
    if let Some(root) = &cli.output {
        config.output.root = root.clone();
    }
    if let Some(clean) = cli.clean {
        config.output.clean = clean;
    }
    config.validate()?;
    Ok(config)
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("tfc_datagen=debug,info")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
