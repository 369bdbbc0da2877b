use std::path::{Path, PathBuf};

use {
    aistudio_config::{Severity, StudioConfig},
    anyhow::{Result, bail},
    clap::Subcommand,
};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Validate the resolved configuration and report errors/warnings.
    Check {
        /// Show informational diagnostics in addition to errors and warnings.
        #[arg(long)]
        verbose: bool,
    },
    /// Write a documented config template.
    Init {
        /// Destination file.
        #[arg(long, default_value = "aistudio.toml")]
        path: PathBuf,
        /// Port written into the template.
        #[arg(long = "template-port", default_value_t = 5000)]
        template_port: u16,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

pub fn handle_config(
    action: &ConfigAction,
    explicit_path: Option<&Path>,
    resolve: impl FnOnce() -> Result<StudioConfig>,
) -> Result<()> {
    match action {
        ConfigAction::Check { verbose } => check(*verbose, explicit_path, resolve()?),
        ConfigAction::Init {
            path,
            template_port,
            force,
        } => init(path, *template_port, *force),
    }
}

/// ANSI color codes.
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn check(verbose: bool, explicit_path: Option<&Path>, config: StudioConfig) -> Result<()> {
    match explicit_path
        .map(Path::to_path_buf)
        .or_else(aistudio_config::find_config_file)
    {
        Some(path) => eprintln!("Checking {}\n", path.display()),
        None => eprintln!("No config file found; checking defaults.\n"),
    }

    let result = aistudio_config::validate(&config);

    let mut shown = 0;
    for d in &result.diagnostics {
        if d.severity == Severity::Info && !verbose {
            continue;
        }

        let (color, label) = match d.severity {
            Severity::Error => (RED, "error"),
            Severity::Warning => (YELLOW, "warning"),
            Severity::Info => (CYAN, "info"),
        };

        if d.path.is_empty() {
            eprintln!("  {BOLD}{color}{label}{RESET} {}", d.message);
        } else {
            eprintln!("  {BOLD}{color}{label}{RESET} {}: {}", d.path, d.message);
        }
        shown += 1;
    }

    let errors = result.count(Severity::Error);
    let warnings = result.count(Severity::Warning);

    if shown > 0 {
        eprintln!();
    }

    if errors == 0 && warnings == 0 {
        eprintln!("No issues found.");
    } else {
        eprintln!("{errors} error(s), {warnings} warning(s)");
    }

    if errors > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn init(path: &Path, port: u16, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    std::fs::write(path, aistudio_config::default_config_template(port))?;
    eprintln!("Wrote {}", path.display());
    Ok(())
}
