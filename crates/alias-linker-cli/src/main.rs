use alias_linker_config::Config;
use alias_linker_engine::{AliasLinker, DocumentStore, DuplicateAliasPolicy, Outcome, VaultStore};
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// Rewrite bare alias wikilinks in a notes directory as [[Note|Alias]]
#[derive(Debug, Parser)]
#[command(name = "alias-linker", version, about)]
struct Cli {
    /// Notes directory, overriding the config file
    #[arg(long, global = true)]
    notes_path: Option<PathBuf>,

    /// Config file to use instead of ~/.config/alias-linker/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// How to treat an alias declared by several notes
    #[arg(long, global = true, value_enum)]
    duplicates: Option<PolicyArg>,

    /// Log each rewrite
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Qualify every declared alias across all notes
    Resolve,
    /// Resolve the bare links inside a single note
    Open {
        /// Note path relative to the notes directory, `.md` optional
        note: String,
    },
    /// List aliases claimed by more than one note
    Duplicates,
    /// Write a config file pointing at a notes directory
    Init {
        /// Notes directory to record
        directory: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    FirstWins,
    Skip,
}

impl From<PolicyArg> for DuplicateAliasPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::FirstWins => DuplicateAliasPolicy::FirstWins,
            PolicyArg::Skip => DuplicateAliasPolicy::Skip,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    log::debug!("Config path: {}", config_path.display());

    match &cli.command {
        Command::Init { directory } => init(&cli, directory, &config_path),
        Command::Resolve => {
            let linker = open_linker(&cli, &config_path)?;
            let report = linker.on_metadata_resolved().await;
            for document in &report.rewritten {
                println!("rewrote {document}");
            }
            if !report.is_clean() {
                for failure in &report.failures {
                    eprintln!("failed {}: {}", failure.document, failure.error);
                }
                bail!("{} notes could not be updated", report.failures.len());
            }
            Ok(())
        }
        Command::Open { note } => {
            let linker = open_linker(&cli, &config_path)?;
            let relative = if note.ends_with(".md") {
                note.clone()
            } else {
                format!("{note}.md")
            };
            let Some(document) = linker.store().document(&relative) else {
                bail!(
                    "no note {relative} in {}",
                    linker.store().notes_root().display()
                );
            };
            match linker.on_document_opened(&document).await? {
                Outcome::Rewritten => println!("rewrote {document}"),
                Outcome::Unchanged => println!("{document} already up to date"),
            }
            Ok(())
        }
        Command::Duplicates => {
            let linker = open_linker(&cli, &config_path)?;
            for duplicate in linker.index().duplicate_aliases() {
                let owners: Vec<String> =
                    duplicate.documents.iter().map(|d| d.to_string()).collect();
                println!("{}: {}", duplicate.alias, owners.join(", "));
            }
            Ok(())
        }
    }
}

fn init(cli: &Cli, directory: &Path, config_path: &Path) -> Result<()> {
    let notes_path = Config::expand_path(directory).unwrap_or_else(|| directory.to_path_buf());
    let mut config = Config::new(notes_path);
    if let Some(policy) = cli.duplicates {
        config.duplicate_aliases = policy.into();
    }
    config
        .save_to_path(config_path)
        .with_context(|| format!("writing {}", config_path.display()))?;
    log::info!("Wrote config to {}", config_path.display());
    Ok(())
}

/// Command-line flags win over the config file
fn open_linker(cli: &Cli, config_path: &Path) -> Result<AliasLinker<VaultStore>> {
    let config = Config::load_from_path(config_path)?;

    let notes_path = match (&cli.notes_path, &config) {
        (Some(path), _) => path.clone(),
        (None, Some(config)) => config.notes_path.clone(),
        (None, None) => bail!(
            "no notes directory: pass --notes-path or run `alias-linker init <dir>` to create {}",
            config_path.display()
        ),
    };
    let policy = cli
        .duplicates
        .map(DuplicateAliasPolicy::from)
        .or(config.as_ref().map(|c| c.duplicate_aliases))
        .unwrap_or_default();

    let store = VaultStore::open(&notes_path)
        .with_context(|| format!("opening notes directory {}", notes_path.display()))?;
    log::info!(
        "Opened {} with {} notes",
        notes_path.display(),
        store.list_documents().len()
    );
    Ok(AliasLinker::new(store).with_policy(policy))
}
