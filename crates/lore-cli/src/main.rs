//! lore CLI: checklists and source notes for agents
//!
//! Commands: serve, checklist, source, list, add, edit, stale, check,
//! completions

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lore_core::{DetailLevel, LoreConfig};
use lore_manage::{ContentManager, NewSource};
use lore_mcp::reload::spawn_index_reloader;
use lore_mcp::LoreMcpService;
use lore_registry::{ListCategory, Registry};
use lore_vault::{ContentRepository, Vault};

#[derive(Parser)]
#[command(name = "lore")]
#[command(version)]
#[command(about = "Task checklists and book notes, served over MCP")]
struct Cli {
    /// Knowledge root directory
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Config file (default: <root>/lore.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run the MCP server on stdio
    Serve {
        /// Reload indexes when routing.json or book_index.json change
        #[arg(long)]
        watch: bool,
    },
    /// Print a task checklist
    #[command(alias = "c")]
    Checklist {
        task_type: String,
        /// brief, standard or detailed
        #[arg(long, short, default_value = "standard")]
        level: String,
        /// Comma-separated heading keywords
        #[arg(long, short, default_value = "")]
        focus: String,
    },
    /// Print one section of a book or article note
    #[command(alias = "s")]
    Source {
        /// Book ID (07) or article ID (a07)
        id: String,
        /// key_ideas, patterns, tradeoffs, pitfalls, framings, applicability or full
        #[arg(long, default_value = "key_ideas")]
        section: String,
    },
    /// List tasks, books and articles
    List {
        /// all, tasks, books or articles
        #[arg(default_value = "all")]
        category: String,
    },
    /// Add a book or article
    Add {
        #[arg(long)]
        title: String,
        /// book, article or blog
        #[arg(long = "type", default_value = "book")]
        source_type: String,
        #[arg(long, default_value = "")]
        category: String,
        /// Task type to cite the source from (repeatable)
        #[arg(long = "task")]
        tasks: Vec<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        /// Markdown note to copy in; `-` reads stdin
        #[arg(long, default_value = "-")]
        file: PathBuf,
    },
    /// Edit a checklist
    Edit {
        task_type: String,
        /// add_items, remove_items or replace_section
        action: String,
        /// Section heading to target
        #[arg(long)]
        section: String,
        /// Content for the edit; read from stdin when omitted
        #[arg(long)]
        content: Option<String>,
    },
    /// Report checklists older than their sources
    Stale,
    /// Check catalog, routing and checklists for broken references
    Check,
    /// Generate shell completions
    Completions { shell: Shell },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr: stdout carries the MCP stream under `serve`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn open(cli: &Cli) -> anyhow::Result<(Vault, LoreConfig)> {
    let config = match &cli.config {
        Some(path) if !path.exists() => bail!("config file '{}' does not exist", path.display()),
        Some(path) => LoreConfig::load_file(path)?,
        None => LoreConfig::load(&cli.root)?,
    };
    let vault = Vault::open_with(&cli.root, config.layout.clone())
        .with_context(|| format!("cannot open knowledge root '{}'", cli.root.display()))?;
    Ok((vault, config))
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("cannot read '{}'", path.display()))
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    if let Commands::Completions { shell } = &cli.command {
        clap_complete::generate(*shell, &mut Cli::command(), "lore", &mut io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    let (vault, config) = open(&cli)?;
    match cli.command {
        Commands::Serve { watch } => {
            let service = LoreMcpService::new(vault.clone(), config.server);
            // Held for the life of the server.
            let _reloader = if watch {
                Some(spawn_index_reloader(vault.root(), service.registry())?)
            } else {
                None
            };
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(serve(service))?;
        }
        Commands::Checklist {
            task_type,
            level,
            focus,
        } => {
            let repository = ContentRepository::new(vault);
            println!(
                "{}",
                repository.checklist_view(&task_type, DetailLevel::parse(&level), &focus)
            );
        }
        Commands::Source { id, section } => {
            let repository = ContentRepository::new(vault);
            println!("{}", repository.read_source_section(&id, &section));
        }
        Commands::List { category } => {
            let category: ListCategory = category.parse().map_err(anyhow::Error::msg)?;
            let mut registry = Registry::new(vault);
            println!("{}", registry.format_listing(category)?);
        }
        Commands::Add {
            title,
            source_type,
            category,
            tasks,
            author,
            year,
            file,
        } => {
            let content = read_input(&file)?;
            let manager = ContentManager::new(vault.clone());
            let mut registry = Registry::new(vault);
            let added = manager.add_source(
                &mut registry,
                NewSource {
                    title,
                    source_type,
                    content,
                    category,
                    task_types: tasks,
                    author,
                    year,
                },
            )?;
            println!("{}", added.message());
        }
        Commands::Edit {
            task_type,
            action,
            section,
            content,
        } => {
            let content = match content {
                Some(content) => content,
                None => read_input(Path::new("-"))?,
            };
            let manager = ContentManager::new(vault);
            let edit = manager.edit_checklist(&task_type, &action, &section, &content)?;
            println!("{}", edit.message());
        }
        Commands::Stale => {
            let manager = ContentManager::new(vault.clone());
            let mut registry = Registry::new(vault);
            println!("{}", manager.staleness_report(&mut registry)?.render());
        }
        Commands::Check => {
            let manager = ContentManager::new(vault.clone());
            let mut registry = Registry::new(vault);
            let issues = manager.integrity_issues(&mut registry)?;
            if issues.is_empty() {
                println!("No integrity issues found.");
                return Ok(ExitCode::SUCCESS);
            }
            for issue in &issues {
                println!("{issue}");
            }
            eprintln!("{} integrity issue(s)", issues.len());
            return Ok(ExitCode::FAILURE);
        }
        Commands::Completions { .. } => {}
    }
    Ok(ExitCode::SUCCESS)
}

async fn serve(service: LoreMcpService) -> anyhow::Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!(root = %service.vault().root().display(), "starting MCP server on stdio");
    let running = service
        .serve(stdio())
        .await
        .context("failed to start MCP server")?;
    running.waiting().await?;
    Ok(())
}
