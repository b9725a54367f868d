use actions_embed_config::Config;
use actions_embed_engine::{Document, Grammar, GrammarReport, scan_all};
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde::Serialize;
use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
};

/// Report embedded-language regions in GitHub Actions workflow files
#[derive(Parser, Debug)]
#[command(name = "actions-embed", version)]
struct CliArgs {
    /// Workflow files to scan
    #[arg(value_name = "FILES", required = true)]
    files: Vec<PathBuf>,

    /// Grammar to scan with (repeatable; default: every configured grammar)
    #[arg(short = 'g', long = "grammar", value_name = "NAME")]
    grammars: Vec<String>,

    /// Config file (default: ~/.config/actions-embed/config.toml)
    #[arg(short = 'c', long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print a JSON array instead of text
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Serialize)]
struct FileReport {
    path: String,
    grammar: String,
    report: actions_embed_engine::ScanReport,
}

fn main() -> Result<()> {
    let args = CliArgs::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    let config = load_config(args.config.as_deref())?;
    let grammars = select_grammars(config.resolve_grammars()?, &args.grammars)?;
    log::debug!(
        "scanning {} files with {} grammars",
        args.files.len(),
        grammars.len()
    );

    let results = scan_files(&args.files, &grammars)?;

    if args.json {
        let flat: Vec<FileReport> = results
            .into_iter()
            .flat_map(|(path, reports)| {
                let path = path.display().to_string();
                reports.into_iter().map(move |r| FileReport {
                    path: path.clone(),
                    grammar: r.grammar,
                    report: r.report,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&flat)?);
    } else {
        for (path, reports) in &results {
            print!("{}", render_text(path, reports));
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => {
            let expanded = Config::expand_path(path).unwrap_or_else(|| path.to_path_buf());
            Config::load_from_path(&expanded)?
                .with_context(|| format!("Config file '{}' not found", expanded.display()))?
        }
        None => Config::load()?.unwrap_or_default(),
    };
    Ok(config)
}

/// Keeps the requested grammars in the order they were asked for.
fn select_grammars(available: Vec<Grammar>, requested: &[String]) -> Result<Vec<Grammar>> {
    if requested.is_empty() {
        return Ok(available);
    }
    requested
        .iter()
        .map(|name| {
            available
                .iter()
                .find(|g| &g.name == name)
                .cloned()
                .ok_or_else(|| {
                    let known: Vec<_> = available.iter().map(|g| g.name.as_str()).collect();
                    anyhow!("Unknown grammar '{name}' (available: {})", known.join(", "))
                })
        })
        .collect()
}

/// Scans each file on its own thread; results come back in input order.
fn scan_files(
    files: &[PathBuf],
    grammars: &[Grammar],
) -> Result<Vec<(PathBuf, Vec<GrammarReport>)>> {
    std::thread::scope(|s| {
        let handles: Vec<_> = files
            .iter()
            .map(|path| {
                s.spawn(move || -> Result<(PathBuf, Vec<GrammarReport>)> {
                    let text = std::fs::read_to_string(path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    let doc = Document::new(text);
                    log::debug!("{}: {} lines", path.display(), doc.line_count());
                    Ok((path.clone(), scan_all(&doc, grammars)))
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().map_err(|_| anyhow!("scan thread panicked"))?)
            .collect()
    })
}

fn render_text(path: &Path, reports: &[GrammarReport]) -> String {
    let mut out = String::new();
    for GrammarReport { grammar, report } in reports {
        if report.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{} [{grammar}]", path.display());
        for step in &report.steps {
            let _ = writeln!(out, "  {:>5}  step    {}", step.line, step.action);
        }
        for nested in &report.nested_keys {
            let _ = writeln!(out, "  {:>5}  nested  {}", nested.line, nested.key);
        }
        for block in &report.blocks {
            let body = match block.body {
                Some(body) => format!("{}-{}", body.first, body.last),
                None => "empty".to_string(),
            };
            let _ = writeln!(
                out,
                "  {:>5}  block   {} ({body})",
                block.header_line,
                block.scope()
            );
        }
    }
    out
}
