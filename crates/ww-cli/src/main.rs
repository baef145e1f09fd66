//! WebWatch CLI
//!
//! Check URLs against the blocklist, manage blocklist entries and report
//! visits to the tracking server.

mod bench;
mod rules_file;

use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use ww_client::{ApiClient, RuleKey, RuleSetProvider, Settings, Visit};
use ww_core::{display_pattern, display_reason, HostCase, Matcher, Rule, RuleMatch};

#[derive(Parser)]
#[command(name = "webwatch")]
#[command(about = "WebWatch blocklist and visit tracking tools")]
struct Cli {
    /// Settings file (JSON, same keys as the extension)
    #[arg(long, global = true, default_value = "webwatch.json")]
    config: PathBuf,

    /// Tracking server URL, overrides the settings file
    #[arg(long, global = true)]
    server: Option<String>,

    /// Compare hosts case-insensitively in domain rules
    #[arg(long, global = true)]
    ignore_host_case: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Errors only
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a URL is blocked
    Check {
        /// URL to check
        url: String,

        /// Blocklist JSON file instead of the server
        #[arg(short, long)]
        rules: Option<String>,

        /// Show which rule matched and how
        #[arg(short, long)]
        explain: bool,
    },

    /// List blocklist entries
    List,

    /// Add a blocklist entry
    Add {
        /// Pattern: URL, domain:<host>, *.<host>/* or a * glob
        pattern: String,

        /// Reason shown on the notice page
        #[arg(short, long)]
        reason: Option<String>,
    },

    /// Remove a blocklist entry by pattern or index
    Remove {
        /// Pattern as stored, or list index
        key: String,
    },

    /// Report a page visit
    ReportVisit {
        #[arg(long)]
        url: String,

        #[arg(long, default_value = "")]
        title: String,

        /// File with the page markup
        #[arg(long)]
        content_file: Option<String>,

        #[arg(long)]
        incognito: bool,
    },

    /// Measure evaluate latency over a blocklist file
    Bench {
        /// Blocklist JSON file
        #[arg(short, long)]
        rules: String,

        #[arg(short, long, default_value_t = 2000)]
        iterations: usize,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let result = load_settings(&cli).and_then(|settings| run(cli.command, settings));

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Error);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn load_settings(cli: &Cli) -> Result<Settings, String> {
    let mut settings = Settings::load(&cli.config).map_err(|e| e.to_string())?;
    if let Some(server) = &cli.server {
        settings.server_url = server.clone();
    }
    if cli.ignore_host_case {
        settings.host_case = HostCase::IgnoreAscii;
    }
    Ok(settings)
}

fn run(command: Commands, settings: Settings) -> Result<(), String> {
    let matcher = Matcher::with_host_case(settings.host_case);

    match command {
        Commands::Check {
            url,
            rules,
            explain,
        } => cmd_check(&settings, matcher, &url, rules.as_deref(), explain),
        Commands::List => cmd_list(&settings),
        Commands::Add { pattern, reason } => cmd_add(&settings, matcher, &pattern, reason.as_deref()),
        Commands::Remove { key } => cmd_remove(&settings, &key),
        Commands::ReportVisit {
            url,
            title,
            content_file,
            incognito,
        } => cmd_report_visit(&settings, &url, &title, content_file.as_deref(), incognito),
        Commands::Bench { rules, iterations } => bench::run_bench(bench::BenchOptions {
            rules_path: rules,
            iterations,
            matcher,
        }),
    }
}

fn block_on<F: Future>(future: F) -> Result<F::Output, String> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to start tokio runtime: {}", e))?;
    Ok(runtime.block_on(future))
}

fn client(settings: &Settings) -> Result<ApiClient, String> {
    ApiClient::new(&settings.server_url).map_err(|e| e.to_string())
}

fn cmd_check(
    settings: &Settings,
    matcher: Matcher,
    url: &str,
    rules_path: Option<&str>,
    explain: bool,
) -> Result<(), String> {
    let rules = check_rules(settings, rules_path)?;
    let found = matcher.find_match(url, &rules);
    println!("{}", decision_json(found.as_ref())?);

    if explain {
        match found {
            Some(m) => println!(
                "  Rule:     #{} {}\n  Match:    {}\n  Reason:   {}",
                m.index,
                m.rule.pattern,
                m.kind.as_str(),
                display_reason(m.rule.reason.as_deref())
            ),
            None => println!("  No rule matched ({} rules checked)", rules.len()),
        }
    }

    Ok(())
}

/// Rules from a file when given, otherwise from the server.
fn check_rules(settings: &Settings, rules_path: Option<&str>) -> Result<Vec<Rule>, String> {
    match rules_path {
        Some(path) => rules_file::read_rules(Path::new(path)),
        None => {
            let provider = RuleSetProvider::new(client(settings)?, settings.on_fetch_failure);
            Ok(block_on(provider.refresh())?.to_vec())
        }
    }
}

fn decision_json(found: Option<&RuleMatch<'_>>) -> Result<String, String> {
    let decision = found.map(RuleMatch::decision).unwrap_or_default();
    serde_json::to_string(&decision.to_record()).map_err(|e| format!("Failed to encode decision: {}", e))
}

fn cmd_list(settings: &Settings) -> Result<(), String> {
    let client = client(settings)?;
    let rules = block_on(client.fetch_blocklist())?.map_err(|e| e.to_string())?;

    if rules.is_empty() {
        println!("Blocklist is empty");
        return Ok(());
    }

    for (index, rule) in rules.iter().enumerate() {
        println!(
            "{:>4}  {:<40}  {}",
            index,
            display_pattern(&rule.pattern),
            display_reason(rule.reason.as_deref())
        );
    }
    Ok(())
}

fn cmd_add(settings: &Settings, matcher: Matcher, pattern: &str, reason: Option<&str>) -> Result<(), String> {
    let pattern = pattern.trim();
    if pattern.is_empty() {
        return Err("Pattern must not be empty".to_string());
    }
    let client = client(settings)?;

    block_on(async {
        match client.fetch_blocklist().await {
            Ok(rules) if matcher.is_listed(pattern, &rules) => {
                log::warn!("'{}' is already covered by the blocklist", pattern);
            }
            Ok(_) => {}
            Err(e) => log::warn!("Could not check existing entries: {}", e),
        }
        client.add_rule(pattern, reason).await
    })?
    .map_err(|e| e.to_string())?;

    println!("Blocked '{}'", display_pattern(pattern));
    Ok(())
}

fn cmd_remove(settings: &Settings, key: &str) -> Result<(), String> {
    let client = client(settings)?;
    let key: RuleKey = key.parse().map_err(|_| format!("Invalid key '{}'", key))?;

    block_on(client.remove_rule(&key))?.map_err(|e| e.to_string())?;

    println!("Removed '{}'", key);
    Ok(())
}

fn cmd_report_visit(
    settings: &Settings,
    url: &str,
    title: &str,
    content_file: Option<&str>,
    incognito: bool,
) -> Result<(), String> {
    let content = match content_file {
        Some(path) => fs::read_to_string(path).map_err(|e| format!("Failed to read '{}': {}", path, e))?,
        None => String::new(),
    };

    let client = client(settings)?;
    let visit = Visit::new(url, title, content, incognito);
    block_on(client.report_visit(&visit))?.map_err(|e| e.to_string())?;

    println!("Reported visit to {}", url);
    Ok(())
}
