//! RESCACHE CLI
//!
//! Terminal consumer of the resource cache: submits creature names, shows a
//! loading fallback while the lookup is pending, then the data or error view.

mod dex;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rescache_cache::{CacheConfig, ResourceCache};
use rescache_core::traits::Clock;
use rescache_core::CacheError;
use rescache_resource::Resource;

use crate::dex::{Creature, Dex};

/// RESCACHE - Expiring resource cache demo
#[derive(Parser)]
#[command(name = "rescache")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Debug)]
struct CacheArgs {
    /// Freshness window in milliseconds (defaults to RESCACHE_FRESHNESS_WINDOW_MS or 10000)
    #[arg(short = 'w', long)]
    freshness_window_ms: Option<u64>,
    /// Simulated fetch latency in milliseconds
    #[arg(short, long, default_value = "1500")]
    delay_ms: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up creatures in order, reporting cache reuse
    Lookup {
        /// Creature names
        #[arg(required = true)]
        names: Vec<String>,
        /// Pause between lookups in milliseconds
        #[arg(short, long, default_value = "0")]
        pause_ms: u64,
        /// Print a JSON report instead of views
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        cache: CacheArgs,
    },

    /// Read one name per line from stdin; an empty line resets the view
    Session {
        #[command(flatten)]
        cache: CacheArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "rescache=debug,info"
    } else {
        "rescache=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Lookup {
            names,
            pause_ms,
            json,
            cache,
        } => cmd_lookup(&names, Duration::from_millis(pause_ms), json, &cache).await,
        Commands::Session { cache } => cmd_session(&cache).await,
    }
}

fn build_cache(args: &CacheArgs) -> Result<ResourceCache<Creature>> {
    let mut config = CacheConfig::from_env().context("Failed to load cache configuration")?;
    if let Some(window) = args.freshness_window_ms {
        config.freshness_window_ms = window;
    }
    tracing::info!(window_ms = config.freshness_window_ms, "Cache ready");
    Ok(ResourceCache::with_config(config))
}

/// Outcome of submitting a name to the cache.
struct Submission {
    resource: Resource<Creature>,
    reused: bool,
}

/// Gets the resource for `name`, starting a fetch on a miss or stale hit.
fn submit<C: Clock>(
    cache: &ResourceCache<Creature, C>,
    dex: &Dex,
    name: &str,
) -> std::result::Result<Submission, CacheError> {
    let mut fetched = false;
    let resource = cache.get_or_create(name, || {
        fetched = true;
        dex.resource(&name.to_lowercase())
    })?;
    Ok(Submission {
        resource,
        reused: !fetched,
    })
}

#[derive(Serialize)]
struct LookupReport {
    name: String,
    resource: u64,
    reused: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    creature: Option<Creature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Look up names in order
async fn cmd_lookup(names: &[String], pause: Duration, json: bool, args: &CacheArgs) -> Result<()> {
    let cache = build_cache(args)?;
    let dex = Dex::new(Duration::from_millis(args.delay_ms));
    let mut reports = Vec::with_capacity(names.len());

    for (i, name) in names.iter().enumerate() {
        if i > 0 && !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }

        let submission = submit(&cache, &dex, name)
            .with_context(|| format!("Invalid creature name {:?}", name))?;

        if json {
            let outcome = submission.resource.wait().await;
            reports.push(LookupReport {
                name: name.clone(),
                resource: submission.resource.id().get(),
                reused: submission.reused,
                creature: outcome.as_ref().ok().cloned(),
                error: outcome.err().map(|e| e.to_string()),
            });
            continue;
        }

        let tag = if submission.reused {
            "♻️  cached".green()
        } else {
            "🌐 fetching".yellow()
        };
        println!(
            "{} {} {}",
            tag,
            name.bold(),
            format!("({})", submission.resource.id()).dimmed()
        );
        render(name, &submission.resource).await?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_stats(&cache);
    }

    Ok(())
}

/// Interactive form: one submission per line
async fn cmd_session(args: &CacheArgs) -> Result<()> {
    let cache = build_cache(args)?;
    let dex = Dex::new(Duration::from_millis(args.delay_ms));
    let mut current: Option<Resource<Creature>> = None;

    println!("{}", "Submit a creature (empty line resets, :stats, :quit)".cyan().bold());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let name = line.trim();
        match name {
            "" => {
                current = None;
                println!("{}", "Submit a creature".dimmed());
                continue;
            }
            ":quit" | ":q" => break,
            ":stats" => {
                print_stats(&cache);
                continue;
            }
            _ => {}
        }

        let submission = match submit(&cache, &dex, name) {
            Ok(s) => s,
            Err(e) => {
                println!("{} {}", "❌".red(), e);
                continue;
            }
        };

        // Same handle as the one on screen: keep the view (and any error) as-is.
        if let Some(shown) = &current {
            if Resource::ptr_eq(shown, &submission.resource) {
                println!("{}", format!("   unchanged ({})", shown.id()).dimmed());
                continue;
            }
        }

        render(name, &submission.resource).await?;
        current = Some(submission.resource);
    }

    Ok(())
}

/// Render a resource: fallback while pending, then the data or error view.
async fn render(name: &str, resource: &Resource<Creature>) -> Result<()> {
    let outcome = match resource.read() {
        Err(CacheError::Suspended) => {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")?,
            );
            spinner.set_message(format!("Loading {}...", name));
            spinner.enable_steady_tick(Duration::from_millis(80));
            let outcome = resource.wait().await;
            spinner.finish_and_clear();
            outcome
        }
        settled => settled,
    };

    match outcome {
        Ok(creature) => print_creature(&creature),
        Err(e) => {
            println!("{}", "There was an error:".red().bold());
            println!("   {}", e.to_string().red());
            println!("   {}", "Submit another name (or an empty line) to try again".dimmed());
        }
    }
    Ok(())
}

fn print_creature(creature: &Creature) {
    println!(
        "   {} {}",
        creature.name.bold(),
        format!("#{:03}", creature.number).dimmed()
    );
    println!("   {} {}", "Image:".dimmed(), creature.image);
    for attack in &creature.attacks {
        println!(
            "   {:<14} {:<10} {}",
            attack.name,
            attack.kind.dimmed(),
            attack.damage
        );
    }
}

fn print_stats<C: Clock>(cache: &ResourceCache<Creature, C>) {
    let stats = cache.stats();
    println!("\n{}", "📊 Cache:".cyan().bold());
    println!(
        "   {} {} ({} fresh, {} stale)",
        "Entries:".dimmed(),
        stats.total_entries,
        stats.fresh_entries,
        stats.stale_entries
    );
    println!(
        "   {} {}  {} {}  {} {}",
        "Hits:".dimmed(),
        stats.hits,
        "Misses:".dimmed(),
        stats.misses,
        "Refreshes:".dimmed(),
        stats.refreshes
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rescache_core::traits::ManualClock;

    fn make_cache(window_ms: u64) -> (ResourceCache<Creature, ManualClock>, ManualClock) {
        let clock = ManualClock::new(0);
        let config = CacheConfig::default().with_freshness_window(Duration::from_millis(window_ms));
        (ResourceCache::with_clock(config, clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_submit_reuses_within_window() {
        let (cache, _clock) = make_cache(10_000);
        let dex = Dex::new(Duration::ZERO);

        let first = submit(&cache, &dex, "Pikachu").unwrap();
        let second = submit(&cache, &dex, "pikachu").unwrap();
        assert!(!first.reused);
        assert!(second.reused);
        assert!(Resource::ptr_eq(&first.resource, &second.resource));
        assert_eq!(second.resource.wait().await.unwrap().number, 25);
    }

    #[tokio::test]
    async fn test_submit_refetches_when_stale() {
        let (cache, clock) = make_cache(100);
        let dex = Dex::new(Duration::ZERO);

        let first = submit(&cache, &dex, "eevee").unwrap();
        clock.advance(Duration::from_millis(150));
        let second = submit(&cache, &dex, "EEVEE").unwrap();
        assert!(!second.reused);
        assert!(!Resource::ptr_eq(&first.resource, &second.resource));
    }

    #[tokio::test]
    async fn test_submit_caches_failures() {
        let (cache, _clock) = make_cache(10_000);
        let dex = Dex::new(Duration::ZERO);

        let first = submit(&cache, &dex, "mewthree").unwrap();
        assert!(first.resource.wait().await.is_err());
        let second = submit(&cache, &dex, "MewThree").unwrap();
        assert!(second.reused);
    }

    #[test]
    fn test_submit_rejects_blank() {
        let (cache, _clock) = make_cache(10_000);
        let dex = Dex::new(Duration::ZERO);
        assert!(matches!(
            submit(&cache, &dex, "  "),
            Err(CacheError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_cli_parses_lookup() {
        let cli = Cli::try_parse_from(["rescache", "lookup", "pikachu", "Pikachu", "-w", "100", "--json"])
            .unwrap();
        match cli.command {
            Commands::Lookup { names, json, cache, .. } => {
                assert_eq!(names, vec!["pikachu", "Pikachu"]);
                assert!(json);
                assert_eq!(cache.freshness_window_ms, Some(100));
                assert_eq!(cache.delay_ms, 1500);
            }
            _ => panic!("expected lookup"),
        }
    }
}
