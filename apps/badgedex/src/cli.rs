//! # CLI Module
//!
//! Command definitions and implementations for the `badgedex` binary.
//!
//! Every `cmd_*` function writes its output to the supplied writer (stdout in
//! the binary, a buffer in tests). Logging goes to stderr, so `--json` output
//! is safe to pipe.

use crate::collection::Collection;
use crate::config::{
    AppConfig, DEFAULT_BIND, DEFAULT_LOOKUPS_PER_MINUTE, DEFAULT_STORE, DEFAULT_TIMEOUT_SECS,
};
use crate::views::{BadgeList, BadgeView, LookupView};
use badgedex_core::tier::BadgeProgress;
use badgedex_core::{
    BadgeError, BadgeRecord, CategoryFilter, FAQS, FilterState, LookupState, RedbOwnedStore,
    SortKey, StatusFilter, process,
};
use badgedex_github::DEFAULT_API_BASE;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Boxed error returned by every command.
pub type CliResult = Result<(), Box<dyn std::error::Error>>;

const PROGRESS_BAR_WIDTH: u64 = 20;

// =============================================================================
// ARGUMENTS
// =============================================================================

/// Browse GitHub achievement badges and estimate your progress.
#[derive(Debug, Parser)]
#[command(name = "badgedex", version, about)]
pub struct Cli {
    /// Preference database holding owned badges.
    #[arg(long, global = true, env = "BADGEDEX_STORE", default_value = DEFAULT_STORE)]
    pub store: PathBuf,

    /// GitHub REST API base URL.
    #[arg(long, global = true, env = "BADGEDEX_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Upstream request timeout in seconds.
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List badges, optionally filtered and sorted.
    List {
        /// Case-insensitive text search over names, descriptions, guides and tips.
        #[arg(long, default_value = "")]
        search: String,
        /// all, owned or missing.
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        /// All or a category name.
        #[arg(long, default_value = "all")]
        category: CategoryFilter,
        /// default, name, category or rarity.
        #[arg(long, default_value = "default")]
        sort: SortKey,
        #[arg(long)]
        json: bool,
    },
    /// Show one badge in full.
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Mark or unmark a badge as collected.
    Toggle {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// List collected badges.
    Owned {
        #[arg(long)]
        json: bool,
    },
    /// Step-by-step earning guides.
    Guides {
        #[arg(long)]
        json: bool,
    },
    /// Frequently asked questions.
    Faq {
        #[arg(long)]
        json: bool,
    },
    /// Look up a GitHub user and estimate Pull Shark / Starstruck progress.
    Check {
        username: String,
        #[arg(long)]
        json: bool,
    },
    /// Serve the catalog as a local JSON API.
    Serve {
        #[arg(long, env = "BADGEDEX_BIND", default_value = DEFAULT_BIND)]
        bind: String,
        /// Bearer key required on mutating routes.
        #[arg(long, env = "BADGEDEX_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        /// Profile lookups forwarded upstream per minute.
        #[arg(long, default_value_t = DEFAULT_LOOKUPS_PER_MINUTE)]
        lookups_per_minute: u32,
    },
}

impl Cli {
    /// Collect global flags (and `serve` flags, if present) into a config.
    pub fn config(&self) -> AppConfig {
        let mut config = AppConfig {
            store_path: self.store.clone(),
            api_base: self.api_base.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            ..AppConfig::default()
        };
        if let Commands::Serve {
            bind,
            api_key,
            lookups_per_minute,
        } = &self.command
        {
            config.bind.clone_from(bind);
            config.api_key.clone_from(api_key);
            config.lookups_per_minute = *lookups_per_minute;
        }
        config
    }
}

// =============================================================================
// SHARED HELPERS
// =============================================================================

/// Open the redb store at `path` and load the collection from it.
pub fn open_collection(path: &Path) -> Result<Collection<RedbOwnedStore>, BadgeError> {
    let store = RedbOwnedStore::open(path)?;
    Ok(Collection::load(store))
}

fn write_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> CliResult {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn badge_line(badge: &BadgeRecord, owned: bool) -> String {
    format!(
        "[{}] {} {:<28} {:<8} {:<10} {}",
        if owned { "x" } else { " " },
        badge.glyph,
        badge.name,
        badge.status.as_str(),
        badge.rarity.as_str(),
        badge.category.as_str(),
    )
}

/// `[#####...............]` for `value` out of `next`; full at Gold.
fn progress_bar(value: u64, next: Option<u64>) -> String {
    let filled = match next {
        Some(next) if next > 0 => (value.saturating_mul(PROGRESS_BAR_WIDTH) / next).min(PROGRESS_BAR_WIDTH),
        _ => PROGRESS_BAR_WIDTH,
    };
    let empty = PROGRESS_BAR_WIDTH.saturating_sub(filled);
    format!("[{}{}]", "#".repeat(filled as usize), ".".repeat(empty as usize))
}

fn progress_line(progress: &BadgeProgress) -> String {
    let p = &progress.progress;
    let next = p
        .next_threshold
        .map_or_else(|| "max tier".to_string(), |n| format!("next at {n}"));
    format!(
        "{:<11} {:<11} {:>6}  {:<6} {} {:.1}% ({})",
        progress.track.badge_name,
        progress.track.metric,
        progress.value,
        p.tier.as_str(),
        progress_bar(progress.value, p.next_threshold),
        p.display_percent(),
        next,
    )
}

// =============================================================================
// CATALOG COMMANDS
// =============================================================================

/// `badgedex list`
pub fn cmd_list(
    store_path: &Path,
    filter: &FilterState,
    json: bool,
    out: &mut impl Write,
) -> CliResult {
    let collection = open_collection(store_path)?;
    let catalog = collection.catalog();
    let owned = collection.owned();
    let shown = process(catalog.badges(), filter, owned);

    if json {
        return write_json(out, &BadgeList::new(catalog, shown, owned));
    }

    let visible_owned = owned.visible(catalog).count();
    writeln!(
        out,
        "Showing {} of {} badges ({} collected)",
        shown.len(),
        catalog.len(),
        visible_owned
    )?;
    for badge in shown {
        writeln!(out, "{}", badge_line(badge, owned.contains(badge.id)))?;
    }
    Ok(())
}

/// `badgedex show <id>`
pub fn cmd_show(store_path: &Path, id: &str, json: bool, out: &mut impl Write) -> CliResult {
    let collection = open_collection(store_path)?;
    let badge = collection
        .catalog()
        .get(id)
        .ok_or_else(|| BadgeError::UnknownBadge(id.to_string()))?;
    let owned = collection.owned().contains(badge.id);

    if json {
        return write_json(out, &BadgeView::new(badge, collection.owned()));
    }

    writeln!(out, "{} {}{}", badge.glyph, badge.name, if owned { "  (collected)" } else { "" })?;
    writeln!(out, "{}", badge.description)?;
    writeln!(
        out,
        "Status: {}  Rarity: {}  Category: {}",
        badge.status, badge.rarity, badge.category
    )?;
    if !badge.tiers.is_empty() {
        writeln!(out, "\nTiers:")?;
        for req in badge.tiers {
            writeln!(out, "  {:<7} {}", req.tier.as_str(), req.description)?;
        }
    }
    if !badge.guide.is_empty() {
        writeln!(out, "\nHow to earn:")?;
        for (n, step) in badge.guide.iter().enumerate() {
            writeln!(out, "  {}. {}", n + 1, step)?;
        }
    }
    if !badge.tips.is_empty() {
        writeln!(out, "\nTips:")?;
        for tip in badge.tips {
            writeln!(out, "  - {tip}")?;
        }
    }
    if let Some(note) = badge.note {
        writeln!(out, "\nNote: {note}")?;
    }
    Ok(())
}

/// `badgedex toggle <id>`
pub fn cmd_toggle(store_path: &Path, id: &str, json: bool, out: &mut impl Write) -> CliResult {
    let mut collection = open_collection(store_path)?;
    let now_owned = collection.toggle(id)?;
    let owned_count = collection.owned().visible(collection.catalog()).count();
    info!(badge = id, owned = now_owned, "badge toggled");

    if json {
        return write_json(
            out,
            &crate::views::ToggleResult {
                id: id.to_string(),
                owned: now_owned,
                owned_count,
            },
        );
    }

    let verb = if now_owned { "Collected" } else { "Removed" };
    writeln!(out, "{verb} {id} ({owned_count} collected)")?;
    Ok(())
}

/// `badgedex owned`
pub fn cmd_owned(store_path: &Path, json: bool, out: &mut impl Write) -> CliResult {
    let collection = open_collection(store_path)?;
    let catalog = collection.catalog();
    let owned = collection.owned();
    let visible: Vec<&'static BadgeRecord> = owned.visible(catalog).collect();

    if json {
        return write_json(out, &BadgeList::new(catalog, visible, owned));
    }

    writeln!(out, "{} of {} badges collected", visible.len(), catalog.len())?;
    for badge in visible {
        writeln!(out, "{}", badge_line(badge, true))?;
    }
    Ok(())
}

/// `badgedex guides`
pub fn cmd_guides(json: bool, out: &mut impl Write) -> CliResult {
    let catalog = badgedex_core::Catalog::builtin();
    let guides: Vec<&BadgeRecord> = catalog.guides().collect();

    if json {
        return write_json(out, &guides);
    }

    for badge in guides {
        writeln!(out, "{} {}", badge.glyph, badge.name)?;
        for (n, step) in badge.guide.iter().enumerate() {
            writeln!(out, "  {}. {}", n + 1, step)?;
        }
        for tip in badge.tips {
            writeln!(out, "  tip: {tip}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// `badgedex faq`
pub fn cmd_faq(json: bool, out: &mut impl Write) -> CliResult {
    if json {
        return write_json(out, FAQS);
    }

    for item in FAQS {
        writeln!(out, "Q: {}", item.question)?;
        writeln!(out, "A: {}", item.answer)?;
        if let Some(fix) = item.fix {
            writeln!(out, "Fix: {fix}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

// =============================================================================
// LOOKUP
// =============================================================================

/// `badgedex check <username>`
///
/// Prints the profile and progress, or the failure message. A failed lookup
/// is also returned as an error so the exit status is non-zero.
pub async fn cmd_check(
    config: &AppConfig,
    username: &str,
    json: bool,
    out: &mut impl Write,
) -> CliResult {
    let client = config.github_client()?;
    let mut state = LookupState::new();
    let ticket = state
        .begin(username)
        .ok_or("username must not be empty")?;

    let outcome = client.lookup(username).await.map_err(|err| {
        tracing::warn!(username, error = %err, "profile lookup failed");
        err.failure()
    });
    state.finish(ticket, outcome);

    if json {
        write_json(out, &LookupView::from(&state))?;
    } else if let Some(profile) = &state.profile {
        writeln!(out, "{} (@{})", profile.display_name(), profile.login)?;
        writeln!(out, "{}", profile.display_bio())?;
        writeln!(
            out,
            "{} public repos, {} followers",
            profile.public_repos, profile.followers
        )?;
        if let Some(progress) = state.progress() {
            writeln!(out)?;
            for p in &progress {
                writeln!(out, "{}", progress_line(p))?;
            }
        }
        writeln!(out, "\nOfficial achievements: {}", profile.achievements_url())?;
    }

    match state.error {
        Some(failure) => {
            if !json {
                writeln!(out, "{failure}")?;
            }
            Err(failure.message().into())
        }
        None => Ok(()),
    }
}

// =============================================================================
// SERVER
// =============================================================================

/// `badgedex serve`
pub async fn cmd_serve(config: &AppConfig) -> CliResult {
    let store = RedbOwnedStore::open(&config.store_path)?;
    info!(store = %store.path().display(), "preference store opened");
    let state = crate::api::AppState::new(config, Box::new(store))?;
    let app = crate::api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    info!(addr = %listener.local_addr()?, "badgedex API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("received shutdown signal, starting graceful shutdown");
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_scales_to_width() {
        assert_eq!(progress_bar(0, Some(2)), format!("[{}]", ".".repeat(20)));
        assert_eq!(progress_bar(4, Some(16)), format!("[{}{}]", "#".repeat(5), ".".repeat(15)));
        assert_eq!(progress_bar(5000, None), format!("[{}]", "#".repeat(20)));
    }

    #[test]
    fn parses_filters_from_flags() {
        let cli = Cli::try_parse_from([
            "badgedex", "list", "--status", "missing", "--category", "community", "--sort",
            "rarity",
        ]);
        let Ok(Cli {
            command:
                Commands::List {
                    status,
                    category,
                    sort,
                    ..
                },
            ..
        }) = cli
        else {
            unreachable!("list should parse");
        };
        assert_eq!(status, StatusFilter::Missing);
        assert_eq!(
            category,
            CategoryFilter::Only(badgedex_core::Category::Community)
        );
        assert_eq!(sort, SortKey::Rarity);
    }

    #[test]
    fn rejects_unknown_sort() {
        assert!(Cli::try_parse_from(["badgedex", "list", "--sort", "shiny"]).is_err());
    }

    #[test]
    fn serve_flags_land_in_config() {
        let cli = Cli::try_parse_from([
            "badgedex",
            "--timeout-secs",
            "5",
            "serve",
            "--bind",
            "0.0.0.0:9000",
            "--lookups-per-minute",
            "3",
        ]);
        let config = cli.map(|c| c.config());
        let config = config.ok();
        assert_eq!(config.as_ref().map(|c| c.bind.as_str()), Some("0.0.0.0:9000"));
        assert_eq!(config.as_ref().map(|c| c.lookups_per_minute), Some(3));
        assert_eq!(config.map(|c| c.timeout), Some(Duration::from_secs(5)));
    }
}
