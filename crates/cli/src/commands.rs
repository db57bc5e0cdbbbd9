//! CLI commands

use anyhow::{Context, Result};
use calltrack_core::{FileStore, NotificationLog, app_icon_path};
use calltrack_dashboard::feed::{Completion, FeedLoader, FeedSource};
use calltrack_dashboard::navigation::{
    CALL_LOGS_PATH, NOTIFICATIONS_PATH, customer_path, page_title, product_path,
};
use calltrack_dashboard::{Dashboard, DashboardConfig, GateState, ScrollPosition};
use chrono::{TimeZone, Utc};
use clap::Subcommand;
use clap::builder::RangedU64ValueParser;
use std::sync::Arc;
use tracing::{info, warn};

/// Height of the simulated terminal viewport, in pixels
const VIEWPORT_HEIGHT_PX: f64 = 900.0;

/// Rendered height of one feed row
const ROW_HEIGHT_PX: f64 = 72.0;

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and persist the session
    Login {
        username: String,

        #[arg(long, env = "CALLTRACK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create a dashboard account
    Signup {
        username: String,

        #[arg(long, env = "CALLTRACK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and wipe the persisted session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List call logs
    CallLogs {
        /// Number of pages to load (at least one)
        #[arg(long, default_value_t = 1, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
        pages: usize,
    },

    /// List notifications
    Notifications {
        /// Number of pages to load (at least one)
        #[arg(long, default_value_t = 1, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
        pages: usize,
    },

    /// Show a product from the reference catalog
    Product { id: u64 },

    /// Show a customer from the reference catalog
    Customer { id: u64 },

    /// Print the icon URL for an Android package id
    Icon { app_id: String },
}

impl Commands {
    pub async fn execute(self, config: DashboardConfig) -> Result<()> {
        match self {
            Self::Login { username, password } => {
                let user = connect(config)?.auth().login(&username, &password).await?;
                println!("Logged in as {} ({})", user.username, user.role);
                Ok(())
            }
            Self::Signup { username, password } => {
                let message = connect(config)?.auth().signup(&username, &password).await?;
                println!("{message}");
                Ok(())
            }
            Self::Logout => {
                connect(config)?.auth().logout().await?;
                println!("Logged out");
                Ok(())
            }
            Self::Whoami => whoami(&connect(config)?).await,
            Self::CallLogs { pages } => call_logs(&connect(config)?, pages).await,
            Self::Notifications { pages } => notifications(&connect(config)?, pages).await,
            Self::Product { id } => product(&connect(config)?, id).await,
            Self::Customer { id } => customer(&connect(config)?, id).await,
            // Offline: no session store or network
            Self::Icon { app_id } => {
                println!("{}", app_icon_path(&app_id));
                Ok(())
            }
        }
    }
}

/// Dashboard services over the session file in the configured data dir
fn connect(config: DashboardConfig) -> Result<Dashboard> {
    let store = Arc::new(FileStore::in_dir(&config.data_dir));
    Dashboard::new(config, store).context("building dashboard client")
}

/// Mount a protected view, failing with a login hint when redirected
async fn require_session(dashboard: &Dashboard) -> Result<()> {
    let mut gate = dashboard.route_gate();
    let state = gate.mount().await.clone();
    if !matches!(state, GateState::Authenticated(_)) {
        info!(?state, "protected view not available");
        anyhow::bail!("Not logged in. Run 'calltrack login <username>' first.");
    }
    gate.render();
    Ok(())
}

async fn whoami(dashboard: &Dashboard) -> Result<()> {
    let mut gate = dashboard.route_gate();
    if let GateState::Redirected { .. } = gate.mount().await {
        println!("Not logged in");
        return Ok(());
    }
    match gate.session().user {
        Some(user) => println!("{} (id {}, role {})", user.username, user.id, user.role),
        None => match dashboard.auth().session().await.user {
            Some(user) => println!("{} (id {})", user.username, user.id),
            None => println!("Logged in"),
        },
    }
    Ok(())
}

/// Load up to `pages` pages by scrolling to the bottom after each one
async fn load_pages<S: FeedSource>(feed: &mut FeedLoader<S>, pages: usize) {
    if let Completion::Failed(e) = feed.mount().await {
        warn!(error = %e, "first page failed");
    }

    for _ in 1..pages {
        let document_height = feed.items().len() as f64 * ROW_HEIGHT_PX;
        let position = ScrollPosition::at_bottom(VIEWPORT_HEIGHT_PX, document_height);
        match feed.on_scroll(position).await {
            Some(Completion::Applied { .. }) => {}
            Some(Completion::Failed(e)) => {
                warn!(error = %e, "page failed, stopping");
                break;
            }
            Some(_) | None => break,
        }
    }
    feed.unmount();
}

async fn call_logs(dashboard: &Dashboard, pages: usize) -> Result<()> {
    require_session(dashboard).await?;
    dashboard.navigator().navigate(CALL_LOGS_PATH).await;

    let mut feed = dashboard.call_log_feed();
    load_pages(&mut feed, pages).await;

    println!("== {} ==", page_title(CALL_LOGS_PATH));
    for log in feed.items() {
        let when = log
            .occurred_at()
            .map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d %H:%M").to_string());
        println!(
            "{when}  {:<20} {:<16} {:<8} {}",
            log.display_name(),
            log.phone_number,
            log.call_type(),
            log.formatted_duration()
        );
    }
    print_footer(feed.items().len(), feed.has_more());
    Ok(())
}

async fn notifications(dashboard: &Dashboard, pages: usize) -> Result<()> {
    require_session(dashboard).await?;
    dashboard.navigator().navigate(NOTIFICATIONS_PATH).await;

    let mut feed = dashboard.notification_feed();
    load_pages(&mut feed, pages).await;

    println!("== {} ==", page_title(NOTIFICATIONS_PATH));
    if let Some(total) = feed.state().total() {
        println!("{total} total");
    }
    let now = Utc::now();
    for log in feed.items() {
        print_notification(log, now);
    }
    print_footer(feed.items().len(), feed.has_more());
    Ok(())
}

fn print_notification(log: &NotificationLog, now: chrono::DateTime<Utc>) {
    let marker = if log.is_recent(now) { "*" } else { " " };
    let when = Utc
        .timestamp_millis_opt(log.time)
        .single()
        .map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d %H:%M").to_string());
    println!("{marker} {when}  [{}] {}: {}", log.app, log.title, log.text);
    println!("    icon: {}", app_icon_path(&log.app));
    for message in log.grouped() {
        println!("    - {}: {}", message.title, message.text);
    }
}

fn print_footer(count: usize, has_more: bool) {
    if has_more {
        println!("-- {count} shown, more available (use --pages) --");
    } else {
        println!("-- {count} shown, end of list --");
    }
}

async fn product(dashboard: &Dashboard, id: u64) -> Result<()> {
    let back = dashboard.navigator().back_to_listing(CALL_LOGS_PATH).await;
    let product = dashboard
        .product(id)
        .await
        .with_context(|| format!("fetching product {id}"))?;

    println!("== {} ==", page_title(&product_path(id)));
    println!("{} ({})", product.title, product.brand);
    println!("  {}", product.description);
    if product.has_discount() {
        println!(
            "  price: {:.2} (was {:.2}, -{:.0}%)",
            product.discounted_price(),
            product.price,
            product.discount_percentage
        );
    } else {
        println!("  price: {:.2}", product.price);
    }
    let stock_note = if product.is_low_stock() { " (low stock)" } else { "" };
    println!("  stock: {}{stock_note}", product.stock);
    println!("  rating: {:.1}", product.rating);
    println!("  image: {}", product.primary_image(0));
    for (label, value) in [
        ("warranty", &product.warranty_information),
        ("shipping", &product.shipping_information),
        ("returns", &product.return_policy),
    ] {
        if let Some(value) = value {
            println!("  {label}: {value}");
        }
    }
    println!("back: {back}");
    Ok(())
}

async fn customer(dashboard: &Dashboard, id: u64) -> Result<()> {
    let back = dashboard.navigator().back_to_listing(NOTIFICATIONS_PATH).await;
    let customer = dashboard
        .customer(id)
        .await
        .with_context(|| format!("fetching customer {id}"))?;

    println!("== {} ==", page_title(&customer_path(id)));
    println!("[{}] {}", customer.initials(), customer.full_name());
    println!("  email: {}", customer.email);
    println!("  phone: {}", customer.phone);
    println!(
        "  address: {}, {}, {} {}",
        customer.address.address,
        customer.address.city,
        customer.address.state,
        customer.address.postal_code
    );
    println!(
        "  company: {} ({}, {})",
        customer.company.name, customer.company.title, customer.company.department
    );
    println!(
        "  card: {} ending {}",
        customer.bank.card_type,
        customer
            .bank
            .card_number
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect::<String>()
    );
    println!("back: {back}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_icon_runs_offline_without_touching_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DashboardConfig::with_api_url("http://127.0.0.1:9");
        config.data_dir = dir.path().join("state");

        Commands::Icon {
            app_id: "com.whatsapp".into(),
        }
        .execute(config)
        .await
        .unwrap();

        assert!(!dir.path().join("state").exists());
    }
}
