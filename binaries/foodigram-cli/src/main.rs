//! Foodigram CLI
//!
//! Browse the food catalog from a terminal: filter it, swipe through the
//! deck, scrap what you want to come back to, and manage the backend session.
//!
//! ## Usage
//!
//! ```bash
//! foodigram list --category korean --avoid peanuts
//! foodigram deck --search noodle
//! foodigram history --markdown
//! foodigram login mina
//! RUST_LOG=foodigram=debug foodigram me
//! ```

mod repl;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use foodigram_config::AppConfig;
use foodigram_core::{Allergen, Catalog, Category};
use foodigram_deck::{
    export_markdown, filter, friends_overlap, FilterCriteria, HistorySync, InteractionStore,
};
use foodigram_session::{AuthFlow, SessionClient, SessionError, User};
use foodigram_storage::FileStore;
use serde_json::json;
use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "foodigram")]
#[command(about = "Foodigram - swipe through food, filter by taste and allergens")]
#[command(version)]
struct Cli {
    /// YAML config file (env overrides still apply)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Case-insensitive text matched against names and keywords
    #[arg(short, long)]
    search: Option<String>,

    /// Only show these categories (repeatable); all when omitted
    #[arg(long = "category", value_name = "CATEGORY")]
    categories: Vec<Category>,

    /// Hide items containing this allergen (repeatable)
    #[arg(long = "avoid", value_name = "ALLERGEN")]
    avoid: Vec<Allergen>,
}

impl FilterArgs {
    fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::default();
        if let Some(search) = &self.search {
            criteria.set_search(search.as_str());
        }
        if !self.categories.is_empty() {
            criteria.allowed_categories = self.categories.iter().copied().collect();
        }
        criteria.denied_allergens = self.avoid.iter().copied().collect();
        criteria
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog items that match the filters
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// Print JSON instead of one line per item
        #[arg(long)]
        json: bool,
    },

    /// Interactive deck: swipe, like and scrap from the terminal
    Deck {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Scrapped items, most recent first
    History {
        /// Export as markdown
        #[arg(long)]
        markdown: bool,

        /// Forget the whole history
        #[arg(long)]
        clear: bool,
    },

    /// Friends who interacted with the items you scrapped
    Friends,

    /// Sign in to the backend
    Login {
        username: String,

        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    Me,

    /// Save filters as profile preferences
    Prefs {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Followers, followings and follow requests
    Social {
        #[command(subcommand)]
        command: SocialCommands,
    },
}

#[derive(Subcommand)]
enum SocialCommands {
    /// Users following USER_ID
    Followers { user_id: u64 },

    /// Users USER_ID follows
    Followings { user_id: u64 },

    /// People you might want to follow
    Suggest {
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },

    /// Ask to follow a user
    Follow { user_id: u64 },

    /// Accept a follow request
    Accept { user_id: u64 },

    /// Stop following a user
    Unfollow { user_id: u64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    // logs go to stderr so stdout stays pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "foodigram=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::List { filters, json } => cmd_list(&config, &filters, json),
        Commands::Deck { filters } => cmd_deck(&config, &filters),
        Commands::History { markdown, clear } => cmd_history(&config, markdown, clear),
        Commands::Friends => cmd_friends(&config),
        Commands::Login { username, password } => cmd_login(&config, &username, password).await,
        Commands::Logout => cmd_logout(&config).await,
        Commands::Me => cmd_me(&config).await,
        Commands::Prefs { filters } => cmd_prefs(&config, &filters).await,
        Commands::Social { command } => cmd_social(&config, command).await,
    }
}

// ============== Local state ==============

fn load_catalog(config: &AppConfig) -> Result<Catalog> {
    Catalog::load(&config.catalog_path)
        .with_context(|| format!("loading catalog from {}", config.catalog_path.display()))
}

fn open_storage(config: &AppConfig) -> Result<FileStore> {
    FileStore::open(&config.storage_path)
        .with_context(|| format!("opening storage at {}", config.storage_path.display()))
}

fn restore_history(config: &AppConfig) -> Result<(HistorySync<FileStore>, InteractionStore)> {
    let sync = HistorySync::new(open_storage(config)?);
    let mut store = InteractionStore::new();
    sync.restore(&mut store)
        .context("restoring scrapped history")?;
    Ok((sync, store))
}

fn cmd_list(config: &AppConfig, filters: &FilterArgs, as_json: bool) -> Result<()> {
    let catalog = load_catalog(config)?;
    let view = filter(&catalog, &filters.criteria(), &BTreeSet::new());

    if as_json {
        let items: Vec<_> = view.iter().collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if view.is_empty() {
        println!("  (no items match)");
        return Ok(());
    }

    for item in view.iter() {
        println!("  {}", item.render_compact());
    }
    println!();
    println!("  {} of {} items", view.len(), catalog.len());
    Ok(())
}

fn cmd_deck(config: &AppConfig, filters: &FilterArgs) -> Result<()> {
    let catalog = load_catalog(config)?;
    let (sync, store) = restore_history(config)?;
    repl::run(catalog, store, filters.criteria(), sync)
}

fn cmd_history(config: &AppConfig, markdown: bool, clear: bool) -> Result<()> {
    let (mut sync, store) = restore_history(config)?;

    if clear {
        sync.clear().context("clearing scrapped history")?;
        println!("  Scrapped history cleared.");
        return Ok(());
    }

    if markdown {
        print!("{}", export_markdown(&store));
        return Ok(());
    }

    if store.scrapped_entries().is_empty() {
        println!("  (nothing scrapped yet)");
        return Ok(());
    }

    for entry in store.scrapped_history() {
        println!(
            "  {}  {}",
            entry.scrapped_at.format("%Y-%m-%d %H:%M"),
            entry.item.render_compact()
        );
    }
    Ok(())
}

fn cmd_friends(config: &AppConfig) -> Result<()> {
    let catalog = load_catalog(config)?;
    let (_, store) = restore_history(config)?;

    let overlaps = friends_overlap(&catalog, &store);
    if overlaps.is_empty() {
        println!("  (no friends in this catalog)");
        return Ok(());
    }

    for overlap in overlaps {
        if overlap.is_empty() {
            println!("  {}: nothing in common yet", overlap.friend.name);
        } else {
            println!(
                "  {}: {} in common ({})",
                overlap.friend.name,
                overlap.item_ids.len(),
                overlap.item_names.join(", ")
            );
        }
    }
    Ok(())
}

// ============== Session ==============

/// Attach the user-facing message as context
fn explain(error: SessionError) -> anyhow::Error {
    let message = error.user_message();
    anyhow::Error::new(error).context(message)
}

fn open_auth(config: &AppConfig) -> Result<AuthFlow<FileStore>> {
    let client = SessionClient::new(&config.api_url, config.request_timeout()).map_err(explain)?;
    Ok(AuthFlow::new(client, open_storage(config)?))
}

fn resume_session(config: &AppConfig) -> Result<AuthFlow<FileStore>> {
    let flow = open_auth(config)?;
    if !flow.resume().map_err(explain)? {
        anyhow::bail!("Not signed in. Run `foodigram login <USERNAME>` first.");
    }
    Ok(flow)
}

fn print_user(user: &User) {
    println!("  #{} {}", user.id, user.username);
    if !user.email.is_empty() {
        println!("  {}", user.email);
    }
}

fn read_password() -> Result<String> {
    print!("Password: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn cmd_login(config: &AppConfig, username: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };

    let mut flow = open_auth(config)?;
    let user = flow.sign_in(username, &password).await.map_err(explain)?;

    println!("  Signed in.");
    print_user(&user);
    Ok(())
}

async fn cmd_logout(config: &AppConfig) -> Result<()> {
    let mut flow = open_auth(config)?;
    flow.resume().map_err(explain)?;
    flow.sign_out().await.map_err(explain)?;
    println!("  Signed out.");
    Ok(())
}

async fn cmd_me(config: &AppConfig) -> Result<()> {
    let mut flow = resume_session(config)?;
    let user = flow.client().me().await.map_err(explain)?;
    flow.save_cookies().map_err(explain)?;

    print_user(&user);
    if let Some(profile) = &user.profile {
        if !profile.bio.is_empty() {
            println!("  {}", profile.bio);
        }
        if !profile.preferences.is_empty() {
            println!(
                "  preferences: {}",
                serde_json::Value::Object(profile.preferences.clone())
            );
        }
    }
    Ok(())
}

async fn cmd_prefs(config: &AppConfig, filters: &FilterArgs) -> Result<()> {
    let mut patch = serde_json::Map::new();
    if let Some(search) = &filters.search {
        patch.insert("search".to_string(), json!(search));
    }
    if !filters.categories.is_empty() {
        patch.insert("categories".to_string(), json!(filters.categories));
    }
    if !filters.avoid.is_empty() {
        patch.insert("avoid_allergens".to_string(), json!(filters.avoid));
    }
    if patch.is_empty() {
        anyhow::bail!("Nothing to save. Pass --search, --category or --avoid.");
    }

    let mut flow = resume_session(config)?;
    let profile = flow
        .client()
        .update_preferences(&serde_json::Value::Object(patch))
        .await
        .map_err(explain)?;
    flow.save_cookies().map_err(explain)?;

    println!(
        "  Saved: {}",
        serde_json::Value::Object(profile.preferences)
    );
    Ok(())
}

async fn cmd_social(config: &AppConfig, command: SocialCommands) -> Result<()> {
    let mut flow = resume_session(config)?;
    let client = flow.client().clone();

    match command {
        SocialCommands::Followers { user_id } => {
            let users = client.followers(user_id).await.map_err(explain)?;
            print_users(&users);
        }
        SocialCommands::Followings { user_id } => {
            let users = client.followings(user_id).await.map_err(explain)?;
            print_users(&users);
        }
        SocialCommands::Suggest { limit } => {
            let users = client.follow_suggestions(limit).await.map_err(explain)?;
            print_users(&users);
        }
        SocialCommands::Follow { user_id } => {
            let follow = client.request_follow(user_id).await.map_err(explain)?;
            println!("  Follow request sent ({:?}).", follow.status);
        }
        SocialCommands::Accept { user_id } => {
            client.accept_follow(user_id).await.map_err(explain)?;
            println!("  Accepted #{user_id}.");
        }
        SocialCommands::Unfollow { user_id } => {
            client.unfollow(user_id).await.map_err(explain)?;
            println!("  Unfollowed #{user_id}.");
        }
    }

    flow.save_cookies().map_err(explain)?;
    Ok(())
}

fn print_users(users: &[User]) {
    if users.is_empty() {
        println!("  (none)");
    }
    for user in users {
        println!("  #{} {}", user.id, user.username);
    }
}
