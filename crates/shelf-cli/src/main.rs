//! Shelf CLI - Personal media tracker
//!
//! Usage:
//!   shelf init                        Initialize database and templates
//!   shelf categories clone Books      Create a category from a template
//!   shelf items add Books --data JSON Track an item
//!   shelf search dune                 Search across categories
//!   shelf analytics --period 90d      Statistics and insights
//!   shelf serve --port 3000           Start web server

mod cli;
mod commands;


use anyhow::{Context, Result};
use clap::Parser;
use shelf_core::config::ShelfConfig;
use shelf_core::Period;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use commands::SearchArgs;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    // Config file < environment < command-line flags
    let mut config = ShelfConfig::load().context("Failed to load configuration")?;
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(user) = &cli.user {
        config.owner = user.clone();
    }

    let db = commands::open_db(&config.db_path, cli.no_encrypt)?;
    let owner = config.owner.as_str();

    match cli.command {
        Commands::Init => commands::cmd_init(&db, &config.db_path, cli.no_encrypt),
        Commands::Categories { action } => match action {
            None | Some(CategoriesAction::List) => commands::cmd_categories_list(&db, owner),
            Some(CategoriesAction::Templates) => commands::cmd_categories_templates(&db),
            Some(CategoriesAction::Clone { template, name }) => {
                commands::cmd_categories_clone(&db, owner, &template, name.as_deref()).map(|_| ())
            }
            Some(CategoriesAction::Add { name, icon, color }) => {
                commands::cmd_categories_add(&db, owner, &name, icon.as_deref(), color.as_deref())
                    .map(|_| ())
            }
            Some(CategoriesAction::Delete { id }) => {
                commands::cmd_categories_delete(&db, owner, id)
            }
        },
        Commands::Items { action } => match action {
            ItemsAction::List { category } => commands::cmd_items_list(&db, owner, &category),
            ItemsAction::Add { category, data } => {
                commands::cmd_items_add(&db, owner, &category, &data).map(|_| ())
            }
            ItemsAction::Delete { id } => commands::cmd_items_delete(&db, owner, id),
        },
        Commands::Search {
            query,
            categories,
            from,
            to,
            rating_min,
            rating_max,
            tags,
            status,
            sort,
            json,
        } => {
            let filters = commands::build_filters(
                &db,
                owner,
                &SearchArgs {
                    categories: &categories,
                    from: from.as_deref(),
                    to: to.as_deref(),
                    rating_min,
                    rating_max,
                    tags: &tags,
                    status: status.as_deref(),
                    sort: &sort,
                },
            )?;
            let engine = commands::search_engine(&db, owner, commands::history_store(&config));
            commands::cmd_search(&engine, &query.join(" "), filters, json)
                .await
                .map(|_| ())
        }
        Commands::Suggest { query } => {
            let engine = commands::search_engine(&db, owner, commands::history_store(&config));
            commands::cmd_suggest(&engine, &query)
        }
        Commands::History { clear } => {
            let engine = commands::search_engine(&db, owner, commands::history_store(&config));
            commands::cmd_history(&engine, clear)
        }
        Commands::Analytics { period, json } => {
            let period: Period = match period {
                Some(p) => p.parse().map_err(anyhow::Error::msg)?,
                None => config.default_period,
            };
            let engine = commands::analytics_engine(&db, owner);
            commands::cmd_analytics(&engine, period, json)
                .await
                .map(|_| ())
        }
        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| config.host.clone());
            let port = port.unwrap_or(config.port);
            commands::cmd_serve(db, &config, &host, port, cli.no_encrypt).await
        }
    }
}
