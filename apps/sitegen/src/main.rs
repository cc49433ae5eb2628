use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use content_client::{
    pages::{detail_page, listing_page, prices_page, strip_tags, PageContext},
    reservation::{estimated_total, reservation_link, ReservationRequest},
    ContentClient,
};
use shared::domain::{FilterSelection, SortDirection, PRICE_PLACEHOLDER};
use tracing::info;

mod config;
mod export;

use config::load_settings;
use export::export_site;

#[derive(Parser, Debug)]
#[command(name = "sitegen", about = "Builds page data for the tour site from the content API")]
struct Cli {
    /// Content API origin; overrides sitegen.toml and the environment.
    #[arg(long)]
    api_url: Option<String>,
    /// Public site origin used for fallback asset URLs.
    #[arg(long)]
    public_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write one JSON document per page.
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the excursion listing, optionally filtered by a tag id.
    List {
        #[arg(long, default_value = "all")]
        filter: FilterSelection,
    },
    /// Print the price table.
    Prices {
        /// asc or desc; API order when omitted.
        #[arg(long)]
        order: Option<SortDirection>,
    },
    /// Print a WhatsApp reservation link for an excursion.
    Reserve {
        #[arg(long)]
        slug: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long, default_value_t = 1)]
        people: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }
    if let Some(public_url) = cli.public_url {
        settings.public_url = public_url;
    }

    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .with_writer(std::io::stderr)
        .init();

    let client = ContentClient::new(&settings.api_url)
        .with_context(|| format!("invalid content api url '{}'", settings.api_url))?;
    let ctx = PageContext::new(settings.public_url.as_str());
    info!(api_url = %client.base_url(), "using content api");

    match cli.command {
        Command::Export { out } => {
            let out_dir = out.unwrap_or(settings.out_dir);
            let summary = export_site(&client, &ctx, &out_dir).await?;
            println!(
                "exported {} pages to {} ({} missing, {} rejected, {} degraded fetches)",
                summary.written.len(),
                out_dir.display(),
                summary.missing.len(),
                summary.rejected.len(),
                summary.degraded
            );
        }
        Command::List { filter } => {
            let page = listing_page(&client, &ctx, filter).await;
            println!(
                "{}: {} of {} excursions",
                page.active_filter,
                page.excursions.len(),
                page.total
            );
            for excursion in &page.excursions {
                println!(
                    "{}\t{}\t{}",
                    excursion.id,
                    excursion.slug,
                    strip_tags(&excursion.title)
                );
            }
        }
        Command::Prices { order } => {
            let page = prices_page(&client, order).await;
            for listing in &page.listings {
                println!(
                    "{}\t{}\t{}",
                    strip_tags(&listing.title),
                    listing.duration,
                    listing.price
                );
            }
        }
        Command::Reserve {
            slug,
            name,
            date,
            people,
        } => {
            let Some(page) = detail_page(&client, &slug).await else {
                bail!("excursion '{slug}' not found");
            };
            let price = page
                .excursion
                .price
                .clone()
                .unwrap_or_else(|| PRICE_PLACEHOLDER.to_string());
            let request = ReservationRequest {
                excursion_title: strip_tags(&page.excursion.title),
                price: price.clone(),
                guest_name: name,
                date,
                people,
            };
            let link = reservation_link(&page.whatsapp_number, &page.whatsapp_template, &request)
                .context("cannot build reservation link")?;
            println!("{link}");
            if let Some(total) = estimated_total(&price, people) {
                println!("estimated total: {total:.2} USD");
            }
        }
    }

    Ok(())
}
