use std::{fs, path::Path};

use anyhow::{Context, Result};
use content_client::{
    pages::{
        about_page, contact_page, detail_pages, faq_page, home_page, listing_page, prices_page, static_slugs,
        PageContext,
    },
    ContentSource,
};
use serde::Serialize;
use shared::domain::FilterSelection;
use tracing::{info, warn};

use crate::config::prepare_out_dir;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Relative paths of every file written, in write order.
    pub written: Vec<String>,
    /// Slugs with no excursion behind them.
    pub missing: Vec<String>,
    /// Slugs skipped because they cannot be used as file names.
    pub rejected: Vec<String>,
    /// Number of content fetches that fell back to defaults.
    pub degraded: usize,
}

/// Slugs become file names, so only plain slug characters are accepted.
fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '%'))
}

fn write_page<T: Serialize>(
    out_dir: &Path,
    relative: &str,
    page: &T,
    summary: &mut ExportSummary,
) -> Result<()> {
    let path = out_dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create '{}'", parent.display()))?;
    }
    let body = serde_json::to_vec_pretty(page)
        .with_context(|| format!("failed to serialize page '{relative}'"))?;
    fs::write(&path, body).with_context(|| format!("failed to write '{}'", path.display()))?;
    info!(page = relative, "wrote page data");
    summary.written.push(relative.to_string());
    Ok(())
}

/// Writes one JSON document per page into `out_dir`.
pub async fn export_site<S>(source: &S, ctx: &PageContext, out_dir: &Path) -> Result<ExportSummary>
where
    S: ContentSource + ?Sized,
{
    let out_dir = prepare_out_dir(out_dir)?;
    let mut summary = ExportSummary::default();

    let home = home_page(source, ctx).await;
    summary.degraded += home.degraded.len();
    write_page(&out_dir, "home.json", &home, &mut summary)?;

    let listing = listing_page(source, ctx, FilterSelection::All).await;
    summary.degraded += listing.degraded.len();
    write_page(&out_dir, "excursiones.json", &listing, &mut summary)?;

    let prices = prices_page(source, None).await;
    summary.degraded += prices.degraded.len();
    write_page(&out_dir, "precios.json", &prices, &mut summary)?;

    let faq = faq_page(source).await;
    summary.degraded += faq.degraded.len();
    write_page(&out_dir, "preguntas-frecuentes.json", &faq, &mut summary)?;

    let contact = contact_page(source).await;
    summary.degraded += contact.degraded.len();
    write_page(&out_dir, "contacto.json", &contact, &mut summary)?;

    write_page(&out_dir, "nosotros.json", &about_page(), &mut summary)?;

    let (slugs, rejected): (Vec<String>, Vec<String>) = static_slugs(source)
        .await
        .into_iter()
        .partition(|slug| is_safe_slug(slug));
    for slug in &rejected {
        warn!(%slug, "skipping excursion with unusable slug");
    }
    summary.rejected = rejected;

    for (slug, page) in detail_pages(source, &slugs).await {
        match page {
            Some(page) => {
                summary.degraded += page.degraded.len();
                write_page(
                    &out_dir,
                    &format!("excursiones/{slug}.json"),
                    &page,
                    &mut summary,
                )?;
            }
            None => {
                warn!(%slug, "excursion not found; no detail page written");
                summary.missing.push(slug);
            }
        }
    }

    info!(
        pages = summary.written.len(),
        missing = summary.missing.len(),
        degraded = summary.degraded,
        out_dir = %out_dir.display(),
        "export finished"
    );
    Ok(summary)
}

#[cfg(test)]
#[path = "tests/export_tests.rs"]
mod tests;
