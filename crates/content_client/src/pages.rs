//! Page data for each brochure page, assembled from the content API.
//!
//! Loaders never fail on content errors. Each failed fetch is logged,
//! recorded in the page's `degraded` list and replaced by a fallback, so the
//! listing engine only ever sees fully resolved data.

use futures::future::join_all;
use listing::{active_filter_name, filter_by_tag, PriceSort};
use serde::Serialize;
use shared::{
    domain::{
        ContentItem, ExcursionId, FaqEntry, FaqId, FilterSelection, MediaRef, PriceListing,
        SiteSettings, SortDirection, Tag, TagAssociations, TagId, Taxonomy,
    },
    error::ApiError,
};
use tracing::{info, warn};

use crate::{ContentError, ContentSource};

pub const SITE_NAME: &str = "Maya Adrenaline";
/// Slugs exported when the excursion list cannot be fetched.
pub const FALLBACK_SLUGS: [&str; 3] = ["full-day", "maya-explosion", "tulum-adrenaline"];
const DESCRIPTION_CHARS: usize = 160;

const CONTACT_HERO_FALLBACK: &str =
    "https://dummyimage.com/1920x1080/0b1d1d/ffffff?text=Jungle+Contact";
const PRICES_HERO_FALLBACK: &str = "https://dummyimage.com/1920x1080/0b1d1d/ffffff?text=Precios";
const FAQ_HERO_FALLBACK: &str = "https://dummyimage.com/1920x1080/0b1d1d/ffffff?text=FAQ";
const DETAIL_IMAGE_FALLBACK: &str =
    "https://dummyimage.com/1200x800/e0e0e0/000000.png&text=No+Image";
const DEFAULT_EMAIL: &str = "info@mayaadrenaline.com";
const DEFAULT_PHONE: &str = "+52 984 123 4567";
const DEFAULT_ADDRESS: &str = "Riviera Maya, Quintana Roo, México";
const ABOUT_HERO_FALLBACK: &str =
    "https://dummyimage.com/1920x1080/0b1d1d/ffffff?text=Nature+Background";

/// Build-wide inputs that are not content.
#[derive(Debug, Clone)]
pub struct PageContext {
    /// Public site origin used to build fallback asset URLs.
    pub public_url: String,
}

impl PageContext {
    pub fn new(public_url: impl Into<String>) -> Self {
        Self {
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn upload(&self, file: &str) -> String {
        format!("{}/wp-content/uploads/2026/02/{file}", self.public_url)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    pub hero_image: String,
    pub cta_image: String,
    pub glance_wide_image: String,
    pub glance_tall_image: String,
    pub excursions: Vec<ContentItem>,
    pub degraded: Vec<ApiError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingPage {
    pub hero_image: String,
    pub selection: FilterSelection,
    pub active_filter: String,
    pub categories: Vec<Tag>,
    pub activities: Vec<Tag>,
    pub total: usize,
    pub excursions: Vec<ContentItem>,
    pub degraded: Vec<ApiError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PricesPage {
    pub hero_image: String,
    pub order: Option<SortDirection>,
    pub listings: Vec<PriceListing>,
    pub degraded: Vec<ApiError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FaqPage {
    pub hero_image: String,
    pub faqs: Vec<FaqEntry>,
    pub used_fallback: bool,
    pub degraded: Vec<ApiError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SocialLink {
    pub network: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactPage {
    pub hero_image: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub whatsapp_number: String,
    pub social: Vec<SocialLink>,
    pub degraded: Vec<ApiError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Highlight {
    pub icon: String,
    pub title: String,
    pub text: String,
}

/// The about page has no API content.
#[derive(Debug, Clone, Serialize)]
pub struct AboutPage {
    pub title: String,
    pub description: String,
    pub hero_image: String,
    pub heading: String,
    pub paragraphs: Vec<String>,
    pub highlights: Vec<Highlight>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailPage {
    /// Plain-text document title.
    pub title: String,
    /// Plain-text summary, at most 160 characters.
    pub description: String,
    pub image: MediaRef,
    pub activities: Vec<Tag>,
    pub whatsapp_number: String,
    pub whatsapp_template: String,
    /// True when the excursion could not be loaded and placeholder content is shown.
    pub placeholder: bool,
    pub excursion: ContentItem,
    pub degraded: Vec<ApiError>,
}

fn recover<T>(
    result: Result<T, ContentError>,
    resource: &str,
    degraded: &mut Vec<ApiError>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(%error, resource, "content fetch failed; using fallback");
            degraded.push(ApiError::from(&error));
            None
        }
    }
}

fn non_empty_or(value: &str, fallback: impl Into<String>) -> String {
    if value.trim().is_empty() {
        fallback.into()
    } else {
        value.to_string()
    }
}

/// Removes markup from rendered HTML. An unterminated tag swallows the rest.
pub fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text
}

pub fn fallback_faqs() -> Vec<FaqEntry> {
    vec![
        FaqEntry {
            id: FaqId(9991),
            question: "¿Necesito experiencia previa para las actividades?".into(),
            answer: "No, nuestras actividades están diseñadas para todos los niveles. Nuestros guías certificados te darán instrucciones detalladas antes de comenzar.".into(),
        },
        FaqEntry {
            id: FaqId(9992),
            question: "¿Qué debo llevar a las excursiones?".into(),
            answer: "Recomendamos ropa cómoda, traje de baño, toalla, cambios de ropa seca, zapatos de agua o tenis que se puedan mojar, repelente biodegradable y protector solar biodegradable.".into(),
        },
    ]
}

/// Categories shown when the taxonomy request fails before any response.
pub fn fallback_categories() -> Vec<Tag> {
    [(1, "aventura", "Aventura", 5), (2, "cultura", "Cultura", 3)]
        .into_iter()
        .map(|(id, slug, name, count)| Tag {
            id: TagId(id),
            taxonomy: Taxonomy::Category,
            slug: slug.into(),
            name: name.into(),
            description: None,
            icon: None,
            count,
        })
        .collect()
}

fn placeholder_excursion(slug: &str) -> ContentItem {
    ContentItem {
        id: ExcursionId(0),
        slug: slug.to_string(),
        title: "Excursión (Cargando...)".into(),
        excerpt: "Próximamente".into(),
        body: "<p>Información no disponible temporalmente.</p>".into(),
        price: Some("0".into()),
        tagline: Some("Aventura".into()),
        duration: Some("N/A".into()),
        featured_image: None,
        gallery: Vec::new(),
        tags: TagAssociations::new(),
        embedded_tags: Vec::new(),
    }
}

async fn settings_or_default<S>(source: &S, degraded: &mut Vec<ApiError>) -> SiteSettings
where
    S: ContentSource + ?Sized,
{
    recover(source.settings().await, "settings", degraded).unwrap_or_default()
}

pub async fn home_page<S>(source: &S, ctx: &PageContext) -> HomePage
where
    S: ContentSource + ?Sized,
{
    let mut degraded = Vec::new();
    let (settings, excursions) = tokio::join!(source.settings(), source.excursions());
    let settings = recover(settings, "settings", &mut degraded).unwrap_or_default();
    let excursions = recover(excursions, "excursions", &mut degraded).unwrap_or_default();

    HomePage {
        hero_image: non_empty_or(&settings.home_hero_image, ctx.upload("hero.webp")),
        cta_image: non_empty_or(&settings.home_cta_image, ctx.upload("bannerCTA.webp")),
        glance_wide_image: non_empty_or(&settings.home_vistazo_h_image, ctx.upload("imgIzq.webp")),
        glance_tall_image: non_empty_or(&settings.home_vistazo_v_image, ctx.upload("imgDer.webp")),
        excursions,
        degraded,
    }
}

pub async fn listing_page<S>(
    source: &S,
    ctx: &PageContext,
    selection: FilterSelection,
) -> ListingPage
where
    S: ContentSource + ?Sized,
{
    let mut degraded = Vec::new();
    let (categories, activities, excursions, settings) = tokio::join!(
        source.tags(Taxonomy::Category),
        source.tags(Taxonomy::Activity),
        source.excursions(),
        source.settings(),
    );
    // An error status means the taxonomy is empty; no answer at all means
    // the placeholder categories.
    let categories = match categories {
        Ok(categories) => categories,
        Err(error) => {
            warn!(%error, resource = "categories", "content fetch failed; using fallback");
            degraded.push(ApiError::from(&error));
            match error {
                ContentError::Status { .. } => Vec::new(),
                _ => fallback_categories(),
            }
        }
    };
    let activities = recover(activities, "activities", &mut degraded).unwrap_or_default();
    let excursions = recover(excursions, "excursions", &mut degraded).unwrap_or_default();
    let settings = recover(settings, "settings", &mut degraded).unwrap_or_default();

    let active_filter = active_filter_name(selection, &categories, &activities).to_string();
    let filtered: Vec<ContentItem> = filter_by_tag(&excursions, selection)
        .into_iter()
        .cloned()
        .collect();

    ListingPage {
        hero_image: non_empty_or(
            &settings.experiencias_hero_image,
            ctx.upload("tulum4-scaled.webp"),
        ),
        selection,
        active_filter,
        categories,
        activities,
        total: excursions.len(),
        excursions: filtered,
        degraded,
    }
}

/// Price table in API order, or sorted when `order` is given.
pub async fn prices_page<S>(source: &S, order: Option<SortDirection>) -> PricesPage
where
    S: ContentSource + ?Sized,
{
    let mut degraded = Vec::new();
    let (listings, settings) = tokio::join!(source.price_listings(), source.settings());
    let mut listings = recover(listings, "price listings", &mut degraded).unwrap_or_default();
    let settings = recover(settings, "settings", &mut degraded).unwrap_or_default();

    if let Some(direction) = order {
        PriceSort::new().sort(&mut listings, Some(direction));
    }

    PricesPage {
        hero_image: non_empty_or(&settings.precios_hero_image, PRICES_HERO_FALLBACK),
        order,
        listings,
        degraded,
    }
}

pub async fn faq_page<S>(source: &S) -> FaqPage
where
    S: ContentSource + ?Sized,
{
    let mut degraded = Vec::new();
    let (faqs, settings) = tokio::join!(source.faqs(), source.settings());
    let faqs = recover(faqs, "faqs", &mut degraded).unwrap_or_default();
    let settings = recover(settings, "settings", &mut degraded).unwrap_or_default();

    let used_fallback = faqs.is_empty();
    FaqPage {
        hero_image: non_empty_or(&settings.faq_hero_image, FAQ_HERO_FALLBACK),
        faqs: if used_fallback { fallback_faqs() } else { faqs },
        used_fallback,
        degraded,
    }
}

pub async fn contact_page<S>(source: &S) -> ContactPage
where
    S: ContentSource + ?Sized,
{
    let mut degraded = Vec::new();
    let settings = settings_or_default(source, &mut degraded).await;

    ContactPage {
        hero_image: non_empty_or(&settings.contacto_hero_image, CONTACT_HERO_FALLBACK),
        email: non_empty_or(&settings.email, DEFAULT_EMAIL),
        phone: non_empty_or(&settings.phone, DEFAULT_PHONE),
        address: non_empty_or(&settings.address, DEFAULT_ADDRESS),
        whatsapp_number: settings.whatsapp_number.clone(),
        social: settings
            .social_links()
            .into_iter()
            .map(|(network, url)| SocialLink {
                network: network.to_string(),
                url: url.to_string(),
            })
            .collect(),
        degraded,
    }
}

pub fn about_page() -> AboutPage {
    AboutPage {
        title: format!("Nosotros - {SITE_NAME}"),
        description: "Conoce más sobre Maya Adrenaline, una empresa de turismo local con más de 10 años de experiencia en la Riviera Maya.".into(),
        hero_image: ABOUT_HERO_FALLBACK.into(),
        heading: "Quiénes Somos".into(),
        paragraphs: vec![
            "Somos una empresa de turismo local, con más de 10 años de experiencia operando excursiones y actividades en la Riviera Maya, siempre con el afán de buscar los mejores destinos, actividades y atracciones de la zona. Combinamos las mejores actividades al mejor precio para que puedas disfrutar tus vacaciones como nunca.".into(),
            "Nuestras excursiones ecoturísticas permiten vivir la adrenalina al máximo, cuidando y disfrutando de la naturaleza que nos rodea, creando así, el balance perfecto entre la adrenalina de la selva, la historia de la zona maya y nuestra hermosa naturaleza.".into(),
        ],
        highlights: [
            ("🌿", "Ecoturismo", "Disfrutando y cuidando la naturaleza."),
            ("⚡", "Adrenalina", "Experiencias al máximo en la selva."),
            ("🏛️", "Historia", "Conexión con la zona Maya."),
        ]
        .into_iter()
        .map(|(icon, title, text)| Highlight {
            icon: icon.into(),
            title: title.into(),
            text: text.into(),
        })
        .collect(),
    }
}

/// Detail page for one excursion.
///
/// `None` means not found: the API answered with no match or a non-success
/// status. Transport and decode failures produce placeholder content instead
/// so the export still emits the page.
pub async fn detail_page<S>(source: &S, slug: &str) -> Option<DetailPage>
where
    S: ContentSource + ?Sized,
{
    let mut degraded = Vec::new();
    let (excursion, settings) = tokio::join!(source.excursion_by_slug(slug), source.settings());
    let settings = recover(settings, "settings", &mut degraded).unwrap_or_default();

    let (excursion, placeholder) = match excursion {
        Ok(Some(excursion)) => (excursion, false),
        Ok(None) | Err(ContentError::Status { .. }) => {
            info!(slug, "excursion not found");
            return None;
        }
        Err(error) => {
            warn!(%error, slug, "excursion fetch failed; using placeholder");
            degraded.push(ApiError::from(&error));
            (placeholder_excursion(slug), true)
        }
    };

    let plain_title = strip_tags(&excursion.title);
    let image = match &excursion.featured_image {
        Some(media) => MediaRef {
            url: media.url.clone(),
            alt: non_empty_or(&media.alt, excursion.title.clone()),
        },
        None => MediaRef {
            url: DETAIL_IMAGE_FALLBACK.to_string(),
            alt: excursion.title.clone(),
        },
    };

    Some(DetailPage {
        title: format!("{plain_title} - {SITE_NAME}"),
        description: strip_tags(&excursion.excerpt)
            .chars()
            .take(DESCRIPTION_CHARS)
            .collect(),
        image,
        activities: excursion
            .embedded_tags_of(Taxonomy::Activity)
            .cloned()
            .collect(),
        whatsapp_number: settings.whatsapp_number,
        whatsapp_template: settings.whatsapp_template,
        placeholder,
        excursion,
        degraded,
    })
}

/// Slugs of every excursion page to export.
pub async fn static_slugs<S>(source: &S) -> Vec<String>
where
    S: ContentSource + ?Sized,
{
    let mut degraded = Vec::new();
    match recover(source.excursions().await, "excursion slugs", &mut degraded) {
        Some(excursions) => excursions
            .into_iter()
            .map(|excursion| excursion.slug)
            .filter(|slug| !slug.is_empty())
            .collect(),
        None => FALLBACK_SLUGS.iter().map(|slug| slug.to_string()).collect(),
    }
}

/// Loads detail pages for all `slugs` concurrently, keeping input order.
pub async fn detail_pages<S>(source: &S, slugs: &[String]) -> Vec<(String, Option<DetailPage>)>
where
    S: ContentSource + ?Sized,
{
    let pages = join_all(slugs.iter().map(|slug| detail_page(source, slug))).await;
    slugs.iter().cloned().zip(pages).collect()
}

#[cfg(test)]
#[path = "tests/pages_tests.rs"]
mod tests;
