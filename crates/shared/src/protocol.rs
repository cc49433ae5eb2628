//! Wire records of the content API (WordPress REST shapes) and their
//! conversion into [`crate::domain`] types.

use serde::{
    de::{DeserializeOwned, Error as _},
    Deserialize, Deserializer, Serialize,
};
use serde_json::Value;

use crate::domain::{
    ContentItem, ExcursionId, FaqEntry, FaqId, MediaRef, PriceListing, Tag, TagAssociations,
    TagId, Taxonomy, PRICE_PLACEHOLDER,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rendered {
    #[serde(default)]
    pub rendered: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExcursionRecord {
    pub id: i64,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: Rendered,
    #[serde(default)]
    pub excerpt: Rendered,
    #[serde(default)]
    pub content: Rendered,
    #[serde(default, deserialize_with = "lenient_text")]
    pub precio: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub tagline: Option<String>,
    #[serde(default, alias = "duracion", deserialize_with = "lenient_text")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub categoria_excursion: Vec<i64>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub actividad_excursion: Vec<i64>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub gallery_images: Vec<GalleryImageRecord>,
    #[serde(default, rename = "_embedded")]
    pub embedded: Option<EmbeddedRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GalleryImageRecord {
    pub url: String,
    #[serde(default)]
    pub alt: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmbeddedRecord {
    #[serde(default, rename = "wp:featuredmedia")]
    pub featured_media: Vec<MediaRecord>,
    /// One inner list per taxonomy attached to the post type.
    #[serde(default, rename = "wp:term")]
    pub terms: Vec<Vec<TermRecord>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaRecord {
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub alt_text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TermRecord {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(default)]
    pub count: u32,
    #[serde(default, deserialize_with = "lenient_text")]
    pub imagen: Option<String>,
    #[serde(default)]
    pub taxonomy: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FaqRecord {
    pub id: i64,
    #[serde(default)]
    pub title: Rendered,
    #[serde(default)]
    pub content: Rendered,
}

/// Excursion fetched with a restricted `_fields` list for the price table.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceRecord {
    pub id: i64,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: Rendered,
    #[serde(default, deserialize_with = "lenient_text")]
    pub precio: Option<String>,
    #[serde(default, alias = "duracion", deserialize_with = "lenient_text")]
    pub duration: Option<String>,
}

/// Accepts strings, numbers, `false` and `null` for optional text fields.
/// Custom-field plugins report an unset field as `false`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

/// Same as [`lenient_text`] for required text: unset fields become empty.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_text(deserializer).map(Option::unwrap_or_default)
}

/// Accepts a list, `false` or `null`; the last two decode as an empty list.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(items @ Value::Array(_)) => serde_json::from_value(items).map_err(D::Error::custom),
        Some(Value::Bool(_)) | None => Ok(Vec::new()),
        Some(other) => Err(D::Error::custom(format!(
            "expected a list or false, found {other}"
        ))),
    }
}

impl TermRecord {
    pub fn into_tag(self, taxonomy: Taxonomy) -> Tag {
        Tag {
            id: TagId(self.id),
            taxonomy,
            slug: self.slug,
            name: self.name,
            description: self.description,
            icon: self.imagen,
            count: self.count,
        }
    }
}

impl From<ExcursionRecord> for ContentItem {
    fn from(record: ExcursionRecord) -> Self {
        let tags = TagAssociations::new()
            .with(
                Taxonomy::Category,
                record.categoria_excursion.into_iter().map(TagId),
            )
            .with(
                Taxonomy::Activity,
                record.actividad_excursion.into_iter().map(TagId),
            );

        let embedded = record.embedded.unwrap_or_default();
        let featured_image = embedded
            .featured_media
            .into_iter()
            .find(|media| !media.source_url.is_empty())
            .map(|media| MediaRef {
                url: media.source_url,
                alt: media.alt_text,
            });
        let embedded_tags = embedded
            .terms
            .into_iter()
            .flatten()
            .filter_map(|term| {
                let taxonomy = term.taxonomy.as_deref().and_then(Taxonomy::from_wire_name)?;
                Some(term.into_tag(taxonomy))
            })
            .collect();

        ContentItem {
            id: ExcursionId(record.id),
            slug: record.slug,
            title: record.title.rendered,
            excerpt: record.excerpt.rendered,
            body: record.content.rendered,
            price: record.precio,
            tagline: record.tagline,
            duration: record.duration,
            featured_image,
            gallery: record
                .gallery_images
                .into_iter()
                .map(|image| MediaRef {
                    url: image.url,
                    alt: image.alt,
                })
                .collect(),
            tags,
            embedded_tags,
        }
    }
}

impl From<FaqRecord> for FaqEntry {
    fn from(record: FaqRecord) -> Self {
        FaqEntry {
            id: FaqId(record.id),
            question: record.title.rendered,
            answer: record.content.rendered,
        }
    }
}

impl From<PriceRecord> for PriceListing {
    fn from(record: PriceRecord) -> Self {
        PriceListing {
            id: ExcursionId(record.id),
            slug: record.slug,
            title: record.title.rendered,
            price: record
                .precio
                .unwrap_or_else(|| PRICE_PLACEHOLDER.to_string()),
            duration: record.duration.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
