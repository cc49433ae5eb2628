use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::error::{ParseDirectionError, ParseSelectionError};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(ExcursionId);
id_newtype!(TagId);
id_newtype!(FaqId);

/// Price shown when the content API has no price for an excursion.
pub const PRICE_PLACEHOLDER: &str = "Consultar";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Taxonomy {
    Category,
    Activity,
}

impl Taxonomy {
    pub const ALL: [Taxonomy; 2] = [Taxonomy::Category, Taxonomy::Activity];

    /// Name of the taxonomy in the content API routes and term payloads.
    pub fn wire_name(self) -> &'static str {
        match self {
            Taxonomy::Category => "categoria_excursion",
            Taxonomy::Activity => "actividad_excursion",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|taxonomy| taxonomy.wire_name() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub taxonomy: Taxonomy,
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Usage count reported by the content API. Informational only.
    #[serde(default)]
    pub count: u32,
}

/// Tag identifiers attached to an item, grouped by taxonomy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagAssociations(BTreeMap<Taxonomy, BTreeSet<TagId>>);

impl TagAssociations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, taxonomy: Taxonomy, tag_id: TagId) {
        self.0.entry(taxonomy).or_default().insert(tag_id);
    }

    pub fn with(mut self, taxonomy: Taxonomy, tag_ids: impl IntoIterator<Item = TagId>) -> Self {
        for tag_id in tag_ids {
            self.insert(taxonomy, tag_id);
        }
        self
    }

    /// True when any taxonomy carries `tag_id`.
    pub fn contains(&self, tag_id: TagId) -> bool {
        self.0.values().any(|ids| ids.contains(&tag_id))
    }

    pub fn of(&self, taxonomy: Taxonomy) -> impl Iterator<Item = TagId> + '_ {
        self.0.get(&taxonomy).into_iter().flatten().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeSet::is_empty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub url: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ExcursionId,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<MediaRef>,
    #[serde(default)]
    pub gallery: Vec<MediaRef>,
    #[serde(default)]
    pub tags: TagAssociations,
    /// Full term records embedded in the item payload, when requested.
    #[serde(default)]
    pub embedded_tags: Vec<Tag>,
}

impl ContentItem {
    pub fn embedded_tags_of(&self, taxonomy: Taxonomy) -> impl Iterator<Item = &Tag> + '_ {
        self.embedded_tags
            .iter()
            .filter(move |tag| tag.taxonomy == taxonomy)
    }
}

/// The single active listing filter, shared across every taxonomy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterSelection {
    #[default]
    All,
    Tag(TagId),
}

impl FilterSelection {
    pub fn tag(self) -> Option<TagId> {
        match self {
            FilterSelection::All => None,
            FilterSelection::Tag(tag_id) => Some(tag_id),
        }
    }
}

impl FromStr for FilterSelection {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(FilterSelection::All);
        }
        s.parse::<i64>()
            .map(|id| FilterSelection::Tag(TagId(id)))
            .map_err(|_| ParseSelectionError(s.to_string()))
    }
}

impl fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterSelection::All => f.write_str("all"),
            FilterSelection::Tag(tag_id) => write!(f, "{tag_id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceListing {
    pub id: ExcursionId,
    pub slug: String,
    pub title: String,
    /// Numeric text such as "$1,250.00" or a placeholder such as "Consultar".
    pub price: String,
    pub duration: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

impl FromStr for SortDirection {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub id: FaqId,
    pub question: String,
    pub answer: String,
}

/// Flat site settings object. Every field may be missing, empty, `false` or `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    #[serde(deserialize_with = "crate::protocol::lenient_string")]
    pub whatsapp_number: String,
    #[serde(deserialize_with = "crate::protocol::lenient_string")]
    pub whatsapp_template: String,
    #[serde(deserialize_with = "crate::protocol::lenient_string")]
    pub email: String,
    #[serde(deserialize_with = "crate::protocol::lenient_string")]
    pub phone: String,
    #[serde(deserialize_with = "crate::protocol::lenient_string")]
    pub address: String,

    #[serde(deserialize_with = "crate::protocol::lenient_string")]
    pub social_facebook: String,
    #[serde(deserialize_with = "crate::protocol::lenient_string")]
    pub social_instagram: String,
    #[serde(deserialize_with = "crate::protocol::lenient_string")]
    pub social_tiktok: String,
    #[serde(deserialize_with = "crate::protocol::lenient_string")]
    pub social_youtube: String,

    #[serde(deserialize_with = "crate::protocol::lenient_string")]
    pub home_hero_image: String,
    #[serde(deserialize_with = "crate::protocol::lenient_string")]
    pub home_cta_image: String,
    #[serde(deserialize_with = "crate::protocol::lenient_string")]
    pub home_vistazo_h_image: String,
    #[serde(deserialize_with = "crate::protocol::lenient_string")]
    pub home_vistazo_v_image: String,

    #[serde(deserialize_with = "crate::protocol::lenient_string")]
    pub experiencias_hero_image: String,
    #[serde(deserialize_with = "crate::protocol::lenient_string")]
    pub contacto_hero_image: String,
    #[serde(deserialize_with = "crate::protocol::lenient_string")]
    pub precios_hero_image: String,
    #[serde(deserialize_with = "crate::protocol::lenient_string")]
    pub faq_hero_image: String,
}

impl SiteSettings {
    /// Social profile links that are actually configured, in display order.
    pub fn social_links(&self) -> Vec<(&'static str, &str)> {
        [
            ("Facebook", self.social_facebook.as_str()),
            ("Instagram", self.social_instagram.as_str()),
            ("TikTok", self.social_tiktok.as_str()),
            ("YouTube", self.social_youtube.as_str()),
        ]
        .into_iter()
        .filter(|(_, url)| !url.trim().is_empty())
        .collect()
    }
}
