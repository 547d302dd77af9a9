use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of catalog entry the server distinguishes between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Video,
    Article,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Article => "article",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Video => "Video",
            Self::Article => "Article",
        }
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(Self::Video),
            "article" => Ok(Self::Article),
            other => Err(format!(
                "unknown content type '{other}': expected video or article"
            )),
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort key accepted by the catalog endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Score,
    PublishedAt,
    Title,
    CreatedAt,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::PublishedAt => "published_at",
            Self::Title => "title",
            Self::CreatedAt => "created_at",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Score => "Score",
            Self::PublishedAt => "Published",
            Self::Title => "Title",
            Self::CreatedAt => "Created",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Score => Self::PublishedAt,
            Self::PublishedAt => Self::Title,
            Self::Title => Self::CreatedAt,
            Self::CreatedAt => Self::Score,
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "score" => Ok(Self::Score),
            "published_at" => Ok(Self::PublishedAt),
            "title" => Ok(Self::Title),
            "created_at" => Ok(Self::CreatedAt),
            other => Err(format!(
                "unknown sort key '{other}': expected score, published_at, title or created_at"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort order '{other}': expected asc or desc")),
        }
    }
}

/// Engagement counters attached to a content item. The optional fields
/// arrive as nullable strings on the wire: `duration` holds seconds,
/// `reading_time` minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentMetrics {
    pub views: u64,
    pub likes: u64,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub reading_time: Option<String>,
    #[serde(default)]
    pub reactions: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
}

/// One catalog entry as returned by the server. Immutable snapshot; the
/// client never mutates these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub id: String,
    pub external_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub provider: String,
    pub score: f64,
    pub metrics: ContentMetrics,
    pub categories: Vec<String>,
    pub published_at: DateTime<Utc>,
}

/// Pagination block accompanying a list response. Replaced wholesale on
/// every fetch that carries one; kept as-is otherwise so the page controls
/// stay navigable after an empty filtered page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
    pub has_more: bool,
    pub current_page: u32,
    pub total_pages: u32,
}

/// Server response wrapper around actual data plus status metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: T,
    #[serde(default)]
    pub meta: Option<PaginationMeta>,
}
