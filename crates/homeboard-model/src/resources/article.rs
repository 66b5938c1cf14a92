//! News articles.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{joined, merge, non_empty};
use crate::access::{FieldAccess, Fields, SortValue};

/// Publication state of an article.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArticleStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl ArticleStatus {
    /// Every label, in declaration order.
    pub const LABELS: &'static [&'static str] = &["Draft", "Published", "Archived"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "Draft",
            ArticleStatus::Published => "Published",
            ArticleStatus::Archived => "Archived",
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ArticleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DRAFT" => Ok(ArticleStatus::Draft),
            "PUBLISHED" => Ok(ArticleStatus::Published),
            "ARCHIVED" => Ok(ArticleStatus::Archived),
            _ => Err(format!("Unknown article status: {s}")),
        }
    }
}

/// Text form of the `featured` flag.
const FLAGS: &[&str] = &["true", "false"];

/// A news article shown on the marketplace blog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub author: String,
    /// Editorial category, e.g. "Real Estate" or "Moving Tips".
    pub category: String,
    pub status: ArticleStatus,
    pub excerpt: String,
    pub content: String,
    pub tags: Vec<String>,
    pub featured: bool,
    pub published_at: Option<NaiveDate>,
}

/// Partial update for an [`Article`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArticlePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ArticleStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<NaiveDate>,
}

impl Fields for Article {
    const RESOURCE: &'static str = "article";
    const COLLECTION_KEY: &'static str = "articles";
    const DRAFT_KEY: &'static str = "articleDraft";

    type Patch = ArticlePatch;

    fn apply_patch(&mut self, patch: &ArticlePatch) {
        merge(&mut self.title, patch.title.as_ref());
        merge(&mut self.author, patch.author.as_ref());
        merge(&mut self.category, patch.category.as_ref());
        merge(&mut self.status, patch.status.as_ref());
        merge(&mut self.excerpt, patch.excerpt.as_ref());
        merge(&mut self.content, patch.content.as_ref());
        merge(&mut self.tags, patch.tags.as_ref());
        merge(&mut self.featured, patch.featured.as_ref());
        if patch.published_at.is_some() {
            self.published_at = patch.published_at;
        }
    }
}

impl FieldAccess for Article {
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "author"];
    const CATEGORY_FIELDS: &'static [&'static str] = &["category", "status", "author", "featured"];

    fn category_values(field: &str) -> Option<&'static [&'static str]> {
        match field {
            "status" => Some(ArticleStatus::LABELS),
            "featured" => Some(FLAGS),
            _ => None,
        }
    }

    fn text(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "title" => non_empty(&self.title),
            "author" => non_empty(&self.author),
            "category" => non_empty(&self.category),
            "status" => Some(Cow::Borrowed(self.status.as_str())),
            "excerpt" => non_empty(&self.excerpt),
            "content" => non_empty(&self.content),
            "tags" => joined(&self.tags),
            "featured" => Some(Cow::Borrowed(if self.featured { "true" } else { "false" })),
            "publishedAt" => self.published_at.map(|d| Cow::Owned(d.to_string())),
            _ => None,
        }
    }

    fn date(&self) -> Option<NaiveDate> {
        self.published_at
    }

    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "publishedAt" => self.published_at.map(SortValue::Date),
            other => self.text(other).map(|value| SortValue::text(&value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_back_to_their_status() {
        for label in ArticleStatus::LABELS {
            let status: ArticleStatus = label.parse().unwrap();
            assert_eq!(status.as_str(), *label);
        }
        assert_eq!(Article::category_values("category"), None);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(
            "published".parse::<ArticleStatus>(),
            Ok(ArticleStatus::Published)
        );
        assert!("Live".parse::<ArticleStatus>().is_err());
    }

    #[test]
    fn patch_only_touches_set_fields() {
        let mut article = Article {
            title: "Staging tips".to_string(),
            author: "Rui".to_string(),
            tags: vec!["staging".to_string()],
            ..Article::default()
        };

        article.apply_patch(&ArticlePatch {
            status: Some(ArticleStatus::Published),
            ..ArticlePatch::default()
        });

        assert_eq!(article.status, ArticleStatus::Published);
        assert_eq!(article.title, "Staging tips");
        assert_eq!(article.tags, vec!["staging".to_string()]);
    }

    #[test]
    fn empty_patch_serializes_to_empty_object() {
        let json = serde_json::to_string(&ArticlePatch::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
