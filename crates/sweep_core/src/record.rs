use serde::{Deserialize, Serialize};

/// One extracted article, in the shape the ingestion API accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    pub url: String,
    /// `YYYY-MM-DD HH:MM:SS`
    pub date: String,
    pub author: String,
    pub email: String,
}

/// The two platform identifiers every article request is scoped by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleContext {
    pub cafe_id: String,
    pub menu_id: String,
}

impl ArticleContext {
    pub fn new(cafe_id: impl Into<String>, menu_id: impl Into<String>) -> Self {
        Self {
            cafe_id: cafe_id.into(),
            menu_id: menu_id.into(),
        }
    }
}
