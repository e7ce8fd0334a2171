use serde::{Deserialize, Serialize};

/// A hymnbook entry: number plus title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Hymn {
    pub number: i64,
    pub title: String,
}
