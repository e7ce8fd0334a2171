use serde::Serialize;

/// A ward member, used for name autocompletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct MemberRef {
    pub id: i64,
    pub name: String,
}
