use serde::Serialize;

/// A ward organization (Relief Society, Primary, the ward itself, ...).
///
/// `organization_type` is the raw type code stored on the entity; see
/// `composer::callings::OrganizationKind` for its interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub label: String,
    pub organization_type: String,
}
