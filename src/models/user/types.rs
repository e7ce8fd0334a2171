use serde::Serialize;

/// Internal user struct for authentication, includes the password hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub display_name: String,
}

/// A user together with the names of every role assigned to them.
///
/// This is the shape the program composer consumes to build the bishopric roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRef {
    pub id: i64,
    pub display_name: String,
    pub roles: Vec<String>,
}

/// New user data for creation.
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub display_name: String,
}
