use actix_session::Session;

use crate::errors::AppError;

/// Permission codes held by the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Permissions(pub Vec<String>);

impl Permissions {
    pub fn has(&self, code: &str) -> bool {
        self.0.iter().any(|p| p == code)
    }

    pub fn from_csv(csv: &str) -> Self {
        let codes = csv
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        Permissions(codes)
    }

    pub fn to_csv(&self) -> String {
        self.0.join(",")
    }
}

/// Store the authenticated user in the session, replacing any prior state.
pub fn sign_in(
    session: &Session,
    user_id: i64,
    username: &str,
    permissions: &Permissions,
) -> Result<(), AppError> {
    session.renew();
    session
        .insert("user_id", user_id)
        .and_then(|_| session.insert("username", username))
        .and_then(|_| session.insert("permissions", permissions.to_csv()))
        .map_err(|e| AppError::Session(format!("Failed to store session: {e}")))
}

pub fn get_user_id(session: &Session) -> Option<i64> {
    session.get::<i64>("user_id").unwrap_or(None)
}

pub fn get_permissions(session: &Session) -> Result<Permissions, AppError> {
    match session.get::<String>("permissions") {
        Ok(Some(csv)) => Ok(Permissions::from_csv(&csv)),
        Ok(None) => Err(AppError::Session("No permissions in session".to_string())),
        Err(e) => Err(AppError::Session(format!("Failed to get permissions: {e}"))),
    }
}

/// Check permission; returns `PermissionDenied` if the code is missing.
pub fn require_permission(session: &Session, code: &str) -> Result<(), AppError> {
    if get_permissions(session)?.has(code) {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(code.to_string()))
    }
}
