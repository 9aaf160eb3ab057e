use uuid::Uuid;

/// How long a session stays valid after login.
pub const SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, sqlx::FromRow)]
pub struct Session {
    pub id: Uuid,
}

/// The user a live session resolves to.
#[derive(Debug, sqlx::FromRow)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
}
