use crate::auth::{CurrentUser, SESSION_COOKIE, parse_session_cookie_value};
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::middleware::{ClientIp, UserAgent};
use crate::models::audit::audit_events;
use crate::models::session::SESSION_TTL_HOURS;
use crate::models::user::{LoginRequest, SignupRequest, UserResponse};
use crate::service::login_guard::{LoginGuard, normalize_identifier};
use chrono::{Duration, Utc};
use rocket::http::{Cookie, CookieJar, Status};
use rocket::serde::json::Json;
use rocket::{State, routes};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[rocket::post("/", data = "<payload>")]
pub async fn post_user_signup(
    pool: &State<PgPool>,
    client_ip: ClientIp,
    user_agent: UserAgent,
    payload: Json<SignupRequest>,
) -> Result<(Status, Json<UserResponse>), AppError> {
    payload.validate()?;

    let email = normalize_identifier(&payload.email);
    let repo = PostgresRepository { pool: pool.inner().clone() };

    if repo.get_user_by_email(&email).await?.is_some() {
        return Err(AppError::UserAlreadyExists(email));
    }

    let user = repo.create_user(&payload.full_name, &email, &payload.password, "student").await?;
    let _ = repo
        .create_security_audit_log(Some(&user.id), audit_events::SIGNUP, true, client_ip.0, user_agent.0, None)
        .await;

    Ok((Status::Created, Json(UserResponse::from(&user))))
}

/// Authenticate a user.
///
/// The login attempt guard is consulted before credentials are verified and
/// updated afterwards: a locked identifier is rejected up front with 429 and
/// a `Retry-After` header, and the failure that crosses the threshold locks
/// the identifier for the lockout duration.
#[rocket::post("/login", data = "<payload>")]
pub async fn post_user_login(
    pool: &State<PgPool>,
    guard: &State<LoginGuard>,
    cookies: &CookieJar<'_>,
    client_ip: ClientIp,
    user_agent: UserAgent,
    payload: Json<LoginRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let identifier = normalize_identifier(&payload.email);
    let repo = PostgresRepository { pool: pool.inner().clone() };

    let lockout = guard.check_lockout(&identifier).await;
    if lockout.locked {
        return Err(AppError::AccountLocked {
            retry_after_seconds: lockout.remaining_seconds,
        });
    }

    let user = match repo.get_user_by_email(&identifier).await? {
        Some(user) => user,
        None => {
            PostgresRepository::dummy_verify(&payload.password);
            return Err(failed_login(&repo, guard, &identifier, None, client_ip.0, user_agent.0).await);
        }
    };

    if let Err(err) = repo.verify_password(&user, &payload.password).await {
        return match err {
            AppError::InvalidCredentials => {
                Err(failed_login(&repo, guard, &identifier, Some(&user.id), client_ip.0, user_agent.0).await)
            }
            other => Err(other),
        };
    }

    guard.record_outcome(&identifier, true).await;

    let expires_at = Utc::now() + Duration::hours(SESSION_TTL_HOURS);
    let session = repo.create_session(&user.id, expires_at).await?;
    let value = format!("{}:{}", session.id, user.id);
    cookies.add_private(Cookie::build((SESSION_COOKIE, value)).path("/").build());

    let _ = repo
        .create_security_audit_log(Some(&user.id), audit_events::LOGIN_SUCCESS, true, client_ip.0, user_agent.0, None)
        .await;

    Ok(Json(UserResponse::from(&user)))
}

/// Record the failed attempt with the guard and turn the result into the
/// response error, auditing along the way.
async fn failed_login(
    repo: &PostgresRepository,
    guard: &LoginGuard,
    identifier: &str,
    user_id: Option<&Uuid>,
    ip_address: Option<String>,
    user_agent: Option<String>,
) -> AppError {
    let outcome = guard.record_outcome(identifier, false).await;

    let _ = repo
        .create_security_audit_log(
            user_id,
            audit_events::LOGIN_FAILED,
            false,
            ip_address.clone(),
            user_agent.clone(),
            Some(serde_json::json!({ "attempts_remaining": outcome.attempts_remaining })),
        )
        .await;

    if outcome.locked {
        let _ = repo
            .create_security_audit_log(user_id, audit_events::ACCOUNT_LOCKED, false, ip_address, user_agent, None)
            .await;

        let lockout = guard.check_lockout(identifier).await;
        return AppError::AccountLocked {
            retry_after_seconds: lockout.remaining_seconds,
        };
    }

    AppError::InvalidCredentials
}

#[rocket::post("/logout")]
pub async fn post_user_logout(pool: &State<PgPool>, cookies: &CookieJar<'_>) -> Status {
    if let Some(cookie) = cookies.get_private(SESSION_COOKIE)
        && let Some((session_id, user_id)) = parse_session_cookie_value(cookie.value())
    {
        let repo = PostgresRepository { pool: pool.inner().clone() };
        let _ = repo.delete_session(&session_id).await;
        let _ = repo
            .create_security_audit_log(Some(&user_id), audit_events::LOGOUT, true, None, None, None)
            .await;
    }

    cookies.remove_private(Cookie::build(SESSION_COOKIE).build());
    Status::Ok
}

#[rocket::get("/me")]
pub async fn get_me(current_user: CurrentUser) -> Json<UserResponse> {
    Json(UserResponse {
        id: current_user.id,
        full_name: current_user.full_name,
        email: current_user.email,
    })
}

pub fn routes() -> Vec<rocket::Route> {
    routes![post_user_signup, post_user_login, post_user_logout, get_me]
}

#[cfg(test)]
mod tests {
    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_login_locks_after_five_failures() {
        // Requires a running PostgreSQL at DATABASE_URL
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_signup_rejects_duplicate_email() {
        // Requires a running PostgreSQL at DATABASE_URL
    }
}
