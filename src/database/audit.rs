use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use serde_json::Value as JsonValue;
use uuid::Uuid;

impl PostgresRepository {
    /// Append an entry to the security audit log. Every entry is also
    /// mirrored to tracing so operators see auth activity without a
    /// database query; failures log at warn.
    pub async fn create_security_audit_log(
        &self,
        user_id: Option<&Uuid>,
        event_type: &str,
        success: bool,
        ip_address: Option<String>,
        user_agent: Option<String>,
        metadata: Option<JsonValue>,
    ) -> Result<(), AppError> {
        let user = user_id.map(|u| u.to_string()).unwrap_or_else(|| "-".to_string());
        let ip = ip_address.as_deref().unwrap_or("-");
        if success {
            tracing::info!(category = "audit", event_type = event_type, user_id = %user, ip = %ip, "security audit event");
        } else {
            tracing::warn!(category = "audit", event_type = event_type, user_id = %user, ip = %ip, "security audit event (failure)");
        }

        sqlx::query(
            r#"
            INSERT INTO security_audit_log (user_id, event_type, success, ip_address, user_agent, metadata)
            VALUES ($1, $2, $3, $4::inet, $5, $6)
            "#,
        )
        .bind(user_id)
        .bind(event_type)
        .bind(success)
        .bind(ip_address)
        .bind(user_agent)
        .bind(metadata)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
