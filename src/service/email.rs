use crate::config::EmailConfig;
use crate::error::app_error::AppError;
use crate::models::complaint::ComplaintCategory;
use lettre::message::header::ContentType;
use lettre::message::{MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Notify a student that their complaint was resolved. Called right
    /// before the resolved complaint row is deleted.
    pub async fn send_resolution_email(
        &self,
        to_email: &str,
        to_name: &str,
        complaint_title: &str,
        category: ComplaintCategory,
    ) -> Result<(), AppError> {
        if !self.config.enabled {
            tracing::warn!("Email service is disabled, skipping resolution email to {}", to_email);
            return Ok(());
        }

        let subject = "Your complaint has been resolved - Sahayya Portal";
        let html_body = self.resolution_email_html(to_name, complaint_title, category);
        let text_body = self.resolution_email_text(to_name, complaint_title, category);

        self.send_email(to_email, subject, &html_body, &text_body).await
    }

    fn resolution_email_html(&self, to_name: &str, complaint_title: &str, category: ComplaintCategory) -> String {
        format!(
            r##"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Your complaint has been resolved</title>
</head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Arial, sans-serif; background-color: #f4f4f5; margin: 0; padding: 20px;">
  <div style="max-width: 600px; margin: 0 auto; background-color: #ffffff; border-radius: 12px; overflow: hidden;">
    <div style="background: linear-gradient(135deg, #3b82f6, #1d4ed8); padding: 30px; text-align: center;">
      <h1 style="color: #ffffff; margin: 0; font-size: 24px;">Sahayya Portal</h1>
      <p style="color: rgba(255,255,255,0.9); margin: 10px 0 0 0; font-size: 14px;">Campus Grievance Redressal System</p>
    </div>
    <div style="padding: 30px;">
      <h2 style="color: #16a34a; text-align: center; margin: 0 0 20px 0;">Your Complaint Has Been Resolved</h2>
      <p style="color: #374151; font-size: 16px; line-height: 1.6;">Dear <strong>{to_name}</strong>,</p>
      <p style="color: #374151; font-size: 16px; line-height: 1.6;">
        We are pleased to inform you that your complaint has been resolved by our administrative team.
      </p>
      <div style="background-color: #f8fafc; border-radius: 8px; padding: 20px; margin: 20px 0; border-left: 4px solid #3b82f6;">
        <p style="margin: 0 0 8px 0; color: #1e293b; font-size: 16px;"><strong>Title:</strong> {complaint_title}</p>
        <p style="margin: 0; color: #1e293b; font-size: 16px;"><strong>Category:</strong> {category}</p>
      </div>
      <p style="color: #374151; font-size: 16px; line-height: 1.6;">
        If you have any further concerns, please submit a new complaint through the portal.
      </p>
      <p style="color: #374151; font-size: 16px; line-height: 1.6;">Thank you for helping us improve our campus!</p>
    </div>
  </div>
</body>
</html>"##
        )
    }

    fn resolution_email_text(&self, to_name: &str, complaint_title: &str, category: ComplaintCategory) -> String {
        format!(
            "Dear {to_name},\n\n\
             We are pleased to inform you that your complaint has been resolved by our administrative team.\n\n\
             Title: {complaint_title}\n\
             Category: {category}\n\n\
             If you have any further concerns, please submit a new complaint through the portal.\n\n\
             Thank you for helping us improve our campus!\n\n\
             Sahayya Portal - Campus Grievance Redressal System\n"
        )
    }

    async fn send_email(&self, to_email: &str, subject: &str, html_body: &str, text_body: &str) -> Result<(), AppError> {
        let email = Message::builder()
            .from(
                format!("{} <{}>", self.config.from_name, self.config.from_address)
                    .parse()
                    .map_err(|e| AppError::email(format!("Invalid from address: {}", e)))?,
            )
            .to(to_email.parse().map_err(|e| AppError::email(format!("Invalid to address: {}", e)))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(SinglePart::builder().header(ContentType::TEXT_PLAIN).body(text_body.to_string()))
                    .singlepart(SinglePart::builder().header(ContentType::TEXT_HTML).body(html_body.to_string())),
            )
            .map_err(|e| AppError::email(format!("Failed to build email: {}", e)))?;

        let creds = Credentials::new(self.config.smtp_username.clone(), self.config.smtp_password.clone());

        let mailer = SmtpTransport::relay(&self.config.smtp_host)
            .map_err(|e| AppError::email(format!("Failed to create SMTP transport: {}", e)))?
            .credentials(creds)
            .port(self.config.smtp_port)
            .build();

        // lettre's SmtpTransport is blocking; keep it off the async workers.
        let result = tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::email(format!("Failed to spawn email sending task: {}", e)))?;

        result.map_err(|e| AppError::email(format!("Failed to send email: {}", e)))?;

        tracing::info!("Resolution email sent successfully to {}", to_email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> EmailConfig {
        EmailConfig {
            enabled: false,
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_username: "test".to_string(),
            smtp_password: "test".to_string(),
            from_address: "noreply@sahayya.example".to_string(),
            from_name: "Sahayya Portal".to_string(),
        }
    }

    #[test]
    fn resolution_email_html_mentions_complaint() {
        let service = EmailService::new(test_config());
        let html = service.resolution_email_html("Asha Rao", "Broken ceiling fan in room 204", ComplaintCategory::Hostel);

        assert!(html.contains("Asha Rao"));
        assert!(html.contains("Broken ceiling fan in room 204"));
        assert!(html.contains("Hostel"));
    }

    #[test]
    fn resolution_email_text_mentions_complaint() {
        let service = EmailService::new(test_config());
        let text = service.resolution_email_text("Asha Rao", "Wi-Fi outage in library", ComplaintCategory::Infrastructure);

        assert!(text.contains("Asha Rao"));
        assert!(text.contains("Wi-Fi outage in library"));
        assert!(text.contains("Infrastructure"));
    }

    #[tokio::test]
    async fn disabled_service_short_circuits() {
        let service = EmailService::new(test_config());
        let result = service
            .send_resolution_email("student@college.edu", "Asha Rao", "Anything", ComplaintCategory::Other)
            .await;
        assert!(result.is_ok());
    }
}
