//! Email Service
//!
//! Outbound notification contract and its SMTP implementation. The
//! orchestrator only sees the [`Notifier`] trait; delivery failures surface
//! to the caller but are never retried here and never roll back store writes.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Datelike;
use lettre::{
    message::{header, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use log::{debug, error, info};
use tera::{Context, Tera};

/// Outbound account notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Welcome email after a successful registration
    async fn send_created_account_email(&self, recipient_name: &str, recipient: &str)
        -> Result<()>;

    /// Password-reset email carrying the reset token
    async fn send_requested_password_email(
        &self,
        recipient_name: &str,
        recipient: &str,
        token: &str,
    ) -> Result<()>;
}

/// Notifier that only logs, for development setups without SMTP credentials.
/// The reset token itself is never written to the log.
pub struct LoggingNotifier;

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn send_created_account_email(
        &self,
        recipient_name: &str,
        recipient: &str,
    ) -> Result<()> {
        info!("account-created email for {recipient_name} <{recipient}> (SMTP not configured)");
        Ok(())
    }

    async fn send_requested_password_email(
        &self,
        recipient_name: &str,
        recipient: &str,
        _token: &str,
    ) -> Result<()> {
        info!("password-reset email for {recipient_name} <{recipient}> (SMTP not configured)");
        Ok(())
    }
}

/// Email service configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// SMTP username
    pub smtp_username: String,
    /// SMTP password
    pub smtp_password: String,
    /// From email address
    pub from_email: String,
    /// From name (display name)
    pub from_name: String,
    /// Base URL of the client application (used in the reset link)
    pub app_base_url: String,
}

impl EmailConfig {
    /// Create email configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            smtp_host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
            smtp_port: std::env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .unwrap_or(587),
            smtp_username: std::env::var("SMTP_USERNAME")
                .map_err(|_| anyhow::anyhow!("SMTP_USERNAME environment variable is required"))?,
            smtp_password: std::env::var("SMTP_PASSWORD")
                .map_err(|_| anyhow::anyhow!("SMTP_PASSWORD environment variable is required"))?,
            from_email: std::env::var("FROM_EMAIL")
                .map_err(|_| anyhow::anyhow!("FROM_EMAIL environment variable is required"))?,
            from_name: std::env::var("FROM_NAME")
                .unwrap_or_else(|_| "Account Service".to_string()),
            app_base_url: std::env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        })
    }
}

/// SMTP notifier with embedded templates
pub struct EmailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    templates: Tera,
    config: EmailConfig,
}

impl EmailService {
    /// Create a new email service
    pub fn new(config: EmailConfig) -> Result<Self> {
        let creds = Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| anyhow::anyhow!("Failed to configure SMTP relay: {e}"))?
            .port(config.smtp_port)
            .credentials(creds)
            .build();

        let mut templates = Tera::default();
        Self::add_embedded_templates(&mut templates)?;

        Ok(Self {
            transport,
            templates,
            config,
        })
    }

    /// Add embedded email templates
    fn add_embedded_templates(tera: &mut Tera) -> Result<()> {
        let created_html = r#"
<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Welcome</title>
    <style>
        body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px; }
        .header { text-align: center; background: #f8f9fa; padding: 20px; border-radius: 8px 8px 0 0; }
        .content { background: white; padding: 30px; border: 1px solid #dee2e6; }
        .footer { background: #f8f9fa; padding: 20px; border-radius: 0 0 8px 8px; text-align: center; font-size: 12px; color: #666; }
    </style>
</head>
<body>
    <div class="header">
        <h1>Welcome to {{ app_name }}</h1>
    </div>
    <div class="content">
        <p>Hello {{ user_name }},</p>
        <p>Your account has been created. You can sign in right away with the email address this message was sent to.</p>
        <p>Best regards,<br>The {{ app_name }} Team</p>
    </div>
    <div class="footer">
        <p>© {{ current_year }} {{ app_name }}. All rights reserved.</p>
    </div>
</body>
</html>
        "#;

        let created_text = r#"
Welcome to {{ app_name }}

Hello {{ user_name }},

Your account has been created. You can sign in right away with the email
address this message was sent to.

Best regards,
The {{ app_name }} Team

---
© {{ current_year }} {{ app_name }}. All rights reserved.
        "#;

        let reset_html = r#"
<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Reset Your Password</title>
    <style>
        body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px; }
        .header { text-align: center; background: #f8f9fa; padding: 20px; border-radius: 8px 8px 0 0; }
        .content { background: white; padding: 30px; border: 1px solid #dee2e6; }
        .button { display: inline-block; padding: 12px 24px; background: #007bff; color: white; text-decoration: none; border-radius: 4px; margin: 20px 0; }
        .footer { background: #f8f9fa; padding: 20px; border-radius: 0 0 8px 8px; text-align: center; font-size: 12px; color: #666; }
    </style>
</head>
<body>
    <div class="header">
        <h1>Reset Your Password</h1>
    </div>
    <div class="content">
        <p>Hello {{ user_name }},</p>
        <p>A password reset was requested for your account. Click the button below to choose a new password:</p>
        <p style="text-align: center;">
            <a class="button" href="{{ reset_url }}">Reset password</a>
        </p>
        <p>If you didn't request a reset, you can safely ignore this email and your password will stay unchanged.</p>
        <p>Best regards,<br>The {{ app_name }} Team</p>
    </div>
    <div class="footer">
        <p>© {{ current_year }} {{ app_name }}. All rights reserved.</p>
    </div>
</body>
</html>
        "#;

        let reset_text = r#"
Reset Your Password

Hello {{ user_name }},

A password reset was requested for your account. Open the link below to
choose a new password:

{{ reset_url }}

If you didn't request a reset, you can safely ignore this email and your
password will stay unchanged.

Best regards,
The {{ app_name }} Team

---
© {{ current_year }} {{ app_name }}. All rights reserved.
        "#;

        tera.add_raw_template("created_account.html", created_html)
            .map_err(|e| anyhow::anyhow!("Failed to add HTML template: {e}"))?;
        tera.add_raw_template("created_account.txt", created_text)
            .map_err(|e| anyhow::anyhow!("Failed to add text template: {e}"))?;
        tera.add_raw_template("reset_password.html", reset_html)
            .map_err(|e| anyhow::anyhow!("Failed to add HTML template: {e}"))?;
        tera.add_raw_template("reset_password.txt", reset_text)
            .map_err(|e| anyhow::anyhow!("Failed to add text template: {e}"))?;

        Ok(())
    }

    fn base_context(&self, user_name: &str) -> Context {
        let mut context = Context::new();
        context.insert("user_name", user_name);
        context.insert("app_name", &self.config.from_name);
        context.insert("current_year", &chrono::Utc::now().year());
        context
    }

    async fn send(
        &self,
        to_email: &str,
        subject: &str,
        text_body: String,
        html_body: String,
    ) -> Result<()> {
        let message = Message::builder()
            .from(
                format!("{} <{}>", self.config.from_name, self.config.from_email)
                    .parse()
                    .map_err(|e| anyhow::anyhow!("Invalid from address: {e}"))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid recipient email: {e}"))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body),
                    ),
            )
            .map_err(|e| anyhow::anyhow!("Failed to build email message: {e}"))?;

        match self.transport.send(message).await {
            Ok(_) => {
                debug!("email sent to {to_email}");
                Ok(())
            }
            Err(e) => {
                error!("failed to send email to {to_email}: {e}");
                Err(anyhow::anyhow!("Failed to send email: {e}"))
            }
        }
    }
}

#[async_trait]
impl Notifier for EmailService {
    async fn send_created_account_email(
        &self,
        recipient_name: &str,
        recipient: &str,
    ) -> Result<()> {
        info!("Sending account-created email to: {recipient}");

        let context = self.base_context(recipient_name);
        let html_body = self
            .templates
            .render("created_account.html", &context)
            .map_err(|e| anyhow::anyhow!("Failed to render HTML template: {e}"))?;
        let text_body = self
            .templates
            .render("created_account.txt", &context)
            .map_err(|e| anyhow::anyhow!("Failed to render text template: {e}"))?;

        self.send(recipient, "Your account has been created", text_body, html_body)
            .await
    }

    async fn send_requested_password_email(
        &self,
        recipient_name: &str,
        recipient: &str,
        token: &str,
    ) -> Result<()> {
        info!("Sending password-reset email to: {recipient}");

        let mut context = self.base_context(recipient_name);
        context.insert(
            "reset_url",
            &format!("{}/reset-password?token={token}", self.config.app_base_url),
        );

        let html_body = self
            .templates
            .render("reset_password.html", &context)
            .map_err(|e| anyhow::anyhow!("Failed to render HTML template: {e}"))?;
        let text_body = self
            .templates
            .render("reset_password.txt", &context)
            .map_err(|e| anyhow::anyhow!("Failed to render text template: {e}"))?;

        self.send(recipient, "Reset your password", text_body, html_body)
            .await
    }
}
