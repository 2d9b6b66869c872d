//! AWS SES delivery for marketplace notifications
//!
//! Supports LocalStack by pointing `AWS_ENDPOINT_URL` at the emulator.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use aws_sdk_ses::config::SharedCredentialsProvider;
use aws_sdk_ses::types::{Body, Content, Destination, Message};
use aws_sdk_ses::Client as SesClient;
use chrono::Utc;

use crate::{EmailConfig, EmailError, EmailMessage, EmailReceipt, EmailService};

const DEFAULT_REGION: &str = "us-east-1";

/// Sends notification emails through Amazon SES
pub struct SesEmailService {
    client: SesClient,
    default_from: String,
    app_base_url: String,
}

impl SesEmailService {
    pub async fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let sdk_config = load_sdk_config(&config).await;
        let client = SesClient::new(&sdk_config);

        // LocalStack may not have SES wired up yet; only warn
        match client.get_send_quota().send().await {
            Ok(_) => tracing::info!("Connected to AWS SES"),
            Err(e) => tracing::warn!(error = %e, "SES quota check failed"),
        }

        Ok(Self {
            client,
            default_from: config.default_from,
            app_base_url: config.app_base_url,
        })
    }
}

async fn load_sdk_config(config: &EmailConfig) -> SdkConfig {
    let region = Region::new(
        config
            .aws_region
            .clone()
            .unwrap_or_else(|| DEFAULT_REGION.to_string()),
    );
    let loader = aws_config::defaults(BehaviorVersion::latest()).region(region);

    match config.aws_endpoint_url.as_deref() {
        Some(endpoint_url) => {
            tracing::info!(endpoint_url, "Using custom AWS endpoint for SES");
            let credentials = Credentials::new(
                "test-access-key",
                "test-secret-key",
                None,
                None,
                "swapshop-localstack",
            );
            loader
                .endpoint_url(endpoint_url)
                .credentials_provider(SharedCredentialsProvider::new(credentials))
                .load()
                .await
        }
        None => loader.load().await,
    }
}

fn utf8_content(data: &str, part: &str) -> Result<Content, EmailError> {
    Content::builder()
        .data(data)
        .charset("UTF-8")
        .build()
        .map_err(|e| EmailError::AwsSes(format!("Failed to build {}: {}", part, e)))
}

fn to_ses_message(message: &EmailMessage) -> Result<Message, EmailError> {
    let mut body = Body::builder().text(utf8_content(&message.body_text, "text body")?);
    if let Some(html) = &message.body_html {
        body = body.html(utf8_content(html, "HTML body")?);
    }

    Ok(Message::builder()
        .subject(utf8_content(&message.subject, "subject")?)
        .body(body.build())
        .build())
}

/// Reject obviously malformed addresses before calling SES
fn validate_addresses(message: &EmailMessage) -> Result<(), EmailError> {
    let plausible = |addr: &str| {
        addr.split_once('@')
            .map(|(local, domain)| !local.is_empty() && !domain.is_empty())
            .unwrap_or(false)
    };

    if !plausible(&message.to) {
        return Err(EmailError::Validation(format!(
            "Invalid recipient address: {}",
            message.to
        )));
    }
    if !plausible(&message.from) {
        return Err(EmailError::Validation(format!(
            "Invalid sender address: {}",
            message.from
        )));
    }
    Ok(())
}

#[async_trait::async_trait]
impl EmailService for SesEmailService {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        validate_addresses(&message)?;

        let mut request = self
            .client
            .send_email()
            .source(&message.from)
            .destination(Destination::builder().to_addresses(&message.to).build())
            .message(to_ses_message(&message)?);

        if let Some(reply_to) = &message.reply_to {
            request = request.reply_to_addresses(reply_to);
        }

        let output = request
            .send()
            .await
            .map_err(|e| EmailError::AwsSes(format!("Failed to send email: {}", e)))?;

        let message_id = output.message_id().to_string();
        tracing::info!(to = %message.to, message_id = %message_id, "Email sent via SES");

        Ok(EmailReceipt {
            message_id,
            sent_at: Utc::now(),
            provider: "aws-ses".to_string(),
            metadata: message.metadata,
        })
    }

    fn default_from(&self) -> String {
        self.default_from.clone()
    }

    fn app_base_url(&self) -> &str {
        &self.app_base_url
    }
}
