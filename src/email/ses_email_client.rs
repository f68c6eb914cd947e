use crate::configuration::EmailClientSettings;
use crate::domain::UserEmail;
use crate::email::Email;
use anyhow::anyhow;
use async_trait::async_trait;
use aws_sdk_sesv2 as ses;
use aws_sdk_sesv2::model::{Body, Content, Destination, EmailContent, Message};

pub struct SesEmailClient {
    ses_client: ses::Client,
    sender: UserEmail,
}

impl SesEmailClient {
    pub async fn new(settings: &EmailClientSettings) -> Result<Self, anyhow::Error> {
        let sender = settings.sender().map_err(|e| anyhow!(e))?;
        let aws_config = aws_config::load_from_env().await;
        Ok(Self {
            ses_client: ses::Client::new(&aws_config),
            sender,
        })
    }
}

#[async_trait]
impl Email for SesEmailClient {
    async fn send_email(
        &self,
        recipient: UserEmail,
        subject: &str,
        html_content: &str,
        text_content: &str,
    ) -> Result<(), anyhow::Error> {
        let html_content = Content::builder()
            .data(html_content)
            .charset("UTF-8")
            .build();
        let text_content = Content::builder()
            .data(text_content)
            .charset("UTF-8")
            .build();
        let body = Body::builder()
            .html(html_content)
            .text(text_content)
            .build();
        let subject = Content::builder().data(subject).charset("UTF-8").build();
        let message = Message::builder().subject(subject).body(body).build();
        let content = EmailContent::builder().simple(message).build();
        let destination = Destination::builder()
            .to_addresses(recipient.as_ref())
            .build();

        self.ses_client
            .send_email()
            .from_email_address(self.sender.as_ref())
            .destination(destination)
            .content(content)
            .send()
            .await?;
        Ok(())
    }
}
