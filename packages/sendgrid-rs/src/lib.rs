// https://www.twilio.com/docs/sendgrid/api-reference/mail-send/mail-send

pub mod models;

use reqwest::Client;

use crate::models::MailSendRequest;

#[derive(Debug, Clone)]
pub struct SendGridOptions {
    pub api_key: String,
    pub from_email: String,
}

#[derive(Debug, Clone)]
pub struct SendGridService {
    options: SendGridOptions,
}

impl SendGridService {
    pub fn new(options: SendGridOptions) -> Self {
        Self { options }
    }

    pub async fn send_email(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), &'static str> {
        let url = "https://api.sendgrid.com/v3/mail/send";

        let request =
            MailSendRequest::plain_text(&self.options.from_email, recipient, subject, body);

        let client = Client::new();
        let res = client
            .post(url)
            .bearer_auth(&self.options.api_key)
            .json(&request)
            .send()
            .await;

        match res {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    // Log the error response from SendGrid
                    let error_body = response.text().await.unwrap_or_default();
                    eprintln!("SendGrid error ({}): {}", status, error_body);
                    return Err("SendGrid returned an error");
                }
                Ok(())
            }
            Err(e) => {
                eprintln!("Request to SendGrid failed: {}", e);
                Err("Error sending email")
            }
        }
    }
}
