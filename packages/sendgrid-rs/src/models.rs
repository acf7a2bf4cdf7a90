use serde::Serialize;

/// Request body for the SendGrid v3 mail send endpoint.
#[derive(Debug, Serialize)]
pub struct MailSendRequest {
    pub personalizations: Vec<Personalization>,
    pub from: EmailAddress,
    pub subject: String,
    pub content: Vec<Content>,
}

#[derive(Debug, Serialize)]
pub struct Personalization {
    pub to: Vec<EmailAddress>,
}

#[derive(Debug, Serialize)]
pub struct EmailAddress {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct Content {
    #[serde(rename = "type")]
    pub content_type: String,
    pub value: String,
}

impl MailSendRequest {
    /// Build a plain-text mail from sender to a single recipient.
    pub fn plain_text(from: &str, to: &str, subject: &str, body: &str) -> Self {
        Self {
            personalizations: vec![Personalization {
                to: vec![EmailAddress {
                    email: to.to_string(),
                }],
            }],
            from: EmailAddress {
                email: from.to_string(),
            },
            subject: subject.to_string(),
            content: vec![Content {
                content_type: "text/plain".to_string(),
                value: body.to_string(),
            }],
        }
    }
}
