//! Contact form relay.

use async_trait::async_trait;
use std::sync::Arc;

use crate::infra::{MailMessage, Mailer};

const CONTACT_TEXT: &str = "Thank you for contacting us.";

#[derive(Debug, Clone, Default)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

#[async_trait]
pub trait ContactService: Send + Sync {
    /// Forward a contact request to the site mailbox. Returns whether the
    /// mail went out; failures are logged.
    async fn send(&self, request: ContactRequest) -> bool;
}

pub struct ContactRelay {
    mailer: Arc<dyn Mailer>,
    site_address: String,
    subject: String,
}

impl ContactRelay {
    pub fn new(mailer: Arc<dyn Mailer>, site_address: String, subject: String) -> Self {
        Self {
            mailer,
            site_address,
            subject,
        }
    }
}

#[async_trait]
impl ContactService for ContactRelay {
    async fn send(&self, request: ContactRequest) -> bool {
        let html = format!(
            "<p>Customer name: {}</p><p>Customer phone: {}</p><p>Message: {}</p>",
            escape_html(&request.name),
            escape_html(&request.phone),
            escape_html(&request.message)
        );

        let message = MailMessage::new(self.site_address.clone(), self.subject.clone(), CONTACT_TEXT)
            .with_reply_to(request.email.clone())
            .with_html(html);

        match self.mailer.send(message).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(email = %request.email, "Failed to send contact email: {}", e);
                false
            }
        }
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
