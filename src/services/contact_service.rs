use askama::Template;

use crate::{
    dto::contact::ContactRequest,
    error::{AppError, AppResult},
    mailer::{ContactAutoReplyEmail, ContactNotificationEmail, MailError},
    response::ApiResponse,
    state::AppState,
};

fn or_na(value: Option<&str>) -> &str {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("N/A")
}

pub fn notification_body(payload: &ContactRequest) -> AppResult<String> {
    let body = ContactNotificationEmail {
        name: payload.name.trim(),
        email: payload.email.trim(),
        phone: or_na(payload.phone.as_deref()),
        subject: or_na(payload.subject.as_deref()),
        message: payload.message.trim(),
    }
    .render()
    .map_err(MailError::from)?;
    Ok(body)
}

/// Mail the shop, then send the sender a courtesy reply in the background.
/// Only the first mail decides the outcome.
pub async fn send_contact(
    state: &AppState,
    payload: ContactRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    if payload.name.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.message.trim().is_empty()
    {
        return Err(AppError::BadRequest(
            "Name, email, and message are required.".into(),
        ));
    }

    let subject = format!(
        "New Contact Inquiry: {}",
        payload
            .subject
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("No Subject")
    );
    state
        .mailer
        .send(
            &state.config.smtp.admin_address,
            &subject,
            &notification_body(&payload)?,
        )
        .await?;

    let mailer = state.mailer.clone();
    let to = payload.email.trim().to_string();
    let body = ContactAutoReplyEmail {
        name: payload.name.trim(),
    }
    .render()
    .map_err(MailError::from)?;
    tokio::spawn(async move {
        if let Err(err) = mailer.send(&to, "We received your message", &body).await {
            tracing::warn!(error = %err, to = %to, "contact auto-reply failed");
        }
    });

    Ok(ApiResponse::message("Message sent successfully!"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_escapes_input_and_fills_blanks() {
        let body = notification_body(&ContactRequest {
            name: "<script>".into(),
            email: "a@b.c".into(),
            phone: None,
            subject: Some("  ".into()),
            message: "Need 500 flyers".into(),
        })
        .expect("render");
        assert!(!body.contains("<script>"));
        assert!(body.contains("<strong>Phone:</strong> N/A"));
        assert!(body.contains("<strong>Subject:</strong> N/A"));
        assert!(body.contains("Need 500 flyers"));
    }
}
