//! Static page route handlers: about, contact and the checkout placeholder.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::cart::Notification;
use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::{TOAST_EVENT, hx_trigger};

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate;

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/contact.html")]
pub struct ContactTemplate;

/// Contact form confirmation fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/contact_sent.html")]
pub struct ContactSentTemplate {
    pub name: String,
}

/// Checkout placeholder template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/checkout.html")]
pub struct CheckoutTemplate;

/// Contact form data.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    /// Reject blank fields and addresses without an `@`.
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() || self.message.trim().is_empty() {
            return Err(AppError::BadRequest(
                "name and message are required".to_string(),
            ));
        }
        if !self.email.contains('@') {
            return Err(AppError::BadRequest("email address is invalid".to_string()));
        }
        Ok(())
    }
}

/// Display the about page.
#[instrument]
pub async fn about() -> impl IntoResponse {
    AboutTemplate
}

/// Display the contact page.
#[instrument]
pub async fn contact() -> impl IntoResponse {
    ContactTemplate
}

/// Accept a contact form submission (HTMX).
///
/// Messages are not delivered anywhere; the shopper gets a confirmation
/// fragment and a success toast.
///
/// # Errors
///
/// Returns 400 if a field is missing or the email is malformed.
#[instrument(skip(form), fields(email = %form.email))]
pub async fn submit_contact(Form(form): Form<ContactForm>) -> Result<Response> {
    form.validate()?;
    tracing::info!(name = %form.name.trim(), "contact form submitted");

    let toast = Notification::success("Thanks for reaching out! We'll get back to you soon.");
    let trigger = hx_trigger(&json!({ TOAST_EVENT: [toast] }))?;

    Ok((
        [("HX-Trigger", trigger)],
        ContactSentTemplate {
            name: form.name.trim().to_string(),
        },
    )
        .into_response())
}

/// Display the checkout placeholder.
#[instrument]
pub async fn checkout() -> impl IntoResponse {
    CheckoutTemplate
}
