//! Twilio WhatsApp webhook — accepts a resume as a PDF attachment or plain
//! message text, runs extraction, and persists the record.
//!
//! Twilio expects a TwiML document back regardless of outcome, so processing
//! failures become an apologetic reply rather than an error status.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::errors::AppError;
use crate::extract::extract;
use crate::state::AppState;

/// Minimum amount of text for a PDF to count as machine-readable.
const MIN_PDF_TEXT_CHARS: usize = 20;

#[derive(Debug, Deserialize)]
pub struct TwilioWebhook {
    #[serde(rename = "Body", default)]
    pub body: String,
    #[serde(rename = "MediaUrl0")]
    pub media_url: Option<String>,
    #[serde(rename = "From", default)]
    pub from: String,
}

/// POST /webhook/whatsapp
pub async fn whatsapp_handler(
    State(state): State<AppState>,
    Form(req): Form<TwilioWebhook>,
) -> Response {
    let reply = match process_submission(&state, &req).await {
        Ok(reply) => reply,
        Err(e) => {
            error!("Error processing resume submission: {e}");
            format!("Error: {e}. Please try again.")
        }
    };
    twiml(&reply)
}

async fn process_submission(state: &AppState, req: &TwilioWebhook) -> Result<String, AppError> {
    let sender = req.from.trim_start_matches("whatsapp:").to_string();

    let text = if let Some(media_url) = req.media_url.as_deref() {
        let bytes = download_media(state, media_url).await?;
        if !is_pdf(&bytes) {
            return Ok("Please send a PDF file only.".to_string());
        }

        save_media(state, &sender, &bytes)?;

        let text = pdf_extract::extract_text_from_mem(&bytes)
            .map_err(|e| AppError::Media(format!("PDF text extraction failed: {e}")))?;
        if text.trim().len() < MIN_PDF_TEXT_CHARS {
            return Ok(
                "Could not extract text from the PDF. Ensure it is not image-based or password-protected."
                    .to_string(),
            );
        }
        text
    } else if !req.body.trim().is_empty() {
        req.body.clone()
    } else {
        return Ok("Please send your resume as a PDF or paste it as plain text.".to_string());
    };

    info!("Extracting candidate details for {sender}");
    let record = extract(&text, state.ner.as_ref(), Some(&sender)).await;

    let saved = state
        .store
        .append(&record)
        .map_err(|e| AppError::Storage(e.to_string()))?;
    if !saved {
        return Ok("This email has already been submitted!".to_string());
    }

    Ok("Resume processed successfully!".to_string())
}

/// Downloads a Twilio media attachment using account-SID basic auth.
async fn download_media(state: &AppState, url: &str) -> Result<Vec<u8>, AppError> {
    let response = state
        .http
        .get(url)
        .basic_auth(&state.config.twilio_sid, Some(&state.config.twilio_token))
        .send()
        .await
        .map_err(|e| AppError::Media(format!("Media download failed: {e}")))?
        .error_for_status()
        .map_err(|e| AppError::Media(format!("Media download failed: {e}")))?;

    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::Media(format!("Media download failed: {e}")))?;
    Ok(bytes.to_vec())
}

fn save_media(state: &AppState, sender: &str, bytes: &[u8]) -> Result<(), AppError> {
    std::fs::create_dir_all(&state.config.media_dir)
        .map_err(|e| AppError::Media(format!("Failed to create media dir: {e}")))?;
    let file_name = format!("resume_{}.pdf", sanitize_sender(sender));
    let path = std::path::Path::new(&state.config.media_dir).join(file_name);
    std::fs::write(&path, bytes)
        .map_err(|e| AppError::Media(format!("Failed to save media: {e}")))?;
    info!("Downloaded media to {}", path.display());
    Ok(())
}

fn sanitize_sender(sender: &str) -> String {
    sender.replace(['+', ':'], "")
}

fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF")
}

/// Wraps a message in a TwiML response document.
fn twiml(message: &str) -> Response {
    let body = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response><Message>{}</Message></Response>",
        xml_escape(message)
    );
    ([(header::CONTENT_TYPE, "text/xml")], body).into_response()
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
