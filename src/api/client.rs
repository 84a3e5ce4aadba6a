use serde::Serialize;
use serde_json::{Value, json};

use crate::error::JoFotaraError;
use crate::invoice::JoFotaraInvoice;

use super::response::JoFotaraResponse;

#[derive(Serialize)]
struct InvoicePayload {
    invoice: String,
}

impl JoFotaraInvoice {
    /// Generate, encode, and submit the invoice to the JoFotara API.
    ///
    /// Credentials travel in the `Client-Id` and `Secret-Key` headers; the
    /// body is JSON with the base64 document under `invoice`. Status codes
    /// 200, 400, and 403 produce a [`JoFotaraResponse`]; anything else is
    /// an error.
    ///
    /// # Errors
    ///
    /// Fails if the invoice does not validate, the request cannot be
    /// completed, or the API answers with an unhandled status code.
    pub fn send(&mut self) -> Result<JoFotaraResponse, JoFotaraError> {
        let encoded_invoice = self.encode_invoice()?;

        let client = reqwest::blocking::Client::builder()
            .timeout(self.config().timeout())
            .build()
            .map_err(|e| JoFotaraError::Network(e.to_string()))?;

        let response = client
            .post(self.config().api_url())
            .header("Client-Id", self.config().client_id())
            .header("Secret-Key", self.config().client_secret())
            .json(&InvoicePayload {
                invoice: encoded_invoice,
            })
            .send()
            .map_err(|e| JoFotaraError::Network(e.to_string()))?;

        let status_code = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| JoFotaraError::Network(e.to_string()))?;

        let raw = parse_body(&body);

        match status_code {
            200 | 400 | 403 => Ok(JoFotaraResponse::from_json(raw, status_code)),
            other => Err(JoFotaraError::UnexpectedStatus(other)),
        }
    }
}

/// Empty and malformed bodies are replaced with a fabricated error body so
/// the normalizer always has something to report.
fn parse_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return json!({
            "error": "Empty response from API",
            "code": "RESPONSE_ERROR",
        });
    }
    serde_json::from_str(body).unwrap_or_else(|_| {
        json!({
            "error": "Invalid response format from API",
            "code": "RESPONSE_ERROR",
        })
    })
}
