use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::Value;

/// One validation message from the API, normalized across both response
/// dialects.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiMessage {
    #[serde(alias = "EINV_CODE", default = "default_code")]
    pub code: String,
    #[serde(alias = "EINV_MESSAGE", default = "default_message")]
    pub message: String,
    #[serde(alias = "EINV_CATEGORY", default = "default_category")]
    pub category: String,
}

fn default_code() -> String {
    "UNKNOWN".to_string()
}

fn default_message() -> String {
    "Unknown error".to_string()
}

fn default_category() -> String {
    "Unknown category".to_string()
}

impl Default for ApiMessage {
    fn default() -> Self {
        Self {
            code: default_code(),
            message: default_message(),
            category: default_category(),
        }
    }
}

impl ApiMessage {
    fn new(code: &str, message: &str, category: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            category: category.to_string(),
        }
    }
}

/// Normalized view over the two response dialects the JoFotara API is known
/// to answer with: the current camelCase one (`validationResults`,
/// `invoiceStatus`, ...) and the legacy upper-case one (`EINV_RESULTS`,
/// `EINV_STATUS`, ...).
///
/// All fields are extracted once at construction; the raw body stays
/// available through [`raw`].
///
/// [`raw`]: JoFotaraResponse::raw
#[derive(Debug, Clone)]
pub struct JoFotaraResponse {
    raw: Value,
    status_code: u16,
    success: bool,
    invoice_status: Option<String>,
    validation_status: Option<String>,
    submitted_invoice: Option<String>,
    qr_code: Option<String>,
    invoice_number: Option<String>,
    invoice_uuid: Option<String>,
    errors: Vec<ApiMessage>,
    warnings: Vec<ApiMessage>,
    info_messages: Vec<ApiMessage>,
}

impl JoFotaraResponse {
    /// Normalize a raw API body for the given HTTP status code.
    pub fn from_json(raw: Value, status_code: u16) -> Self {
        let mut response = Self {
            raw,
            status_code,
            success: false,
            invoice_status: None,
            validation_status: None,
            submitted_invoice: None,
            qr_code: None,
            invoice_number: None,
            invoice_uuid: None,
            errors: Vec::new(),
            warnings: Vec::new(),
            info_messages: Vec::new(),
        };

        if response.raw.get("validationResults").is_some() {
            response.apply_modern_dialect();
        } else if response.raw.get("EINV_RESULTS").is_some() {
            response.apply_legacy_dialect();
        } else {
            response.apply_bare_body();
        }

        if status_code == 403 {
            // The API returns no usable body on auth failures
            response.success = false;
            response.errors = vec![ApiMessage::new(
                "AUTH_ERROR",
                "Authentication failed. Please check your client ID and secret.",
                "Authentication",
            )];
        }

        response
    }

    fn apply_modern_dialect(&mut self) {
        let results = &self.raw["validationResults"];
        self.validation_status = string_at(results, "status");
        self.errors = messages_at(results, "errorMessages");
        self.warnings = messages_at(results, "warningMessages");
        self.info_messages = messages_at(results, "infoMessages");

        self.invoice_status = string_at(&self.raw, "invoiceStatus");
        self.submitted_invoice = string_at(&self.raw, "submittedInvoice");
        self.qr_code = string_at(&self.raw, "qrCode");
        self.invoice_number = string_at(&self.raw, "invoiceNumber");
        self.invoice_uuid = string_at(&self.raw, "invoiceUUID");

        self.success = self.status_code == 200
            && self.validation_status.as_deref() == Some("PASS")
            && is_submitted(self.invoice_status.as_deref());
    }

    fn apply_legacy_dialect(&mut self) {
        let results = &self.raw["EINV_RESULTS"];
        self.validation_status = string_at(results, "status");
        self.errors = messages_at(results, "ERRORS");
        self.warnings = messages_at(results, "WARNINGS");
        self.info_messages = messages_at(results, "INFO");

        self.invoice_status = string_at(&self.raw, "EINV_STATUS");
        // "SINGED" is how the upstream API spells it
        self.submitted_invoice = string_at(&self.raw, "EINV_SINGED_INVOICE");
        self.qr_code = string_at(&self.raw, "EINV_QR");
        self.invoice_number = string_at(&self.raw, "EINV_NUM");
        self.invoice_uuid = string_at(&self.raw, "EINV_INV_UUID");

        self.success = self.status_code == 200
            && self.validation_status.as_deref() != Some("ERROR")
            && is_submitted(self.invoice_status.as_deref());
    }

    /// Bodies without either result structure: fabricated transport errors
    /// and unstructured 400 responses.
    fn apply_bare_body(&mut self) {
        self.success = false;

        if let Some(errors) = self.raw.get("errors").and_then(Value::as_array) {
            self.errors = errors.iter().map(parse_message).collect();
            return;
        }
        if let Some(error) = string_at(&self.raw, "error") {
            let code = string_at(&self.raw, "code").unwrap_or_else(default_code);
            self.errors = vec![ApiMessage {
                code,
                message: error,
                category: default_category(),
            }];
            return;
        }
        if self.status_code == 400 && !self.raw.is_null() {
            self.errors = vec![ApiMessage::new(
                "API_ERROR",
                &self.raw.to_string(),
                "API Validation",
            )];
        }
    }

    /// Whether the invoice was accepted (submitted or already submitted
    /// with passing validation).
    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// The raw response body as received.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Invoice lifecycle status, e.g. `SUBMITTED` or `ALREADY_SUBMITTED`.
    pub fn invoice_status(&self) -> Option<&str> {
        self.invoice_status.as_deref()
    }

    /// Validation outcome, e.g. `PASS` or `ERROR`.
    pub fn validation_status(&self) -> Option<&str> {
        self.validation_status.as_deref()
    }

    /// The signed invoice as base64, as returned by the API.
    pub fn submitted_invoice(&self) -> Option<&str> {
        self.submitted_invoice.as_deref()
    }

    /// The signed invoice decoded back to XML, when present and valid
    /// base64 UTF-8.
    pub fn submitted_invoice_decoded(&self) -> Option<String> {
        let encoded = self.submitted_invoice.as_deref()?;
        let bytes = STANDARD.decode(encoded).ok()?;
        String::from_utf8(bytes).ok()
    }

    pub fn qr_code(&self) -> Option<&str> {
        self.qr_code.as_deref()
    }

    pub fn invoice_number(&self) -> Option<&str> {
        self.invoice_number.as_deref()
    }

    pub fn invoice_uuid(&self) -> Option<&str> {
        self.invoice_uuid.as_deref()
    }

    pub fn errors(&self) -> &[ApiMessage] {
        &self.errors
    }

    pub fn warnings(&self) -> &[ApiMessage] {
        &self.warnings
    }

    pub fn info_messages(&self) -> &[ApiMessage] {
        &self.info_messages
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// One line per error, formatted as `[code] category: message`.
    pub fn error_summary(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        let lines: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("[{}] {}: {}", e.code, e.category, e.message))
            .collect();
        Some(lines.join("\n"))
    }
}

fn string_at(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn messages_at(value: &Value, key: &str) -> Vec<ApiMessage> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|entries| entries.iter().map(parse_message).collect())
        .unwrap_or_default()
}

fn parse_message(value: &Value) -> ApiMessage {
    serde_json::from_value(value.clone()).unwrap_or_default()
}

fn is_submitted(status: Option<&str>) -> bool {
    matches!(status, Some("SUBMITTED") | Some("ALREADY_SUBMITTED"))
}
