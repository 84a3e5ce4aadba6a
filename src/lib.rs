//! JoFotara e-invoicing for Jordan.
//!
//! Builds UBL 2.1 invoice documents for the Jordanian tax authority's
//! JoFotara platform, validates them against the platform's business
//! rules, and submits them over the JoFotara REST API.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating point.
//! Amounts render with exactly 9 decimal places, as the platform requires.
//!
//! ## Quick Start
//!
//! ```
//! use jofotara::{JoFotaraConfig, JoFotaraInvoice, sections::InvoiceType};
//! use rust_decimal_macros::dec;
//!
//! # fn main() -> Result<(), jofotara::JoFotaraError> {
//! let config = JoFotaraConfig::new("your-client-id", "your-secret-key")?;
//! let mut invoice = JoFotaraInvoice::new(config);
//!
//! invoice
//!     .basic_information()
//!     .set_invoice_id("INV-001")
//!     .set_uuid("123e4567-e89b-12d3-a456-426614174000")?
//!     .set_issue_date("16-02-2025")?
//!     .set_invoice_type(InvoiceType::GeneralSales)
//!     .cash()?;
//!
//! invoice
//!     .seller_information()
//!     .set_tin("123456789")?
//!     .set_name("My Company")?;
//!
//! invoice.supplier_income_source("16683693")?;
//!
//! invoice
//!     .items()
//!     .add_item("1")?
//!     .set_quantity(dec!(2))?
//!     .set_unit_price(dec!(10))?
//!     .set_description("Widget")?
//!     .tax(dec!(16))?;
//!
//! // Totals are derived from the items on first access
//! invoice.invoice_totals()?;
//!
//! let xml = invoice.generate_xml()?;
//! assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
//! # Ok(())
//! # }
//! ```
//!
//! Submitting requires the `api` feature (enabled by default):
//!
//! ```no_run
//! # use jofotara::{JoFotaraConfig, JoFotaraInvoice};
//! # fn main() -> Result<(), jofotara::JoFotaraError> {
//! # let mut invoice = JoFotaraInvoice::new(JoFotaraConfig::new("id", "secret")?);
//! let response = invoice.send()?;
//! if response.is_success() {
//!     println!("QR code: {:?}", response.qr_code());
//! } else if let Some(summary) = response.error_summary() {
//!     eprintln!("{summary}");
//! }
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "api")]
pub mod api;
mod config;
mod error;
mod invoice;
pub mod sections;
mod xml;

pub use config::{DEFAULT_API_URL, JoFotaraConfig, SellerDefaults};
pub use error::JoFotaraError;
pub use invoice::JoFotaraInvoice;

#[cfg(feature = "api")]
pub use api::{ApiMessage, JoFotaraResponse};
