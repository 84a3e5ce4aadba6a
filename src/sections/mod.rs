//! Invoice sections.
//!
//! Each section owns one region of the UBL document, validates its own
//! fields, and renders itself as an XML fragment. [`JoFotaraInvoice`]
//! stitches the fragments together in schema order.
//!
//! [`JoFotaraInvoice`]: crate::JoFotaraInvoice

mod basic_info;
mod customer;
mod income_source;
mod items;
mod line_item;
mod reason;
mod seller;
mod totals;

pub use basic_info::{BasicInvoiceInformation, InvoiceType, PaymentMethod};
pub use customer::{CityCode, CustomerIdType, CustomerInformation};
pub use income_source::SupplierIncomeSource;
pub use items::InvoiceItems;
pub use line_item::{InvoiceLineItem, TaxCategory};
pub use reason::ReasonForReturn;
pub use seller::SellerInformation;
pub use totals::InvoiceTotals;
