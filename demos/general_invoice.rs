//! Build a general sales tax invoice and print the generated document.
//!
//! Run with: `cargo run --example general_invoice`

use jofotara::sections::{CustomerIdType, InvoiceType};
use jofotara::{JoFotaraConfig, JoFotaraError, JoFotaraInvoice};
use rust_decimal_macros::dec;

fn main() -> Result<(), JoFotaraError> {
    let config = JoFotaraConfig::new("your-client-id", "your-secret-key")?;
    let mut invoice = JoFotaraInvoice::new(config);

    invoice
        .basic_information()
        .set_invoice_id("INV-2025-001")
        .set_uuid("123e4567-e89b-12d3-a456-426614174000")?
        .set_issue_date("16-02-2025")?
        .set_invoice_counter(1)?
        .set_invoice_type(InvoiceType::GeneralSales)
        .cash()?;

    invoice
        .seller_information()
        .set_tin("123456789")?
        .set_name("My Company Ltd")?;

    invoice
        .customer_information()
        .set_id("987654321", CustomerIdType::Nin)
        .set_name("Jane Customer")
        .set_city_code("JO-AM")?;

    invoice.supplier_income_source("16683693")?;

    let item = invoice.items().add_item("1")?;
    item.set_quantity(dec!(2))?
        .set_unit_price(dec!(25.5))?
        .set_description("Consulting hours")?
        .set_discount(dec!(5))?
        .tax(dec!(16))?;

    // Derive the monetary totals from the line items
    invoice.invoice_totals()?;

    println!("{}", invoice.generate_xml()?);
    println!("\nbase64 payload:\n{}", invoice.encode_invoice()?);

    Ok(())
}
