//! Issue a credit invoice against a previously submitted invoice.
//!
//! Run with: `cargo run --example credit_invoice`

use jofotara::sections::InvoiceType;
use jofotara::{JoFotaraConfig, JoFotaraError, JoFotaraInvoice};
use rust_decimal_macros::dec;

fn main() -> Result<(), JoFotaraError> {
    let config = JoFotaraConfig::new("your-client-id", "your-secret-key")?;
    let mut invoice = JoFotaraInvoice::new(config);

    invoice
        .basic_information()
        .set_invoice_id("CR-2025-001")
        .set_uuid("123e4567-e89b-12d3-a456-426614174001")?
        .set_issue_date("20-02-2025")?
        .set_invoice_type(InvoiceType::GeneralSales)
        .cash()?
        // Reference the original invoice and its payable amount
        .as_credit_invoice(
            "INV-2025-001",
            "123e4567-e89b-12d3-a456-426614174000",
            dec!(53.36),
        )?;

    invoice.set_reason_for_return("Customer returned the goods")?;

    invoice
        .seller_information()
        .set_tin("123456789")?
        .set_name("My Company Ltd")?;

    invoice.supplier_income_source("16683693")?;

    let item = invoice.items().add_item("1")?;
    item.set_quantity(dec!(2))?
        .set_unit_price(dec!(25.5))?
        .set_description("Consulting hours")?
        .set_discount(dec!(5))?
        .tax(dec!(16))?;

    invoice.invoice_totals()?;

    println!("{}", invoice.generate_xml()?);

    Ok(())
}
