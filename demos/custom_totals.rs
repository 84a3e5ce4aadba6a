//! Set the monetary totals by hand instead of deriving them from the items.
//!
//! The totals still have to match the line items unless the cross-check is
//! disabled with `set_totals_validation(false)`.
//!
//! Run with: `cargo run --example custom_totals`

use jofotara::sections::InvoiceType;
use jofotara::{JoFotaraConfig, JoFotaraError, JoFotaraInvoice};
use rust_decimal_macros::dec;

fn main() -> Result<(), JoFotaraError> {
    let config = JoFotaraConfig::new("your-client-id", "your-secret-key")?;
    let mut invoice = JoFotaraInvoice::new(config);

    invoice
        .basic_information()
        .set_invoice_id("INV-2025-002")
        .set_uuid("123e4567-e89b-12d3-a456-426614174002")?
        .set_issue_date("21-02-2025")?
        .set_invoice_type(InvoiceType::GeneralSales)
        .receivable()?;

    invoice
        .seller_information()
        .set_tin("123456789")?
        .set_name("My Company Ltd")?;

    invoice.supplier_income_source("16683693")?;

    let item = invoice.items().add_item("1")?;
    item.set_quantity(dec!(1))?
        .set_unit_price(dec!(100))?
        .set_description("Yearly subscription")?
        .tax(dec!(16))?;

    // Set each amount explicitly; call order matters for the guards
    let totals = invoice.invoice_totals()?;
    totals
        .set_tax_exclusive_amount(dec!(100))?
        .set_discount_total_amount(None)?
        .set_tax_inclusive_amount(dec!(116))?
        .set_tax_total_amount(dec!(16))?
        .set_payable_amount(dec!(116))?;

    println!("{}", invoice.generate_xml()?);

    Ok(())
}
