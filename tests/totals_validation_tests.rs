use jofotara::sections::InvoiceType;
use jofotara::{JoFotaraConfig, JoFotaraInvoice};
use rust_decimal_macros::dec;

const UUID: &str = "123e4567-e89b-12d3-a456-426614174000";

fn invoice_with_items() -> JoFotaraInvoice {
    let mut invoice = JoFotaraInvoice::new(JoFotaraConfig::new("id", "secret").unwrap());
    invoice
        .basic_information()
        .set_invoice_id("INV-001")
        .set_uuid(UUID)
        .unwrap()
        .set_issue_date("16-02-2025")
        .unwrap()
        .set_invoice_type(InvoiceType::GeneralSales)
        .cash()
        .unwrap();
    invoice
        .seller_information()
        .set_tin("123456789")
        .unwrap()
        .set_name("Seller")
        .unwrap();
    invoice.supplier_income_source("1").unwrap();
    invoice
        .items()
        .add_item("1")
        .unwrap()
        .set_quantity(dec!(1))
        .unwrap()
        .set_unit_price(dec!(100))
        .unwrap()
        .set_description("Item")
        .unwrap()
        .tax(dec!(16))
        .unwrap();
    invoice
}

#[test]
fn manually_set_mismatched_totals_fail_generation() {
    let mut invoice = invoice_with_items();
    {
        let totals = invoice.invoice_totals().unwrap();
        // Overwrite the derived totals with inconsistent values
        totals.set_tax_exclusive_amount(dec!(90)).unwrap();
        totals.set_tax_inclusive_amount(dec!(100)).unwrap();
        totals.set_tax_total_amount(dec!(10)).unwrap();
        totals.set_payable_amount(dec!(100)).unwrap();
    }
    let err = invoice.generate_xml().unwrap_err();
    assert_eq!(
        err.to_string(),
        "validation failed: Invoice totals do not match calculated values from line items"
    );
}

#[test]
fn matching_manual_totals_pass() {
    let mut invoice = invoice_with_items();
    {
        let totals = invoice.invoice_totals().unwrap();
        totals.set_tax_exclusive_amount(dec!(100)).unwrap();
        totals.set_tax_inclusive_amount(dec!(116)).unwrap();
        totals.set_tax_total_amount(dec!(16)).unwrap();
        totals.set_payable_amount(dec!(116)).unwrap();
    }
    assert!(invoice.generate_xml().is_ok());
}

#[test]
fn disabled_validation_accepts_any_totals() {
    let mut invoice = invoice_with_items();
    {
        let totals = invoice.invoice_totals().unwrap();
        totals.set_tax_exclusive_amount(dec!(90)).unwrap();
        totals.set_tax_inclusive_amount(dec!(100)).unwrap();
        totals.set_tax_total_amount(dec!(10)).unwrap();
        totals.set_payable_amount(dec!(100)).unwrap();
    }
    invoice.set_totals_validation(false);
    let xml = invoice.generate_xml().unwrap();
    assert!(xml.contains("<cbc:TaxExclusiveAmount currencyID=\"JOD\">90.000000000</cbc:TaxExclusiveAmount>"));
}

#[test]
fn compute_totals_from_items_overrides_manual_values() {
    let mut invoice = invoice_with_items();
    {
        let totals = invoice.invoice_totals().unwrap();
        totals.set_tax_exclusive_amount(dec!(90)).unwrap();
        totals.set_tax_inclusive_amount(dec!(100)).unwrap();
        totals.set_tax_total_amount(dec!(10)).unwrap();
        totals.set_payable_amount(dec!(100)).unwrap();
    }
    invoice.compute_totals_from_items().unwrap();
    assert!(invoice.generate_xml().is_ok());
    let totals = invoice.invoice_totals().unwrap();
    assert_eq!(totals.tax_exclusive_amount(), dec!(100));
    assert_eq!(totals.payable_amount(), dec!(116));
}

#[test]
fn compute_totals_requires_items() {
    let mut invoice = JoFotaraInvoice::new(JoFotaraConfig::new("id", "secret").unwrap());
    let err = invoice.compute_totals_from_items().unwrap_err();
    assert!(err.to_string().contains("At least one invoice item"));
}

#[test]
fn fractional_amounts_compare_on_rounded_values() {
    let mut invoice = JoFotaraInvoice::new(JoFotaraConfig::new("id", "secret").unwrap());
    invoice
        .basic_information()
        .set_invoice_id("INV-002")
        .set_uuid(UUID)
        .unwrap()
        .set_issue_date("16-02-2025")
        .unwrap()
        .set_invoice_type(InvoiceType::GeneralSales)
        .cash()
        .unwrap();
    invoice
        .seller_information()
        .set_tin("123456789")
        .unwrap()
        .set_name("Seller")
        .unwrap();
    invoice.supplier_income_source("1").unwrap();
    // 3 × 0.333333333333 produces more than 9 decimal places
    invoice
        .items()
        .add_item("1")
        .unwrap()
        .set_quantity(dec!(3))
        .unwrap()
        .set_unit_price(dec!(0.333333333333))
        .unwrap()
        .set_description("Sliver")
        .unwrap()
        .tax(dec!(16))
        .unwrap();
    invoice.invoice_totals().unwrap();
    assert!(invoice.generate_xml().is_ok());
}
