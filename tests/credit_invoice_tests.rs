use jofotara::sections::InvoiceType;
use jofotara::{JoFotaraConfig, JoFotaraInvoice};
use rust_decimal_macros::dec;

const UUID: &str = "123e4567-e89b-12d3-a456-426614174000";
const ORIGINAL_UUID: &str = "00000000-1111-2222-3333-444444444444";

fn credit_invoice() -> JoFotaraInvoice {
    let mut invoice = JoFotaraInvoice::new(JoFotaraConfig::new("id", "secret").unwrap());
    invoice
        .basic_information()
        .set_invoice_id("CR-001")
        .set_uuid(UUID)
        .unwrap()
        .set_issue_date("20-02-2025")
        .unwrap()
        .set_invoice_type(InvoiceType::GeneralSales)
        .cash()
        .unwrap()
        .as_credit_invoice("INV-001", ORIGINAL_UUID, dec!(92.8))
        .unwrap();
    invoice
        .seller_information()
        .set_tin("123456789")
        .unwrap()
        .set_name("Seller Company")
        .unwrap();
    invoice.supplier_income_source("16683693").unwrap();
    invoice
        .items()
        .add_item("1")
        .unwrap()
        .set_quantity(dec!(1))
        .unwrap()
        .set_unit_price(dec!(100))
        .unwrap()
        .set_description("Returned Item")
        .unwrap()
        .set_discount(dec!(20))
        .unwrap()
        .tax(dec!(16))
        .unwrap();
    invoice.invoice_totals().unwrap();
    invoice
}

#[test]
fn credit_invoice_without_reason_is_rejected() {
    let mut invoice = credit_invoice();
    let err = invoice.generate_xml().unwrap_err();
    assert_eq!(
        err.to_string(),
        "validation failed: Credit invoices require a reason for return"
    );
}

#[test]
fn credit_invoice_renders_381_and_billing_reference() {
    let mut invoice = credit_invoice();
    invoice.set_reason_for_return("Customer returned the goods").unwrap();
    let xml = invoice.generate_xml().unwrap();

    assert!(xml.contains("<cbc:InvoiceTypeCode name=\"012\">381</cbc:InvoiceTypeCode>"));
    assert!(xml.contains("<cac:BillingReference>"));
    assert!(xml.contains("        <cbc:ID>INV-001</cbc:ID>"));
    assert!(xml.contains(&format!("        <cbc:UUID>{ORIGINAL_UUID}</cbc:UUID>")));
    assert!(xml.contains("<cbc:DocumentDescription>92.80</cbc:DocumentDescription>"));
}

#[test]
fn reason_renders_between_supplier_and_totals() {
    let mut invoice = credit_invoice();
    invoice.set_reason_for_return("Damaged goods").unwrap();
    let xml = invoice.generate_xml().unwrap();

    let supplier = xml.find("</cac:SellerSupplierParty>").unwrap();
    let reason = xml.find("<cac:PaymentMeans>").unwrap();
    let totals = xml.find("<cac:LegalMonetaryTotal>").unwrap();
    assert!(supplier < reason);
    assert!(reason < totals);
    assert!(xml.contains(
        "<cac:PaymentMeans><cbc:PaymentMeansCode listID=\"UN/ECE 4461\">10</cbc:PaymentMeansCode><cbc:InstructionNote>Damaged goods</cbc:InstructionNote></cac:PaymentMeans>"
    ));
}

#[test]
fn regular_invoice_never_renders_payment_means() {
    let mut regular = JoFotaraInvoice::new(JoFotaraConfig::new("id", "secret").unwrap());
    regular
        .basic_information()
        .set_invoice_id("INV-010")
        .set_uuid(UUID)
        .unwrap()
        .set_issue_date("20-02-2025")
        .unwrap()
        .set_invoice_type(InvoiceType::GeneralSales)
        .cash()
        .unwrap();
    regular
        .seller_information()
        .set_tin("123456789")
        .unwrap()
        .set_name("Seller")
        .unwrap();
    regular.supplier_income_source("1").unwrap();
    regular
        .items()
        .add_item("1")
        .unwrap()
        .set_quantity(dec!(1))
        .unwrap()
        .set_unit_price(dec!(10))
        .unwrap()
        .set_description("Item")
        .unwrap()
        .tax(dec!(16))
        .unwrap();
    regular.invoice_totals().unwrap();
    regular.set_reason_for_return("Should not appear").unwrap();

    let xml = regular.generate_xml().unwrap();
    assert!(!xml.contains("PaymentMeans"));
    assert!(xml.contains(">388</cbc:InvoiceTypeCode>"));
}
