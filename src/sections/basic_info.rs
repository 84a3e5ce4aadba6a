use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::JoFotaraError;
use crate::xml::{escape_xml, normalize_newlines};

/// JoFotara invoice type, determining the `name` attribute of
/// `cbc:InvoiceTypeCode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceType {
    /// Income invoice (unregistered sellers).
    Income,
    /// General sales tax invoice.
    GeneralSales,
    /// Special sales tax invoice.
    SpecialSales,
}

/// How the invoice is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Receivable,
}

impl InvoiceType {
    /// Payment code for a cash sale.
    pub fn cash_code(&self) -> &'static str {
        self.payment_code(PaymentMethod::Cash)
    }

    /// Payment code for a receivable sale.
    pub fn receivable_code(&self) -> &'static str {
        self.payment_code(PaymentMethod::Receivable)
    }

    /// Three-digit payment code carried in the `name` attribute.
    pub fn payment_code(&self, method: PaymentMethod) -> &'static str {
        match (self, method) {
            (Self::Income, PaymentMethod::Cash) => "011",
            (Self::Income, PaymentMethod::Receivable) => "021",
            (Self::GeneralSales, PaymentMethod::Cash) => "012",
            (Self::GeneralSales, PaymentMethod::Receivable) => "022",
            (Self::SpecialSales, PaymentMethod::Cash) => "013",
            (Self::SpecialSales, PaymentMethod::Receivable) => "023",
        }
    }
}

#[derive(Debug, Clone)]
struct BillingReference {
    original_id: String,
    original_uuid: String,
    original_full_amount: Decimal,
}

/// Invoice identity, dates, type, and the credit-note billing reference.
#[derive(Debug, Clone)]
pub struct BasicInvoiceInformation {
    invoice_id: Option<String>,
    uuid: Option<String>,
    issue_date: Option<NaiveDate>,
    note: Option<String>,
    invoice_counter: u64,
    invoice_type: Option<InvoiceType>,
    payment_method: PaymentMethod,
    billing_reference: Option<BillingReference>,
}

impl Default for BasicInvoiceInformation {
    fn default() -> Self {
        Self::new()
    }
}

impl BasicInvoiceInformation {
    pub fn new() -> Self {
        Self {
            invoice_id: None,
            uuid: None,
            issue_date: None,
            note: None,
            invoice_counter: 1,
            invoice_type: None,
            payment_method: PaymentMethod::Cash,
            billing_reference: None,
        }
    }

    /// Set the seller-assigned invoice number.
    pub fn set_invoice_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.invoice_id = Some(id.into());
        self
    }

    /// Set the globally unique invoice identifier.
    ///
    /// # Errors
    ///
    /// Fails unless the value is a canonical 8-4-4-4-12 hex UUID.
    pub fn set_uuid(&mut self, uuid: impl Into<String>) -> Result<&mut Self, JoFotaraError> {
        let uuid = uuid.into();
        if !is_canonical_uuid(&uuid) {
            return Err(JoFotaraError::validation("Invalid UUID format"));
        }
        self.uuid = Some(uuid);
        Ok(self)
    }

    /// Set the issue date from a `dd-mm-yyyy` string.
    ///
    /// # Errors
    ///
    /// Fails if the string does not parse as a valid calendar date.
    pub fn set_issue_date(&mut self, date: &str) -> Result<&mut Self, JoFotaraError> {
        let parsed = NaiveDate::parse_from_str(date, "%d-%m-%Y")
            .map_err(|_| JoFotaraError::validation("Date must be in the format dd-mm-yyyy"))?;
        self.issue_date = Some(parsed);
        Ok(self)
    }

    /// Set the issue date from an already-parsed date.
    pub fn set_issue_date_naive(&mut self, date: NaiveDate) -> &mut Self {
        self.issue_date = Some(date);
        self
    }

    /// Attach a free-text note.
    pub fn set_note(&mut self, note: impl Into<String>) -> &mut Self {
        self.note = Some(note.into());
        self
    }

    /// Set the invoice counter (ICV), a per-seller sequence starting at 1.
    ///
    /// # Errors
    ///
    /// Fails if the counter is zero.
    pub fn set_invoice_counter(&mut self, counter: u64) -> Result<&mut Self, JoFotaraError> {
        if counter == 0 {
            return Err(JoFotaraError::validation(
                "Invoice counter must be greater than 0",
            ));
        }
        self.invoice_counter = counter;
        Ok(self)
    }

    /// Set the invoice type; call before choosing a payment method.
    pub fn set_invoice_type(&mut self, invoice_type: InvoiceType) -> &mut Self {
        self.invoice_type = Some(invoice_type);
        self
    }

    /// Mark the invoice as settled in cash.
    ///
    /// # Errors
    ///
    /// Fails if the invoice type has not been set yet.
    pub fn cash(&mut self) -> Result<&mut Self, JoFotaraError> {
        self.set_payment_method(PaymentMethod::Cash)
    }

    /// Mark the invoice as a receivable.
    ///
    /// # Errors
    ///
    /// Fails if the invoice type has not been set yet.
    pub fn receivable(&mut self) -> Result<&mut Self, JoFotaraError> {
        self.set_payment_method(PaymentMethod::Receivable)
    }

    /// Set the payment method directly.
    ///
    /// # Errors
    ///
    /// Fails if the invoice type has not been set yet.
    pub fn set_payment_method(&mut self, method: PaymentMethod) -> Result<&mut Self, JoFotaraError> {
        if self.invoice_type.is_none() {
            return Err(JoFotaraError::validation(
                "Invoice type must be set before setting payment method. Use set_invoice_type() first.",
            ));
        }
        self.payment_method = method;
        Ok(self)
    }

    /// Turn this invoice into a credit invoice referencing the original one.
    ///
    /// The referenced amount is the original invoice's payable amount.
    ///
    /// # Errors
    ///
    /// Fails if the referenced amount is not positive.
    pub fn as_credit_invoice(
        &mut self,
        original_invoice_id: impl Into<String>,
        original_invoice_uuid: impl Into<String>,
        original_full_amount: Decimal,
    ) -> Result<&mut Self, JoFotaraError> {
        if original_full_amount <= Decimal::ZERO {
            return Err(JoFotaraError::validation(
                "Original invoice amount must be greater than 0",
            ));
        }
        self.billing_reference = Some(BillingReference {
            original_id: original_invoice_id.into(),
            original_uuid: original_invoice_uuid.into(),
            original_full_amount,
        });
        Ok(self)
    }

    pub fn is_credit_invoice(&self) -> bool {
        self.billing_reference.is_some()
    }

    pub fn invoice_counter(&self) -> u64 {
        self.invoice_counter
    }

    /// Check that the identity fields and invoice type are present.
    pub fn validate(&self) -> Result<(), JoFotaraError> {
        if self.invoice_id.is_none() {
            return Err(JoFotaraError::validation("Invoice ID is required"));
        }
        if self.uuid.is_none() {
            return Err(JoFotaraError::validation("UUID is required"));
        }
        if self.issue_date.is_none() {
            return Err(JoFotaraError::validation("Issue date is required"));
        }
        if self.invoice_type.is_none() {
            return Err(JoFotaraError::validation(
                "Invoice type is required. Use set_invoice_type() to set it.",
            ));
        }
        Ok(())
    }

    /// Render the identity elements, the type code, currencies, the
    /// credit-note billing reference, and the ICV counter.
    pub fn to_xml(&self) -> Result<String, JoFotaraError> {
        self.validate()?;
        let invoice_id = self.invoice_id.as_deref().unwrap_or_default();
        let uuid = self.uuid.as_deref().unwrap_or_default();
        let issue_date = self.issue_date.unwrap_or_default();
        let invoice_type = self.invoice_type.unwrap_or(InvoiceType::GeneralSales);

        let type_code = if self.is_credit_invoice() { "381" } else { "388" };

        let mut xml = Vec::new();
        xml.push(format!("<cbc:ID>{}</cbc:ID>", escape_xml(invoice_id)));
        xml.push(format!("<cbc:UUID>{}</cbc:UUID>", escape_xml(uuid)));
        xml.push(format!(
            "<cbc:IssueDate>{}</cbc:IssueDate>",
            issue_date.format("%Y-%m-%d")
        ));
        xml.push(format!(
            "<cbc:InvoiceTypeCode name=\"{}\">{}</cbc:InvoiceTypeCode>",
            invoice_type.payment_code(self.payment_method),
            type_code
        ));
        if let Some(note) = &self.note {
            xml.push(format!("<cbc:Note>{}</cbc:Note>", escape_xml(note)));
        }
        xml.push("<cbc:DocumentCurrencyCode>JOD</cbc:DocumentCurrencyCode>".to_string());
        xml.push("<cbc:TaxCurrencyCode>JOD</cbc:TaxCurrencyCode>".to_string());

        if let Some(reference) = &self.billing_reference {
            xml.push("<cac:BillingReference>".to_string());
            xml.push("    <cac:InvoiceDocumentReference>".to_string());
            xml.push(format!(
                "        <cbc:ID>{}</cbc:ID>",
                escape_xml(&reference.original_id)
            ));
            xml.push(format!(
                "        <cbc:UUID>{}</cbc:UUID>",
                escape_xml(&reference.original_uuid)
            ));
            xml.push(format!(
                "        <cbc:DocumentDescription>{:.2}</cbc:DocumentDescription>",
                reference.original_full_amount
            ));
            xml.push("    </cac:InvoiceDocumentReference>".to_string());
            xml.push("</cac:BillingReference>".to_string());
        }

        xml.push("<cac:AdditionalDocumentReference>".to_string());
        xml.push("    <cbc:ID>ICV</cbc:ID>".to_string());
        xml.push(format!("    <cbc:UUID>{}</cbc:UUID>", self.invoice_counter));
        xml.push("</cac:AdditionalDocumentReference>".to_string());

        Ok(normalize_newlines(&xml.join("\n")))
    }
}

/// Canonical UUID check: 8-4-4-4-12 groups of hex digits.
fn is_canonical_uuid(value: &str) -> bool {
    if value.len() != 36 {
        return false;
    }
    value.bytes().enumerate().all(|(i, b)| match i {
        8 | 13 | 18 | 23 => b == b'-',
        _ => b.is_ascii_hexdigit(),
    })
}
