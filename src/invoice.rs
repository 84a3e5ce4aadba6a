use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::config::JoFotaraConfig;
use crate::error::JoFotaraError;
use crate::sections::{
    BasicInvoiceInformation, CustomerInformation, InvoiceItems, InvoiceTotals, ReasonForReturn,
    SellerInformation, SupplierIncomeSource,
};

/// Builder and submission entry point for one JoFotara invoice.
///
/// Section accessors hand out mutable builders and create the section on
/// first use. [`generate_xml`] validates everything, renders the sections in
/// schema order, and joins them into the final UBL 2.1 document.
///
/// [`generate_xml`]: JoFotaraInvoice::generate_xml
#[derive(Debug)]
pub struct JoFotaraInvoice {
    config: JoFotaraConfig,
    basic_info: BasicInvoiceInformation,
    seller_info: Option<SellerInformation>,
    customer_info: Option<CustomerInformation>,
    supplier_income_source: Option<SupplierIncomeSource>,
    items: Option<InvoiceItems>,
    invoice_totals: Option<InvoiceTotals>,
    reason_for_return: Option<ReasonForReturn>,
    validate_totals: bool,
}

impl JoFotaraInvoice {
    pub fn new(config: JoFotaraConfig) -> Self {
        Self {
            config,
            basic_info: BasicInvoiceInformation::new(),
            seller_info: None,
            customer_info: None,
            supplier_income_source: None,
            items: None,
            invoice_totals: None,
            reason_for_return: None,
            validate_totals: true,
        }
    }

    pub(crate) fn config(&self) -> &JoFotaraConfig {
        &self.config
    }

    /// Basic invoice information: identity, dates, type, counter.
    pub fn basic_information(&mut self) -> &mut BasicInvoiceInformation {
        &mut self.basic_info
    }

    /// Seller section, pre-filled from the configuration's seller defaults
    /// on first access.
    pub fn seller_information(&mut self) -> &mut SellerInformation {
        if self.seller_info.is_none() {
            // Defaults were validated when the config was built
            let seller = match self.config.seller_defaults() {
                Some(defaults) => SellerInformation::from_validated(defaults.tin(), defaults.name()),
                None => SellerInformation::new(),
            };
            self.seller_info = Some(seller);
        }
        self.seller_info.as_mut().unwrap_or_else(|| unreachable!())
    }

    /// Customer section, seeded as an anonymous cash customer on first
    /// access.
    pub fn customer_information(&mut self) -> &mut CustomerInformation {
        self.customer_info
            .get_or_insert_with(CustomerInformation::anonymous)
    }

    /// Supplier income source section. The sequence is applied on first
    /// access only; later calls ignore the argument and return the
    /// existing section.
    ///
    /// # Errors
    ///
    /// Fails if the sequence is empty or malformed on first access.
    pub fn supplier_income_source(
        &mut self,
        sequence: impl Into<String>,
    ) -> Result<&mut SupplierIncomeSource, JoFotaraError> {
        if self.supplier_income_source.is_none() {
            let mut source = SupplierIncomeSource::new();
            source.set_sequence_id(sequence)?;
            self.supplier_income_source = Some(source);
        }
        Ok(self
            .supplier_income_source
            .as_mut()
            .unwrap_or_else(|| unreachable!()))
    }

    /// The invoice line collection.
    pub fn items(&mut self) -> &mut InvoiceItems {
        self.items.get_or_insert_with(InvoiceItems::new)
    }

    /// Set the return reason, required for credit invoices.
    ///
    /// # Errors
    ///
    /// Fails if the reason is empty.
    pub fn set_reason_for_return(&mut self, reason: impl Into<String>) -> Result<&mut Self, JoFotaraError> {
        self.reason_for_return
            .get_or_insert_with(ReasonForReturn::new)
            .set_reason(reason)?;
        Ok(self)
    }

    /// Monetary totals. On first access, if invoice lines exist the totals
    /// are derived from them; override individual amounts afterwards if
    /// needed.
    ///
    /// # Errors
    ///
    /// Fails if the derived line amounts are inconsistent.
    pub fn invoice_totals(&mut self) -> Result<&mut InvoiceTotals, JoFotaraError> {
        if self.invoice_totals.is_none() {
            let totals = match &self.items {
                Some(items) if !items.is_empty() => InvoiceTotals::from_items(items)?,
                _ => InvoiceTotals::new(),
            };
            self.invoice_totals = Some(totals);
        }
        Ok(self.invoice_totals.as_mut().unwrap_or_else(|| unreachable!()))
    }

    /// Recompute the totals from the invoice lines, replacing any totals
    /// set earlier.
    ///
    /// # Errors
    ///
    /// Fails if no lines exist or their amounts are incomplete.
    pub fn compute_totals_from_items(&mut self) -> Result<&mut Self, JoFotaraError> {
        let items = match &self.items {
            Some(items) if !items.is_empty() => items,
            _ => {
                return Err(JoFotaraError::validation(
                    "At least one invoice item is required",
                ));
            }
        };
        self.invoice_totals = Some(InvoiceTotals::from_items(items)?);
        Ok(self)
    }

    /// Enable or disable the cross-check of provided totals against the
    /// amounts derived from the invoice lines. Enabled by default.
    pub fn set_totals_validation(&mut self, enabled: bool) -> &mut Self {
        self.validate_totals = enabled;
        self
    }

    pub fn enable_totals_validation(&mut self) -> &mut Self {
        self.set_totals_validation(true)
    }

    pub fn disable_totals_validation(&mut self) -> &mut Self {
        self.set_totals_validation(false)
    }

    fn validate_sections(&mut self) -> Result<(), JoFotaraError> {
        self.basic_info.validate()?;

        // Credit invoice requirements come before the section checks
        if self.basic_info.is_credit_invoice() {
            let reason = self.reason_for_return.as_ref().ok_or_else(|| {
                JoFotaraError::validation("Credit invoices require a reason for return")
            })?;
            reason.validate()?;
        }

        if self.seller_info.is_none() {
            return Err(JoFotaraError::validation("Seller information is required"));
        }

        if self.customer_info.is_none() {
            self.customer_info = Some(CustomerInformation::anonymous());
        }

        if self.supplier_income_source.is_none() {
            return Err(JoFotaraError::validation("Supplier income source is required"));
        }
        if self.items.is_none() {
            return Err(JoFotaraError::validation(
                "At least one invoice item is required",
            ));
        }
        if self.invoice_totals.is_none() {
            return Err(JoFotaraError::validation("Invoice totals are required"));
        }

        if let Some(seller) = &self.seller_info {
            seller.validate()?;
        }
        if let Some(customer) = &self.customer_info {
            customer.validate()?;
        }
        if let Some(source) = &self.supplier_income_source {
            source.validate()?;
        }
        if let Some(items) = &self.items {
            items.validate()?;
        }
        if let Some(totals) = &self.invoice_totals {
            totals.validate()?;
        }

        if self.validate_totals {
            if let (Some(items), Some(provided)) = (&self.items, &self.invoice_totals) {
                if !items.is_empty() {
                    let calculated = InvoiceTotals::from_items(items)?;
                    if provided != &calculated {
                        return Err(JoFotaraError::validation(
                            "Invoice totals do not match calculated values from line items",
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    /// Validate all sections and render the full UBL 2.1 document.
    ///
    /// # Errors
    ///
    /// Fails if any section is missing, incomplete, or inconsistent with
    /// the others.
    pub fn generate_xml(&mut self) -> Result<String, JoFotaraError> {
        self.validate_sections()?;

        let mut xml = Vec::new();

        xml.push("<?xml version=\"1.0\" encoding=\"UTF-8\"?>".to_string());
        xml.push(
            "<Invoice xmlns=\"urn:oasis:names:specification:ubl:schema:xsd:Invoice-2\" xmlns:cac=\"urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2\" xmlns:cbc=\"urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2\" xmlns:ext=\"urn:oasis:names:specification:ubl:schema:xsd:CommonExtensionComponents-2\">"
                .to_string(),
        );
        xml.push("<cbc:UBLVersionID>2.1</cbc:UBLVersionID>".to_string());

        xml.push(self.basic_info.to_xml()?);

        if let Some(seller) = &self.seller_info {
            xml.push(seller.to_xml()?);
        }
        if let Some(customer) = &self.customer_info {
            xml.push(customer.to_xml()?);
        }
        if let Some(source) = &self.supplier_income_source {
            xml.push(source.to_xml()?);
        }

        if self.basic_info.is_credit_invoice() {
            if let Some(reason) = &self.reason_for_return {
                xml.push(reason.to_xml()?);
            }
        }

        if let Some(totals) = &self.invoice_totals {
            xml.push(totals.to_xml()?);
        }
        if let Some(items) = &self.items {
            xml.push(items.to_xml()?);
        }

        xml.push("</Invoice>".to_string());

        Ok(xml.join("\n"))
    }

    /// Generate the XML document and encode it as standard base64, the
    /// payload format the JoFotara API expects.
    ///
    /// # Errors
    ///
    /// Fails if XML generation fails.
    pub fn encode_invoice(&mut self) -> Result<String, JoFotaraError> {
        Ok(STANDARD.encode(self.generate_xml()?))
    }
}
