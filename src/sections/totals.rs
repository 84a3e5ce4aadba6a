use rust_decimal::Decimal;

use crate::error::JoFotaraError;
use crate::xml::{format_amount, normalize_newlines, round9};

use super::InvoiceItems;

/// Monetary totals of the invoice.
///
/// All amounts are stored rounded to 9 decimal places, so two totals built
/// from equivalent inputs compare equal. Setters cross-check against the
/// fields already set; call them in the order tax exclusive, discount,
/// tax inclusive, tax total, payable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceTotals {
    tax_exclusive_amount: Decimal,
    tax_inclusive_amount: Decimal,
    discount_total_amount: Decimal,
    tax_total_amount: Decimal,
    payable_amount: Decimal,
}

impl InvoiceTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive all five totals from the invoice lines.
    ///
    /// Tax exclusive is the sum before discounts; the inclusive and payable
    /// amounts are exclusive minus discounts plus tax.
    pub fn from_items(items: &InvoiceItems) -> Result<Self, JoFotaraError> {
        // Round the sums up front so the cross-field guards below compare
        // values at the same precision they are stored at
        let tax_exclusive = round9(items.total_before_discount()?);
        let discount = round9(items.total_discount());
        let tax = round9(items.total_tax()?);
        let tax_inclusive = round9(tax_exclusive - discount + tax);

        let mut totals = Self::new();
        totals.set_tax_exclusive_amount(tax_exclusive)?;
        totals.set_discount_total_amount(Some(discount))?;
        totals.set_tax_inclusive_amount(tax_inclusive)?;
        totals.set_tax_total_amount(tax)?;
        totals.set_payable_amount(tax_inclusive)?;
        Ok(totals)
    }

    /// Set the total amount before tax and discounts.
    ///
    /// # Errors
    ///
    /// Fails if the amount is negative.
    pub fn set_tax_exclusive_amount(&mut self, amount: Decimal) -> Result<&mut Self, JoFotaraError> {
        if amount < Decimal::ZERO {
            return Err(JoFotaraError::validation(
                "Tax exclusive amount cannot be negative",
            ));
        }
        self.tax_exclusive_amount = round9(amount);
        Ok(self)
    }

    /// Set the total amount including tax.
    ///
    /// # Errors
    ///
    /// Fails if the amount is negative or below the discounted tax
    /// exclusive amount.
    pub fn set_tax_inclusive_amount(&mut self, amount: Decimal) -> Result<&mut Self, JoFotaraError> {
        if amount < Decimal::ZERO {
            return Err(JoFotaraError::validation(
                "Tax inclusive amount cannot be negative",
            ));
        }
        if amount < self.tax_exclusive_amount - self.discount_total_amount {
            return Err(JoFotaraError::validation(
                "Tax inclusive amount cannot be less than tax exclusive amount",
            ));
        }
        self.tax_inclusive_amount = round9(amount);
        Ok(self)
    }

    /// Set the total discount. Discounts are distributed across the invoice
    /// lines, never applied on top of the invoice total.
    ///
    /// # Errors
    ///
    /// Fails if the amount is negative or exceeds the tax exclusive amount.
    pub fn set_discount_total_amount(&mut self, amount: Option<Decimal>) -> Result<&mut Self, JoFotaraError> {
        let amount = amount.unwrap_or(Decimal::ZERO);
        if amount < Decimal::ZERO {
            return Err(JoFotaraError::validation(
                "Discount total amount cannot be negative",
            ));
        }
        if amount > self.tax_exclusive_amount {
            return Err(JoFotaraError::validation(
                "Discount total amount cannot be greater than tax exclusive amount",
            ));
        }
        self.discount_total_amount = round9(amount);
        Ok(self)
    }

    /// Set the total tax amount.
    ///
    /// # Errors
    ///
    /// Fails if the amount is negative or inconsistent with an already-set
    /// tax inclusive amount.
    pub fn set_tax_total_amount(&mut self, tax_amount: Decimal) -> Result<&mut Self, JoFotaraError> {
        if tax_amount < Decimal::ZERO {
            return Err(JoFotaraError::validation("Tax total amount cannot be negative"));
        }
        if self.tax_inclusive_amount > Decimal::ZERO
            && self.tax_exclusive_amount - self.discount_total_amount + tax_amount
                > self.tax_inclusive_amount
        {
            return Err(JoFotaraError::validation(
                "Tax total amount would make tax inclusive amount invalid",
            ));
        }
        self.tax_total_amount = round9(tax_amount);
        Ok(self)
    }

    /// Set the final payable amount.
    ///
    /// # Errors
    ///
    /// Fails if the amount is negative or below the tax inclusive amount
    /// minus discounts.
    pub fn set_payable_amount(&mut self, amount: Decimal) -> Result<&mut Self, JoFotaraError> {
        if amount < Decimal::ZERO {
            return Err(JoFotaraError::validation("Payable amount cannot be negative"));
        }
        if self.tax_inclusive_amount > Decimal::ZERO
            && amount < self.tax_inclusive_amount - self.discount_total_amount
        {
            return Err(JoFotaraError::validation(
                "Payable amount cannot be less than tax inclusive amount minus discounts",
            ));
        }
        self.payable_amount = round9(amount);
        Ok(self)
    }

    pub fn tax_exclusive_amount(&self) -> Decimal {
        self.tax_exclusive_amount
    }

    pub fn tax_inclusive_amount(&self) -> Decimal {
        self.tax_inclusive_amount
    }

    pub fn discount_total_amount(&self) -> Decimal {
        self.discount_total_amount
    }

    pub fn tax_total_amount(&self) -> Decimal {
        self.tax_total_amount
    }

    pub fn payable_amount(&self) -> Decimal {
        self.payable_amount
    }

    /// Check presence of the mandatory amounts and their relationships.
    pub fn validate(&self) -> Result<(), JoFotaraError> {
        if self.tax_inclusive_amount == Decimal::ZERO {
            return Err(JoFotaraError::validation("Tax inclusive amount is required"));
        }
        if self.tax_exclusive_amount == Decimal::ZERO {
            return Err(JoFotaraError::validation("Tax exclusive amount is required"));
        }
        if self.payable_amount == Decimal::ZERO {
            return Err(JoFotaraError::validation("Payable amount is required"));
        }

        if self.tax_inclusive_amount < self.tax_exclusive_amount - self.discount_total_amount {
            return Err(JoFotaraError::validation(
                "Tax inclusive amount cannot be less than tax exclusive amount",
            ));
        }
        if self.payable_amount < self.tax_inclusive_amount - self.discount_total_amount {
            return Err(JoFotaraError::validation(
                "Payable amount cannot be less than tax inclusive amount minus allowances",
            ));
        }
        Ok(())
    }

    /// Render the discount allowance, `cac:TaxTotal`, and
    /// `cac:LegalMonetaryTotal` blocks.
    pub fn to_xml(&self) -> Result<String, JoFotaraError> {
        if self.tax_inclusive_amount == Decimal::ZERO {
            return Err(JoFotaraError::validation("Tax inclusive amount is required"));
        }
        if self.tax_exclusive_amount == Decimal::ZERO {
            return Err(JoFotaraError::validation("Tax exclusive amount is required"));
        }
        if self.payable_amount == Decimal::ZERO {
            return Err(JoFotaraError::validation("Payable amount is required"));
        }

        let mut xml = Vec::new();

        if self.discount_total_amount > Decimal::ZERO {
            xml.push("<cac:AllowanceCharge>".to_string());
            xml.push("    <cbc:ChargeIndicator>false</cbc:ChargeIndicator>".to_string());
            xml.push("    <cbc:AllowanceChargeReason>discount</cbc:AllowanceChargeReason>".to_string());
            xml.push(format!(
                "    <cbc:Amount currencyID=\"JOD\">{}</cbc:Amount>",
                format_amount(self.discount_total_amount)
            ));
            xml.push("</cac:AllowanceCharge>".to_string());
        }

        xml.push("<cac:TaxTotal>".to_string());
        xml.push(format!(
            "    <cbc:TaxAmount currencyID=\"JOD\">{}</cbc:TaxAmount>",
            format_amount(self.tax_total_amount)
        ));
        xml.push("</cac:TaxTotal>".to_string());

        xml.push("<cac:LegalMonetaryTotal>".to_string());
        xml.push(format!(
            "    <cbc:TaxExclusiveAmount currencyID=\"JOD\">{}</cbc:TaxExclusiveAmount>",
            format_amount(self.tax_exclusive_amount)
        ));
        xml.push(format!(
            "    <cbc:TaxInclusiveAmount currencyID=\"JOD\">{}</cbc:TaxInclusiveAmount>",
            format_amount(self.tax_inclusive_amount)
        ));
        if self.discount_total_amount > Decimal::ZERO {
            xml.push(format!(
                "    <cbc:AllowanceTotalAmount currencyID=\"JOD\">{}</cbc:AllowanceTotalAmount>",
                format_amount(self.discount_total_amount)
            ));
        }
        xml.push(format!(
            "    <cbc:PayableAmount currencyID=\"JOD\">{}</cbc:PayableAmount>",
            format_amount(self.payable_amount)
        ));
        xml.push("</cac:LegalMonetaryTotal>".to_string());

        Ok(normalize_newlines(&xml.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn discounted_totals() -> InvoiceTotals {
        let mut totals = InvoiceTotals::new();
        totals.set_tax_exclusive_amount(dec!(100)).unwrap();
        totals.set_discount_total_amount(Some(dec!(20))).unwrap();
        totals.set_tax_inclusive_amount(dec!(92.8)).unwrap();
        totals.set_tax_total_amount(dec!(12.8)).unwrap();
        totals.set_payable_amount(dec!(92.8)).unwrap();
        totals
    }

    #[test]
    fn rejects_negative_amounts() {
        let mut totals = InvoiceTotals::new();
        assert!(totals.set_tax_exclusive_amount(dec!(-1)).is_err());
        assert!(totals.set_tax_inclusive_amount(dec!(-1)).is_err());
        assert!(totals.set_discount_total_amount(Some(dec!(-1))).is_err());
        assert!(totals.set_tax_total_amount(dec!(-1)).is_err());
        assert!(totals.set_payable_amount(dec!(-1)).is_err());
    }

    #[test]
    fn inclusive_amount_respects_discounted_exclusive() {
        let mut totals = InvoiceTotals::new();
        totals.set_tax_exclusive_amount(dec!(100)).unwrap();
        totals.set_discount_total_amount(Some(dec!(20))).unwrap();
        // 100 - 20 = 80 is the floor
        assert!(totals.set_tax_inclusive_amount(dec!(79.99)).is_err());
        assert!(totals.set_tax_inclusive_amount(dec!(80)).is_ok());
    }

    #[test]
    fn discount_cannot_exceed_exclusive_amount() {
        let mut totals = InvoiceTotals::new();
        totals.set_tax_exclusive_amount(dec!(50)).unwrap();
        assert!(totals.set_discount_total_amount(Some(dec!(50.01))).is_err());
        assert!(totals.set_discount_total_amount(Some(dec!(50))).is_ok());
    }

    #[test]
    fn tax_total_consistency_with_inclusive() {
        let mut totals = InvoiceTotals::new();
        totals.set_tax_exclusive_amount(dec!(100)).unwrap();
        totals.set_discount_total_amount(Some(dec!(20))).unwrap();
        totals.set_tax_inclusive_amount(dec!(92.8)).unwrap();
        // 100 - 20 + 13 = 93 > 92.8
        assert!(totals.set_tax_total_amount(dec!(13)).is_err());
        assert!(totals.set_tax_total_amount(dec!(12.8)).is_ok());
    }

    #[test]
    fn payable_floor_is_inclusive_minus_discount() {
        let mut totals = discounted_totals();
        // 92.8 - 20 = 72.8 is the floor
        assert!(totals.set_payable_amount(dec!(72.79)).is_err());
        assert!(totals.set_payable_amount(dec!(72.8)).is_ok());
    }

    #[test]
    fn from_items_matches_manual_setup() {
        let mut items = InvoiceItems::new();
        items
            .add_item("1")
            .unwrap()
            .set_quantity(dec!(1))
            .unwrap()
            .set_unit_price(dec!(100))
            .unwrap()
            .set_discount(dec!(20))
            .unwrap()
            .tax(dec!(16))
            .unwrap();

        let computed = InvoiceTotals::from_items(&items).unwrap();
        assert_eq!(computed, discounted_totals());
    }

    #[test]
    fn validate_requires_mandatory_amounts() {
        let totals = InvoiceTotals::new();
        assert!(totals.validate().unwrap_err().to_string().contains("Tax inclusive"));
    }

    #[test]
    fn xml_omits_allowance_without_discount() {
        let mut totals = InvoiceTotals::new();
        totals.set_tax_exclusive_amount(dec!(100)).unwrap();
        totals.set_tax_inclusive_amount(dec!(116)).unwrap();
        totals.set_tax_total_amount(dec!(16)).unwrap();
        totals.set_payable_amount(dec!(116)).unwrap();
        let xml = totals.to_xml().unwrap();
        assert!(!xml.contains("AllowanceCharge"));
        assert!(!xml.contains("AllowanceTotalAmount"));
        assert!(xml.contains("<cbc:TaxAmount currencyID=\"JOD\">16.000000000</cbc:TaxAmount>"));
    }

    #[test]
    fn xml_includes_discount_blocks() {
        let xml = discounted_totals().to_xml().unwrap();
        assert!(xml.contains("<cbc:AllowanceChargeReason>discount</cbc:AllowanceChargeReason>"));
        assert!(xml.contains("<cbc:Amount currencyID=\"JOD\">20.000000000</cbc:Amount>"));
        assert!(xml.contains("<cbc:AllowanceTotalAmount currencyID=\"JOD\">20.000000000</cbc:AllowanceTotalAmount>"));
        assert!(xml.contains("<cbc:PayableAmount currencyID=\"JOD\">92.800000000</cbc:PayableAmount>"));
    }
}
