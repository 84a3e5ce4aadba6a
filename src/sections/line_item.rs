use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::JoFotaraError;
use crate::xml::{escape_xml, format_amount, normalize_newlines};

/// UN/ECE 5305 tax categories accepted by JoFotara.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxCategory {
    /// S — standard rate, requires a percentage in (0, 16].
    Standard,
    /// Z — exempt from tax.
    Exempt,
    /// O — zero rated.
    ZeroRated,
}

impl TaxCategory {
    /// UN/ECE 5305 code letter.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Standard => "S",
            Self::Exempt => "Z",
            Self::ZeroRated => "O",
        }
    }

    /// Parse from a UN/ECE 5305 code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "S" => Some(Self::Standard),
            "Z" => Some(Self::Exempt),
            "O" => Some(Self::ZeroRated),
            _ => None,
        }
    }
}

/// One invoice line: quantity, price, discount, and tax treatment.
///
/// Created through [`InvoiceItems::add_item`]; all amounts are derived on
/// demand, never stored.
///
/// [`InvoiceItems::add_item`]: super::InvoiceItems::add_item
#[derive(Debug, Clone)]
pub struct InvoiceLineItem {
    id: String,
    quantity: Option<Decimal>,
    unit_price: Option<Decimal>,
    discount: Decimal,
    description: Option<String>,
    tax_category: TaxCategory,
    tax_percent: Decimal,
    unit_code: String,
}

impl InvoiceLineItem {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            quantity: None,
            unit_price: None,
            discount: Decimal::ZERO,
            description: None,
            tax_category: TaxCategory::Standard,
            tax_percent: dec!(16),
            unit_code: "PCE".to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Set the invoiced quantity.
    ///
    /// # Errors
    ///
    /// Fails if the quantity is not positive.
    pub fn set_quantity(&mut self, quantity: Decimal) -> Result<&mut Self, JoFotaraError> {
        if quantity <= Decimal::ZERO {
            return Err(JoFotaraError::validation("Quantity must be greater than 0"));
        }
        self.quantity = Some(quantity);
        Ok(self)
    }

    /// Set the unit price before tax.
    ///
    /// # Errors
    ///
    /// Fails if the price is negative.
    pub fn set_unit_price(&mut self, price: Decimal) -> Result<&mut Self, JoFotaraError> {
        if price < Decimal::ZERO {
            return Err(JoFotaraError::validation("Unit price cannot be negative"));
        }
        self.unit_price = Some(price);
        Ok(self)
    }

    /// Set the discount amount for this line.
    ///
    /// # Errors
    ///
    /// Fails if the discount is negative, or exceeds quantity × unit price
    /// when both are already set.
    pub fn set_discount(&mut self, amount: Decimal) -> Result<&mut Self, JoFotaraError> {
        if amount < Decimal::ZERO {
            return Err(JoFotaraError::validation("Discount amount cannot be negative"));
        }
        if let (Some(quantity), Some(price)) = (self.quantity, self.unit_price) {
            if amount > quantity * price {
                return Err(JoFotaraError::validation(
                    "Discount cannot be greater than total amount",
                ));
            }
        }
        self.discount = amount;
        Ok(self)
    }

    /// Set the item description.
    ///
    /// # Errors
    ///
    /// Fails if the description is empty.
    pub fn set_description(&mut self, description: impl Into<String>) -> Result<&mut Self, JoFotaraError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(JoFotaraError::validation("Description cannot be empty"));
        }
        self.description = Some(description);
        Ok(self)
    }

    /// Mark the item as tax exempted (category Z, 0%).
    pub fn tax_exempted(&mut self) -> &mut Self {
        self.tax_category = TaxCategory::Exempt;
        self.tax_percent = Decimal::ZERO;
        self
    }

    /// Mark the item as zero rated (category O, 0%).
    pub fn zero_tax(&mut self) -> &mut Self {
        self.tax_category = TaxCategory::ZeroRated;
        self.tax_percent = Decimal::ZERO;
        self
    }

    /// Apply the standard rate category with the given percentage.
    ///
    /// # Errors
    ///
    /// Fails if the rate is not positive.
    pub fn tax(&mut self, rate: Decimal) -> Result<&mut Self, JoFotaraError> {
        self.set_tax_category(TaxCategory::Standard, Some(rate))
    }

    /// Set the tax category, with the percentage required for [`TaxCategory::Standard`].
    ///
    /// Exempt and zero-rated items always carry a 0% rate.
    ///
    /// # Errors
    ///
    /// Fails if the standard-rate percentage is missing or not positive.
    pub fn set_tax_category(
        &mut self,
        category: TaxCategory,
        percent: Option<Decimal>,
    ) -> Result<&mut Self, JoFotaraError> {
        match category {
            TaxCategory::Standard => {
                let percent = percent.ok_or_else(|| {
                    JoFotaraError::validation("Tax percentage is required for standard rate category")
                })?;
                if percent <= Decimal::ZERO {
                    return Err(JoFotaraError::validation(
                        "Invalid tax rate for standard category",
                    ));
                }
                self.tax_percent = percent;
            }
            TaxCategory::Exempt | TaxCategory::ZeroRated => {
                self.tax_percent = Decimal::ZERO;
            }
        }
        self.tax_category = category;
        Ok(self)
    }

    pub fn discount(&self) -> Decimal {
        self.discount
    }

    pub fn tax_category(&self) -> TaxCategory {
        self.tax_category
    }

    pub fn tax_percent(&self) -> Decimal {
        self.tax_percent
    }

    pub fn unit_code(&self) -> &str {
        &self.unit_code
    }

    fn quantity_or_err(&self) -> Result<Decimal, JoFotaraError> {
        self.quantity.ok_or_else(|| {
            JoFotaraError::validation("Quantity is required to calculate tax exclusive amount")
        })
    }

    fn unit_price_or_err(&self) -> Result<Decimal, JoFotaraError> {
        self.unit_price.ok_or_else(|| {
            JoFotaraError::validation("Unit price is required to calculate tax exclusive amount")
        })
    }

    /// Quantity × unit price.
    pub fn amount_before_discount(&self) -> Result<Decimal, JoFotaraError> {
        Ok(self.quantity_or_err()? * self.unit_price_or_err()?)
    }

    /// Quantity × unit price − discount.
    pub fn amount_after_discount(&self) -> Result<Decimal, JoFotaraError> {
        Ok(self.amount_before_discount()? - self.discount)
    }

    /// Tax charged on this line; always zero for exempt and zero-rated items.
    pub fn tax_amount(&self) -> Result<Decimal, JoFotaraError> {
        let after_discount = self.amount_after_discount()?;
        Ok(match self.tax_category {
            TaxCategory::Standard => after_discount * self.tax_percent / dec!(100),
            TaxCategory::Exempt | TaxCategory::ZeroRated => Decimal::ZERO,
        })
    }

    /// Line total including tax.
    pub fn tax_inclusive_amount(&self) -> Result<Decimal, JoFotaraError> {
        Ok(self.amount_after_discount()? + self.tax_amount()?)
    }

    /// Check that all required fields are set and valid.
    pub fn validate(&self) -> Result<(), JoFotaraError> {
        let quantity = self
            .quantity
            .ok_or_else(|| JoFotaraError::validation("Item quantity is required"))?;
        let unit_price = self
            .unit_price
            .ok_or_else(|| JoFotaraError::validation("Item unit price is required"))?;
        if self.description.is_none() {
            return Err(JoFotaraError::validation("Item description is required"));
        }

        if quantity <= Decimal::ZERO {
            return Err(JoFotaraError::validation(
                "Item quantity must be greater than 0",
            ));
        }
        if unit_price < Decimal::ZERO {
            return Err(JoFotaraError::validation("Item unit price cannot be negative"));
        }
        if self.discount < Decimal::ZERO {
            return Err(JoFotaraError::validation("Item discount cannot be negative"));
        }
        if self.discount > quantity * unit_price {
            return Err(JoFotaraError::validation(
                "Item discount cannot be greater than total amount",
            ));
        }

        if self.tax_category == TaxCategory::Standard
            && (self.tax_percent <= Decimal::ZERO || self.tax_percent > dec!(16))
        {
            return Err(JoFotaraError::validation(
                "Tax percentage must be between 0 and 16 for standard rate",
            ));
        }
        Ok(())
    }

    /// Render the line as a `cac:InvoiceLine` block.
    ///
    /// # Errors
    ///
    /// Fails if quantity, unit price, or description is unset.
    pub fn to_xml(&self) -> Result<String, JoFotaraError> {
        let quantity = self
            .quantity
            .ok_or_else(|| JoFotaraError::validation("Quantity is required"))?;
        let unit_price = self
            .unit_price
            .ok_or_else(|| JoFotaraError::validation("Unit price is required"))?;
        let description = self
            .description
            .as_deref()
            .ok_or_else(|| JoFotaraError::validation("Description is required"))?;

        let tax_amount = self.tax_amount()?;
        let tax_inclusive = self.tax_inclusive_amount()?;
        let tax_exclusive = self.amount_after_discount()?;

        let mut xml = Vec::new();
        xml.push("<cac:InvoiceLine>".to_string());
        xml.push(format!("    <cbc:ID>{}</cbc:ID>", escape_xml(&self.id)));
        xml.push(format!(
            "    <cbc:InvoicedQuantity unitCode=\"{}\">{}</cbc:InvoicedQuantity>",
            escape_xml(&self.unit_code),
            format_amount(quantity)
        ));
        xml.push(format!(
            "    <cbc:LineExtensionAmount currencyID=\"JOD\">{}</cbc:LineExtensionAmount>",
            format_amount(tax_exclusive)
        ));

        // Tax information
        xml.push("    <cac:TaxTotal>".to_string());
        xml.push(format!(
            "        <cbc:TaxAmount currencyID=\"JOD\">{}</cbc:TaxAmount>",
            format_amount(tax_amount)
        ));
        xml.push(format!(
            "        <cbc:RoundingAmount currencyID=\"JOD\">{}</cbc:RoundingAmount>",
            format_amount(tax_inclusive)
        ));
        xml.push("        <cac:TaxSubtotal>".to_string());
        xml.push(format!(
            "            <cbc:TaxAmount currencyID=\"JOD\">{}</cbc:TaxAmount>",
            format_amount(tax_amount)
        ));
        xml.push("            <cac:TaxCategory>".to_string());
        xml.push(format!(
            "                <cbc:ID schemeAgencyID=\"6\" schemeID=\"UN/ECE 5305\">{}</cbc:ID>",
            self.tax_category.code()
        ));
        xml.push(format!(
            "                <cbc:Percent>{}</cbc:Percent>",
            format_amount(self.tax_percent)
        ));
        xml.push("                <cac:TaxScheme>".to_string());
        xml.push(
            "                    <cbc:ID schemeAgencyID=\"6\" schemeID=\"UN/ECE 5153\">VAT</cbc:ID>"
                .to_string(),
        );
        xml.push("                </cac:TaxScheme>".to_string());
        xml.push("            </cac:TaxCategory>".to_string());
        xml.push("        </cac:TaxSubtotal>".to_string());
        xml.push("    </cac:TaxTotal>".to_string());

        // Item description
        xml.push("    <cac:Item>".to_string());
        xml.push(format!(
            "        <cbc:Name>{}</cbc:Name>",
            escape_xml(description)
        ));
        xml.push("    </cac:Item>".to_string());

        // Price information; the discount block is always emitted
        xml.push("    <cac:Price>".to_string());
        xml.push(format!(
            "        <cbc:PriceAmount currencyID=\"JOD\">{}</cbc:PriceAmount>",
            format_amount(unit_price)
        ));
        xml.push("        <cac:AllowanceCharge>".to_string());
        xml.push("            <cbc:ChargeIndicator>false</cbc:ChargeIndicator>".to_string());
        xml.push("            <cbc:AllowanceChargeReason>DISCOUNT</cbc:AllowanceChargeReason>".to_string());
        xml.push(format!(
            "            <cbc:Amount currencyID=\"JOD\">{}</cbc:Amount>",
            format_amount(self.discount)
        ));
        xml.push("        </cac:AllowanceCharge>".to_string());
        xml.push("    </cac:Price>".to_string());
        xml.push("</cac:InvoiceLine>".to_string());

        Ok(normalize_newlines(&xml.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> InvoiceLineItem {
        InvoiceLineItem::new("1")
    }

    #[test]
    fn rejects_non_positive_quantity() {
        assert!(item().set_quantity(Decimal::ZERO).is_err());
        assert!(item().set_quantity(dec!(-1)).is_err());
        assert!(item().set_quantity(dec!(0.5)).is_ok());
    }

    #[test]
    fn rejects_negative_unit_price() {
        assert!(item().set_unit_price(dec!(-0.01)).is_err());
        assert!(item().set_unit_price(Decimal::ZERO).is_ok());
    }

    #[test]
    fn discount_cannot_exceed_line_total() {
        let mut it = item();
        it.set_quantity(dec!(2)).unwrap();
        it.set_unit_price(dec!(10)).unwrap();
        assert!(it.set_discount(dec!(20)).is_ok());
        assert!(it.set_discount(dec!(20.01)).is_err());
        assert!(it.set_discount(dec!(-1)).is_err());
    }

    #[test]
    fn standard_rate_requires_percent() {
        let mut it = item();
        assert!(it.set_tax_category(TaxCategory::Standard, None).is_err());
        assert!(it.set_tax_category(TaxCategory::Standard, Some(Decimal::ZERO)).is_err());
        assert!(it.set_tax_category(TaxCategory::Standard, Some(dec!(16))).is_ok());
    }

    #[test]
    fn exempt_and_zero_rated_force_zero_percent() {
        let mut it = item();
        it.tax(dec!(16)).unwrap();
        it.tax_exempted();
        assert_eq!(it.tax_percent(), Decimal::ZERO);
        assert_eq!(it.tax_category(), TaxCategory::Exempt);
        it.tax(dec!(10)).unwrap();
        it.zero_tax();
        assert_eq!(it.tax_percent(), Decimal::ZERO);
        assert_eq!(it.tax_category(), TaxCategory::ZeroRated);
    }

    #[test]
    fn derived_amounts_match_formulas() {
        let mut it = item();
        it.set_quantity(dec!(1)).unwrap();
        it.set_unit_price(dec!(100)).unwrap();
        it.set_discount(dec!(20)).unwrap();
        it.tax(dec!(16)).unwrap();

        assert_eq!(it.amount_before_discount().unwrap(), dec!(100));
        assert_eq!(it.amount_after_discount().unwrap(), dec!(80));
        assert_eq!(it.tax_amount().unwrap(), dec!(12.8));
        assert_eq!(it.tax_inclusive_amount().unwrap(), dec!(92.8));
    }

    #[test]
    fn derived_amounts_require_quantity_and_price() {
        assert!(item().amount_before_discount().is_err());
        let mut it = item();
        it.set_quantity(dec!(1)).unwrap();
        assert!(it.tax_amount().is_err());
    }

    #[test]
    fn validate_bounds_standard_percent() {
        let mut it = item();
        it.set_quantity(dec!(1)).unwrap();
        it.set_unit_price(dec!(10)).unwrap();
        it.set_description("Widget").unwrap();
        it.tax(dec!(17)).unwrap();
        assert!(it.validate().is_err());
        it.tax(dec!(16)).unwrap();
        assert!(it.validate().is_ok());
    }

    #[test]
    fn to_xml_requires_description() {
        let mut it = item();
        it.set_quantity(dec!(1)).unwrap();
        it.set_unit_price(dec!(10)).unwrap();
        let err = it.to_xml().unwrap_err();
        assert!(err.to_string().contains("Description is required"));
    }

    #[test]
    fn to_xml_renders_nine_decimal_amounts() {
        let mut it = item();
        it.set_quantity(dec!(2)).unwrap();
        it.set_unit_price(dec!(10)).unwrap();
        it.set_description("Test Item").unwrap();
        it.tax_exempted();

        let xml = it.to_xml().unwrap();
        assert!(xml.contains("<cbc:InvoicedQuantity unitCode=\"PCE\">2.000000000</cbc:InvoicedQuantity>"));
        assert!(xml.contains("<cbc:LineExtensionAmount currencyID=\"JOD\">20.000000000</cbc:LineExtensionAmount>"));
        assert!(xml.contains("schemeID=\"UN/ECE 5305\">Z</cbc:ID>"));
        assert!(xml.contains("<cbc:Percent>0.000000000</cbc:Percent>"));
    }

    #[test]
    fn xml_escapes_description() {
        let mut it = item();
        it.set_quantity(dec!(1)).unwrap();
        it.set_unit_price(dec!(1)).unwrap();
        it.set_description("Bolts & <nuts>").unwrap();
        let xml = it.to_xml().unwrap();
        assert!(xml.contains("<cbc:Name>Bolts &amp; &lt;nuts&gt;</cbc:Name>"));
    }
}
