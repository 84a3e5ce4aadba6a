use crate::error::JoFotaraError;
use crate::xml::{escape_xml, normalize_newlines};

/// The registered seller: tax identification number and legal name.
#[derive(Debug, Clone, Default)]
pub struct SellerInformation {
    tin: Option<String>,
    name: Option<String>,
}

impl SellerInformation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from values that already passed the TIN and name rules.
    pub(crate) fn from_validated(tin: &str, name: &str) -> Self {
        Self {
            tin: Some(tin.to_string()),
            name: Some(name.to_string()),
        }
    }

    /// Set the seller's tax identification number.
    ///
    /// # Errors
    ///
    /// Fails if the value is empty or is not at least 6 digits.
    pub fn set_tin(&mut self, tin: impl Into<String>) -> Result<&mut Self, JoFotaraError> {
        let tin = tin.into();
        if tin.trim().is_empty() {
            return Err(JoFotaraError::validation("TIN cannot be empty"));
        }
        if tin.len() < 6 || !tin.bytes().all(|b| b.is_ascii_digit()) {
            return Err(JoFotaraError::validation(
                "Invalid TIN format. Must be at least 6 digits",
            ));
        }
        self.tin = Some(tin);
        Ok(self)
    }

    /// Set the seller's registered name.
    ///
    /// # Errors
    ///
    /// Fails if the name is empty.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<&mut Self, JoFotaraError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(JoFotaraError::validation("Seller name cannot be empty"));
        }
        self.name = Some(name);
        Ok(self)
    }

    pub fn tin(&self) -> Option<&str> {
        self.tin.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn validate(&self) -> Result<(), JoFotaraError> {
        if self.tin.is_none() {
            return Err(JoFotaraError::validation("Seller TIN is required"));
        }
        if self.name.is_none() {
            return Err(JoFotaraError::validation("Seller name is required"));
        }
        Ok(())
    }

    /// Render the `cac:AccountingSupplierParty` block.
    pub fn to_xml(&self) -> Result<String, JoFotaraError> {
        self.validate()?;
        let tin = self.tin.as_deref().unwrap_or_default();
        let name = self.name.as_deref().unwrap_or_default();

        let mut xml = Vec::new();
        xml.push("<cac:AccountingSupplierParty>".to_string());
        xml.push("    <cac:Party>".to_string());
        xml.push("        <cac:PostalAddress>".to_string());
        xml.push("            <cac:Country>".to_string());
        xml.push("                <cbc:IdentificationCode>JO</cbc:IdentificationCode>".to_string());
        xml.push("            </cac:Country>".to_string());
        xml.push("        </cac:PostalAddress>".to_string());
        xml.push("        <cac:PartyTaxScheme>".to_string());
        xml.push(format!(
            "            <cbc:CompanyID>{}</cbc:CompanyID>",
            escape_xml(tin)
        ));
        xml.push("            <cac:TaxScheme>".to_string());
        xml.push("                <cbc:ID>VAT</cbc:ID>".to_string());
        xml.push("            </cac:TaxScheme>".to_string());
        xml.push("        </cac:PartyTaxScheme>".to_string());
        xml.push("        <cac:PartyLegalEntity>".to_string());
        xml.push(format!(
            "            <cbc:RegistrationName>{}</cbc:RegistrationName>",
            escape_xml(name)
        ));
        xml.push("        </cac:PartyLegalEntity>".to_string());
        xml.push("    </cac:Party>".to_string());
        xml.push("</cac:AccountingSupplierParty>".to_string());

        Ok(normalize_newlines(&xml.join("\n")))
    }
}
