use crate::error::JoFotaraError;
use crate::xml::{escape_xml, normalize_newlines};

/// The seller's income source sequence, assigned by ISTD per activity.
#[derive(Debug, Clone, Default)]
pub struct SupplierIncomeSource {
    sequence_id: Option<String>,
}

impl SupplierIncomeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the income source sequence ID.
    ///
    /// # Errors
    ///
    /// Fails if the value is empty or contains non-digit characters.
    pub fn set_sequence_id(&mut self, sequence_id: impl Into<String>) -> Result<&mut Self, JoFotaraError> {
        let sequence_id = sequence_id.into();
        if sequence_id.trim().is_empty() {
            return Err(JoFotaraError::validation(
                "Supplier income source sequence ID cannot be empty",
            ));
        }
        if !sequence_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(JoFotaraError::validation(
                "Invalid supplier income source sequence ID format",
            ));
        }
        self.sequence_id = Some(sequence_id);
        Ok(self)
    }

    pub fn sequence_id(&self) -> Option<&str> {
        self.sequence_id.as_deref()
    }

    pub fn validate(&self) -> Result<(), JoFotaraError> {
        if self.sequence_id.is_none() {
            return Err(JoFotaraError::validation(
                "Supplier income source sequence ID is required",
            ));
        }
        Ok(())
    }

    /// Render the `cac:SellerSupplierParty` block.
    pub fn to_xml(&self) -> Result<String, JoFotaraError> {
        self.validate()?;
        let sequence_id = self.sequence_id.as_deref().unwrap_or_default();

        let mut xml = Vec::new();
        xml.push("<cac:SellerSupplierParty>".to_string());
        xml.push("    <cac:Party>".to_string());
        xml.push("        <cac:PartyIdentification>".to_string());
        xml.push(format!(
            "            <cbc:ID>{}</cbc:ID>",
            escape_xml(sequence_id)
        ));
        xml.push("        </cac:PartyIdentification>".to_string());
        xml.push("    </cac:Party>".to_string());
        xml.push("</cac:SellerSupplierParty>".to_string());

        Ok(normalize_newlines(&xml.join("\n")))
    }
}
