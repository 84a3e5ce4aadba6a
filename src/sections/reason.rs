use crate::error::JoFotaraError;
use crate::xml::{escape_xml, normalize_newlines};

/// Mandatory justification attached to credit invoices.
#[derive(Debug, Clone, Default)]
pub struct ReasonForReturn {
    reason: Option<String>,
}

impl ReasonForReturn {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the return reason text.
    ///
    /// # Errors
    ///
    /// Fails if the reason is empty.
    pub fn set_reason(&mut self, reason: impl Into<String>) -> Result<&mut Self, JoFotaraError> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(JoFotaraError::validation("Return reason cannot be empty"));
        }
        self.reason = Some(reason);
        Ok(self)
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn validate(&self) -> Result<(), JoFotaraError> {
        if self.reason.is_none() {
            return Err(JoFotaraError::validation("Return reason is required"));
        }
        Ok(())
    }

    /// Render the single-line `cac:PaymentMeans` element.
    pub fn to_xml(&self) -> Result<String, JoFotaraError> {
        self.validate()?;
        let reason = self.reason.as_deref().unwrap_or_default();
        let xml = format!(
            "<cac:PaymentMeans><cbc:PaymentMeansCode listID=\"UN/ECE 4461\">10</cbc:PaymentMeansCode><cbc:InstructionNote>{}</cbc:InstructionNote></cac:PaymentMeans>",
            escape_xml(reason)
        );
        Ok(normalize_newlines(&xml))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_reason() {
        let mut reason = ReasonForReturn::new();
        assert!(reason.set_reason("").is_err());
        assert!(reason.set_reason("  ").is_err());
        assert!(reason.set_reason("Damaged goods").is_ok());
    }

    #[test]
    fn validate_requires_reason() {
        assert!(ReasonForReturn::new().validate().is_err());
    }

    #[test]
    fn renders_single_line_payment_means() {
        let mut reason = ReasonForReturn::new();
        reason.set_reason("Wrong item <shipped>").unwrap();
        let xml = reason.to_xml().unwrap();
        assert_eq!(
            xml,
            "<cac:PaymentMeans><cbc:PaymentMeansCode listID=\"UN/ECE 4461\">10</cbc:PaymentMeansCode><cbc:InstructionNote>Wrong item &lt;shipped&gt;</cbc:InstructionNote></cac:PaymentMeans>"
        );
        assert!(!xml.contains('\n'));
    }
}
