use rust_decimal::Decimal;

use crate::error::JoFotaraError;
use crate::xml::normalize_newlines;

use super::InvoiceLineItem;

/// The collection of invoice lines.
///
/// Line IDs are unique within an invoice; [`add_item`] rejects duplicates.
///
/// [`add_item`]: InvoiceItems::add_item
#[derive(Debug, Clone, Default)]
pub struct InvoiceItems {
    items: Vec<InvoiceLineItem>,
}

impl InvoiceItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new line with the given ID and return a mutable handle to it.
    ///
    /// # Errors
    ///
    /// Fails if a line with the same ID already exists.
    pub fn add_item(&mut self, id: impl Into<String>) -> Result<&mut InvoiceLineItem, JoFotaraError> {
        let id = id.into();
        if self.items.iter().any(|item| item.id() == id) {
            return Err(JoFotaraError::validation(format!(
                "Item with ID {id} already exists"
            )));
        }
        self.items.push(InvoiceLineItem::new(id));
        Ok(self.items.last_mut().unwrap_or_else(|| unreachable!()))
    }

    /// Look up a line by ID.
    pub fn item(&mut self, id: &str) -> Option<&mut InvoiceLineItem> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub fn items(&self) -> &[InvoiceLineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantity × unit price over all lines.
    pub fn total_before_discount(&self) -> Result<Decimal, JoFotaraError> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| Ok(acc + item.amount_before_discount()?))
    }

    /// Sum of per-line discounts.
    pub fn total_discount(&self) -> Decimal {
        self.items.iter().map(InvoiceLineItem::discount).sum()
    }

    /// Sum of per-line tax amounts.
    pub fn total_tax(&self) -> Result<Decimal, JoFotaraError> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| Ok(acc + item.tax_amount()?))
    }

    /// Check that the collection is non-empty and every line is valid.
    pub fn validate(&self) -> Result<(), JoFotaraError> {
        if self.items.is_empty() {
            return Err(JoFotaraError::validation(
                "At least one invoice item is required",
            ));
        }
        for item in &self.items {
            item.validate()?;
        }
        Ok(())
    }

    /// Render all lines, joined with newlines in insertion order.
    ///
    /// # Errors
    ///
    /// Fails if the collection is empty or any line is incomplete.
    pub fn to_xml(&self) -> Result<String, JoFotaraError> {
        if self.items.is_empty() {
            return Err(JoFotaraError::validation(
                "At least one invoice item is required",
            ));
        }
        let rendered: Vec<String> = self
            .items
            .iter()
            .map(InvoiceLineItem::to_xml)
            .collect::<Result<_, _>>()?;
        Ok(normalize_newlines(&rendered.join("\n")))
    }
}
