use serde::{Deserialize, Serialize};

use crate::error::JoFotaraError;
use crate::xml::{escape_xml, normalize_newlines};

/// Scheme of the buyer's identifier (UBL `schemeID`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerIdType {
    /// National identification number.
    Nin,
    /// Passport number.
    Pn,
    /// Tax identification number.
    Tin,
}

impl CustomerIdType {
    pub fn scheme_id(&self) -> &'static str {
        match self {
            Self::Nin => "NIN",
            Self::Pn => "PN",
            Self::Tin => "TIN",
        }
    }
}

/// Jordanian governorate codes accepted in `cbc:CountrySubentityCode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CityCode {
    Balqa,
    Maan,
    Madaba,
    Mafraq,
    Karak,
    Jarash,
    Irbid,
    Zarqa,
    Tafilah,
    Aqaba,
    Amman,
    Ajloun,
}

impl CityCode {
    const ALL: [CityCode; 12] = [
        Self::Balqa,
        Self::Maan,
        Self::Madaba,
        Self::Mafraq,
        Self::Karak,
        Self::Jarash,
        Self::Irbid,
        Self::Zarqa,
        Self::Tafilah,
        Self::Aqaba,
        Self::Amman,
        Self::Ajloun,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Balqa => "JO-BA",
            Self::Maan => "JO-MN",
            Self::Madaba => "JO-MD",
            Self::Mafraq => "JO-MA",
            Self::Karak => "JO-KA",
            Self::Jarash => "JO-JA",
            Self::Irbid => "JO-IR",
            Self::Zarqa => "JO-AZ",
            Self::Tafilah => "JO-AT",
            Self::Aqaba => "JO-AQ",
            Self::Amman => "JO-AM",
            Self::Ajloun => "JO-AJ",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    fn joined_codes() -> String {
        Self::ALL
            .iter()
            .map(|c| c.code())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The buyer. Only the identifier is mandatory; JoFotara accepts an
/// anonymous buyer as a NIN with an empty value.
#[derive(Debug, Clone, Default)]
pub struct CustomerInformation {
    id: Option<(String, CustomerIdType)>,
    postal_code: Option<String>,
    city_code: Option<CityCode>,
    phone: Option<String>,
    tin: Option<String>,
    name: Option<String>,
}

impl CustomerInformation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anonymous cash customer: a NIN identifier with an empty value.
    pub(crate) fn anonymous() -> Self {
        let mut customer = Self::new();
        customer.id = Some((String::new(), CustomerIdType::Nin));
        customer
    }

    /// Set the buyer identifier and its scheme.
    pub fn set_id(&mut self, id: impl Into<String>, id_type: CustomerIdType) -> &mut Self {
        self.id = Some((id.into(), id_type));
        self
    }

    pub fn set_postal_code(&mut self, postal_code: impl Into<String>) -> &mut Self {
        self.postal_code = Some(postal_code.into());
        self
    }

    /// Set the governorate code, e.g. `"JO-AM"` for Amman.
    ///
    /// # Errors
    ///
    /// Fails if the code is not one of the twelve Jordanian governorates.
    pub fn set_city_code(&mut self, code: &str) -> Result<&mut Self, JoFotaraError> {
        let city = CityCode::from_code(code).ok_or_else(|| {
            JoFotaraError::validation(format!(
                "City code must be one of: {}",
                CityCode::joined_codes()
            ))
        })?;
        self.city_code = Some(city);
        Ok(self)
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) -> &mut Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn set_tin(&mut self, tin: impl Into<String>) -> &mut Self {
        self.tin = Some(tin.into());
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    pub fn validate(&self) -> Result<(), JoFotaraError> {
        if self.id.is_none() {
            return Err(JoFotaraError::validation("Customer ID and type are required"));
        }
        Ok(())
    }

    /// Render the `cac:AccountingCustomerParty` block.
    pub fn to_xml(&self) -> Result<String, JoFotaraError> {
        self.validate()?;
        let (id, id_type) = self
            .id
            .as_ref()
            .map(|(id, id_type)| (id.as_str(), *id_type))
            .unwrap_or(("", CustomerIdType::Nin));

        let mut xml = Vec::new();
        xml.push("<cac:AccountingCustomerParty>".to_string());
        xml.push("    <cac:Party>".to_string());
        xml.push("        <cac:PartyIdentification>".to_string());
        xml.push(format!(
            "            <cbc:ID schemeID=\"{}\">{}</cbc:ID>",
            id_type.scheme_id(),
            escape_xml(id)
        ));
        xml.push("        </cac:PartyIdentification>".to_string());

        if self.postal_code.is_some() || self.city_code.is_some() {
            xml.push("        <cac:PostalAddress>".to_string());
            if let Some(postal_code) = &self.postal_code {
                xml.push(format!(
                    "            <cbc:PostalZone>{}</cbc:PostalZone>",
                    escape_xml(postal_code)
                ));
            }
            if let Some(city) = self.city_code {
                xml.push(format!(
                    "            <cbc:CountrySubentityCode>{}</cbc:CountrySubentityCode>",
                    city.code()
                ));
            }
            xml.push("            <cac:Country>".to_string());
            xml.push("                <cbc:IdentificationCode>JO</cbc:IdentificationCode>".to_string());
            xml.push("            </cac:Country>".to_string());
            xml.push("        </cac:PostalAddress>".to_string());
        }

        if let Some(tin) = &self.tin {
            xml.push("        <cac:PartyTaxScheme>".to_string());
            xml.push(format!(
                "            <cbc:CompanyID>{}</cbc:CompanyID>",
                escape_xml(tin)
            ));
            xml.push("            <cac:TaxScheme>".to_string());
            xml.push("                <cbc:ID>VAT</cbc:ID>".to_string());
            xml.push("            </cac:TaxScheme>".to_string());
            xml.push("        </cac:PartyTaxScheme>".to_string());
        }

        if let Some(name) = &self.name {
            xml.push("        <cac:PartyLegalEntity>".to_string());
            xml.push(format!(
                "            <cbc:RegistrationName>{}</cbc:RegistrationName>",
                escape_xml(name)
            ));
            xml.push("        </cac:PartyLegalEntity>".to_string());
        }

        xml.push("    </cac:Party>".to_string());

        if let Some(phone) = &self.phone {
            xml.push("    <cac:AccountingContact>".to_string());
            xml.push(format!(
                "        <cbc:Telephone>{}</cbc:Telephone>",
                escape_xml(phone)
            ));
            xml.push("    </cac:AccountingContact>".to_string());
        }

        xml.push("</cac:AccountingCustomerParty>".to_string());

        Ok(normalize_newlines(&xml.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_requires_identifier() {
        let customer = CustomerInformation::new();
        assert!(customer.validate().is_err());
        let mut customer = CustomerInformation::new();
        customer.set_id("987654321", CustomerIdType::Tin);
        assert!(customer.validate().is_ok());
    }

    #[test]
    fn anonymous_customer_renders_empty_nin() {
        let xml = CustomerInformation::anonymous().to_xml().unwrap();
        assert!(xml.contains("<cbc:ID schemeID=\"NIN\"></cbc:ID>"));
        assert!(!xml.contains("PostalAddress"));
        assert!(!xml.contains("AccountingContact"));
    }

    #[test]
    fn rejects_unknown_city_code() {
        let mut customer = CustomerInformation::new();
        let err = customer.set_city_code("JO-XX").unwrap_err();
        assert!(err.to_string().contains("City code must be one of: JO-BA"));
        assert!(customer.set_city_code("JO-AM").is_ok());
    }

    #[test]
    fn city_code_round_trips() {
        for code in ["JO-BA", "JO-MN", "JO-MD", "JO-MA", "JO-KA", "JO-JA", "JO-IR", "JO-AZ", "JO-AT", "JO-AQ", "JO-AM", "JO-AJ"] {
            assert_eq!(CityCode::from_code(code).map(|c| c.code()), Some(code));
        }
        assert!(CityCode::from_code("JO-ZZ").is_none());
    }

    #[test]
    fn full_customer_block() {
        let mut customer = CustomerInformation::new();
        customer.set_id("123456789", CustomerIdType::Nin);
        customer.set_postal_code("11937");
        customer.set_city_code("JO-AM").unwrap();
        customer.set_tin("987654321");
        customer.set_name("Test Buyer");
        customer.set_phone("0790000000");

        let xml = customer.to_xml().unwrap();
        assert!(xml.contains("<cbc:ID schemeID=\"NIN\">123456789</cbc:ID>"));
        assert!(xml.contains("<cbc:PostalZone>11937</cbc:PostalZone>"));
        assert!(xml.contains("<cbc:CountrySubentityCode>JO-AM</cbc:CountrySubentityCode>"));
        assert!(xml.contains("<cbc:CompanyID>987654321</cbc:CompanyID>"));
        assert!(xml.contains("<cbc:RegistrationName>Test Buyer</cbc:RegistrationName>"));
        assert!(xml.contains("<cbc:Telephone>0790000000</cbc:Telephone>"));
        let party_close = xml.find("    </cac:Party>").unwrap();
        let contact = xml.find("<cac:AccountingContact>").unwrap();
        assert!(contact > party_close);
    }

    #[test]
    fn postal_address_omitted_without_address_fields() {
        let mut customer = CustomerInformation::new();
        customer.set_id("1", CustomerIdType::Pn);
        customer.set_name("Traveler");
        let xml = customer.to_xml().unwrap();
        assert!(!xml.contains("PostalAddress"));
        assert!(xml.contains("schemeID=\"PN\""));
    }
}
