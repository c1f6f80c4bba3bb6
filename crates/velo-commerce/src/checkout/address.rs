//! Address types.

use serde::{Deserialize, Serialize};

use crate::checkout::CheckoutField;

/// A postal address with the contact details checkout collects alongside it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Company name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Street and number.
    pub line1: String,
    /// City.
    pub city: String,
    /// Postal code.
    pub postal_code: String,
    /// Region or province.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Country.
    pub country: String,
    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Contact email.
    pub email: String,
}

impl Address {
    /// Create an address from its required parts.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        line1: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            line1: line1.into(),
            city: city.into(),
            postal_code: postal_code.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    /// Set the country.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Set the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the phone number.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Get full name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Format as single line.
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.line1.clone()];
        parts.push(format!("{} {}", self.postal_code, self.city).trim().to_string());
        if let Some(ref region) = self.region {
            parts.push(region.clone());
        }
        if !self.country.is_empty() {
            parts.push(self.country.clone());
        }
        parts.retain(|p| !p.is_empty());
        parts.join(", ")
    }

    /// Format as multi-line.
    pub fn multi_line(&self) -> String {
        let mut lines = vec![self.full_name()];
        if let Some(ref company) = self.company {
            lines.push(company.clone());
        }
        lines.push(self.line1.clone());
        let city_line = match self.region {
            Some(ref region) => format!("{} {}, {}", self.postal_code, self.city, region),
            None => format!("{} {}", self.postal_code, self.city),
        };
        lines.push(city_line);
        lines.push(self.country.clone());
        lines.retain(|l| !l.trim().is_empty());
        lines.join("\n")
    }

    /// Required fields that are blank, in form order.
    pub fn missing_required_fields(&self) -> Vec<CheckoutField> {
        [
            (CheckoutField::FirstName, &self.first_name),
            (CheckoutField::LastName, &self.last_name),
            (CheckoutField::Line1, &self.line1),
            (CheckoutField::City, &self.city),
            (CheckoutField::PostalCode, &self.postal_code),
            (CheckoutField::Email, &self.email),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Check if every required field is filled in.
    pub fn is_complete(&self) -> bool {
        self.missing_required_fields().is_empty()
    }
}
