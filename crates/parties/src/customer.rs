use serde::{Deserialize, Serialize};

use hamperdesk_core::{CustomerId, DomainError, DomainResult, Entity};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Fiscal identifier (NIF/CIF) printed on invoices.
    #[serde(default)]
    pub tax_id: Option<String>,
    /// Default shipping address.
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CustomerDraft {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("customer name cannot be empty"));
        }
        if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty()) {
            if !email.contains('@') {
                return Err(DomainError::validation(format!(
                    "invalid customer email: {email}"
                )));
            }
        }
        Ok(())
    }

    pub fn into_customer(self, id: CustomerId) -> Customer {
        Customer {
            id,
            name: self.name.trim().to_string(),
            email: non_blank(self.email),
            phone: non_blank(self.phone),
            tax_id: non_blank(self.tax_id),
            address: non_blank(self.address),
            notes: non_blank(self.notes),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Entity for Customer {
    type Id = CustomerId;
    const COLLECTION: &'static str = "customers";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
