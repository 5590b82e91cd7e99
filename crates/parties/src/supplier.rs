use serde::{Deserialize, Serialize};

use hamperdesk_core::{DomainError, DomainResult, Entity, SupplierId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierDraft {
    pub name: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl SupplierDraft {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("supplier name cannot be empty"));
        }
        Ok(())
    }

    pub fn into_supplier(self, id: SupplierId) -> Supplier {
        Supplier {
            id,
            name: self.name.trim().to_string(),
            contact_name: self.contact_name,
            email: self.email,
            phone: self.phone,
            notes: self.notes,
        }
    }
}

impl Entity for Supplier {
    type Id = SupplierId;
    const COLLECTION: &'static str = "suppliers";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_name() {
        let draft = SupplierDraft {
            name: " ".to_string(),
            ..SupplierDraft::default()
        };
        assert!(matches!(draft.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn tolerates_missing_optional_fields_in_json() {
        let id = SupplierId::new();
        let json = format!(r#"{{"id":"{id}","name":"Conservas Ortiz"}}"#);
        let s: Supplier = serde_json::from_str(&json).unwrap();
        assert_eq!(s.name, "Conservas Ortiz");
        assert_eq!(s.contact_name, None);
    }
}
