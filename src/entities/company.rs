//! Company entity type - client companies that own projects

use serde::{Deserialize, Serialize};

/// A client company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    /// Row id
    pub id: i64,

    /// Company name, unique across the store
    pub name: String,

    /// Tax identifier (RUT/NIT/VAT number)
    pub tax_id: Option<String>,

    /// Contact person name
    pub contact_name: Option<String>,

    /// Contact email
    pub contact_email: Option<String>,
}
