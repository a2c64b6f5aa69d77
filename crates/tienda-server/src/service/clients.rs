use tienda_storage::Payload;

use super::{require_name, require_numeric, ResourceService};

/// Validation and formatting for the `clients` collection.
#[derive(Debug, Clone, Copy)]
pub struct ClientService;

impl ResourceService for ClientService {
    fn numeric_fields(&self) -> &'static [&'static str] {
        &["dni", "celular"]
    }

    fn validate_create(&self, payload: &Payload) -> Vec<String> {
        let mut errors = Vec::new();
        require_name(payload, &mut errors);
        require_numeric(payload, "dni", &mut errors);
        require_numeric(payload, "celular", &mut errors);
        errors
    }
}
