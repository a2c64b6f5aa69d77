use tienda_storage::Payload;

use super::{require_name, require_numeric, ResourceService};

/// Validation and formatting for the `products` collection.
#[derive(Debug, Clone, Copy)]
pub struct ProductService;

impl ResourceService for ProductService {
    fn numeric_fields(&self) -> &'static [&'static str] {
        &["price", "cantidad"]
    }

    fn validate_create(&self, payload: &Payload) -> Vec<String> {
        let mut errors = Vec::new();
        require_name(payload, &mut errors);
        require_numeric(payload, "price", &mut errors);
        require_numeric(payload, "cantidad", &mut errors);
        errors
    }
}
