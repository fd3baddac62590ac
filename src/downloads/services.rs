use crate::products::repo_types::Product;

const DEFAULT_EXTENSION: &str = "rbxl";

/// Blob key and download filename for a purchased product. Products missing
/// from the catalogue fall back to `products/<id>.rbxl`.
pub fn blob_location(product_id: &str, product: Option<&Product>) -> (String, String) {
    match product {
        Some(p) => (p.file_key.clone(), p.file_name.clone()),
        None => (
            format!("products/{}.{}", product_id, DEFAULT_EXTENSION),
            format!("{}.{}", product_id, DEFAULT_EXTENSION),
        ),
    }
}

/// `attachment; filename="..."` with characters that would break the quoted
/// string dropped.
pub fn content_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .filter(|c| *c != '"' && *c != '\\' && !c.is_control() && c.is_ascii())
        .collect();
    let safe = if safe.is_empty() { "download".to_string() } else { safe };
    format!("attachment; filename=\"{}\"", safe)
}
