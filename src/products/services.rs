use lazy_static::lazy_static;
use regex::Regex;

/// Product ids are short slugs; they end up in blob keys and filenames.
pub fn is_valid_product_id(id: &str) -> bool {
    lazy_static! {
        static ref PRODUCT_ID_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]{1,64}$").unwrap();
    }
    PRODUCT_ID_RE.is_match(id)
}
