mod extractor;

pub use extractor::{extract_price, PriceExtractor};
