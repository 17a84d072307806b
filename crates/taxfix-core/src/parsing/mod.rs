pub mod currency;
pub mod labels;

pub use currency::{collect_tokens, currency_tokens, require_tokens};
pub use labels::label_pattern;
