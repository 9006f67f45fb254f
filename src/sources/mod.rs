pub mod qasa;
pub mod traits;
pub mod types;

pub use qasa::QasaSource;
pub use traits::ListingSource;
pub use types::SearchParams;
