pub mod entities;
pub mod numeric;
pub mod sku;
