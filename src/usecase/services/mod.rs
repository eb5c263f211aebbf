pub mod convert_service;
pub mod option_service;
pub mod process_service;
pub mod product_service;
