pub mod conversion;
pub mod library;
