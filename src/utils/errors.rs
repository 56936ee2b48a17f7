pub use rollbook_core::errors::AppError;
