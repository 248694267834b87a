//! Command implementations.

mod export;
mod info;
mod validate;

pub use export::run_export;
pub use info::run_info;
pub use validate::run_validate;
