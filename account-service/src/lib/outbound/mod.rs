pub mod repositories;
pub mod tokens;
