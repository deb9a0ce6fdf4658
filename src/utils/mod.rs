pub mod date;
pub mod employee_cache;
pub mod validate;
