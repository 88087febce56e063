//! Base types and error handling.
//!
//! - [`LookupError`](lookuperror::LookupError): every failure the resolver run can report
//! - [`IoResultExt`](context::IoResultExt): attaches path or hostname context to IO errors

pub mod context;
pub mod lookuperror;

#[cfg(test)]
mod tests;
