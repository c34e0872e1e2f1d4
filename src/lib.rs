// Formkeeper - rule-driven form validation
//
// Rules describe the fields and selections of each form. The engine filters
// submitted values, checks them against registered validators and reports
// what passed and what failed.

// Re-export core functionality
pub use formkeeper_core::*;

// Re-export optional crates
#[cfg(feature = "config")]
pub use formkeeper_config;
