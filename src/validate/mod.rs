//! Validation of template configurations and render inputs.
//!
//! - Syntax: parser errors and brace balance for every configured body
//! - Declarations: duplicate names, default type and enum membership
//! - Usage: declared-but-unused and used-but-undeclared variables (warnings)
//! - Inputs: must-provide variables, value types and allowed values

mod types;
mod validator;


pub use types::ValidationResult;
pub use validator::{
    check_undeclared_variables, check_unused_variables, enum_contains, type_error, validate,
    validate_inputs, validate_syntax, validate_variables,
};
