//! Form schemas and whole-form validation

mod schema;
mod validator;

pub use schema::{FieldRule, FieldSpec, FormSchemaName};
pub use validator::{validate_form, validate_form_data, validate_form_data_in};
