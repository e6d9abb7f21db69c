//! Admission check for public form submissions
//!
//! A submission is first counted against its route's rate limit, then
//! validated against its schema. Either failure short-circuits before any
//! downstream call is made.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::api::types::ApiError;
use crate::domain::form::{validate_form, FormSchemaName};
use crate::domain::validation::Locale;
use crate::domain::{RouteClass, ValidationResult};
use crate::infrastructure::rate_limit::RateLimiters;

/// Rate limit, then validate
#[derive(Debug, Clone)]
pub struct FormSubmissionGuard {
    limiters: Arc<RateLimiters>,
    locale: Locale,
}

impl FormSubmissionGuard {
    pub fn new(limiters: Arc<RateLimiters>) -> Self {
        Self {
            limiters,
            locale: Locale::default(),
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Route class whose budget a schema's submissions draw on
    pub fn route_for(schema: FormSchemaName) -> RouteClass {
        match schema {
            FormSchemaName::Contact => RouteClass::Contact,
            FormSchemaName::Demo => RouteClass::Demo,
        }
    }

    /// Admit a submission from `client_key`
    ///
    /// On success the returned result is valid but may carry warnings.
    /// Fails with 429 when the client is over budget and with 400 when the
    /// data does not pass validation.
    pub fn admit(
        &self,
        schema: FormSchemaName,
        client_key: &str,
        data: &Value,
    ) -> Result<ValidationResult, ApiError> {
        let route = Self::route_for(schema);
        self.limiters.enforce(route, client_key)?;

        let result = validate_form(data, schema, self.locale);
        if !result.is_valid() {
            debug!(
                schema = %schema,
                errors = result.errors().len(),
                "Form submission rejected"
            );
            return Err(ApiError::from_validation(result));
        }

        Ok(result)
    }

    /// Like `admit`, for a schema named by the caller
    pub fn admit_named(
        &self,
        schema_name: &str,
        client_key: &str,
        data: &Value,
    ) -> Result<ValidationResult, ApiError> {
        let schema: FormSchemaName = schema_name.parse()?;
        self.admit(schema, client_key, data)
    }
}
