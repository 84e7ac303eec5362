//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::errors::AppError;

/// JSON body that has passed its `validator` rules.
///
/// Malformed JSON and rule violations both become `400 VALIDATION_ERROR`.
///
/// ```rust,ignore
/// async fn create_cabinet(ValidatedJson(cabinet): ValidatedJson<NewCabinet>) {
///     // location and dataCenter are non-empty here
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(describe(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// One message per failed rule, sorted so the output is stable.
/// Rules without a message fall back to "<field> is invalid".
fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewCabinet, NewDevice};

    #[test]
    fn test_messages_come_from_rules() {
        let cabinet = NewCabinet::new("", "");
        let errors = cabinet.validate().unwrap_err();
        assert_eq!(describe(&errors), "dataCenter is required, location is required");
    }

    #[test]
    fn test_struct_level_rule_is_reported() {
        let mut device = NewDevice::new("sw1", "Network", "jdoe", "DC1", "A-01");
        device.manufacturer = Some("Cisco".to_string());
        let errors = device.validate().unwrap_err();
        assert_eq!(
            describe(&errors),
            "manufacturer and model must be given together"
        );
    }
}
