//! Extraction of provider headers from an inbound request.

use axum::http::HeaderMap;
use thiserror::Error;

use crate::domain::notification::{
    MessageType, NotificationHeaders, UnknownMessageType, MESSAGE_ID_HEADER, MESSAGE_RETRY_HEADER,
    MESSAGE_SIGNATURE_HEADER, MESSAGE_TIMESTAMP_HEADER, MESSAGE_TYPE_HEADER,
    SUBSCRIPTION_TYPE_HEADER, SUBSCRIPTION_VERSION_HEADER,
};

/// Why the provider headers could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("Missing header {0}")]
    Missing(&'static str),

    #[error("Header {0} is not valid text")]
    NotText(&'static str),

    #[error("Header {header} has invalid value '{value}'")]
    InvalidValue { header: &'static str, value: String },

    #[error(transparent)]
    UnknownMessageType(#[from] UnknownMessageType),
}

/// Raw value of a header, `None` if absent or not visible ASCII.
pub(crate) fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn optional(headers: &HeaderMap, name: &'static str) -> Result<Option<String>, HeaderError> {
    match headers.get(name) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .map(|s| Some(s.to_string()))
            .map_err(|_| HeaderError::NotText(name)),
    }
}

fn required(headers: &HeaderMap, name: &'static str) -> Result<String, HeaderError> {
    match optional(headers, name)? {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(HeaderError::Missing(name)),
    }
}

impl NotificationHeaders {
    /// Parse the provider headers of one delivery.
    ///
    /// The retry count is optional and defaults to zero. The signature is
    /// optional here; whether it is required depends on the handler's
    /// secret configuration.
    pub fn from_header_map(headers: &HeaderMap) -> Result<Self, HeaderError> {
        let message_retry = match optional(headers, MESSAGE_RETRY_HEADER)? {
            None => 0,
            Some(raw) => raw.trim().parse().map_err(|_| HeaderError::InvalidValue {
                header: MESSAGE_RETRY_HEADER,
                value: raw,
            })?,
        };

        let message_type: MessageType = required(headers, MESSAGE_TYPE_HEADER)?.parse()?;

        Ok(Self {
            message_id: required(headers, MESSAGE_ID_HEADER)?,
            message_retry,
            message_type,
            message_signature: optional(headers, MESSAGE_SIGNATURE_HEADER)?,
            message_timestamp: required(headers, MESSAGE_TIMESTAMP_HEADER)?,
            subscription_type: required(headers, SUBSCRIPTION_TYPE_HEADER)?,
            subscription_version: required(headers, SUBSCRIPTION_VERSION_HEADER)?,
        })
    }
}

impl TryFrom<&HeaderMap> for NotificationHeaders {
    type Error = HeaderError;

    fn try_from(headers: &HeaderMap) -> Result<Self, Self::Error> {
        Self::from_header_map(headers)
    }
}
