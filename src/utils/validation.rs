use crate::utils::error::{MenuError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> MenuError {
    MenuError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Menu endpoints and the Telegram API base must be absolute http(s) URLs.
pub fn validate_url(field_name: &str, url_str: &str) -> Result<Url> {
    let url = Url::parse(url_str).map_err(|e| invalid(field_name, url_str, format!("Invalid URL: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(invalid(
            field_name,
            url_str,
            format!("Unsupported URL scheme: {}", scheme),
        )),
    }
}

/// The log path is handed to the OS as is, so it only has to be non-empty and NUL free.
pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() || path.contains('\0') {
        return Err(invalid(field_name, path.escape_default(), "Not a usable file path"));
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(invalid(field_name, value, format!("Value must be at least {}", min_value)));
    }
    Ok(())
}

/// A config string that has to be present and not blank, such as a token.
pub fn required_text<'a>(field_name: &str, value: &'a Option<String>) -> Result<&'a str> {
    let text = value.as_deref().ok_or_else(|| MenuError::MissingConfigError {
        field: field_name.to_string(),
    })?;
    validate_non_empty_string(field_name, text)?;
    Ok(text)
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field_name, value, "Value cannot be blank"));
    }
    Ok(())
}
