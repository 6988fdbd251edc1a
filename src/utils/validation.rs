use crate::utils::error::{MlopsError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(MlopsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(MlopsError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(MlopsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(MlopsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(MlopsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(MlopsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MlopsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(MlopsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 解析單一表單欄位為浮點數，前後空白會被忽略
pub fn parse_float_field(field_name: &str, raw: Option<&str>) -> Result<f64> {
    let raw = raw.ok_or_else(|| MlopsError::InvalidInputError {
        field: field_name.to_string(),
        reason: "field is missing".to_string(),
    })?;

    raw.trim()
        .parse::<f64>()
        .map_err(|e| MlopsError::InvalidInputError {
            field: field_name.to_string(),
            reason: format!("'{}' is not a number ({})", raw, e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("source_url", "https://example.com/data.zip").is_ok());
        assert!(validate_url("source_url", "http://example.com").is_ok());
        assert!(validate_url("source_url", "").is_err());
        assert!(validate_url("source_url", "invalid-url").is_err());
        assert!(validate_url("source_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("l1_ratio", 0.1, 0.0, 1.0).is_ok());
        assert!(validate_range("l1_ratio", 1.5, 0.0, 1.0).is_err());
        assert!(validate_positive_number("port", 0, 1).is_err());
    }

    #[test]
    fn test_parse_float_field() {
        assert_eq!(parse_float_field("pH", Some(" 3.51 ")).unwrap(), 3.51);
        assert_eq!(parse_float_field("citric_acid", Some("0")).unwrap(), 0.0);
        assert!(parse_float_field("pH", Some("abc")).is_err());
        assert!(parse_float_field("pH", Some("")).is_err());
        assert!(matches!(
            parse_float_field("pH", None),
            Err(MlopsError::InvalidInputError { .. })
        ));
    }
}
