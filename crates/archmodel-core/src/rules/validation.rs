use crate::errors::{ArchModelError, Result};

/// Check that a name is not empty or whitespace-only
///
/// # Errors
/// Returns `InvalidName` naming the offending field.
pub fn validate_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ArchModelError::InvalidName {
            reason: format!("The {} must not be null or empty.", field),
        });
    }
    Ok(())
}

/// Check that a string is an absolute URL
///
/// Accepted shape: `scheme://host[...]` where the scheme starts with a letter
/// and contains only letters, digits, `+`, `-` or `.`, the host is non-empty,
/// and there is no whitespace anywhere.
///
/// # Errors
/// Returns `InvalidUrl` carrying the rejected value.
pub fn validate_url(url: &str) -> Result<()> {
    if is_url(url) {
        Ok(())
    } else {
        Err(ArchModelError::InvalidUrl {
            url: url.to_string(),
        })
    }
}

pub fn is_url(url: &str) -> bool {
    if url.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((scheme, rest)) = url.split_once("://") else {
        return false;
    };

    let mut scheme_chars = scheme.chars();
    let scheme_ok = scheme_chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && scheme_chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !scheme_ok {
        return false;
    }

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_and_port = authority.rsplit('@').next().unwrap_or_default();
    let host = match host_and_port.rsplit_once(':') {
        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => host_and_port,
    };
    !host.is_empty()
}

/// Trim a group label; blank labels mean "no group"
pub fn normalize_group(group: &str) -> Option<String> {
    let trimmed = group.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Validate HTTP health check parameters
///
/// Checks run in this order and the first failure wins: name, URL presence,
/// URL shape, interval, timeout.
///
/// # Errors
/// Returns `InvalidHealthCheck` (or `InvalidUrl` for a malformed URL).
pub fn validate_health_check(name: &str, url: &str, interval: i64, timeout: i64) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ArchModelError::InvalidHealthCheck {
            reason: "The name must not be null or empty.".to_string(),
        });
    }
    if url.trim().is_empty() {
        return Err(ArchModelError::InvalidHealthCheck {
            reason: "The URL must not be null or empty.".to_string(),
        });
    }
    validate_url(url)?;
    if interval < 0 {
        return Err(ArchModelError::InvalidHealthCheck {
            reason: "The polling interval must be zero or a positive integer.".to_string(),
        });
    }
    if timeout < 0 {
        return Err(ArchModelError::InvalidHealthCheck {
            reason: "The timeout must be zero or a positive integer.".to_string(),
        });
    }
    Ok(())
}
