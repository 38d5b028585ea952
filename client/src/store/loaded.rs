//! Results annotated with where their data came from, and the policy that
//! decides what a failed fetch falls back to.

use crate::core::error::{AppError, Result};
use std::fmt;
use std::str::FromStr;

/// Provenance of data handed to a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    /// Fetched from the backend by this call.
    Fresh,
    /// Served from a valid cache bucket.
    Cached,
    /// Served from an expired bucket because the fetch failed.
    Stale,
    /// Synthetic zeroed data because the fetch failed and nothing was cached.
    Placeholder,
}

/// Data plus its [`DataOrigin`]. Degraded results carry the error that
/// caused the fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub data: T,
    pub origin: DataOrigin,
    pub error: Option<AppError>,
}

impl<T> Loaded<T> {
    pub fn fresh(data: T) -> Self {
        Self { data, origin: DataOrigin::Fresh, error: None }
    }

    pub fn cached(data: T) -> Self {
        Self { data, origin: DataOrigin::Cached, error: None }
    }

    pub fn stale(data: T, error: AppError) -> Self {
        Self { data, origin: DataOrigin::Stale, error: Some(error) }
    }

    pub fn placeholder(data: T, error: AppError) -> Self {
        Self { data, origin: DataOrigin::Placeholder, error: Some(error) }
    }

    /// True for `Stale` and `Placeholder`.
    pub fn is_degraded(&self) -> bool {
        matches!(self.origin, DataOrigin::Stale | DataOrigin::Placeholder)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loaded<U> {
        Loaded {
            data: f(self.data),
            origin: self.origin,
            error: self.error,
        }
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}

/// What a store returns when a fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Return the error.
    Surface,
    /// Serve the last cached data marked `Stale`, else return the error.
    #[default]
    Stale,
    /// Serve stale data if any, else zeroed data marked `Placeholder`.
    Placeholder,
}

impl FallbackPolicy {
    /// Apply the policy to a failed fetch.
    ///
    /// Auth, validation, cancellation and 4xx errors always surface; only
    /// transient failures are eligible for fallback.
    pub fn resolve<T>(
        &self,
        error: AppError,
        stale: Option<T>,
        placeholder: impl FnOnce() -> T,
    ) -> Result<Loaded<T>> {
        if !error.is_transient() {
            return Err(error);
        }
        match (self, stale) {
            (FallbackPolicy::Surface, _) => Err(error),
            (FallbackPolicy::Stale, Some(data)) | (FallbackPolicy::Placeholder, Some(data)) => {
                tracing::warn!(error = %error, "Serving stale data after failed fetch");
                Ok(Loaded::stale(data, error))
            }
            (FallbackPolicy::Stale, None) => Err(error),
            (FallbackPolicy::Placeholder, None) => {
                tracing::warn!(error = %error, "Serving placeholder data after failed fetch");
                Ok(Loaded::placeholder(placeholder(), error))
            }
        }
    }
}

impl FromStr for FallbackPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "surface" => Ok(FallbackPolicy::Surface),
            "stale" => Ok(FallbackPolicy::Stale),
            "placeholder" => Ok(FallbackPolicy::Placeholder),
            other => Err(format!(
                "unknown fallback policy '{}' (expected surface, stale or placeholder)",
                other
            )),
        }
    }
}

impl fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FallbackPolicy::Surface => "surface",
            FallbackPolicy::Stale => "stale",
            FallbackPolicy::Placeholder => "placeholder",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net() -> AppError {
        AppError::Network("connection reset".to_string())
    }

    #[test]
    fn test_surface_returns_error() {
        let out = FallbackPolicy::Surface.resolve(net(), Some(1), || 0);
        assert_eq!(out, Err(net()));
    }

    #[test]
    fn test_stale_serves_cached_or_errors() {
        let out = FallbackPolicy::Stale.resolve(net(), Some(5), || 0).unwrap();
        assert_eq!(out.origin, DataOrigin::Stale);
        assert_eq!(out.data, 5);
        assert_eq!(out.error, Some(net()));

        assert!(FallbackPolicy::Stale.resolve::<i32>(net(), None, || 0).is_err());
    }

    #[test]
    fn test_placeholder_is_marked() {
        let out = FallbackPolicy::Placeholder.resolve::<i32>(net(), None, || 0).unwrap();
        assert_eq!(out.origin, DataOrigin::Placeholder);
        assert!(out.is_degraded());
    }

    #[test]
    fn test_auth_errors_never_fall_back() {
        let err = AppError::Auth("expired".to_string());
        let out = FallbackPolicy::Placeholder.resolve(err.clone(), Some(1), || 0);
        assert_eq!(out, Err(err));
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!("Stale".parse::<FallbackPolicy>(), Ok(FallbackPolicy::Stale));
        assert_eq!("placeholder".parse::<FallbackPolicy>(), Ok(FallbackPolicy::Placeholder));
        assert!("mock".parse::<FallbackPolicy>().is_err());
    }
}
