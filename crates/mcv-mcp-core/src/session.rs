//! Session context holding the portal cookie.

use std::fmt;

use crate::{Error, Result};

/// Environment variable holding the raw `Cookie` header value.
pub const COOKIE_ENV: &str = "MCV_COOKIE";

/// Immutable authentication context for the portal.
///
/// Built once at startup and shared behind an `Arc`. The cookie is never
/// refreshed; an expired cookie surfaces as an authentication error on the
/// next request.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionContext {
    cookie: String,
}

impl SessionContext {
    /// Create a session context from a raw cookie string such as the output
    /// of `document.cookie`.
    ///
    /// The value is split on `;`, parts without `=` are dropped, and the
    /// remaining `name=value` pairs are re-joined with `"; "`.
    pub fn new(raw: &str) -> Result<Self> {
        let pairs: Vec<String> = raw
            .split(';')
            .filter_map(|part| {
                let (name, value) = part.trim().split_once('=')?;
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                Some(format!("{}={}", name, value.trim()))
            })
            .collect();

        if pairs.is_empty() {
            return Err(Error::Config(format!(
                "{COOKIE_ENV} must contain at least one name=value pair. \
                 Get it from the browser: F12 -> Console -> document.cookie"
            )));
        }

        Ok(Self {
            cookie: pairs.join("; "),
        })
    }

    /// Read the cookie from [`COOKIE_ENV`].
    pub fn from_env() -> Result<Self> {
        match std::env::var(COOKIE_ENV) {
            Ok(raw) if !raw.trim().is_empty() => Self::new(&raw),
            _ => Err(Error::Config(format!(
                "{COOKIE_ENV} environment variable is required. \
                 Get it from the browser: F12 -> Console -> document.cookie"
            ))),
        }
    }

    /// The normalized `Cookie` header value.
    pub fn cookie(&self) -> &str {
        &self.cookie
    }

    /// Cookie names, in order, without their values.
    pub fn cookie_names(&self) -> Vec<&str> {
        self.cookie
            .split("; ")
            .filter_map(|pair| pair.split_once('=').map(|(name, _)| name))
            .collect()
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("cookies", &self.cookie_names())
            .finish()
    }
}
