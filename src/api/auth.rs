use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use indexmap::IndexMap;

use crate::error::{ChartError, ChartResult};

use super::Credential;

/// HTTP basic-auth gate in front of the dashboard.
///
/// With no credentials configured, access is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicAuth {
    credentials: IndexMap<String, String>,
}

impl BasicAuth {
    pub fn from_credentials<'a>(
        credentials: impl IntoIterator<Item = &'a Credential>,
    ) -> ChartResult<Self> {
        let mut map = IndexMap::new();
        for credential in credentials {
            if credential.username.is_empty() || credential.username.contains(':') {
                return Err(ChartError::InvalidData(
                    "username must be non-empty and must not contain `:`".to_owned(),
                ));
            }
            if map
                .insert(credential.username.clone(), credential.password.clone())
                .is_some()
            {
                return Err(ChartError::InvalidData(format!(
                    "duplicate credential for user `{}`",
                    credential.username
                )));
            }
        }
        Ok(Self { credentials: map })
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.credentials.is_empty()
    }

    #[must_use]
    pub fn user_count(&self) -> usize {
        self.credentials.len()
    }

    #[must_use]
    pub fn verify(&self, username: &str, password: &str) -> bool {
        if !self.is_enabled() {
            return true;
        }
        self.credentials
            .get(username)
            .is_some_and(|expected| expected == password)
    }

    /// Checks an `Authorization` header value such as `Basic dXNlcjE6MTIz`.
    #[must_use]
    pub fn verify_header(&self, header: &str) -> bool {
        if !self.is_enabled() {
            return true;
        }
        let Some((scheme, encoded)) = header.trim().split_once(' ') else {
            return false;
        };
        if !scheme.eq_ignore_ascii_case("basic") {
            return false;
        }
        let Ok(decoded) = STANDARD.decode(encoded.trim()) else {
            return false;
        };
        let Ok(pair) = String::from_utf8(decoded) else {
            return false;
        };
        pair.split_once(':')
            .is_some_and(|(username, password)| self.verify(username, password))
    }
}
