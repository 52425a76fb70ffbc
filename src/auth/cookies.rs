use std::{fmt::Write as _, time::Duration};

use axum::{
    extract::FromRef,
    http::{header, header::InvalidHeaderValue, HeaderMap, HeaderValue},
};
use headers::{Cookie, HeaderMapExt};

use crate::state::AppState;

/// Name of the cookie carrying the signed auth token.
pub const TOKEN_COOKIE: &str = "token";

const DEFAULT_MAX_AGE: Duration = Duration::from_secs(15 * 60);
const EPOCH_HTTP_DATE: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

#[derive(Debug, thiserror::Error)]
pub enum CookieError {
    #[error("invalid cookie name `{0}`")]
    InvalidName(String),
    #[error("cookie value contains characters outside cookie-octet")]
    InvalidValue,
    #[error("invalid cookie {0} attribute")]
    InvalidAttribute(&'static str),
    #[error(transparent)]
    Header(#[from] InvalidHeaderValue),
}

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    pub max_age: Duration,
    pub path: Option<String>,
    pub domain: Option<String>,
}

/// Per-call changes merged over [`CookieManager::default_options`].
#[derive(Debug, Clone, Default)]
pub struct CookieOverrides {
    pub http_only: Option<bool>,
    pub secure: Option<bool>,
    pub same_site: Option<SameSite>,
    pub max_age: Option<Duration>,
    pub path: Option<String>,
    pub domain: Option<String>,
}

impl CookieOptions {
    fn merge(mut self, overrides: Option<CookieOverrides>) -> Self {
        let Some(o) = overrides else {
            return self;
        };
        if let Some(v) = o.http_only {
            self.http_only = v;
        }
        if let Some(v) = o.secure {
            self.secure = v;
        }
        if let Some(v) = o.same_site {
            self.same_site = v;
        }
        if let Some(v) = o.max_age {
            self.max_age = v;
        }
        if o.path.is_some() {
            self.path = o.path;
        }
        if o.domain.is_some() {
            self.domain = o.domain;
        }
        self
    }

    fn write_attributes(&self, out: &mut String) -> Result<(), CookieError> {
        if let Some(path) = &self.path {
            check_attribute("Path", path)?;
            let _ = write!(out, "; Path={path}");
        }
        if let Some(domain) = &self.domain {
            check_attribute("Domain", domain)?;
            let _ = write!(out, "; Domain={domain}");
        }
        if self.http_only {
            out.push_str("; HttpOnly");
        }
        if self.secure {
            out.push_str("; Secure");
        }
        let _ = write!(out, "; SameSite={}", self.same_site.as_str());
        Ok(())
    }
}

/// Writes and reads cookies with the service's security defaults.
#[derive(Debug, Clone, Copy)]
pub struct CookieManager {
    production: bool,
}

impl FromRef<AppState> for CookieManager {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.config.production)
    }
}

impl CookieManager {
    pub fn new(production: bool) -> Self {
        Self { production }
    }

    pub fn default_options(&self) -> CookieOptions {
        CookieOptions {
            http_only: true,
            secure: self.production,
            same_site: SameSite::Strict,
            max_age: DEFAULT_MAX_AGE,
            path: Some("/".into()),
            domain: None,
        }
    }

    pub fn set(
        &self,
        headers: &mut HeaderMap,
        name: &str,
        value: &str,
        overrides: Option<CookieOverrides>,
    ) -> Result<(), CookieError> {
        check_name(name)?;
        if !value.bytes().all(is_cookie_octet) {
            return Err(CookieError::InvalidValue);
        }
        let opts = self.default_options().merge(overrides);
        let mut cookie = format!("{name}={value}; Max-Age={}", opts.max_age.as_secs());
        opts.write_attributes(&mut cookie)?;
        append_set_cookie(headers, &cookie)
    }

    /// Expire `name`. Path and domain must match the ones used in [`Self::set`],
    /// otherwise the browser keeps the original cookie.
    #[allow(dead_code)]
    pub fn clear(
        &self,
        headers: &mut HeaderMap,
        name: &str,
        overrides: Option<CookieOverrides>,
    ) -> Result<(), CookieError> {
        check_name(name)?;
        let opts = self.default_options().merge(overrides);
        let mut cookie = format!("{name}=; Max-Age=0; Expires={EPOCH_HTTP_DATE}");
        opts.write_attributes(&mut cookie)?;
        append_set_cookie(headers, &cookie)
    }

    #[allow(dead_code)]
    pub fn get(&self, headers: &HeaderMap, name: &str) -> Option<String> {
        headers
            .typed_get::<Cookie>()
            .and_then(|c| c.get(name).map(str::to_owned))
    }
}

/// RFC 6265 `token`: visible ASCII without separators.
fn check_name(name: &str) -> Result<(), CookieError> {
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b));
    if valid {
        Ok(())
    } else {
        Err(CookieError::InvalidName(name.to_string()))
    }
}

/// RFC 6265 `cookie-octet`.
fn is_cookie_octet(b: u8) -> bool {
    matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
}

fn check_attribute(attr: &'static str, value: &str) -> Result<(), CookieError> {
    if value.bytes().all(|b| b >= 0x20 && b != 0x7f && b != b';') {
        Ok(())
    } else {
        Err(CookieError::InvalidAttribute(attr))
    }
}

fn append_set_cookie(headers: &mut HeaderMap, cookie: &str) -> Result<(), CookieError> {
    headers.append(header::SET_COOKIE, HeaderValue::from_str(cookie)?);
    Ok(())
}
