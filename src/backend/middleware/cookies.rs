/**
 * Cookie Helpers
 *
 * Just enough cookie handling for the session and CSRF stages: read one
 * named value from the `Cookie` header and format a `Set-Cookie` value.
 */

use std::time::Duration;

use axum::http::{
    header::{COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};

/// Find `name` in the request's `Cookie` headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
}

/// A `Set-Cookie` value scoped to path `/` and marked HttpOnly
#[derive(Debug, Clone)]
pub struct SetCookie<'a> {
    name: &'a str,
    value: &'a str,
    max_age: Option<Duration>,
    same_site_lax: bool,
    secure: bool,
}

impl<'a> SetCookie<'a> {
    pub fn new(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            value,
            max_age: None,
            same_site_lax: false,
            secure: false,
        }
    }

    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn same_site_lax(mut self) -> Self {
        self.same_site_lax = true;
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn to_header_value(&self) -> String {
        let mut out = format!("{}={}; Path=/; HttpOnly", self.name, self.value);
        if let Some(max_age) = self.max_age {
            out.push_str(&format!("; Max-Age={}", max_age.as_secs()));
        }
        if self.same_site_lax {
            out.push_str("; SameSite=Lax");
        }
        if self.secure {
            out.push_str("; Secure");
        }
        out
    }

    /// Append to `headers`, keeping any cookies already being set.
    pub fn append_to(&self, headers: &mut HeaderMap) {
        match HeaderValue::from_str(&self.to_header_value()) {
            Ok(value) => {
                headers.append(SET_COOKIE, value);
            }
            Err(e) => tracing::error!(cookie = self.name, error = ?e, "Invalid Set-Cookie value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("a=1; session=abc; csrf_token=\"xyz\""));
        assert_eq!(read_cookie(&headers, "session").as_deref(), Some("abc"));
        assert_eq!(read_cookie(&headers, "csrf_token").as_deref(), Some("xyz"));
        assert_eq!(read_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_read_cookie_across_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1"));
        headers.append(COOKIE, HeaderValue::from_static("session=abc"));
        assert_eq!(read_cookie(&headers, "session").as_deref(), Some("abc"));
    }

    #[test]
    fn test_set_cookie_attributes() {
        let cookie = SetCookie::new("session", "abc")
            .max_age(Duration::from_secs(43200))
            .same_site_lax()
            .secure(true)
            .to_header_value();
        assert_eq!(
            cookie,
            "session=abc; Path=/; HttpOnly; Max-Age=43200; SameSite=Lax; Secure"
        );

        let plain = SetCookie::new("csrf_token", "t").secure(false).to_header_value();
        assert_eq!(plain, "csrf_token=t; Path=/; HttpOnly");
    }

    #[test]
    fn test_append_keeps_existing() {
        let mut headers = HeaderMap::new();
        SetCookie::new("a", "1").append_to(&mut headers);
        SetCookie::new("b", "2").append_to(&mut headers);
        assert_eq!(headers.get_all(SET_COOKIE).iter().count(), 2);
    }
}
