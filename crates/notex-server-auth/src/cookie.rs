// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Reading session credentials from requests and writing session cookies.
//!
//! # Where credentials come from
//!
//! ```text
//! Authorization: Bearer <jwt>          ──┐
//! Cookie: <session_cookie>=<jwt>       ──┴─> self-issued
//! Cookie: <federated_cookie>=<jwt>     ──┐
//! Cookie: __Secure-<federated>=<jwt>   ──┴─> federated
//! ```
//!
//! Token values are wrapped in [`SecretString`] as soon as they are read.

use http::header::{AUTHORIZATION, COOKIE};
use http::HeaderMap;
use notex_common_secret::SecretString;

use crate::token::{IssuedToken, TokenKind};

/// Prefix browsers require `Secure` cookies to carry when set over HTTPS.
pub const SECURE_PREFIX: &str = "__Secure-";

pub const DEFAULT_SESSION_COOKIE: &str = "notex_session";
pub const DEFAULT_FEDERATED_COOKIE: &str = "notex_federated_session";

/// Find a cookie by exact name across all `Cookie` headers.
pub fn extract_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
	headers
		.get_all(COOKIE)
		.iter()
		.filter_map(|value| value.to_str().ok())
		.flat_map(|value| value.split(';'))
		.find_map(|cookie| {
			let (name, value) = cookie.trim().split_once('=')?;
			(name == cookie_name && !value.is_empty()).then(|| value.to_string())
		})
}

/// Token from `Authorization: Bearer <token>`.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
	headers
		.get(AUTHORIZATION)?
		.to_str()
		.ok()?
		.strip_prefix("Bearer ")
		.map(str::trim)
		.filter(|token| !token.is_empty())
		.map(str::to_string)
}

/// The credentials a request carries, grouped by kind in the order they are
/// tried.
#[derive(Debug, Clone, Default)]
pub struct PresentedCredentials {
	/// Bearer header, then the session cookie.
	pub self_issued: Vec<SecretString>,
	/// `__Secure-` cookie, then the plain federated cookie.
	pub federated: Vec<SecretString>,
}

impl PresentedCredentials {
	pub fn is_empty(&self) -> bool {
		self.self_issued.is_empty() && self.federated.is_empty()
	}

	pub fn candidates(&self, kind: TokenKind) -> &[SecretString] {
		match kind {
			TokenKind::SelfIssued => &self.self_issued,
			TokenKind::Federated => &self.federated,
		}
	}
}

/// Cookie names and attributes for both session kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSettings {
	pub session_cookie: String,
	pub federated_cookie: String,
	/// Adds `Secure` and uses the `__Secure-` name for the federated cookie.
	pub secure: bool,
}

impl Default for CookieSettings {
	fn default() -> Self {
		Self {
			session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
			federated_cookie: DEFAULT_FEDERATED_COOKIE.to_string(),
			secure: false,
		}
	}
}

impl CookieSettings {
	fn secure_federated_name(&self) -> String {
		format!("{SECURE_PREFIX}{}", self.federated_cookie)
	}

	/// Collect both credential kinds. A bearer token is tried before the
	/// session cookie, so a stale header cannot hide a valid cookie.
	pub fn presented_credentials(&self, headers: &HeaderMap) -> PresentedCredentials {
		let self_issued = [
			extract_bearer_token(headers),
			extract_cookie(headers, &self.session_cookie),
		];
		let federated = [
			extract_cookie(headers, &self.secure_federated_name()),
			extract_cookie(headers, &self.federated_cookie),
		];

		PresentedCredentials {
			self_issued: self_issued.into_iter().flatten().map(SecretString::new).collect(),
			federated: federated.into_iter().flatten().map(SecretString::new).collect(),
		}
	}

	/// Whether any session cookie is present, valid or not.
	pub fn has_session_cookie(&self, headers: &HeaderMap) -> bool {
		extract_cookie(headers, &self.session_cookie).is_some()
			|| extract_cookie(headers, &self.federated_cookie).is_some()
			|| extract_cookie(headers, &self.secure_federated_name()).is_some()
	}

	fn cookie_name(&self, kind: TokenKind) -> String {
		match kind {
			TokenKind::SelfIssued => self.session_cookie.clone(),
			TokenKind::Federated if self.secure => self.secure_federated_name(),
			TokenKind::Federated => self.federated_cookie.clone(),
		}
	}

	/// `Set-Cookie` value carrying a freshly issued token.
	pub fn set_cookie(&self, issued: &IssuedToken) -> String {
		self.build(
			&self.cookie_name(issued.kind),
			issued.token.expose(),
			issued.max_age_secs,
		)
	}

	/// `Set-Cookie` values that remove every session cookie.
	pub fn clear_cookies(&self) -> Vec<String> {
		let mut names = vec![self.session_cookie.clone(), self.federated_cookie.clone()];
		if self.secure {
			names.push(self.secure_federated_name());
		}
		names.iter().map(|name| self.build(name, "", 0)).collect()
	}

	/// A short-lived HttpOnly cookie, used for OAuth `state`.
	pub fn transient_cookie(&self, name: &str, value: &str, max_age_secs: i64) -> String {
		self.build(name, value, max_age_secs)
	}

	fn build(&self, name: &str, value: &str, max_age_secs: i64) -> String {
		let mut cookie =
			format!("{name}={value}; Path=/; Max-Age={max_age_secs}; HttpOnly; SameSite=Lax");
		if self.secure {
			cookie.push_str("; Secure");
		}
		cookie
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::Utc;
	use http::header::HeaderValue;

	fn headers(pairs: &[(&http::HeaderName, &str)]) -> HeaderMap {
		let mut map = HeaderMap::new();
		for (name, value) in pairs {
			map.append((*name).clone(), HeaderValue::from_str(value).unwrap());
		}
		map
	}

	fn issued(kind: TokenKind) -> IssuedToken {
		IssuedToken {
			kind,
			token: "jwt-value".into(),
			expires_at: Utc::now(),
			max_age_secs: 604_800,
		}
	}

	#[test]
	fn extracts_named_cookie_among_others() {
		let map = headers(&[(&COOKIE, "theme=dark; notex_session=abc.def.ghi; lang=en")]);
		assert_eq!(
			extract_cookie(&map, "notex_session"),
			Some("abc.def.ghi".to_string())
		);
		assert_eq!(extract_cookie(&map, "notex"), None);
	}

	#[test]
	fn empty_cookie_value_is_absent() {
		let map = headers(&[(&COOKIE, "notex_session=")]);
		assert_eq!(extract_cookie(&map, "notex_session"), None);
	}

	#[test]
	fn searches_every_cookie_header() {
		let map = headers(&[(&COOKIE, "a=1"), (&COOKIE, "notex_session=tok")]);
		assert_eq!(extract_cookie(&map, "notex_session"), Some("tok".to_string()));
	}

	#[test]
	fn bearer_requires_scheme_and_value() {
		assert_eq!(
			extract_bearer_token(&headers(&[(&AUTHORIZATION, "Bearer tok")])),
			Some("tok".to_string())
		);
		assert_eq!(
			extract_bearer_token(&headers(&[(&AUTHORIZATION, "Basic dXNlcg==")])),
			None
		);
		assert_eq!(
			extract_bearer_token(&headers(&[(&AUTHORIZATION, "Bearer ")])),
			None
		);
	}

	#[test]
	fn presented_credentials_collects_both_kinds() {
		let settings = CookieSettings::default();
		let map = headers(&[(
			&COOKIE,
			"notex_session=self; __Secure-notex_federated_session=fed",
		)]);
		let creds = settings.presented_credentials(&map);

		assert_eq!(creds.self_issued.len(), 1);
		assert_eq!(creds.self_issued[0].expose(), "self");
		assert_eq!(creds.federated[0].expose(), "fed");
	}

	#[test]
	fn bearer_is_tried_before_session_cookie() {
		let settings = CookieSettings::default();
		let map = headers(&[
			(&AUTHORIZATION, "Bearer from-header"),
			(&COOKIE, "notex_session=from-cookie"),
		]);
		let creds = settings.presented_credentials(&map);
		let tried: Vec<&str> = creds
			.candidates(TokenKind::SelfIssued)
			.iter()
			.map(|t| t.expose().as_str())
			.collect();
		assert_eq!(tried, ["from-header", "from-cookie"]);
		assert!(creds.candidates(TokenKind::Federated).is_empty());
	}

	#[test]
	fn no_cookies_means_no_credentials() {
		let creds = CookieSettings::default().presented_credentials(&HeaderMap::new());
		assert!(creds.is_empty());
	}

	#[test]
	fn set_cookie_attributes() {
		let settings = CookieSettings::default();
		assert_eq!(
			settings.set_cookie(&issued(TokenKind::SelfIssued)),
			"notex_session=jwt-value; Path=/; Max-Age=604800; HttpOnly; SameSite=Lax"
		);

		let secure = CookieSettings {
			secure: true,
			..CookieSettings::default()
		};
		let cookie = secure.set_cookie(&issued(TokenKind::Federated));
		assert!(cookie.starts_with("__Secure-notex_federated_session=jwt-value;"));
		assert!(cookie.ends_with("; Secure"));
	}

	#[test]
	fn clear_cookies_expires_every_name() {
		let secure = CookieSettings {
			secure: true,
			..CookieSettings::default()
		};
		let cleared = secure.clear_cookies();
		assert_eq!(cleared.len(), 3);
		assert!(cleared.iter().all(|c| c.contains("Max-Age=0")));
	}

	#[test]
	fn has_session_cookie_ignores_unrelated_cookies() {
		let settings = CookieSettings::default();
		assert!(!settings.has_session_cookie(&headers(&[(&COOKIE, "theme=dark")])));
		assert!(settings.has_session_cookie(&headers(&[(&COOKIE, "notex_federated_session=x")])));
	}
}
