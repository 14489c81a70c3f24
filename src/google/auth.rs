//! OAuth 2.0 for an installed application: consent URL, code exchange and
//! refresh-token grant against Google Identity.

use crate::config::{Config, GoogleConfig};
use crate::errors::{AppError, AppResult};
use reqwest::Url;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::env;

pub const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/drive.file",
    "https://www.googleapis.com/auth/spreadsheets",
];

const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Overrides every configured credential (handy for CI and one-off pushes).
pub const TOKEN_ENV: &str = "TAXIBOOK_GOOGLE_TOKEN";

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenError {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

fn require_client(cfg: &GoogleConfig) -> AppResult<()> {
    if cfg.client_id.is_empty() || cfg.client_secret.is_empty() {
        return Err(AppError::Auth(
            "google.client_id and google.client_secret must be set in the config".into(),
        ));
    }
    Ok(())
}

/// Consent page the user opens once to grant Drive + Sheets access.
pub fn authorization_url(cfg: &GoogleConfig) -> AppResult<String> {
    require_client(cfg)?;
    let scope = SCOPES.join(" ");
    let url = Url::parse_with_params(
        AUTH_ENDPOINT,
        &[
            ("client_id", cfg.client_id.as_str()),
            ("redirect_uri", cfg.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", scope.as_str()),
            ("access_type", "offline"),
            ("prompt", "consent"),
        ],
    )
    .map_err(|e| AppError::Auth(e.to_string()))?;
    Ok(url.to_string())
}

fn token_request(http: &Client, form: &[(&str, &str)]) -> AppResult<TokenResponse> {
    let resp = http.post(TOKEN_ENDPOINT).form(form).send()?;
    let status = resp.status();
    let body = resp.text()?;

    if !status.is_success() {
        let detail = serde_json::from_str::<TokenError>(&body)
            .map(|e| match e.error_description {
                Some(d) => format!("{}: {}", e.error, d),
                None => e.error,
            })
            .unwrap_or(body);
        return Err(AppError::Auth(format!("token endpoint returned {}: {}", status, detail)));
    }

    Ok(serde_json::from_str(&body)?)
}

/// Trade the code shown after consent for tokens (including the refresh token).
pub fn exchange_code(http: &Client, cfg: &GoogleConfig, code: &str) -> AppResult<TokenResponse> {
    require_client(cfg)?;
    token_request(
        http,
        &[
            ("code", code.trim()),
            ("client_id", cfg.client_id.as_str()),
            ("client_secret", cfg.client_secret.as_str()),
            ("redirect_uri", cfg.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ],
    )
}

pub fn refresh_access_token(http: &Client, cfg: &GoogleConfig) -> AppResult<String> {
    require_client(cfg)?;
    let resp = token_request(
        http,
        &[
            ("client_id", cfg.client_id.as_str()),
            ("client_secret", cfg.client_secret.as_str()),
            ("refresh_token", cfg.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ],
    )?;
    Ok(resp.access_token)
}

/// Resolve a bearer token: environment, then a configured access token,
/// then a refresh-token grant.
pub fn access_token(http: &Client, cfg: &Config) -> AppResult<String> {
    if let Ok(token) = env::var(TOKEN_ENV)
        && !token.trim().is_empty()
    {
        return Ok(token.trim().to_string());
    }
    if !cfg.google.access_token.is_empty() {
        return Ok(cfg.google.access_token.clone());
    }
    if !cfg.google.refresh_token.is_empty() {
        return refresh_access_token(http, &cfg.google);
    }
    Err(AppError::Auth(
        "No Google credentials. Run `taxibook sync auth-url` and `taxibook sync auth-code <CODE>`."
            .into(),
    ))
}
