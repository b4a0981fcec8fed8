use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: u64,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
    email: Option<String>,
}

/// An authenticated session as handed back by the auth endpoint.
#[derive(Debug)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub email: Option<String>,
}

fn auth_url(base_url: &str, path: &str) -> String {
    format!("{}/auth/v1/{}", base_url.trim_end_matches('/'), path)
}

fn session_from_token_response(token: TokenResponse) -> AuthSession {
    // Expire a little early so a token is never presented right at the edge
    let expires_at = Utc::now() + Duration::seconds(token.expires_in as i64 - 120);
    AuthSession {
        access_token: token.access_token,
        refresh_token: token.refresh_token,
        expires_at,
        user_id: token.user.id,
        email: token.user.email,
    }
}

/// Password sign-in against the auth endpoint.
pub async fn sign_in(
    client: &Client,
    base_url: &str,
    anon_key: &str,
    email: &str,
    password: &str,
) -> Result<AuthSession> {
    let payload = serde_json::json!({
        "email": email,
        "password": password,
    });

    let response = client
        .post(auth_url(base_url, "token"))
        .query(&[("grant_type", "password")])
        .json(&payload)
        .header("apikey", anon_key)
        .header("Content-Type", "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(anyhow!("Sign-in failed: {} - {}", status, error_text));
    }

    let token: TokenResponse = response.json().await?;
    Ok(session_from_token_response(token))
}

/// Register a new account. Projects requiring email confirmation return no
/// session yet; that surfaces as `Ok(None)`.
pub async fn sign_up(
    client: &Client,
    base_url: &str,
    anon_key: &str,
    email: &str,
    password: &str,
) -> Result<Option<AuthSession>> {
    let payload = serde_json::json!({
        "email": email,
        "password": password,
    });

    let response = client
        .post(auth_url(base_url, "signup"))
        .json(&payload)
        .header("apikey", anon_key)
        .header("Content-Type", "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(anyhow!("Sign-up failed: {} - {}", status, error_text));
    }

    let body: serde_json::Value = response.json().await?;
    if body.get("access_token").is_some() {
        let token: TokenResponse = serde_json::from_value(body)?;
        Ok(Some(session_from_token_response(token)))
    } else {
        Ok(None)
    }
}
