use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    config,
    server::{self, auth_router},
    types::{PkceToken, Token},
    utils, warning,
};

/// How long [`auth`] waits for the browser to hit the callback.
const AUTH_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

impl From<TokenResponse> for Token {
    fn from(response: TokenResponse) -> Self {
        Token {
            access_token: response.access_token,
            refresh_token: response.refresh_token.unwrap_or_default(),
            scope: response.scope.unwrap_or_default(),
            expires_in: response.expires_in,
            obtained_at: Utc::now().timestamp() as u64,
        }
    }
}

/// Runs the OAuth 2.0 PKCE flow against Spotify and returns the token.
///
/// Starts the local callback server, sends the user to the authorization
/// page and polls `shared_state` until the callback stored a token or
/// [`AUTH_TIMEOUT`] passes. The caller decides whether to persist it.
pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Result<Token, String> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    // verifier must be in place before the browser can come back
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier,
            token: None,
        });
    }

    let router = auth_router(Arc::clone(&shared_state));
    let server = tokio::spawn(async move {
        if let Err(e) = server::serve(router).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    let auth_url = authorize_url(&code_challenge);
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let token = wait_for_token(shared_state, AUTH_TIMEOUT).await;
    server.abort();

    token.ok_or_else(|| "Authentication failed or timed out.".to_string())
}

/// Authorization page url for a PKCE challenge.
pub fn authorize_url(code_challenge: &str) -> String {
    format!(
        "{spotify_auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&code_challenge={code_challenge}&code_challenge_method=S256&scope={scope}",
        spotify_auth_url = &config::spotify_apiauth_url(),
        client_id = &config::spotify_client_id(),
        redirect_uri = &config::spotify_redirect_uri(),
        code_challenge = code_challenge,
        scope = &config::spotify_scope()
    )
}

/// Polls the shared state once a second until the callback handler stored
/// a token or `max_wait` elapsed.
pub async fn wait_for_token(
    shared_state: Arc<Mutex<Option<PkceToken>>>,
    max_wait: Duration,
) -> Option<Token> {
    let start = tokio::time::Instant::now();

    while start.elapsed() < max_wait {
        {
            let lock = shared_state.lock().await;
            if let Some(token) = lock.as_ref().and_then(|p| p.token.as_ref()) {
                return Some(token.clone());
            }
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Trades a refresh token for a fresh access token.
///
/// Spotify may or may not rotate the refresh token; when it does not, the
/// returned token carries an empty `refresh_token` and the caller keeps the
/// old one.
pub async fn refresh_token(refresh_token: &str) -> Result<Token, String> {
    let client = Client::new();
    let res = client
        .post(&config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", &config::spotify_client_id()),
        ])
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !res.status().is_success() {
        return Err(format!("Token refresh rejected with HTTP {}", res.status()));
    }

    let response: TokenResponse = res.json().await.map_err(|e| e.to_string())?;
    Ok(response.into())
}

/// Exchanges the authorization code from the callback, proving possession
/// of the PKCE verifier.
pub async fn exchange_code_pkce(code: &str, verifier: &str) -> Result<Token, String> {
    let client_id = &config::spotify_client_id();
    let redirect_uri = &config::spotify_redirect_uri();

    let client = Client::new();
    let res = client
        .post(&config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri),
        ])
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !res.status().is_success() {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        return Err(format!("Code exchange rejected with HTTP {}: {}", status, body));
    }

    let response: TokenResponse = res.json().await.map_err(|e| e.to_string())?;
    Ok(response.into())
}
