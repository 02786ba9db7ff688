// system-tests/tests/helpers/identity_stub.rs
// ============================================================================
// Module: Identity Stub
// Description: Minimal server-rendered identity application for system-tests.
// Purpose: Exercise registration and login flows over HTTP.
// Dependencies: axum, flowprobe-core, flowprobe-harness
// ============================================================================

//! ## Overview
//! An in-process identity application implementing the observed page
//! contract: registration and login forms carrying a per-session anti-forgery
//! token, cookie-backed sessions, password-policy validation re-rendered at
//! 200, and a personalized greeting once authenticated. State lives in one
//! in-memory map per instance, so each spawned instance is fully isolated.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use axum::Form;
use axum::Router;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header;
use axum::response::AppendHeaders;
use axum::response::Html;
use axum::routing::get;
use flowprobe_core::PasswordPolicy;
use flowprobe_core::html;
use flowprobe_harness::BootError;
use flowprobe_harness::EnvProfile;

/// Session cookie name issued by the stub.
pub const SESSION_COOKIE: &str = "fp.session";
/// Anti-forgery form field rendered into every form page.
const TOKEN_FIELD: &str = "__RequestVerificationToken";
/// Email form field name.
const EMAIL_FIELD: &str = "Input.Email";
/// Password form field name.
const PASSWORD_FIELD: &str = "Input.Password";
/// Password confirmation form field name.
const CONFIRM_PASSWORD_FIELD: &str = "Input.ConfirmPassword";

/// Per-session state: the anti-forgery token and the signed-in user.
#[derive(Default)]
struct Session {
    token: String,
    user: Option<String>,
}

/// In-memory application state for one stub instance.
#[derive(Default)]
struct StubState {
    users: HashMap<String, String>,
    sessions: HashMap<String, Session>,
}

type SharedState = Arc<Mutex<StubState>>;

/// Response shape shared by every stub handler.
type StubResponse = (StatusCode, AppendHeaders<Vec<(HeaderName, String)>>, Html<String>);

/// Builds a fresh identity application router with empty state.
pub fn identity_router() -> Router {
    let state: SharedState = Arc::new(Mutex::new(StubState::default()));
    Router::new()
        .route("/Identity/Account/Register", get(register_page).post(register_submit))
        .route("/Identity/Account/Login", get(login_page).post(login_submit))
        .with_state(state)
}

/// Boot function for the application factory; only `Testing` is supported.
pub fn boot_identity_app(profile: &EnvProfile) -> Result<Router, BootError> {
    if *profile == EnvProfile::Testing {
        Ok(identity_router())
    } else {
        Err(BootError::UnsupportedProfile {
            profile: profile.to_string(),
        })
    }
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

async fn register_page(State(state): State<SharedState>, headers: HeaderMap) -> StubResponse {
    let (token, cookies) = ensure_session(&state, &headers);
    (StatusCode::OK, AppendHeaders(cookies), Html(render_register_page(&token, &[])))
}

async fn login_page(State(state): State<SharedState>, headers: HeaderMap) -> StubResponse {
    let (token, cookies) = ensure_session(&state, &headers);
    (StatusCode::OK, AppendHeaders(cookies), Html(render_login_page(&token, &[])))
}

async fn register_submit(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> StubResponse {
    if !verify_token(&state, &headers, &form) {
        return token_rejection();
    }
    let email = form.get(EMAIL_FIELD).cloned().unwrap_or_default();
    let password = form.get(PASSWORD_FIELD).cloned().unwrap_or_default();
    let confirm = form.get(CONFIRM_PASSWORD_FIELD).cloned().unwrap_or_default();

    let mut errors: Vec<String> = Vec::new();
    if email.trim().is_empty() || !email.contains('@') {
        errors.push("The Email field is not a valid e-mail address.".to_string());
    }
    if confirm != password {
        errors.push("The password and confirmation password do not match.".to_string());
    }
    for violation in PasswordPolicy::default().violations(&password) {
        errors.push(violation.to_string());
    }

    let Ok(mut guard) = state.lock() else {
        return internal_error();
    };
    if errors.is_empty() && guard.users.contains_key(&email) {
        errors.push(format!("Username '{email}' is already taken."));
    }
    let session_id = cookie_value(&headers, SESSION_COOKIE).unwrap_or_default();
    let token =
        guard.sessions.get(&session_id).map(|session| session.token.clone()).unwrap_or_default();
    if !errors.is_empty() {
        return (StatusCode::OK, AppendHeaders(Vec::new()), Html(render_register_page(&token, &errors)));
    }
    guard.users.insert(email.clone(), password);
    if let Some(session) = guard.sessions.get_mut(&session_id) {
        session.user = Some(email.clone());
    }
    (StatusCode::OK, AppendHeaders(Vec::new()), Html(render_authenticated(&email)))
}

async fn login_submit(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> StubResponse {
    if !verify_token(&state, &headers, &form) {
        return token_rejection();
    }
    let email = form.get(EMAIL_FIELD).cloned().unwrap_or_default();
    let password = form.get(PASSWORD_FIELD).cloned().unwrap_or_default();

    let Ok(mut guard) = state.lock() else {
        return internal_error();
    };
    let session_id = cookie_value(&headers, SESSION_COOKIE).unwrap_or_default();
    let valid = guard.users.get(&email).is_some_and(|stored| *stored == password);
    if !valid {
        let token = guard
            .sessions
            .get(&session_id)
            .map(|session| session.token.clone())
            .unwrap_or_default();
        let errors = vec!["Invalid login attempt.".to_string()];
        return (StatusCode::OK, AppendHeaders(Vec::new()), Html(render_login_page(&token, &errors)));
    }
    if let Some(session) = guard.sessions.get_mut(&session_id) {
        session.user = Some(email.clone());
    }
    (StatusCode::OK, AppendHeaders(Vec::new()), Html(render_authenticated(&email)))
}

// ============================================================================
// SECTION: Sessions
// ============================================================================

/// Resolves the request session, creating one with a fresh token if needed.
fn ensure_session(
    state: &SharedState,
    headers: &HeaderMap,
) -> (String, Vec<(HeaderName, String)>) {
    let existing = cookie_value(headers, SESSION_COOKIE);
    let Ok(mut guard) = state.lock() else {
        return (String::new(), Vec::new());
    };
    if let Some(id) = existing {
        if let Some(session) = guard.sessions.get(&id) {
            return (session.token.clone(), Vec::new());
        }
    }
    let id = random_hex();
    let token = random_hex();
    guard.sessions.insert(
        id.clone(),
        Session {
            token: token.clone(),
            user: None,
        },
    );
    let cookie = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly");
    (token, vec![(header::SET_COOKIE, cookie)])
}

/// Returns true when the submitted token matches the session's token.
fn verify_token(state: &SharedState, headers: &HeaderMap, form: &HashMap<String, String>) -> bool {
    let Some(id) = cookie_value(headers, SESSION_COOKIE) else {
        return false;
    };
    let Some(submitted) = form.get(TOKEN_FIELD) else {
        return false;
    };
    let Ok(guard) = state.lock() else {
        return false;
    };
    guard.sessions.get(&id).is_some_and(|session| session.token == *submitted)
}

/// Reads one cookie value from the request headers.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

/// Returns a random 128-bit hex identifier.
fn random_hex() -> String {
    format!("{:032x}", rand::random::<u128>())
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Standard rejection for missing or mismatched anti-forgery tokens.
fn token_rejection() -> StubResponse {
    (
        StatusCode::BAD_REQUEST,
        AppendHeaders(Vec::new()),
        Html("anti-forgery validation failed".to_string()),
    )
}

/// Standard response when application state is unavailable.
fn internal_error() -> StubResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, AppendHeaders(Vec::new()), Html(String::new()))
}

/// Renders the registration page with optional validation errors.
fn render_register_page(token: &str, errors: &[String]) -> String {
    let summary = render_validation_summary(errors);
    format!(
        concat!(
            "<!DOCTYPE html><html><head><title>Register</title></head><body>",
            "<h1>Create a new account.</h1>",
            "{summary}",
            "<form method=\"post\" action=\"/Identity/Account/Register\">",
            "<input name=\"{email}\" type=\"email\" />",
            "<input name=\"{password}\" type=\"password\" />",
            "<input name=\"{confirm}\" type=\"password\" />",
            "<input name=\"{token_field}\" type=\"hidden\" value=\"{token}\" />",
            "<button type=\"submit\">Register</button>",
            "</form></body></html>",
        ),
        summary = summary,
        email = EMAIL_FIELD,
        password = PASSWORD_FIELD,
        confirm = CONFIRM_PASSWORD_FIELD,
        token_field = TOKEN_FIELD,
        token = html::escape(token),
    )
}

/// Renders the login page with optional validation errors.
fn render_login_page(token: &str, errors: &[String]) -> String {
    let summary = render_validation_summary(errors);
    format!(
        concat!(
            "<!DOCTYPE html><html><head><title>Log in</title></head><body>",
            "<h1>Use a local account to log in.</h1>",
            "{summary}",
            "<form method=\"post\" action=\"/Identity/Account/Login\">",
            "<input name=\"{email}\" type=\"email\" />",
            "<input name=\"{password}\" type=\"password\" />",
            "<input name=\"{token_field}\" type=\"hidden\" value=\"{token}\" />",
            "<button type=\"submit\">Log in</button>",
            "</form></body></html>",
        ),
        summary = summary,
        email = EMAIL_FIELD,
        password = PASSWORD_FIELD,
        token_field = TOKEN_FIELD,
        token = html::escape(token),
    )
}

/// Renders the validation summary list the way the target framework does.
fn render_validation_summary(errors: &[String]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|message| format!("<li>{}</li>", html::escape(message)))
        .collect();
    format!("<div class=\"validation-summary-errors\"><ul>{items}</ul></div>")
}

/// Renders the authenticated layout with the personalized greeting.
fn render_authenticated(email: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html><html><head><title>Home page</title></head><body>",
            "<nav><a href=\"/Identity/Account/Manage\">Hello {email}!</a></nav>",
            "<h1>Welcome</h1>",
            "</body></html>",
        ),
        email = html::escape(email),
    )
}
