use tracing::info;

use crate::errors::AppError;
use crate::gateway::ApiClient;
use crate::models::user::{AuthResponse, LoginRequest, RegisterRequest};
use crate::session::{Session, SessionStore};

pub async fn login(api: &ApiClient, request: &LoginRequest) -> Result<AuthResponse, AppError> {
    require(&request.email, "Email is required")?;
    require(&request.password, "Password is required")?;

    api.post("/auth/login", request).await.map_err(|e| match e {
        AppError::Network {
            status: Some(400 | 401),
            ..
        } => AppError::Validation("Invalid email or password".to_string()),
        e => e.context("Login failed"),
    })
}

pub async fn register(
    api: &ApiClient,
    request: &RegisterRequest,
) -> Result<AuthResponse, AppError> {
    require(&request.name, "Name is required")?;
    require(&request.email, "Email is required")?;
    require(&request.password, "Password is required")?;

    api.post("/auth/register", request).await.map_err(|e| match e {
        AppError::Network {
            status: Some(400),
            ..
        } => AppError::Validation("Registration rejected (is the email already in use?)".to_string()),
        e => e.context("Registration failed"),
    })
}

/// Logs in and persists the resulting session.
pub async fn login_and_store(
    api: &ApiClient,
    store: &mut SessionStore,
    request: &LoginRequest,
) -> Result<Session, AppError> {
    let auth = login(api, request).await?;
    info!("Logged in as {}", auth.user.email);
    let session = Session::from(auth);
    store.save(session.clone())?;
    Ok(session)
}

pub async fn register_and_store(
    api: &ApiClient,
    store: &mut SessionStore,
    request: &RegisterRequest,
) -> Result<Session, AppError> {
    let auth = register(api, request).await?;
    info!("Registered {}", auth.user.email);
    let session = Session::from(auth);
    store.save(session.clone())?;
    Ok(session)
}

fn require(value: &str, message: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}
