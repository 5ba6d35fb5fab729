//! The web form: routes, handlers and template rendering.
//!
//! `POST /result` validates the form, scores it, then stores it. A storage
//! failure never hides the estimate; the page shows it together with a
//! "database unreachable" notice.

use crate::settings::AppSettings;
use crate::storage::UserStore;
use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use bodyfat::model::InferenceModel;
use bodyfat::serving::{validate, ScoringContext, Submission, MEASUREMENT_FIELDS};
use minijinja::{context, Environment};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

/// Shown when a submission could not be stored.
pub const DB_UNREACHABLE: &str = "We are sorry. There was a problem accessing the database, \
     so your measurements were not saved. Please try again later.";

const SCORING_FAILED: &str = "We are sorry. Your estimate could not be computed.";

/// The compiled page templates.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("index.html", include_str!("../templates/index.html"))?;
        env.add_template("error.html", include_str!("../templates/error.html"))?;
        Ok(Self { env })
    }

    pub fn render(&self, name: &str, ctx: minijinja::Value) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }
}

#[derive(Serialize)]
struct FieldView {
    key: &'static str,
    label: String,
}

fn form_fields() -> Vec<FieldView> {
    MEASUREMENT_FIELDS
        .iter()
        .map(|(key, column)| {
            let unit = match *key {
                "age" => "years",
                "weight" => "lbs",
                "height" => "inches",
                _ => "cm",
            };
            FieldView {
                key,
                label: format!("{column} ({unit})"),
            }
        })
        .collect()
}

/// Shared, read-only request state.
#[derive(Clone)]
pub struct AppState {
    app_name: Arc<str>,
    scoring: Arc<ScoringContext>,
    store: Option<UserStore>,
    templates: Arc<Templates>,
}

impl AppState {
    /// `store` is `None` when the database could not be opened; the form
    /// keeps working without persistence.
    pub fn new(
        app_name: impl Into<String>,
        scoring: ScoringContext,
        store: Option<UserStore>,
    ) -> Result<Self> {
        let templates = Templates::new().context("failed to compile page templates")?;
        Ok(Self {
            app_name: Arc::from(app_name.into()),
            scoring: Arc::new(scoring),
            store,
            templates: Arc::new(templates),
        })
    }
}

fn render(state: &AppState, status: StatusCode, name: &str, ctx: minijinja::Value) -> Response {
    match state.templates.render(name, ctx) {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            error!("Failed to render {}: {}", name, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "template rendering failed").into_response()
        }
    }
}

fn error_page(state: &AppState, status: StatusCode, msg: &str) -> Response {
    render(
        state,
        status,
        "error.html",
        context! { app_name => &*state.app_name, msg => msg },
    )
}

/// `GET /`
pub async fn index(State(state): State<AppState>) -> Response {
    debug!("Index page accessed");
    render(
        &state,
        StatusCode::OK,
        "index.html",
        context! { app_name => &*state.app_name, fields => form_fields() },
    )
}

/// `POST /result`
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let submission = match validate(&form) {
        Ok(submission) => submission,
        Err(e) => {
            warn!("Rejected submission: {}", e);
            return error_page(&state, StatusCode::UNPROCESSABLE_ENTITY, &e.to_string());
        }
    };

    let estimate = match state.scoring.score(&submission.measurements) {
        Ok(estimate) => estimate,
        Err(e) => {
            error!("Failed to score submission: {}", e);
            return error_page(&state, StatusCode::INTERNAL_SERVER_ERROR, SCORING_FAILED);
        }
    };
    info!("The predicted body fat for the user is {}", estimate.prediction);

    let db_notice = persist(&state, submission).await.err();

    debug!("Result page accessed");
    render(
        &state,
        StatusCode::OK,
        "index.html",
        context! {
            app_name => &*state.app_name,
            fields => form_fields(),
            estimate => estimate,
            bucket_label => estimate.bucket.label(),
            db_notice => db_notice,
        },
    )
}

async fn persist(state: &AppState, submission: Submission) -> Result<i64, &'static str> {
    let Some(store) = state.store.clone() else {
        warn!("No database connection; submission not stored");
        return Err(DB_UNREACHABLE);
    };
    let outcome = tokio::task::spawn_blocking(move || {
        store.add_user(&submission.name, &submission.measurements)
    })
    .await;
    match outcome {
        Ok(Ok(id)) => {
            info!("New user body measurement is added with id {}", id);
            Ok(id)
        }
        Ok(Err(e)) => {
            error!("Not able to add user input to the database: {}", e);
            Err(DB_UNREACHABLE)
        }
        Err(e) => {
            error!("Storage task failed: {}", e);
            Err(DB_UNREACHABLE)
        }
    }
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "app": &*state.app_name,
        "features": state.scoring.model().feature_names(),
        "database": state.store.is_some(),
    }))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/result", post(submit))
        .route("/health", get(health))
        .with_state(state)
}

/// Loads the artifacts, opens the database and serves until Ctrl+C.
///
/// Refuses to start if the scaler or model is missing, malformed or the two
/// disagree on features. An unreachable database only disables storage.
pub async fn serve(settings: &AppSettings) -> Result<()> {
    let scoring = ScoringContext::load(&settings.scaler_path, &settings.model_path)
        .context("failed to load the scaler and model")?;

    let store = match UserStore::open(&settings.database_path) {
        Ok(store) => match store.create_schema() {
            Ok(()) => Some(store),
            Err(e) => {
                error!("Failed to prepare the database: {}", e);
                None
            }
        },
        Err(e) => {
            error!("Submissions will not be stored: {}", e);
            None
        }
    };

    let state = AppState::new(settings.app_name.clone(), scoring, store)?;
    let addr = settings.bind_addr();
    let listener = TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
    }
}
