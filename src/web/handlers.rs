//! HTTP request handlers

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Query, State,
    },
    response::{Html, Redirect},
    Form,
};

use super::error::WebError;
use super::state::AppState;
use super::templates::IndexPage;
use crate::domain::model::{FeatureVector, TrainingOutcome};
use crate::utils::error::{MlopsError, Result as MlopsResult};

pub const TRAINING_SUCCESS_MESSAGE: &str = "Training Successful...";
pub const TRAINING_FAILURE_MESSAGE: &str = "Training Failed...";
pub const PREDICTION_ERROR_MESSAGE: &str =
    "Something went wrong while predicting. Please check inputs and try again.";

/// First value of `key`; repeated keys are tolerated.
fn first_param(params: &[(String, String)], key: &str) -> Option<String> {
    params.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
}

pub async fn home(
    State(state): State<Arc<AppState>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Html<String>, WebError> {
    let params = match query {
        Ok(Query(params)) => params,
        Err(e) => {
            tracing::debug!("Ignoring unreadable query string: {}", e.body_text());
            Vec::new()
        }
    };

    let page = IndexPage {
        message: first_param(&params, "message"),
        prediction: first_param(&params, "prediction"),
        error_message: None,
    };
    Ok(Html(page.render(&state.templates)?))
}

fn home_with_message(message: &str) -> Redirect {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("message", message)
        .finish();
    Redirect::to(&format!("/?{}", query))
}

pub async fn train(State(state): State<Arc<AppState>>) -> Redirect {
    match state.launcher.launch().await {
        Ok(TrainingOutcome::Succeeded) => {
            tracing::info!("✅ Training finished successfully");
            home_with_message(TRAINING_SUCCESS_MESSAGE)
        }
        Ok(TrainingOutcome::Failed { exit_code, detail }) => {
            tracing::error!(exit_code = ?exit_code, detail = %detail, "❌ Training command failed");
            home_with_message(TRAINING_FAILURE_MESSAGE)
        }
        Err(e) => {
            tracing::error!(error = %e, "❌ Could not run training command");
            home_with_message(TRAINING_FAILURE_MESSAGE)
        }
    }
}

async fn run_prediction(
    state: &AppState,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> MlopsResult<String> {
    let Form(fields) = form.map_err(|e| MlopsError::InvalidInputError {
        field: "form".to_string(),
        reason: e.body_text(),
    })?;

    let features = FeatureVector::from_form(&fields)?;
    tracing::debug!("Prediction input: {:?}", features.values());

    let prediction = state.predictor.predict(&features.to_matrix()).await?;
    Ok(prediction.to_string())
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Html<String>, WebError> {
    let page = match run_prediction(&state, form).await {
        Ok(prediction) => IndexPage {
            prediction: Some(prediction),
            ..Default::default()
        },
        Err(e) => {
            tracing::warn!("The Exception message is: {}", e);
            IndexPage {
                error_message: Some(PREDICTION_ERROR_MESSAGE.to_string()),
                ..Default::default()
            }
        }
    };

    Ok(Html(page.render(&state.templates)?))
}
