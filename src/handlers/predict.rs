//! Prediction handlers

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    response::Html,
    Form, Json,
};
use uuid::Uuid;

use crate::models::{PredictResponse, RawTransactionForm, TransactionInput};
use crate::{views, AppError, AppResult, AppState};

/// Score a transaction posted from the HTML form.
///
/// Every failure renders the result page with only an error message.
pub async fn form(
    State(state): State<AppState>,
    payload: Result<Form<RawTransactionForm>, FormRejection>,
) -> Html<String> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("predict", %request_id, source = "form");

    span.in_scope(|| {
        let outcome = payload
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
            .and_then(|Form(raw)| TransactionInput::try_from(raw).map_err(AppError::from))
            .and_then(|input| score(&state, input));

        match outcome {
            Ok(result) => Html(views::render_result(&result)),
            Err(err) => {
                tracing::error!(error = %err.chain(), "Prediction failed");
                Html(views::render_error(&err.to_string()))
            }
        }
    })
}

/// Score a transaction posted as JSON
pub async fn json(
    State(state): State<AppState>,
    payload: Result<Json<TransactionInput>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("predict", %request_id, source = "api");

    span.in_scope(|| -> AppResult<Json<PredictResponse>> {
        let Json(input) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        score(&state, input).map(Json)
    })
}

fn score(state: &AppState, input: TransactionInput) -> AppResult<PredictResponse> {
    let prediction = state.engine.score(&input)?;

    tracing::info!(
        transaction_type = %input.transaction_type,
        step = input.step,
        prediction = prediction.prediction,
        confidence = prediction.confidence(),
        "Transaction scored"
    );

    Ok(PredictResponse::new(prediction, input))
}
