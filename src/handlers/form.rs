//! Input form handler

use axum::response::Html;

use crate::views;

pub async fn show() -> Html<String> {
    Html(views::render_form())
}
