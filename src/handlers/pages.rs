use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};

// Redirect::to would reply 303; the dashboard clients expect a plain 302.
pub async fn home() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/forecast")])
}

pub async fn forecast_page() -> Html<&'static str> {
    Html(include_str!("../../assets/forecast.html"))
}

pub async fn data_page() -> Html<&'static str> {
    Html(include_str!("../../assets/data.html"))
}

pub async fn about_page() -> Html<&'static str> {
    Html(include_str!("../../assets/about.html"))
}
