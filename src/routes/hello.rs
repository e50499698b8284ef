use axum::http::StatusCode;

#[tracing::instrument(name = "Hello route handler", skip_all)]
pub async fn hello() -> (StatusCode, &'static str) {
    (StatusCode::OK, "hello")
}
