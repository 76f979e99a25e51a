use axum::{http::Uri, response::Html};
use tracing::{info, warn};

use crate::error_handler::AppError;

const INDEX_HTML: &str = r#"<!doctype html>
<html>
  <head><meta charset="utf-8"><title>Revisor de Código con IA</title></head>
  <body>
    <h1>Revisor de Código con IA</h1>
    <p>Esta aplicación revisa automáticamente cambios de código en GitLab usando un modelo de lenguaje.</p>
    <p><a href="/health">Health Check</a></p>
    <p>Webhook endpoint: <code>POST /webhook</code></p>
  </body>
</html>
"#;

/// GET /
pub async fn root_route() -> Html<&'static str> {
    info!("index page requested");
    Html(INDEX_HTML)
}

/// Router fallback for unknown routes.
pub async fn not_found(uri: Uri) -> AppError {
    warn!(%uri, "route not found");
    AppError::NotFound
}
