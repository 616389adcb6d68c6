use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: String,
}

/// Package version, with the git hash when the build had one.
pub fn version() -> String {
    match env!("GIT_HASH") {
        "" => env!("CARGO_PKG_VERSION").to_string(),
        hash => format!("{} ({hash})", env!("CARGO_PKG_VERSION")),
    }
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: version(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_ok_and_version() {
        let Json(body) = health().await;
        assert_eq!(body.status, "ok");
        assert!(body.version.starts_with(env!("CARGO_PKG_VERSION")));
    }
}
