//! `POST /convert-all` handler.

use std::path::PathBuf;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::config::DirectoryDefaults;
use crate::core::{AppState, BatchResult};
use crate::utils::{ConverterError, SetupError, parse_request_format};
use super::error::ApiError;

/// Request body. Only `convertFormat` is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    pub directory: Option<String>,
    pub convert_format: Option<String>,
    pub output_directory: Option<String>,
    pub folder_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub success: bool,
    pub message: String,
    pub result: BatchResult,
}

/// Source and output directories for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDirectories {
    pub source: PathBuf,
    pub output: PathBuf,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Fills in missing request directories from `defaults`.
///
/// `folderName` is appended to whichever output directory wins. Never
/// touches the filesystem.
pub fn resolve_directories(
    req: &ConvertRequest,
    defaults: &DirectoryDefaults,
) -> Result<ResolvedDirectories, SetupError> {
    let source = match non_blank(&req.directory) {
        Some(dir) => PathBuf::from(dir),
        None => defaults
            .source
            .clone()
            .ok_or(SetupError::NoDefaultDirectory("pictures"))?,
    };

    let mut output = match non_blank(&req.output_directory) {
        Some(dir) => PathBuf::from(dir),
        None => defaults
            .output
            .clone()
            .ok_or(SetupError::NoDefaultDirectory("downloads"))?,
    };
    if let Some(folder) = non_blank(&req.folder_name) {
        output.push(folder);
    }

    Ok(ResolvedDirectories { source, output })
}

/// POST /convert-all
///
/// The format is validated before anything on disk is read, so a bad format
/// never touches the filesystem.
pub async fn convert_all(
    State(state): State<AppState>,
    payload: Result<Json<ConvertRequest>, JsonRejection>,
) -> Result<Json<ConvertResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    debug!("Received convert-all request: {:?}", req);

    let format = parse_request_format(req.convert_format.as_deref().unwrap_or_default())
        .map_err(ConverterError::from)?;
    let dirs = resolve_directories(&req, state.directories()).map_err(ConverterError::from)?;
    let policy = state.config().policy.policy_for(format);

    let result = state
        .processor()
        .run_directory(&dirs.source, &dirs.output, state.codec(), policy)
        .await?;

    Ok(Json(ConvertResponse {
        success: true,
        message: format!(
            "All images processed and saved to {}. {}",
            dirs.output.display(),
            result.summary()
        ),
        result,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;
    use crate::config::AppConfig;
    use crate::processing::codec::tests::MockCodec;
    use crate::server::create_router;

    fn defaults() -> DirectoryDefaults {
        DirectoryDefaults {
            source: Some(PathBuf::from("/home/u/Pictures")),
            output: Some(PathBuf::from("/home/u/Downloads/upload-images")),
        }
    }

    fn request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/convert-all")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn state(codec: Arc<MockCodec>) -> AppState {
        AppState::with_codec(AppConfig::default(), codec)
            .unwrap()
            .with_directories(defaults())
    }

    #[test]
    fn resolve_uses_defaults_when_absent() {
        let dirs = resolve_directories(&ConvertRequest::default(), &defaults()).unwrap();
        assert_eq!(dirs.source, PathBuf::from("/home/u/Pictures"));
        assert_eq!(dirs.output, PathBuf::from("/home/u/Downloads/upload-images"));
    }

    #[test]
    fn resolve_prefers_request_and_appends_folder() {
        let req = ConvertRequest {
            directory: Some("/data/in".into()),
            output_directory: Some("/data/out".into()),
            folder_name: Some("batch-1".into()),
            ..ConvertRequest::default()
        };
        let dirs = resolve_directories(&req, &defaults()).unwrap();
        assert_eq!(dirs.source, PathBuf::from("/data/in"));
        assert_eq!(dirs.output, PathBuf::from("/data/out/batch-1"));
    }

    #[test]
    fn resolve_appends_folder_to_default_output() {
        let req = ConvertRequest {
            folder_name: Some("mine".into()),
            output_directory: Some("  ".into()),
            ..ConvertRequest::default()
        };
        let dirs = resolve_directories(&req, &defaults()).unwrap();
        assert_eq!(dirs.output, PathBuf::from("/home/u/Downloads/upload-images/mine"));
    }

    #[test]
    fn resolve_fails_without_platform_default() {
        let err = resolve_directories(&ConvertRequest::default(), &DirectoryDefaults::default()).unwrap_err();
        assert!(matches!(err, SetupError::NoDefaultDirectory("pictures")));
    }

    #[tokio::test]
    async fn unsupported_format_is_400_and_touches_nothing() {
        let src = TempDir::new().unwrap();
        std::fs::write(src.path().join("a.jpg"), b"data").unwrap();
        let out = src.path().join("out");
        let codec = Arc::new(MockCodec::with_output_size(10));

        let response = create_router(state(codec.clone()))
            .oneshot(request(serde_json::json!({
                "directory": src.path(),
                "convertFormat": "bmp",
                "outputDirectory": out,
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("'bmp'"));
        assert!(message.contains("jpeg, png, webp, gif, avif"));
        assert!(codec.get_operations().is_empty());
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn missing_format_is_400() {
        let response = create_router(state(Arc::new(MockCodec::default())))
            .oneshot(request(serde_json::json!({ "directory": "/tmp" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let response = create_router(state(Arc::new(MockCodec::default())))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/convert-all")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error_code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn empty_directory_is_404_and_creates_no_output() {
        let src = TempDir::new().unwrap();
        let out = src.path().join("converted");

        let response = create_router(state(Arc::new(MockCodec::default())))
            .oneshot(request(serde_json::json!({
                "directory": src.path(),
                "convertFormat": "png",
                "outputDirectory": out,
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error_code"], "NO_FILES");
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn missing_directory_is_500_with_generic_message() {
        let tmp = TempDir::new().unwrap();

        let response = create_router(state(Arc::new(MockCodec::default())))
            .oneshot(request(serde_json::json!({
                "directory": tmp.path().join("nope"),
                "convertFormat": "webp",
                "outputDirectory": tmp.path().join("out"),
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "An error occurred while processing images.");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn converts_directory_in_two_groups() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        for i in 0..7 {
            std::fs::write(src.path().join(format!("img{i}.png")), b"data").unwrap();
        }
        let codec = Arc::new(MockCodec::with_output_size(10));

        let response = create_router(state(codec.clone()))
            .oneshot(request(serde_json::json!({
                "directory": src.path(),
                "convertFormat": "JPG",
                "outputDirectory": out.path(),
                "folderName": "converted",
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["result"]["totalFiles"], 7);
        assert_eq!(body["result"]["groups"], 2);
        assert_eq!(body["result"]["succeeded"], 7);
        assert_eq!(codec.converted_sources().len(), 7);
        assert!(out.path().join("converted").join("img0.jpeg").exists());
    }
}
