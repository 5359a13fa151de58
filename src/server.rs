use crate::config::{Config, DetectorConfig};
use crate::detection::{annotate, BrailleDetector};
use crate::error::BrailleError;
use crate::preprocessing::StepTiming;
use crate::translator::{BrailleTranslator, CharMapping};
use crate::translators::{TranslatorInfo, TranslatorRegistry};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

const SUPPORTED_FORMATS: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/bmp",
    "image/webp",
    "image/tiff",
];

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub detector: Arc<BrailleDetector>,
    pub translators: Arc<TranslatorRegistry>,
    pub config: Arc<Config>,
}

/// Braille image response
#[derive(Serialize)]
pub struct BrailleResponse {
    pub text: String,
    pub braille: String,
    pub language: String,
    pub rows: usize,
    pub cells: usize,
    pub dots: usize,
    pub spacing: f32,
    /// Base64 PNG of the input with detected dots marked
    pub processed_image: String,
    pub processing_time_ms: u64,
    pub preprocessing: Vec<StepTiming>,
}

#[derive(Deserialize)]
pub struct TextToBrailleRequest {
    #[serde(default)]
    pub text: String,
    pub language: Option<String>,
}

#[derive(Serialize)]
pub struct TextToBrailleResponse {
    pub braille: String,
    pub detailed_mapping: Vec<CharMapping>,
}

#[derive(Deserialize)]
pub struct BrailleToTextRequest {
    #[serde(default)]
    pub braille: String,
    pub language: Option<String>,
}

#[derive(Serialize)]
pub struct BrailleToTextResponse {
    pub text: String,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Detector settings reported by /info
#[derive(Serialize)]
pub struct DetectorInfo {
    pub max_dimension: u32,
    pub min_dot_area: f32,
    pub max_dot_area: f32,
    pub circularity: f32,
    pub max_dots: usize,
}

impl From<&DetectorConfig> for DetectorInfo {
    fn from(config: &DetectorConfig) -> Self {
        Self {
            max_dimension: config.max_dimension,
            min_dot_area: config.min_dot_area,
            max_dot_area: config.max_dot_area,
            circularity: config.circularity,
            max_dots: config.max_dots,
        }
    }
}

/// Server info response
#[derive(Serialize)]
pub struct InfoResponse {
    pub version: String,
    pub supported_formats: Vec<String>,
    pub available_languages: Vec<TranslatorInfo>,
    pub default_language: String,
    pub max_file_size_bytes: usize,
    pub detector: DetectorInfo,
}

/// Run the HTTP server
pub async fn run(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState {
        detector: Arc::new(BrailleDetector::new(config.detector.clone())),
        translators: Arc::new(TranslatorRegistry::new(&config.default_language)),
        config: Arc::new(config),
    };

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, router(state)).await?;

    Ok(())
}

pub fn router(state: AppState) -> Router {
    let max_file_size = state.config.max_file_size;

    Router::new()
        .route("/braille", post(handle_braille_image))
        .route("/text-to-braille", post(handle_text_to_braille))
        .route("/braille-to-text", post(handle_braille_to_text))
        .route("/health", get(handle_health))
        .route("/info", get(handle_info))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                // multipart framing needs headroom over the raw file cap
                .layer(DefaultBodyLimit::max(max_file_size.saturating_add(64 * 1024))),
        )
        .with_state(state)
}

impl AppState {
    fn translator(&self, language: Option<&str>) -> Result<Arc<dyn BrailleTranslator>, BrailleError> {
        match language.filter(|l| !l.trim().is_empty()) {
            Some(name) => self
                .translators
                .get(name)
                .ok_or_else(|| BrailleError::UnsupportedLanguage(name.to_string())),
            None => self
                .translators
                .default()
                .ok_or_else(|| BrailleError::Internal("No default translator".to_string())),
        }
    }
}

/// Handle Braille image requests
async fn handle_braille_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<BrailleResponse>, BrailleError> {
    let start = Instant::now();

    let mut image_data: Option<Bytes> = None;
    let mut language: Option<String> = None;

    // Parse multipart form
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| BrailleError::InvalidRequest(format!("Failed to parse multipart: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "image" | "file" => {
                if let Some(mime) = field.content_type() {
                    if !SUPPORTED_FORMATS.contains(&mime) {
                        tracing::warn!("Received image with content type: {}", mime);
                    }
                }
                image_data = Some(field.bytes().await.map_err(|e| {
                    BrailleError::InvalidRequest(format!("Failed to read image data: {}", e))
                })?);
            }
            "language" => {
                language = Some(field.text().await.map_err(|e| {
                    BrailleError::InvalidRequest(format!("Invalid language: {}", e))
                })?);
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    let data = image_data
        .filter(|d| !d.is_empty())
        .ok_or(BrailleError::MissingFile)?;

    if data.len() > state.config.max_file_size {
        return Err(BrailleError::ImageTooLarge {
            size: data.len(),
            max: state.config.max_file_size,
        });
    }

    // Resolve the translator before spending time on the image
    let translator = state.translator(language.as_deref())?;

    let detector = state.detector.clone();
    let timeout_secs = state.config.timeout_secs;
    let job = tokio::task::spawn_blocking(move || {
        let detection = detector.detect_bytes(&data)?;
        let processed_image = annotate::encode_base64_png(&detection.diagnostic)?;
        Ok::<_, BrailleError>((detection, processed_image))
    });

    let (detection, processed_image) = tokio::time::timeout(Duration::from_secs(timeout_secs), job)
        .await
        .map_err(|_| {
            tracing::warn!(
                "Braille detection exceeded {}s, abandoning blocking job",
                timeout_secs
            );
            BrailleError::Timeout {
                seconds: timeout_secs,
            }
        })?
        .map_err(|e| BrailleError::Internal(format!("Detection task failed: {}", e)))?
        .inspect_err(|e| tracing::warn!("Braille detection failed: {}", e))?;

    let text = translator.braille_to_text(&detection.braille);
    let processing_time_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        "Braille decoded in {}ms (pipeline {}ms): {} dots, {} cells, {} rows",
        processing_time_ms,
        detection.processing_time_ms,
        detection.dots.len(),
        detection.layout.cell_count(),
        detection.layout.rows.len()
    );

    Ok(Json(BrailleResponse {
        text,
        rows: detection.layout.rows.len(),
        cells: detection.layout.cell_count(),
        dots: detection.dots.len(),
        spacing: detection.layout.spacing,
        braille: detection.braille,
        language: translator.name().to_string(),
        processed_image,
        processing_time_ms,
        preprocessing: detection.preprocessing,
    }))
}

/// Handle text to Braille conversion
async fn handle_text_to_braille(
    State(state): State<AppState>,
    Json(request): Json<TextToBrailleRequest>,
) -> Result<Json<TextToBrailleResponse>, BrailleError> {
    if request.text.is_empty() {
        return Err(BrailleError::InvalidRequest("No text provided".to_string()));
    }

    let translator = state.translator(request.language.as_deref())?;

    Ok(Json(TextToBrailleResponse {
        braille: translator.text_to_braille(&request.text),
        detailed_mapping: translator.detailed_mapping(&request.text),
    }))
}

/// Handle Braille to text conversion
async fn handle_braille_to_text(
    State(state): State<AppState>,
    Json(request): Json<BrailleToTextRequest>,
) -> Result<Json<BrailleToTextResponse>, BrailleError> {
    if request.braille.is_empty() {
        return Err(BrailleError::InvalidRequest("No Braille provided".to_string()));
    }

    let translator = state.translator(request.language.as_deref())?;

    Ok(Json(BrailleToTextResponse {
        text: translator.braille_to_text(&request.braille),
    }))
}

/// Handle health check requests
async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle info requests
async fn handle_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        supported_formats: SUPPORTED_FORMATS.iter().map(|s| s.to_string()).collect(),
        available_languages: state.translators.info(),
        default_language: state.translators.default_name().to_string(),
        max_file_size_bytes: state.config.max_file_size,
        detector: state.detector.config().into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    const BOUNDARY: &str = "braille-test-boundary";

    fn test_router() -> Router {
        router_with_timeout(30)
    }

    fn router_with_timeout(timeout_secs: u64) -> Router {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            default_language: "english".to_string(),
            max_file_size: 1024 * 1024,
            timeout_secs,
            detector: DetectorConfig::default(),
        };
        router(AppState {
            detector: Arc::new(BrailleDetector::new(config.detector.clone())),
            translators: Arc::new(TranslatorRegistry::new(&config.default_language)),
            config: Arc::new(config),
        })
    }

    fn multipart_body(image: &[u8], language: Option<&str>) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"page.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(image);
        body.extend_from_slice(b"\r\n");
        if let Some(language) = language {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"language\"\r\n\r\n{language}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        send_to(test_router(), request).await
    }

    async fn send_to(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_image(image: &[u8], language: Option<&str>) -> Request<Body> {
        Request::post("/braille")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(image, language)))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_info_lists_languages() {
        let (status, body) = send(Request::get("/info").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["default_language"], "english");
        assert_eq!(body["available_languages"].as_array().unwrap().len(), 2);
        assert_eq!(body["detector"]["max_dimension"], 1200);
    }

    #[tokio::test]
    async fn test_text_to_braille() {
        let (status, body) = send(post_json(
            "/text-to-braille",
            serde_json::json!({ "text": "ab c" }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["braille"], "⠁⠃⠀⠉");
        assert_eq!(body["detailed_mapping"][2]["original"], "space");
    }

    #[tokio::test]
    async fn test_text_to_braille_requires_text() {
        let (status, body) = send(post_json("/text-to-braille", serde_json::json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_braille_to_text_hindi() {
        let (status, body) = send(post_json(
            "/braille-to-text",
            serde_json::json!({ "braille": "⠅", "language": "hin" }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "क");
    }

    #[tokio::test]
    async fn test_unknown_language_rejected() {
        let (status, body) = send(post_json(
            "/braille-to-text",
            serde_json::json!({ "braille": "⠁", "language": "klingon" }),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "UNSUPPORTED_LANGUAGE");
    }

    #[tokio::test]
    async fn test_garbage_image_is_bad_request() {
        let (status, body) = send(post_image(b"not a png", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "UNREADABLE_IMAGE");
    }

    #[tokio::test]
    async fn test_blank_image_is_unprocessable() {
        let blank = image::DynamicImage::ImageLuma8(image::GrayImage::from_pixel(
            60,
            60,
            image::Luma([255]),
        ));
        let mut png = std::io::Cursor::new(Vec::new());
        blank.write_to(&mut png, image::ImageFormat::Png).unwrap();

        let (status, body) = send(post_image(png.get_ref(), Some("english"))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "INSUFFICIENT_DOTS");
    }

    #[tokio::test]
    async fn test_missing_image_field() {
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"language\"\r\n\r\nenglish\r\n--{BOUNDARY}--\r\n"
        );
        let request = Request::post("/braille")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "MISSING_FILE");
    }

    #[tokio::test]
    async fn test_slow_detection_times_out() {
        let page = image::DynamicImage::ImageLuma8(image::GrayImage::from_pixel(
            1200,
            1200,
            image::Luma([255]),
        ));
        let mut png = std::io::Cursor::new(Vec::new());
        page.write_to(&mut png, image::ImageFormat::Png).unwrap();

        let (status, body) = send_to(router_with_timeout(0), post_image(png.get_ref(), None)).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body["code"], "TIMEOUT");
    }
}
