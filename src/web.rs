use actix_web::{middleware, web, App, HttpRequest, HttpResponse, HttpServer, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;
use crate::error::SantaError;
use crate::parser::UploadedFile;
use crate::santa::build_secret_santa_csv;
use crate::validation::{EMPLOYEE_LABEL, PREVIOUS_LABEL};

pub const FILE_NAME_HEADER: &str = "X-File-Name";
const DEFAULT_UPLOAD_NAME: &str = "employees.csv";
const DOWNLOAD_NAME: &str = "secret-santa.csv";

/// A file sent inside a JSON body.
#[derive(Debug, Deserialize, Serialize)]
pub struct EncodedFile {
    pub name: String,
    pub content_base64: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SantaRequest {
    pub employees: EncodedFile,
    #[serde(default)]
    pub previous: Option<EncodedFile>,
}

/// Error body returned with every 400.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl EncodedFile {
    fn decode(&self, label: &str) -> Result<UploadedFile, SantaError> {
        let content = STANDARD
            .decode(self.content_base64.trim())
            .map_err(|_| SantaError::UnreadableFile {
                label: label.to_string(),
            })?;
        Ok(UploadedFile::new(self.name.clone(), content))
    }
}

fn csv_response(csv: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", DOWNLOAD_NAME),
        ))
        .body(csv)
}

fn error_response(err: &SantaError) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        message: err.to_string(),
    })
}

// Failures caught before the pipeline runs; the pipeline logs its own
fn reject(err: SantaError) -> HttpResponse {
    log::warn!("request rejected ({}): {}", err.kind(), err);
    error_response(&err)
}

fn draw(employees: &UploadedFile, previous: Option<&UploadedFile>) -> HttpResponse {
    match build_secret_santa_csv(employees, previous, &mut rand::thread_rng()) {
        Ok(csv) => csv_response(csv),
        Err(e) => error_response(&e),
    }
}

// Raw upload: body is the employee file, name comes from a header
async fn upload_employees(req: HttpRequest, body: web::Bytes) -> Result<HttpResponse> {
    if body.is_empty() {
        return Ok(reject(SantaError::MissingEmployeeFile));
    }

    let name = req
        .headers()
        .get(FILE_NAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(DEFAULT_UPLOAD_NAME);

    let employees = UploadedFile::new(name, body.to_vec());
    Ok(draw(&employees, None))
}

// JSON upload carrying both files
async fn upload_with_previous(req: web::Json<SantaRequest>) -> Result<HttpResponse> {
    let request = req.into_inner();

    let employees = match request.employees.decode(EMPLOYEE_LABEL) {
        Ok(file) if file.content.is_empty() => {
            return Ok(reject(SantaError::MissingEmployeeFile))
        }
        Ok(file) => file,
        Err(e) => return Ok(reject(e)),
    };
    let previous = match request.previous.as_ref().map(|f| f.decode(PREVIOUS_LABEL)).transpose() {
        Ok(previous) => previous,
        Err(e) => return Ok(reject(e)),
    };

    Ok(draw(&employees, previous.as_ref()))
}

async fn health() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({"status": "ok"})))
}

async fn index() -> Result<HttpResponse> {
    let html = include_str!("../templates/index.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

/// Body size caps. The JSON route carries up to two base64-encoded files,
/// each up to `limit` bytes before encoding.
pub fn json_body_limit(limit: usize) -> usize {
    let encoded = limit.div_ceil(3).saturating_mul(4);
    encoded.saturating_mul(2).saturating_add(1024)
}

pub fn body_limits(cfg: &mut web::ServiceConfig, limit: usize) {
    cfg.app_data(web::PayloadConfig::new(limit))
        .app_data(web::JsonConfig::default().limit(json_body_limit(limit)));
}

/// Route table, shared by the server and the endpoint tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/health", web::get().to(health))
        .route("/api/santa", web::post().to(upload_employees))
        .route("/api/santa/with-previous", web::post().to(upload_with_previous));
}

pub async fn start_server(config: ServerConfig) -> std::io::Result<()> {
    let limit = config.max_upload_bytes;
    log::info!(
        "listening on http://{}:{} (max upload {} bytes)",
        config.bind,
        config.port,
        limit
    );

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .configure(|cfg| body_limits(cfg, limit))
            .configure(configure)
    })
    .bind((config.bind.as_str(), config.port))?
    .run()
    .await
}
