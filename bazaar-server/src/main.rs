#![warn(clippy::dbg_macro)]

use actix_cors::Cors;
use actix_web::middleware;
use actix_web::{App, HttpResponse, HttpServer, http::StatusCode, web};
use bazaar_catalog::Catalog;
use error::{BazaarError, IoErrorContext, RequestError, Result};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, time::Duration};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod image;
mod items;
mod root;
mod search;

/// Body of every non-item response.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Message {
    pub(crate) message: String,
}

impl Message {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug)]
struct ServerError {
    err: BazaarError,
}

impl Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.err)
    }
}

impl ServerError {
    /// Message shown to the caller. Internal failures are not described.
    fn public_message(&self) -> String {
        use bazaar_catalog::Error as CatalogError;
        match &self.err {
            BazaarError::Catalog(CatalogError::Validation(reason)) => reason.clone(),
            BazaarError::Catalog(CatalogError::InvalidPath(_)) => {
                format!(
                    "Image path does not end with {}",
                    bazaar_catalog::IMAGE_EXTENSION
                )
            }
            BazaarError::Catalog(CatalogError::NotFound(_)) => "Item not found".to_string(),
            BazaarError::Request(RequestError::InvalidItemId(_)) => "Invalid item ID".to_string(),
            BazaarError::Request(RequestError::Form { reason }) => reason.clone(),
            BazaarError::Request(RequestError::TooLarge { field, limit }) => {
                format!("{field} exceeds {limit} bytes")
            }
            BazaarError::Request(RequestError::Multipart(_)) => {
                "Invalid multipart form".to_string()
            }
            _ => "Internal server error".to_string(),
        }
    }
}

impl actix_web::error::ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        use bazaar_catalog::Error as CatalogError;
        match &self.err {
            BazaarError::Catalog(CatalogError::Validation(_)) => StatusCode::BAD_REQUEST,
            BazaarError::Catalog(CatalogError::InvalidPath(_)) => StatusCode::BAD_REQUEST,
            BazaarError::Catalog(CatalogError::NotFound(_)) => StatusCode::NOT_FOUND,
            BazaarError::Request(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self.err);
        } else {
            tracing::debug!("{}", self.err);
        }
        HttpResponse::build(status).json(Message::new(self.public_message()))
    }
}

impl From<BazaarError> for ServerError {
    fn from(err: BazaarError) -> ServerError {
        ServerError { err }
    }
}

impl From<bazaar_catalog::Error> for ServerError {
    fn from(err: bazaar_catalog::Error) -> ServerError {
        BazaarError::from(err).into()
    }
}

impl From<RequestError> for ServerError {
    fn from(err: RequestError) -> ServerError {
        BazaarError::from(err).into()
    }
}

impl From<actix_web::error::BlockingError> for ServerError {
    fn from(err: actix_web::error::BlockingError) -> ServerError {
        BazaarError::from(err).into()
    }
}

impl From<actix_multipart::MultipartError> for ServerError {
    fn from(err: actix_multipart::MultipartError) -> ServerError {
        BazaarError::from(RequestError::from(err)).into()
    }
}

type ServerResult = std::result::Result<HttpResponse, ServerError>;

/// Per-part size cap for add-item uploads.
#[derive(Debug, Clone, Copy)]
pub(crate) struct UploadLimit {
    pub(crate) max_bytes: usize,
}

pub(crate) fn routes(limit: UploadLimit) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(limit))
            .route("/", web::get().to(root::get))
            .route("/items", web::get().to(items::list))
            .route("/items", web::post().to(items::add))
            .route("/items/{item_id}", web::get().to(items::get))
            .route("/search", web::get().to(search::get))
            .route("/image/{filename}", web::get().to(image::get));
    }
}

fn cors(front_url: &str) -> Cors {
    Cors::default()
        .allowed_origin(front_url)
        .allowed_methods(vec!["GET", "PUT", "POST", "DELETE"])
}

async fn inner_main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = config::load()?;

    let catalog = Catalog::open(&config.catalog())?;
    let catalog = web::Data::new(catalog);
    let front_url = config.front_url.clone();
    let limit = UploadLimit {
        max_bytes: config.max_image_bytes,
    };

    tracing::info!("listening on {}", config.bind);
    HttpServer::new(move || {
        App::new()
            .wrap(cors(&front_url))
            .wrap(middleware::Logger::default())
            .app_data(catalog.clone())
            .configure(routes(limit))
    })
    // default is 5 seconds, which is too small for slow image uploads
    .client_request_timeout(Duration::from_secs(30))
    .workers(config.workers)
    .bind(config.bind.clone())
    .io_context("Failed to bind server")?
    .run()
    .await
    .io_context("Failed to start server")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    inner_main()
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))
}
