//! Static file request handling.
//!
//! # Responsibilities
//! - Map a request path onto the configured root directory
//! - Refuse anything that would escape the root (path-traversal guard)
//! - Serve directory index files, redirecting slash-less directory paths
//! - Pick the content type from the MIME table
//!
//! # Design Decisions
//! - Each file is read with a single async read; files are not streamed
//! - Traversal attempts are answered with 404, indistinguishable from a miss

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{ALLOW, CONTENT_LENGTH, CONTENT_TYPE, LOCATION},
        HeaderValue, Method, Request, Response, StatusCode, Uri,
    },
};
use percent_encoding::percent_decode_str;

use crate::config::StaticFilesConfig;
use crate::observability::metrics;
use crate::static_files::mime::MimeTable;

/// Everything needed to answer static file requests.
#[derive(Debug, Clone)]
pub struct StaticSite {
    root: PathBuf,
    index_file: String,
    mime: MimeTable,
}

impl StaticSite {
    pub fn new(config: &StaticFilesConfig) -> Self {
        Self {
            root: config.root.clone(),
            index_file: config.index_file.clone(),
            mime: MimeTable::with_overrides(&config.mime_types),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a request path below the root.
    ///
    /// Returns `None` for paths that are not valid UTF-8 once decoded or that
    /// contain a `..` segment or an encoded separator.
    pub fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let mut resolved = self.root.clone();
        for segment in request_path.split('/') {
            let decoded = percent_decode_str(segment).decode_utf8().ok()?;
            match &*decoded {
                "" | "." => continue,
                ".." => return None,
                s if s.contains('/') || s.contains('\\') || s.contains('\0') => return None,
                s => resolved.push(s),
            }
        }
        Some(resolved)
    }
}

/// Axum handler for the static listener.
///
/// The request body is never read; only the method and URI are kept.
pub async fn serve(State(site): State<Arc<StaticSite>>, request: Request<Body>) -> Response<Body> {
    let (parts, _) = request.into_parts();
    let response = match parts.method {
        Method::OPTIONS => status_only(StatusCode::OK),
        Method::GET | Method::HEAD => serve_path(&site, &parts.method, &parts.uri).await,
        _ => {
            let mut response = status_only(StatusCode::METHOD_NOT_ALLOWED);
            response
                .headers_mut()
                .insert(ALLOW, HeaderValue::from_static("GET, HEAD, OPTIONS"));
            response
        }
    };

    metrics::record_static(response.status().as_u16());
    response
}

async fn serve_path(site: &StaticSite, method: &Method, uri: &Uri) -> Response<Body> {
    let request_path = uri.path();

    let Some(mut path) = site.resolve(request_path) else {
        tracing::warn!(path = %request_path, "Rejected path outside static root");
        return status_only(StatusCode::NOT_FOUND);
    };

    let is_dir = match tokio::fs::metadata(&path).await {
        Ok(meta) => meta.is_dir(),
        Err(e) => return io_failure(request_path, e),
    };

    if is_dir {
        if !request_path.ends_with('/') {
            return redirect_to_slash(uri);
        }
        path.push(&site.index_file);
    }

    let contents = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => return io_failure(request_path, e),
    };

    tracing::debug!(path = %request_path, bytes = contents.len(), "Serving static file");

    let content_type = HeaderValue::from_str(site.mime.content_type(&path))
        .unwrap_or_else(|_| HeaderValue::from_static(super::mime::FALLBACK));
    let length = HeaderValue::from(contents.len());

    let body = if method == Method::HEAD {
        Body::empty()
    } else {
        Body::from(contents)
    };

    let mut response = Response::new(body);
    response.headers_mut().insert(CONTENT_TYPE, content_type);
    response.headers_mut().insert(CONTENT_LENGTH, length);
    response
}

fn redirect_to_slash(uri: &Uri) -> Response<Body> {
    let mut location = format!("{}/", uri.path());
    if let Some(query) = uri.query() {
        location.push('?');
        location.push_str(query);
    }

    let mut response = status_only(StatusCode::MOVED_PERMANENTLY);
    if let Ok(value) = HeaderValue::from_str(&location) {
        response.headers_mut().insert(LOCATION, value);
    }
    response
}

fn io_failure(request_path: &str, err: std::io::Error) -> Response<Body> {
    let status = match err.kind() {
        ErrorKind::NotFound | ErrorKind::NotADirectory => StatusCode::NOT_FOUND,
        ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
        _ => {
            tracing::error!(path = %request_path, error = %err, "Static file read failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    tracing::debug!(path = %request_path, status = %status, "Static file not served");
    status_only(status)
}

fn status_only(status: StatusCode) -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response
}
