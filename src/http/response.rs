//! Response rendering.
//!
//! # Responsibilities
//! - Redirect browsers to the repository (307)
//! - Render the go-import metadata page for the go tool
//! - Map rendering failures to 500 with the underlying cause
//!
//! # Design Decisions
//! - The page is rendered fully in memory before a response is built,
//!   so a failing template never produces a partial body
//! - No templating happens on the redirect path

use axum::body::Body;
use axum::http::header::{HeaderValue, CONTENT_TYPE, LOCATION};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::package::{Template, TemplateData, TemplateError};

/// How a request was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Redirect,
    Metadata,
    Error,
    NotFound,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Redirect => "redirect",
            Outcome::Metadata => "metadata",
            Outcome::Error => "error",
            Outcome::NotFound => "not_found",
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("url '{0}' is not a valid Location header")]
    InvalidLocation(String),
}

impl IntoResponse for RenderError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// Answer a resolved request.
///
/// Browsers (`tooling == false`) get a temporary redirect to `data.url`; the
/// go tool gets the rendered template as `text/html`.
pub fn render(
    template: &Template,
    data: &TemplateData<'_>,
    tooling: bool,
) -> Result<Response, RenderError> {
    if !tooling {
        return redirect(data.url);
    }

    let page = template.execute(data)?;
    let mut response = Response::new(Body::from(page));
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
    Ok(response)
}

fn redirect(url: &str) -> Result<Response, RenderError> {
    let location =
        HeaderValue::from_str(url).map_err(|_| RenderError::InvalidLocation(url.to_string()))?;
    let mut response = StatusCode::TEMPORARY_REDIRECT.into_response();
    response.headers_mut().insert(LOCATION, location);
    Ok(response)
}
