//! Static pages of the upload UI.

use axum::http::StatusCode;
use minijinja::{Environment, context};

use crate::error::Result;

const INDEX: &str = include_str!("templates/index.html");
const ERROR: &str = include_str!("templates/error.html");

fn environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.add_template("index.html", INDEX)?;
    env.add_template("error.html", ERROR)?;
    Ok(env)
}

/// The upload form.
pub fn index_page(max_upload_mb: usize) -> Result<String> {
    let env = environment()?;
    let html = env.get_template("index.html")?.render(context! {
        max_upload_mb => max_upload_mb,
        version => env!("CARGO_PKG_VERSION"),
    })?;
    Ok(html)
}

/// An error page with a link back to the form.
pub fn error_page(status: StatusCode, message: &str) -> Result<String> {
    let env = environment()?;
    let html = env.get_template("error.html")?.render(context! {
        status => status.as_u16(),
        reason => status.canonical_reason().unwrap_or(""),
        message => message,
    })?;
    Ok(html)
}
