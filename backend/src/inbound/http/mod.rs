//! HTTP inbound adapter exposing REST endpoints.

pub mod collections;
pub mod error;
pub mod health;
mod links;
pub mod session;
pub mod snippets;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_web::web;

use crate::domain::Error;

/// Register every resource under one API scope.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    users::configure(cfg);
    snippets::configure(cfg);
    collections::configure(cfg);
}

/// JSON extractor configuration mapping deserialisation failures onto the
/// domain error shape instead of Actix's plain-text default.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _| Error::invalid_request(format!("invalid JSON body: {err}")).into())
}

/// Query extractor configuration with the same error shape.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _| {
        Error::invalid_request(format!("invalid query parameters: {err}")).into()
    })
}

/// Path extractor configuration: malformed ids are a 404, not a parse
/// error, since no resource can live at such a path.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|_, _| Error::not_found("resource not found").into())
}
