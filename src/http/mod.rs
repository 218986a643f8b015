pub mod actor;
pub mod cache;
pub mod controllers;
pub mod error;
pub mod form_data;
pub mod render;
pub mod server;
pub mod util;

pub use actor::{Actor, SessionUser};
pub use error::Error;
pub use form_data::FormData;

/// Builds the [`actix_web::App`] serving yatube out of an [`App`](crate::App).
///
/// This is a macro because the type of a fully configured
/// `actix_web::App` cannot be written down.
macro_rules! http_app {
    ($app:expr) => {
        actix_web::App::new()
            .app_data(actix_web::web::Data::new($app))
            .wrap($crate::http::error::pages())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure($crate::http::controllers::configure)
            .default_service(actix_web::web::to($crate::http::controllers::not_found))
    };
}
pub(crate) use http_app;
