//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::AppSettings;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use walktalk::Trace;
use walktalk::doc::ApiDoc;
use walktalk::inbound::http::error::{json_error_handler, path_error_handler};
use walktalk::inbound::http::health::{HealthState, live, ready};
use walktalk::inbound::http::state::HttpState;
use walktalk::inbound::http::walks::{
    advance_walk, create_walk, get_walk, join_walk, list_walks,
};

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let api = web::scope("/api/v1")
        .service(list_walks)
        .service(create_walk)
        .service(get_walk)
        .service(join_walk)
        .service(advance_walk);

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live)
        .service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// Handler state, including the optional sample walk, is prepared before the
/// socket is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config).await;
    let bind_addr = config.bind_addr();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::Value;

    use super::*;

    async fn deps() -> AppDependencies {
        let config = ServerConfig::new(SocketAddr::from(([127, 0, 0, 1], 0)));
        AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: build_http_state(&config).await,
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn openapi_document_is_served() {
        let app = test::init_service(build_app(deps().await)).await;

        let doc: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api-docs/openapi.json")
                .to_request(),
        )
        .await;

        assert!(doc["paths"]["/api/v1/walks/{walk_id}/participants"].is_object());
    }

    #[rstest]
    #[case("/api/v1/walks", StatusCode::OK)]
    #[case("/health/live", StatusCode::OK)]
    #[case("/health/ready", StatusCode::SERVICE_UNAVAILABLE)]
    #[actix_web::test]
    async fn routes_are_mounted(#[case] uri: &str, #[case] status: StatusCode) {
        let app = test::init_service(build_app(deps().await)).await;

        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;

        assert_eq!(res.status(), status);
        assert!(res.headers().contains_key(walktalk::middleware::TRACE_ID_HEADER));
    }
}
