use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use wallet_tools::{HttpTransport, SaveLinkIssuer, ServiceAccountKey, WalletApi};

use crate::{
    config::{IssuerOptions, ServerConfig},
    errors::ServerError,
    routes,
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let credentials = ServiceAccountKey::from_file(&config.wallet.key_file_path)
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, credentials)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, credentials: ServiceAccountKey) -> Result<Server, ServerError> {
    let api = WalletApi::new(config.wallet.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let api = web::Data::new(api);
    // The signing key is parsed here, once, for the lifetime of the server. A bad key file stops
    // the server from starting rather than failing on the first request.
    let signer = SaveLinkIssuer::new(&credentials, config.origins.clone(), &config.wallet.save_url)
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let signer = web::Data::new(signer);
    let options = web::Data::new(IssuerOptions::from_config(&config));
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("wps::access_log"))
            .app_data(api.clone())
            .app_data(signer.clone())
            .app_data(options.clone())
            .service(routes::health)
            .service(routes::index)
            .route("/wallet", web::post().to(routes::save_pass::<HttpTransport>))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
