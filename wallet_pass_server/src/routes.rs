//! Request handler definitions
//!
//! Define each route and its handler here. Handlers that are more than a line or two MUST go into
//! a separate module. Keep this module neat and tidy 🙏
//!
//! Handlers await the pass store round trips, so worker threads are free to pick up other requests
//! while a save is in flight.

use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use serde_json::json;
use wallet_tools::{
    data_objects::Reservation,
    helpers::ticket_object_for_reservation,
    PassTransport,
    SaveLinkIssuer,
    WalletApi,
};

use crate::{config::IssuerOptions, errors::ServerError};

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

#[get("/")]
pub async fn index() -> impl Responder {
    trace!("💻️ Received index request");
    HttpResponse::Ok().body("Hello World")
}

// ----------------------------------------------   Wallet  ----------------------------------------------------
/// Route handler for the wallet endpoint
///
/// Accepts a reservation body, brings the remote pass object in line with it (creating the object
/// on first sight, replacing it otherwise) and responds with a signed save-to-wallet token plus
/// the deep link embedding it.
///
/// The upsert is deliberately best-effort: a transient pass-store failure is logged and the link
/// is issued anyway, since the pass may already exist from a prior call. A signing failure, in
/// contrast, is fatal and produces a 500.
pub async fn save_pass<T: PassTransport>(
    reservation: web::Json<Reservation>,
    api: web::Data<WalletApi<T>>,
    signer: web::Data<SaveLinkIssuer>,
    options: web::Data<IssuerOptions>,
) -> Result<HttpResponse, ServerError> {
    let reservation = reservation.into_inner();
    debug!("💻️ Save request for reservation {}", reservation.confirmation_number);
    let new_object = ticket_object_for_reservation(&options.issuer_id, &reservation.id, &reservation);
    let object_id = api.upsert_object(&options.issuer_id, &reservation.id, &new_object, &reservation).await;
    info!("💻️ Ticket object ready: {object_id}");
    let link = signer.issue_for_existing_passes(&options.issuer_id, &reservation.id, &reservation.airport_code)?;
    trace!("💻️ Issued save link for {object_id}");
    Ok(HttpResponse::Ok().json(json!({ "token": link.token(), "saveUrl": link.url() })))
}
