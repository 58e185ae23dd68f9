mod api;
mod config;
mod error;
mod save_link;
mod transport;

pub mod data_objects;
pub mod helpers;

pub use api::WalletApi;
pub use config::{ServiceAccountKey, WalletConfig, DEFAULT_BASE_URL, DEFAULT_SAVE_URL};
pub use error::WalletApiError;
pub use save_link::{SaveClaims, SaveLink, SaveLinkIssuer, SavePayload, TicketToSave, SAVE_AUDIENCE, SAVE_TOKEN_TYPE};
pub use transport::{HttpTransport, PassTransport};
