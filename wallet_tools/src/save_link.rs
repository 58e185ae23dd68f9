//! The deep-link token issuer.
//!
//! A save link embeds a signed assertion naming the passes to create or attach. The claims shape
//! is fixed by the external verifier: issuer is the service-account email, audience is always
//! `google`, the type discriminator is `savetowallet`, and the payload carries the event-ticket
//! collections. Tokens are built, signed with the service account's RSA key (RS256) and discarded;
//! nothing here is persisted.

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    config::ServiceAccountKey,
    data_objects::{
        pass_id,
        Barcode,
        EventTicketClass,
        EventTicketObject,
        Image,
        ImageModule,
        ImageUri,
        LatLongPoint,
        LinksModuleData,
        LocalizedString,
        PassRef,
        SeatInfo,
        TextModule,
        Uri,
    },
    WalletApiError,
};

pub const SAVE_AUDIENCE: &str = "google";
pub const SAVE_TOKEN_TYPE: &str = "savetowallet";

/// The claims asserted by a save-to-wallet token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveClaims {
    pub iss: String,
    pub aud: String,
    pub origins: Vec<String>,
    pub typ: String,
    pub payload: SavePayload,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePayload {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event_ticket_classes: Vec<EventTicketClass>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event_ticket_objects: Vec<TicketToSave>,
}

/// Either a full inline definition (the pass is created when the user opens the link) or a
/// `{id, classId}` reference to a pass that already exists on the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TicketToSave {
    Definition(Box<EventTicketObject>),
    Reference(PassRef),
}

/// A signed token plus the wallet host needed to turn it into an "Add to Wallet" link.
#[derive(Debug, Clone)]
pub struct SaveLink {
    token: String,
    save_url: String,
}

impl SaveLink {
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The consumer-facing deep link: `<save_url>/<token>`.
    pub fn url(&self) -> String {
        format!("{}/{}", self.save_url, self.token)
    }
}

pub struct SaveLinkIssuer {
    client_email: String,
    encoding_key: EncodingKey,
    origins: Vec<String>,
    save_url: String,
}

impl std::fmt::Debug for SaveLinkIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveLinkIssuer")
            .field("client_email", &self.client_email)
            .field("origins", &self.origins)
            .field("save_url", &self.save_url)
            .finish_non_exhaustive()
    }
}

impl SaveLinkIssuer {
    /// The private key is parsed once here, so a malformed key fails loudly at startup instead of
    /// on the first issued link.
    pub fn new(credentials: &ServiceAccountKey, origins: Vec<String>, save_url: &str) -> Result<Self, WalletApiError> {
        let encoding_key = EncodingKey::from_rsa_pem(credentials.private_key.reveal().as_bytes())
            .map_err(|e| WalletApiError::Signing(format!("Invalid RSA private key: {e}")))?;
        Ok(Self {
            client_email: credentials.client_email.clone(),
            encoding_key,
            origins,
            save_url: save_url.to_string(),
        })
    }

    /// Signs an arbitrary payload. Signing failures are fatal to the issuing operation and
    /// propagate as typed errors; a save link is never built from anything but a real signature.
    pub fn sign(&self, payload: SavePayload) -> Result<SaveLink, WalletApiError> {
        let claims = SaveClaims {
            iss: self.client_email.clone(),
            aud: SAVE_AUDIENCE.to_string(),
            origins: self.origins.clone(),
            typ: SAVE_TOKEN_TYPE.to_string(),
            payload,
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|e| WalletApiError::Signing(e.to_string()))?;
        debug!("Signed save-to-wallet token as {}", self.client_email);
        Ok(SaveLink { token, save_url: self.save_url.clone() })
    }

    /// Issues a link whose payload carries complete class and object definitions. Neither has to
    /// exist remotely beforehand; both are created when the user saves the pass.
    pub fn issue_for_new_passes(
        &self,
        issuer_id: &str,
        class_suffix: &str,
        object_suffix: &str,
    ) -> Result<SaveLink, WalletApiError> {
        let new_class = EventTicketClass::minimal(issuer_id, class_suffix);
        let new_object = demo_ticket_object(issuer_id, class_suffix, object_suffix);
        let payload = SavePayload {
            event_ticket_classes: vec![new_class],
            event_ticket_objects: vec![TicketToSave::Definition(Box::new(new_object))],
        };
        self.sign(payload)
    }

    /// Issues a link that only references passes already present on the remote store.
    pub fn issue_for_existing_passes(
        &self,
        issuer_id: &str,
        object_suffix: &str,
        class_suffix: &str,
    ) -> Result<SaveLink, WalletApiError> {
        let payload = SavePayload {
            event_ticket_classes: vec![],
            event_ticket_objects: vec![TicketToSave::Reference(PassRef {
                id: pass_id(issuer_id, object_suffix),
                class_id: pass_id(issuer_id, class_suffix),
            })],
        };
        self.sign(payload)
    }
}

/// A fully-populated sample object exercising every display block the wallet renders. Used by the
/// new-passes link, which creates its passes inline.
fn demo_ticket_object(issuer_id: &str, class_suffix: &str, object_suffix: &str) -> EventTicketObject {
    EventTicketObject {
        hero_image: Some(Image {
            source_uri: ImageUri {
                uri: "https://farm4.staticflickr.com/3723/11177041115_6e6a3b6f49_o.jpg".to_string(),
            },
            content_description: Some(LocalizedString::en("Hero image description")),
        }),
        text_modules_data: Some(vec![TextModule {
            header: "Text module header".to_string(),
            body: "Text module body".to_string(),
            id: "TEXT_MODULE_ID".to_string(),
        }]),
        links_module_data: Some(LinksModuleData {
            uris: vec![
                Uri {
                    uri: "http://maps.google.com/".to_string(),
                    description: "Link module URI description".to_string(),
                    id: Some("LINK_MODULE_URI_ID".to_string()),
                },
                Uri {
                    uri: "tel:6505555555".to_string(),
                    description: "Link module tel description".to_string(),
                    id: Some("LINK_MODULE_TEL_ID".to_string()),
                },
            ],
        }),
        image_modules_data: Some(vec![ImageModule {
            main_image: Image {
                source_uri: ImageUri {
                    uri: "http://farm4.staticflickr.com/3738/12440799783_3dc3c20606_b.jpg".to_string(),
                },
                content_description: Some(LocalizedString::en("Image module description")),
            },
            id: "IMAGE_MODULE_ID".to_string(),
        }]),
        barcode: Some(Barcode::qr("QR code")),
        locations: Some(vec![LatLongPoint { latitude: 37.424015499999996, longitude: -122.09259560000001 }]),
        seat_info: Some(SeatInfo {
            seat: Some(LocalizedString::en("42")),
            section: Some(LocalizedString::en("5")),
            gate: Some(LocalizedString::en("A")),
            row: None,
        }),
        ticket_holder_name: Some("Ticket holder name".to_string()),
        ticket_number: Some("Ticket number".to_string()),
        ..EventTicketObject::new(pass_id(issuer_id, object_suffix), pass_id(issuer_id, class_suffix))
    }
}
