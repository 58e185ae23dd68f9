//! The pass repository client.
//!
//! Every public operation here keeps a non-throwing contract: it returns the best-effort composite
//! id even when the underlying call failed. A NotFound lookup is a normal outcome that drives the
//! create-vs-update branch; any other failure is logged and swallowed at the operation boundary so
//! that link issuance is never blocked by a transient remote error. Callers that need to observe
//! write failures should use the lower-level `get_*` operations and the transport directly.

use log::*;
use reqwest::Method;
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    config::WalletConfig,
    data_objects::{pass_id, EventTicketClass, EventTicketObject, Reservation, ReviewStatus, Uri},
    helpers::ticket_object_for_reservation,
    transport::{HttpTransport, PassTransport},
    WalletApiError,
};

#[derive(Clone)]
pub struct WalletApi<T = HttpTransport> {
    config: WalletConfig,
    transport: T,
}

impl WalletApi<HttpTransport> {
    pub fn new(config: WalletConfig) -> Result<Self, WalletApiError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self { config, transport })
    }
}

impl<T: PassTransport> WalletApi<T> {
    pub fn with_transport(config: WalletConfig, transport: T) -> Self {
        Self { config, transport }
    }

    fn class_url(&self) -> String {
        format!("{}/eventTicketClass", self.config.base_url)
    }

    fn object_url(&self) -> String {
        format!("{}/eventTicketObject", self.config.base_url)
    }

    async fn send<B: Serialize>(&self, method: Method, url: &str, body: Option<&B>) -> Result<Value, WalletApiError> {
        let body = match body {
            Some(b) => Some(serde_json::to_value(b).map_err(|e| WalletApiError::JsonError(e.to_string()))?),
            None => None,
        };
        self.transport.request(method, url, body).await
    }

    pub async fn get_class(&self, class_id: &str) -> Result<EventTicketClass, WalletApiError> {
        let url = format!("{}/{class_id}", self.class_url());
        let value = self.transport.request(Method::GET, &url, None).await?;
        serde_json::from_value(value).map_err(|e| WalletApiError::JsonError(e.to_string()))
    }

    pub async fn get_object(&self, object_id: &str) -> Result<EventTicketObject, WalletApiError> {
        let url = format!("{}/{object_id}", self.object_url());
        let value = self.transport.request(Method::GET, &url, None).await?;
        serde_json::from_value(value).map_err(|e| WalletApiError::JsonError(e.to_string()))
    }

    /// Looks the class up and creates a minimal record if the remote store does not know it yet.
    ///
    /// The already-exists branch intentionally performs no update, so repeat calls are
    /// side-effect free. Lookup failures other than NotFound are logged and the composite id is
    /// returned anyway, since the class may well exist from a prior run.
    pub async fn ensure_class(&self, issuer_id: &str, class_suffix: &str) -> String {
        let class_id = pass_id(issuer_id, class_suffix);
        match self.get_class(&class_id).await {
            Ok(_) => {
                info!("Class {class_id} already exists");
                return class_id;
            },
            Err(WalletApiError::NotFound(_)) => debug!("Class {class_id} not found, creating it"),
            Err(e) => {
                warn!("Unexpected error looking up class {class_id}. {e}");
                return class_id;
            },
        }
        let new_class = EventTicketClass::minimal(issuer_id, class_suffix);
        match self.send(Method::POST, &self.class_url(), Some(&new_class)).await {
            Ok(_) => info!("Created class {class_id}"),
            Err(e) => warn!("Could not create class {class_id}. {e}"),
        }
        class_id
    }

    /// Fetches the class and replaces it wholesale after applying `mutator` to the fetched
    /// representation. Mutating in place (rather than building a fresh record) means fields the
    /// mutator does not touch survive the round trip, including ones this client does not model.
    /// Mutation requires a non-approved state, so the review status is forced back to
    /// `UNDER_REVIEW` before the write.
    pub async fn replace_class<F>(&self, issuer_id: &str, class_suffix: &str, mutator: F) -> String
    where F: FnOnce(&mut EventTicketClass) {
        let class_id = pass_id(issuer_id, class_suffix);
        let mut class = match self.get_class(&class_id).await {
            Ok(class) => class,
            Err(WalletApiError::NotFound(_)) => {
                info!("Class {class_id} not found");
                return class_id;
            },
            Err(e) => {
                warn!("Unexpected error looking up class {class_id}. {e}");
                return class_id;
            },
        };
        mutator(&mut class);
        class.review_status = ReviewStatus::UnderReview;
        let url = format!("{}/{class_id}", self.class_url());
        match self.send(Method::PUT, &url, Some(&class)).await {
            Ok(_) => info!("Replaced class {class_id}"),
            Err(e) => warn!("Could not replace class {class_id}. {e}"),
        }
        class_id
    }

    /// Sends a partial update containing only the supplied fields. The preceding fetch confirms
    /// existence only; its result is not otherwise used.
    pub async fn patch_class(&self, issuer_id: &str, class_suffix: &str, partial: Value) -> String {
        let class_id = pass_id(issuer_id, class_suffix);
        match self.get_class(&class_id).await {
            Ok(_) => {},
            Err(WalletApiError::NotFound(_)) => {
                info!("Class {class_id} not found");
                return class_id;
            },
            Err(e) => {
                warn!("Unexpected error looking up class {class_id}. {e}");
                return class_id;
            },
        }
        let mut patch = partial;
        match patch.as_object_mut() {
            Some(fields) => {
                fields.insert("reviewStatus".to_string(), json!("UNDER_REVIEW"));
            },
            None => {
                warn!("Ignoring patch for class {class_id}: patch body must be a JSON object");
                return class_id;
            },
        }
        let url = format!("{}/{class_id}", self.class_url());
        match self.transport.request(Method::PATCH, &url, Some(patch)).await {
            Ok(_) => info!("Patched class {class_id}"),
            Err(e) => warn!("Could not patch class {class_id}. {e}"),
        }
        class_id
    }

    /// Appends one header/body message to the class via the dedicated sub-operation. Repeated
    /// calls append repeated entries; the remote store does not deduplicate and neither do we.
    pub async fn append_class_message(&self, issuer_id: &str, class_suffix: &str, header: &str, body: &str) -> String {
        let class_id = pass_id(issuer_id, class_suffix);
        match self.get_class(&class_id).await {
            Ok(_) => {},
            Err(WalletApiError::NotFound(_)) => {
                info!("Class {class_id} not found");
                return class_id;
            },
            Err(e) => {
                warn!("Unexpected error looking up class {class_id}. {e}");
                return class_id;
            },
        }
        let url = format!("{}/{class_id}/addMessage", self.class_url());
        let message = json!({ "message": { "header": header, "body": body } });
        match self.transport.request(Method::POST, &url, Some(message)).await {
            Ok(_) => info!("Added message to class {class_id}"),
            Err(e) => warn!("Could not add message to class {class_id}. {e}"),
        }
        class_id
    }

    /// Creates the object if it does not exist, or replaces it with data derived from
    /// `reservation` if it does. The update runs to completion before the id is returned; there is
    /// no detached work left behind.
    pub async fn upsert_object(
        &self,
        issuer_id: &str,
        object_suffix: &str,
        new_object: &EventTicketObject,
        reservation: &Reservation,
    ) -> String {
        let object_id = pass_id(issuer_id, object_suffix);
        match self.get_object(&object_id).await {
            Ok(_) => {
                debug!("Object {object_id} already exists, replacing it");
                return self.replace_object(issuer_id, object_suffix, reservation).await;
            },
            Err(WalletApiError::NotFound(_)) => debug!("Object {object_id} not found, creating it"),
            Err(e) => {
                warn!("Unexpected error looking up object {object_id}. {e}");
                return object_id;
            },
        }
        match self.send(Method::POST, &self.object_url(), Some(new_object)).await {
            Ok(_) => info!("Created object {object_id}"),
            Err(e) => warn!("Could not create object {object_id}. {e}"),
        }
        object_id
    }

    /// Replaces the object with a representation derived entirely from the reservation. A failed
    /// write surfaces as a typed error in the logs; the id is still returned per the non-throwing
    /// contract.
    pub async fn replace_object(&self, issuer_id: &str, object_suffix: &str, reservation: &Reservation) -> String {
        let object_id = pass_id(issuer_id, object_suffix);
        let updated = ticket_object_for_reservation(issuer_id, object_suffix, reservation);
        let url = format!("{}/{object_id}", self.object_url());
        match self.send(Method::PUT, &url, Some(&updated)).await {
            Ok(response) => debug!("Object update response: {response}"),
            Err(e) => warn!("Could not replace object {object_id}. {e}"),
        }
        object_id
    }

    /// Appends `new_link` to the object's link list and patches only that list. The list length
    /// after N calls with distinct links is N: no deduplication, no loss.
    pub async fn patch_object(&self, issuer_id: &str, object_suffix: &str, new_link: Uri) -> String {
        let object_id = pass_id(issuer_id, object_suffix);
        let object = match self.get_object(&object_id).await {
            Ok(object) => object,
            Err(WalletApiError::NotFound(_)) => {
                info!("Object {object_id} not found");
                return object_id;
            },
            Err(e) => {
                warn!("Unexpected error looking up object {object_id}. {e}");
                return object_id;
            },
        };
        let mut uris = object.links_module_data.map(|links| links.uris).unwrap_or_default();
        uris.push(new_link);
        let patch = json!({ "linksModuleData": { "uris": uris } });
        let url = format!("{}/{object_id}", self.object_url());
        match self.transport.request(Method::PATCH, &url, Some(patch)).await {
            Ok(_) => info!("Patched links for object {object_id}"),
            Err(e) => warn!("Could not patch object {object_id}. {e}"),
        }
        object_id
    }
}
