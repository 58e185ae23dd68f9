//! Wire representations for the event-ticket pass schema.
//!
//! These structs mirror the remote store's JSON contract, so everything is camelCase on the wire
//! and optional blocks are omitted entirely when unset. `EventTicketClass` and
//! `EventTicketObject` carry a flattened `extra` map so that fields this client does not model
//! survive a fetch-mutate-replace round trip.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Builds the composite `{issuer_id}.{suffix}` identifier. Composite ids are opaque, stable
/// idempotency keys; re-issuing a create with the same id must not duplicate the pass.
pub fn pass_id(issuer_id: &str, suffix: &str) -> String {
    format!("{issuer_id}.{suffix}")
}

/// Review status of a pass class. Only `Draft` and `UnderReview` permit mutation, so every update
/// forces the status back to `UnderReview` before writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    Draft,
    UnderReview,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn allows_update(&self) -> bool {
        matches!(self, ReviewStatus::Draft | ReviewStatus::UnderReview)
    }
}

/// Lifecycle state of an issued pass object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PassState {
    Active,
    Completed,
    Expired,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedString {
    pub language: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedString {
    pub default_value: TranslatedString,
}

impl LocalizedString {
    /// An `en-US` localized string, the only locale this issuer emits.
    pub fn en<S: Into<String>>(value: S) -> Self {
        Self { default_value: TranslatedString { language: "en-US".to_string(), value: value.into() } }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barcode {
    #[serde(rename = "type")]
    pub barcode_type: String,
    pub value: String,
}

impl Barcode {
    pub fn qr<S: Into<String>>(value: S) -> Self {
        Self { barcode_type: "QR_CODE".to_string(), value: value.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uri {
    pub uri: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinksModuleData {
    pub uris: Vec<Uri>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextModule {
    pub header: String,
    pub body: String,
    pub id: String,
}

/// Seat layout display block. Note that this issuer bends the schema: `section` carries a parking
/// category and `row`/`seat` carry entry and exit times. That shape is the external contract the
/// wallet renders, not a seating model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<LocalizedString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<LocalizedString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat: Option<LocalizedString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate: Option<LocalizedString>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationInfo {
    pub confirmation_code: String,
}

/// A header/body announcement attached to a pass class. The append-message operation adds these
/// one at a time and never deduplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub header: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUri {
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub source_uri: ImageUri,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_description: Option<LocalizedString>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageModule {
    pub main_image: Image,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLongPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Template shared by many pass instances, identified by `{issuerId}.{classSuffix}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTicketClass {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    pub event_name: LocalizedString,
    pub issuer_name: String,
    pub review_status: ReviewStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage_uri: Option<Uri>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventTicketClass {
    /// The minimal valid class record used when the class does not exist yet. New classes always
    /// start out under review.
    pub fn minimal(issuer_id: &str, class_suffix: &str) -> Self {
        let id = pass_id(issuer_id, class_suffix);
        Self {
            event_id: Some(id.clone()),
            event_name: LocalizedString::en("Event name"),
            id,
            issuer_name: "Issuer name".to_string(),
            review_status: ReviewStatus::UnderReview,
            homepage_uri: None,
            messages: None,
            extra: Map::new(),
        }
    }
}

/// One issued instance of a pass class, identified by `{issuerId}.{objectSuffix}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTicketObject {
    pub id: String,
    pub class_id: String,
    pub state: PassState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<Barcode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_modules_data: Option<Vec<TextModule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat_info: Option<SeatInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_info: Option<ReservationInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links_module_data: Option<LinksModuleData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<Image>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_modules_data: Option<Vec<ImageModule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<LatLongPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_holder_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_number: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventTicketObject {
    pub fn new(id: String, class_id: String) -> Self {
        Self {
            id,
            class_id,
            state: PassState::Active,
            barcode: None,
            text_modules_data: None,
            seat_info: None,
            reservation_info: None,
            links_module_data: None,
            hero_image: None,
            image_modules_data: None,
            locations: None,
            ticket_holder_name: None,
            ticket_number: None,
            extra: Map::new(),
        }
    }
}

/// A reference to a pass that already exists on the remote store. This is the entire payload entry
/// for existing-pass save links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassRef {
    pub id: String,
    pub class_id: String,
}

/// The reservation shape the upstream booking system posts to `/wallet`. Only used to populate
/// pass display fields; never persisted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub confirmation_number: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub parking_type: ParkingType,
    /// Doubles as the pass class suffix, so every airport gets its own class.
    pub airport_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingType {
    pub name: String,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn deserialize_reservation() {
        let reservation = include_str!("./test_assets/reservation.json");
        let reservation: Reservation = serde_json::from_str(reservation).unwrap();
        assert_eq!(reservation.id, "res_81734");
        assert_eq!(reservation.confirmation_number, "CNF-81734");
        assert_eq!(reservation.airport_code, "JFK");
        assert_eq!(reservation.parking_type.name, "Covered Self-Park");
        assert_eq!(reservation.start_date.to_rfc3339(), "2024-01-01T13:30:00+00:00");
    }

    #[test]
    fn minimal_class_matches_the_create_contract() {
        let class = EventTicketClass::minimal("3388000000022193134", "JFK");
        let json = serde_json::to_value(&class).unwrap();
        assert_eq!(json["id"], "3388000000022193134.JFK");
        assert_eq!(json["eventId"], "3388000000022193134.JFK");
        assert_eq!(json["reviewStatus"], "UNDER_REVIEW");
        assert_eq!(json["eventName"]["defaultValue"]["language"], "en-US");
        assert!(json.get("homepageUri").is_none());
    }

    #[test]
    fn unmodelled_class_fields_survive_a_round_trip() {
        let raw = serde_json::json!({
            "id": "123.JFK",
            "eventName": { "defaultValue": { "language": "en-US", "value": "Event name" } },
            "issuerName": "Issuer name",
            "reviewStatus": "APPROVED",
            "countryCode": "US",
            "hexBackgroundColor": "#1a73e8",
        });
        let class: EventTicketClass = serde_json::from_value(raw).unwrap();
        assert_eq!(class.review_status, ReviewStatus::Approved);
        assert!(!class.review_status.allows_update());
        let json = serde_json::to_value(&class).unwrap();
        assert_eq!(json["countryCode"], "US");
        assert_eq!(json["hexBackgroundColor"], "#1a73e8");
    }

    #[test]
    fn optional_object_blocks_are_omitted_on_the_wire() {
        let object = EventTicketObject::new("123.obj".into(), "123.JFK".into());
        let json = serde_json::to_value(&object).unwrap();
        assert_eq!(json["state"], "ACTIVE");
        assert!(json.get("seatInfo").is_none());
        assert!(json.get("linksModuleData").is_none());
        assert!(json.get("barcode").is_none());
    }
}
