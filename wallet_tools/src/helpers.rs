//! Reservation → pass display-field shaping.
//!
//! The wallet renders fixed slots, so the mapping here is part of the external contract: four text
//! modules for arrival/exit date and time, and a seat-info block whose `section` carries the
//! parking category while `row` and `seat` carry the entry and exit times. All timestamps are
//! rendered in UTC.

use chrono::{DateTime, Utc};

use crate::data_objects::{
    pass_id,
    Barcode,
    EventTicketObject,
    LocalizedString,
    Reservation,
    ReservationInfo,
    SeatInfo,
    TextModule,
};

/// `Monday, Jan 1, 2024`
pub fn long_date(dt: &DateTime<Utc>) -> String {
    dt.format("%A, %b %-d, %Y").to_string()
}

/// `01:30 PM`
pub fn short_time(dt: &DateTime<Utc>) -> String {
    dt.format("%I:%M %p").to_string()
}

/// `Jan 1 at 01:30 PM`
pub fn day_at_time(dt: &DateTime<Utc>) -> String {
    format!("{} at {}", dt.format("%b %-d"), dt.format("%I:%M %p"))
}

/// The four display fields every reservation pass carries. Ids are stable; values derive solely
/// from the reservation's start and end timestamps.
pub fn reservation_text_modules(reservation: &Reservation) -> Vec<TextModule> {
    vec![
        TextModule {
            header: "Arrival Date".to_string(),
            body: long_date(&reservation.start_date),
            id: "arrivalDate".to_string(),
        },
        TextModule {
            header: "Arrival Time".to_string(),
            body: short_time(&reservation.start_date),
            id: "arrivalTime".to_string(),
        },
        TextModule {
            header: "Exit Date".to_string(),
            body: long_date(&reservation.end_date),
            id: "exitDate".to_string(),
        },
        TextModule {
            header: "Exit Time".to_string(),
            body: short_time(&reservation.end_date),
            id: "exitTime".to_string(),
        },
    ]
}

pub fn reservation_seat_info(reservation: &Reservation) -> SeatInfo {
    SeatInfo {
        section: Some(LocalizedString::en(reservation.parking_type.name.clone())),
        row: Some(LocalizedString::en(day_at_time(&reservation.start_date))),
        seat: Some(LocalizedString::en(day_at_time(&reservation.end_date))),
        gate: None,
    }
}

/// The full object representation for a reservation. Used both for the initial create (via the
/// `/wallet` endpoint) and for every subsequent replace, so create and update stay in lockstep.
pub fn ticket_object_for_reservation(issuer_id: &str, object_suffix: &str, reservation: &Reservation) -> EventTicketObject {
    let id = pass_id(issuer_id, object_suffix);
    let class_id = pass_id(issuer_id, &reservation.airport_code);
    EventTicketObject {
        barcode: Some(Barcode::qr("QR code")),
        text_modules_data: Some(reservation_text_modules(reservation)),
        seat_info: Some(reservation_seat_info(reservation)),
        reservation_info: Some(ReservationInfo { confirmation_code: reservation.confirmation_number.clone() }),
        ..EventTicketObject::new(id, class_id)
    }
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;

    use super::*;
    use crate::data_objects::ParkingType;

    fn reservation() -> Reservation {
        Reservation {
            id: "res_81734".to_string(),
            confirmation_number: "CNF-81734".to_string(),
            start_date: Utc.with_ymd_and_hms(2024, 1, 1, 13, 30, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2024, 1, 5, 0, 5, 0).unwrap(),
            parking_type: ParkingType { name: "Covered Self-Park".to_string() },
            airport_code: "JFK".to_string(),
        }
    }

    #[test]
    fn date_and_time_formats() {
        let r = reservation();
        assert_eq!(long_date(&r.start_date), "Monday, Jan 1, 2024");
        assert_eq!(short_time(&r.start_date), "01:30 PM");
        assert_eq!(day_at_time(&r.start_date), "Jan 1 at 01:30 PM");
        // Midnight renders as 12 AM, not 00
        assert_eq!(short_time(&r.end_date), "12:05 AM");
        assert_eq!(long_date(&r.end_date), "Friday, Jan 5, 2024");
    }

    #[test]
    fn exactly_four_text_modules_with_stable_ids() {
        let modules = reservation_text_modules(&reservation());
        let ids = modules.iter().map(|m| m.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["arrivalDate", "arrivalTime", "exitDate", "exitTime"]);
        assert_eq!(modules[0].body, "Monday, Jan 1, 2024");
        assert_eq!(modules[1].body, "01:30 PM");
        assert_eq!(modules[2].body, "Friday, Jan 5, 2024");
        assert_eq!(modules[3].body, "12:05 AM");
    }

    #[test]
    fn seat_info_carries_category_and_times() {
        let seat_info = reservation_seat_info(&reservation());
        assert_eq!(seat_info.section.unwrap().default_value.value, "Covered Self-Park");
        assert_eq!(seat_info.row.unwrap().default_value.value, "Jan 1 at 01:30 PM");
        assert_eq!(seat_info.seat.unwrap().default_value.value, "Jan 5 at 12:05 AM");
        assert!(seat_info.gate.is_none());
    }

    #[test]
    fn ticket_object_is_fully_shaped() {
        let object = ticket_object_for_reservation("3388000000022193134", "res_81734", &reservation());
        assert_eq!(object.id, "3388000000022193134.res_81734");
        assert_eq!(object.class_id, "3388000000022193134.JFK");
        assert_eq!(object.reservation_info.unwrap().confirmation_code, "CNF-81734");
        assert_eq!(object.barcode.unwrap().barcode_type, "QR_CODE");
        assert_eq!(object.text_modules_data.unwrap().len(), 4);
    }
}
