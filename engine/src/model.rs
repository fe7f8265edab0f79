//! Domain entities: reservations, vehicles, customers.
//!
//! Amounts are integer minor currency units. Identifiers are
//! human-readable strings; booking and customer ids are assigned by the
//! allocator, vehicle ids are the fleet's own registration codes.

use crate::interval::DateInterval;
use crate::{CustomerId, ReservationId, VehicleId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reservation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReservationStatus {
    /// Booked but not yet confirmed or picked up.
    Pending,
    /// Confirmed; the vehicle is out or committed.
    Active,
    /// Vehicle handed back. Terminal.
    Returned,
    /// Called off before return. Terminal.
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Active => "Active",
            Self::Returned => "Returned",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(Self::Pending),
            "Active" => Some(Self::Active),
            "Returned" => Some(Self::Returned),
            "Cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Whether a reservation in this status occupies its vehicle for
    /// conflict purposes.
    pub fn occupies_vehicle(&self) -> bool {
        matches!(self, Self::Pending | Self::Active)
    }

    /// Whether this status permits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Returned | Self::Cancelled)
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Initial status a caller may request at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InitialStatus {
    #[default]
    Pending,
    Active,
}

impl From<InitialStatus> for ReservationStatus {
    fn from(initial: InitialStatus) -> Self {
        match initial {
            InitialStatus::Pending => ReservationStatus::Pending,
            InitialStatus::Active => ReservationStatus::Active,
        }
    }
}

/// A booking of one vehicle for one customer over a rental period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    /// Allocator-assigned identifier, e.g. `BK-20240610-001`.
    pub id: ReservationId,
    pub vehicle_id: VehicleId,
    pub customer_id: CustomerId,
    /// Inclusive rental period.
    pub period: DateInterval,
    pub status: ReservationStatus,
    /// Amount collected up front, minor units.
    pub advance_amount: i64,
    /// Final amount; unset until the rental is settled.
    pub total_amount: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn new(
        id: impl Into<ReservationId>,
        draft: &ReservationDraft,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            vehicle_id: draft.vehicle_id.clone(),
            customer_id: draft.customer_id.clone(),
            period: draft.period,
            status: draft.status.into(),
            advance_amount: draft.advance_amount,
            total_amount: draft.total_amount,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a reservation; the id is allocator-assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDraft {
    pub vehicle_id: VehicleId,
    pub customer_id: CustomerId,
    pub period: DateInterval,
    #[serde(default)]
    pub status: InitialStatus,
    #[serde(default)]
    pub advance_amount: i64,
    #[serde(default)]
    pub total_amount: Option<i64>,
}

/// Field-wise update for a reservation. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReservationPatch {
    pub vehicle_id: Option<VehicleId>,
    pub customer_id: Option<CustomerId>,
    pub period: Option<DateInterval>,
    pub status: Option<ReservationStatus>,
    pub advance_amount: Option<i64>,
    pub total_amount: Option<i64>,
}

impl ReservationPatch {
    /// A patch that only moves the status.
    pub fn status(status: ReservationStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether the patch would move the reservation to a different
    /// vehicle or period, i.e. requires a fresh conflict check.
    pub fn reschedules(&self, current: &Reservation) -> bool {
        let vehicle_changed = self
            .vehicle_id
            .as_ref()
            .is_some_and(|v| *v != current.vehicle_id);
        let period_changed = self.period.is_some_and(|p| p != current.period);
        vehicle_changed || period_changed
    }
}

/// Vehicle status.
///
/// This is a cached projection of whether the vehicle currently has an
/// active reservation. It is advisory: conflict checks go to the
/// reservation intervals, never to this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VehicleStatus {
    #[default]
    Available,
    Rented,
    UnderMaintenance,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Rented => "Rented",
            Self::UnderMaintenance => "UnderMaintenance",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Available" => Some(Self::Available),
            "Rented" => Some(Self::Rented),
            "UnderMaintenance" => Some(Self::UnderMaintenance),
            _ => None,
        }
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fleet vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    /// Registration / fleet code, supplied by the caller.
    pub id: VehicleId,
    pub make: String,
    pub model: String,
    pub year: i32,
    /// Rate per rental day, minor units.
    pub daily_rate: i64,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn new(draft: VehicleDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: draft.id,
            make: draft.make,
            model: draft.model,
            year: draft.year,
            daily_rate: draft.daily_rate,
            status: draft.status,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for registering a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDraft {
    pub id: VehicleId,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub daily_rate: i64,
    #[serde(default)]
    pub status: VehicleStatus,
}

/// Field-wise update for a vehicle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VehiclePatch {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub daily_rate: Option<i64>,
    pub status: Option<VehicleStatus>,
}

impl VehiclePatch {
    /// A patch that only moves the status.
    pub fn status(status: VehicleStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// A rental customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Allocator-assigned identifier, e.g. `CUST-0042`.
    pub id: CustomerId,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub licence_no: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(id: impl Into<CustomerId>, draft: &CustomerDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            full_name: draft.full_name.clone(),
            phone: draft.phone.clone(),
            email: draft.email.clone(),
            licence_no: draft.licence_no.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for registering a customer.
///
/// `id` is normally absent and assigned by the allocator; an offline
/// client replaying a queue sets it to the id it was handed on a
/// previous pass, which is what makes replays idempotent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    #[serde(default)]
    pub id: Option<CustomerId>,
    pub full_name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub licence_no: Option<String>,
}

/// Field-wise update for a customer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerPatch {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub licence_no: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn period() -> DateInterval {
        DateInterval::new(
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        )
        .unwrap()
    }

    fn draft() -> ReservationDraft {
        ReservationDraft {
            vehicle_id: "KA-01-1234".into(),
            customer_id: "CUST-0001".into(),
            period: period(),
            status: InitialStatus::Pending,
            advance_amount: 5_000,
            total_amount: None,
        }
    }

    #[test]
    fn status_parse_roundtrip() {
        for status in [
            ReservationStatus::Pending,
            ReservationStatus::Active,
            ReservationStatus::Returned,
            ReservationStatus::Cancelled,
        ] {
            assert_eq!(ReservationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ReservationStatus::parse("Unknown"), None);
    }

    #[test]
    fn occupying_and_terminal_statuses() {
        assert!(ReservationStatus::Pending.occupies_vehicle());
        assert!(ReservationStatus::Active.occupies_vehicle());
        assert!(!ReservationStatus::Returned.occupies_vehicle());
        assert!(!ReservationStatus::Cancelled.occupies_vehicle());

        assert!(ReservationStatus::Returned.is_terminal());
        assert!(ReservationStatus::Cancelled.is_terminal());
        assert!(!ReservationStatus::Pending.is_terminal());
        assert!(!ReservationStatus::Active.is_terminal());
    }

    #[test]
    fn new_reservation_takes_draft_fields() {
        let now = Utc::now();
        let r = Reservation::new("BK-20240610-001", &draft(), now);
        assert_eq!(r.id, "BK-20240610-001");
        assert_eq!(r.status, ReservationStatus::Pending);
        assert_eq!(r.advance_amount, 5_000);
        assert_eq!(r.total_amount, None);
        assert_eq!(r.created_at, now);
        assert_eq!(r.updated_at, now);
    }

    #[test]
    fn patch_reschedules_detects_vehicle_and_period_moves() {
        let r = Reservation::new("BK-20240610-001", &draft(), Utc::now());

        assert!(!ReservationPatch::default().reschedules(&r));
        assert!(!ReservationPatch::status(ReservationStatus::Active).reschedules(&r));

        let same_vehicle = ReservationPatch {
            vehicle_id: Some("KA-01-1234".into()),
            ..Default::default()
        };
        assert!(!same_vehicle.reschedules(&r));

        let other_vehicle = ReservationPatch {
            vehicle_id: Some("KA-02-9999".into()),
            ..Default::default()
        };
        assert!(other_vehicle.reschedules(&r));

        let moved = ReservationPatch {
            period: Some(
                DateInterval::new(
                    NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
                    NaiveDate::from_ymd_opt(2024, 7, 4).unwrap(),
                )
                .unwrap(),
            ),
            ..Default::default()
        };
        assert!(moved.reschedules(&r));
    }

    #[test]
    fn vehicle_status_serializes_camel_case() {
        let json = serde_json::to_string(&VehicleStatus::UnderMaintenance).unwrap();
        assert_eq!(json, r#""underMaintenance""#);
    }

    #[test]
    fn customer_draft_id_defaults_to_none() {
        let draft: CustomerDraft =
            serde_json::from_str(r#"{"fullName":"Asha Rao","phone":"+91-98450-00000"}"#).unwrap();
        assert_eq!(draft.id, None);
        assert_eq!(draft.email, None);
    }
}
