//! Tests for the read → validate → append orchestration.

use chrono::NaiveDate;
use leave_engine::service::LeaveService;
use leave_engine::{
    Booking, BookingRequest, BookingRow, BookingStore, CsvBookingStore, Decision, EngineConfig,
    HolidayPolicy, LeaveError, MemoryBookingStore, PersonId, Rejection, StoreError,
};
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────────────

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn person(name: &str) -> PersonId {
    PersonId::new(name).unwrap()
}

fn request(name: &str, start: NaiveDate, end: NaiveDate) -> BookingRequest {
    BookingRequest::new(person(name), start, end)
}

// ── Booking ─────────────────────────────────────────────────────────────────

#[test]
fn accepted_booking_is_appended_and_reduces_remaining() {
    let service = LeaveService::new(MemoryBookingStore::new(), EngineConfig::default());

    let outcome = service
        .book(&request("alice", date(2024, 7, 1), date(2024, 7, 5)))
        .unwrap();

    assert!(outcome.decision.is_accepted());
    assert_eq!(service.store().len(), 1);

    let report = service.check(&person("ALICE"), 2024).unwrap();
    assert_eq!(report.state.remaining_days, 23);
    assert_eq!(report.state.remaining_holiday_count, 8);
    assert_eq!(report.holidays.len(), 8);
}

#[test]
fn rejected_booking_is_not_appended() {
    let service = LeaveService::new(MemoryBookingStore::new(), EngineConfig::default());

    let outcome = service
        .book(&request("alice", date(2024, 7, 10), date(2024, 7, 5)))
        .unwrap();

    assert!(matches!(
        outcome.decision,
        Decision::Rejected(Rejection::InvalidRange { .. })
    ));
    assert!(service.store().is_empty());
}

#[test]
fn successive_bookings_exhaust_the_allowance() {
    let config = EngineConfig::new(10, HolidayPolicy::CountAgainst);
    let service = LeaveService::new(MemoryBookingStore::new(), config);

    let first = service
        .book(&request("alice", date(2024, 7, 1), date(2024, 7, 7)))
        .unwrap();
    assert!(first.decision.is_accepted());

    let second = service
        .book(&request("alice", date(2024, 7, 5), date(2024, 7, 12)))
        .unwrap();
    match second.decision {
        Decision::Rejected(Rejection::InsufficientEntitlement {
            year,
            requested_new_days,
            remaining_days,
            shortfall,
        }) => {
            assert_eq!(year, 2024);
            assert_eq!(requested_new_days, 5);
            assert_eq!(remaining_days, 3);
            assert_eq!(shortfall, 2);
        }
        other => panic!("expected insufficient entitlement, got {:?}", other),
    }

    let third = service
        .book(&request("alice", date(2024, 7, 5), date(2024, 7, 10)))
        .unwrap();
    assert!(third.decision.is_accepted());
    assert_eq!(service.store().len(), 2);
    assert_eq!(service.check(&person("alice"), 2024).unwrap().state.remaining_days, 0);
}

#[test]
fn bookings_for_lists_only_that_person_sorted() {
    let store = MemoryBookingStore::new();
    let service = LeaveService::new(&store, EngineConfig::default());

    for (name, start, end) in [
        ("alice", date(2024, 8, 1), date(2024, 8, 2)),
        ("bob", date(2024, 7, 1), date(2024, 7, 2)),
        ("Alice", date(2024, 3, 4), date(2024, 3, 4)),
    ] {
        service.book(&request(name, start, end)).unwrap();
    }

    let listing = service.bookings_for(&person("alice")).unwrap();
    let starts: Vec<NaiveDate> = listing.bookings.iter().map(Booking::start_date).collect();
    assert_eq!(starts, vec![date(2024, 3, 4), date(2024, 8, 1)]);
}

// ── Degraded and failing stores ─────────────────────────────────────────────

#[test]
fn malformed_rows_are_reported_but_do_not_block_booking() {
    let store = MemoryBookingStore::with_rows(vec![
        BookingRow {
            name: "alice".to_string(),
            start_date: "01/07/2024".to_string(),
            end_date: "05/07/2024".to_string(),
            year: "2024".to_string(),
        },
        BookingRow {
            name: "alice".to_string(),
            start_date: "July 8th".to_string(),
            end_date: "12/07/2024".to_string(),
            year: "2024".to_string(),
        },
    ]);
    let service = LeaveService::new(&store, EngineConfig::default());

    let report = service.check(&person("alice"), 2024).unwrap();
    assert_eq!(report.state.remaining_days, 23);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].row, 2);

    let outcome = service
        .book(&request("alice", date(2024, 9, 2), date(2024, 9, 3)))
        .unwrap();
    assert!(outcome.decision.is_accepted());
    assert_eq!(outcome.issues.len(), 1);
}

#[test]
fn store_failure_propagates_from_fetch() {
    let store = MemoryBookingStore::new();
    store.set_offline(true);
    let service = LeaveService::new(&store, EngineConfig::default());

    let err = service
        .book(&request("alice", date(2024, 7, 1), date(2024, 7, 5)))
        .unwrap_err();
    assert!(matches!(err, LeaveError::Store(StoreError::Unavailable(_))));

    let err = service.check(&person("alice"), 2024).unwrap_err();
    assert!(matches!(err, LeaveError::Store(_)));
}

/// Store whose reads succeed but whose appends always fail.
struct ReadOnlyStore(MemoryBookingStore);

impl BookingStore for ReadOnlyStore {
    fn fetch_all(&self) -> Result<leave_engine::FetchedBookings, StoreError> {
        self.0.fetch_all()
    }

    fn append(&self, _booking: &Booking) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("read-only".to_string()))
    }
}

#[test]
fn store_failure_propagates_from_append() {
    let service = LeaveService::new(ReadOnlyStore(MemoryBookingStore::new()), EngineConfig::default());

    let err = service
        .book(&request("alice", date(2024, 7, 1), date(2024, 7, 5)))
        .unwrap_err();

    assert!(matches!(err, LeaveError::Store(StoreError::Unavailable(_))));
}

#[test]
fn unsupported_year_is_checked_before_reading_the_store() {
    let store = MemoryBookingStore::new();
    store.set_offline(true);
    let service = LeaveService::new(&store, EngineConfig::default());

    let err = service.check(&person("alice"), 0).unwrap_err();

    assert!(matches!(err, LeaveError::YearOutOfRange(0)));
}

// ── CSV-backed end to end ───────────────────────────────────────────────────

#[test]
fn csv_store_end_to_end() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bookings.csv");

    let service = LeaveService::new(CsvBookingStore::new(&path), EngineConfig::default());
    service
        .book(&request("alice", date(2024, 7, 1), date(2024, 7, 5)))
        .unwrap();

    // A fresh handle over the same file sees the booking.
    let reopened = LeaveService::new(CsvBookingStore::new(&path), EngineConfig::default());
    let outcome = reopened
        .book(&request("alice", date(2024, 7, 3), date(2024, 7, 10)))
        .unwrap();

    match outcome.decision {
        Decision::Accepted(approval) => {
            assert_eq!(approval.new_days, 5);
            assert_eq!(approval.remaining_after, 18);
        }
        Decision::Rejected(r) => panic!("unexpected rejection: {}", r),
    }
    assert_eq!(reopened.check(&person("alice"), 2024).unwrap().state.remaining_days, 18);
    assert_eq!(reopened.store().path(), path.as_path());
}

#[test]
fn booking_across_new_year_charges_each_year_its_own_days() {
    let service = LeaveService::new(MemoryBookingStore::new(), EngineConfig::default());
    service
        .book(&request("alice", date(2025, 1, 6), date(2025, 1, 30)))
        .unwrap();

    let outcome = service
        .book(&request("alice", date(2024, 12, 30), date(2025, 1, 3)))
        .unwrap();
    match outcome.decision {
        Decision::Accepted(approval) => {
            assert_eq!(approval.new_days, 5);
            assert_eq!(approval.remaining_after, 26);
        }
        Decision::Rejected(r) => panic!("unexpected rejection: {}", r),
    }

    // 2024 gives up 30 and 31 December, 2025 gives up 1 to 3 January.
    assert_eq!(service.check(&person("alice"), 2024).unwrap().state.remaining_days, 26);
    assert_eq!(service.check(&person("alice"), 2025).unwrap().state.remaining_days, 0);

    // 2025 is now exhausted, so any new January day is refused.
    let refused = service
        .book(&request("alice", date(2024, 12, 31), date(2025, 1, 31)))
        .unwrap();
    assert!(matches!(
        refused.decision,
        Decision::Rejected(Rejection::InsufficientEntitlement { year: 2025, .. })
    ));
    assert_eq!(service.store().len(), 2);
}
