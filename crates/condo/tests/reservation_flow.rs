use condo::app::receipt::ReceiptRenderer;
use condo::app::reservations::ReservationBoard;
use condo::app::slots::NO_SELECTION;
use condo::domain::errors::DomainError;
use condo::infra::backend::MockBackend;
use condo::infra::config::Config;
use condo::infra::mock::MockCatalog;
use time::macros::datetime;

fn board(catalog: &MockCatalog) -> ReservationBoard {
    let config = Config::default();
    ReservationBoard::new(
        catalog,
        "A-101",
        config.reservations.schedule(),
        config.reservations.booking_window_days(),
    )
}

#[test]
fn books_two_hours_and_renders_receipt() {
    let catalog = MockCatalog::seeded(datetime!(2026-03-10 12:00 UTC));
    let mut board = board(&catalog);
    let backend = MockBackend::instant();

    board.tap(5).unwrap();
    board.tap(6).unwrap();
    assert_eq!(board.summary(), "14:00 - 16:00");

    let reservation = board.confirm(&backend).unwrap();
    assert_eq!((reservation.start, reservation.end), (5, 6));
    assert_eq!(board.summary(), NO_SELECTION);
    assert!(!board.availability().contains(&5));
    assert!(!board.availability().contains(&6));

    let facility = board.facility().unwrap();
    let receipt = ReceiptRenderer::new()
        .unwrap()
        .booking(&reservation, facility, &board.schedule())
        .unwrap();
    assert!(receipt.contains("Swimming Pool on 2026-03-10, 14:00 - 16:00"));
    assert_eq!(backend.bookings().len(), 1);
}

#[test]
fn taken_slots_cannot_be_joined() {
    let catalog = MockCatalog::seeded(datetime!(2026-03-10 12:00 UTC));
    let mut board = board(&catalog);

    // pool, today: 09:00 and 10:00 are taken
    board.tap(1).unwrap();
    assert!(board.selection().is_empty());
    board.tap(2).unwrap();
    board.tap(1).unwrap();
    assert_eq!(board.selection().range(), Some((2, 2)));
    assert_eq!(board.summary(), "11:00 - 12:00");
}

#[test]
fn failing_backend_keeps_selection() {
    let catalog = MockCatalog::seeded(datetime!(2026-03-10 12:00 UTC));
    let mut board = board(&catalog);

    board.tap(8).unwrap();
    let err = board.confirm(&MockBackend::failing()).unwrap_err();
    assert!(matches!(err, DomainError::Gateway(_)));
    assert_eq!(board.selection().range(), Some((8, 8)));
    assert!(board.availability().contains(&8));
}
