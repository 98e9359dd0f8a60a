use parcel_core::db::open_db_in_memory;
use parcel_core::{
    Parcel, ParcelRepository, ParcelService, ParcelStatus, ParcelValidationError, ServiceError,
    SqliteParcelStore,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn register_assigns_number_and_registered_status() {
    let conn = open_db_in_memory().unwrap();
    let service = ParcelService::new(SqliteParcelStore::try_new(&conn).unwrap());

    let parcel = service.register(5, "Saratov, Veselaya str, 8").unwrap();
    assert!(parcel.is_persisted());
    assert_eq!(parcel.status, ParcelStatus::Registered);
    assert_eq!(service.get(parcel.number).unwrap(), parcel);
}

#[test]
fn next_status_walks_lifecycle_and_stops_at_delivered() {
    let conn = open_db_in_memory().unwrap();
    let service = ParcelService::new(SqliteParcelStore::try_new(&conn).unwrap());
    let number = service.register(5, "somewhere").unwrap().number;

    assert_eq!(
        service.next_status(number).unwrap(),
        Some(ParcelStatus::Sent)
    );
    assert_eq!(
        service.next_status(number).unwrap(),
        Some(ParcelStatus::Delivered)
    );
    assert_eq!(service.next_status(number).unwrap(), None);
    assert_eq!(service.get(number).unwrap().status, ParcelStatus::Delivered);
}

#[test]
fn change_address_allowed_only_while_registered() {
    let conn = open_db_in_memory().unwrap();
    let service = ParcelService::new(SqliteParcelStore::try_new(&conn).unwrap());
    let number = service.register(5, "old").unwrap().number;

    service.change_address(number, "new").unwrap();
    assert_eq!(service.get(number).unwrap().address, "new");

    service.next_status(number).unwrap();
    let err = service.change_address(number, "newer").unwrap_err();
    assert!(matches!(
        err,
        ServiceError::StatusLocked {
            status: ParcelStatus::Sent,
            ..
        }
    ));
    assert_eq!(service.get(number).unwrap().address, "new");
}

#[test]
fn delete_allowed_only_while_registered() {
    let conn = open_db_in_memory().unwrap();
    let service = ParcelService::new(SqliteParcelStore::try_new(&conn).unwrap());
    let kept = service.register(5, "kept").unwrap().number;
    let removed = service.register(5, "removed").unwrap().number;

    service.next_status(kept).unwrap();
    assert!(matches!(
        service.delete(kept).unwrap_err(),
        ServiceError::StatusLocked { number, .. } if number == kept
    ));

    service.delete(removed).unwrap();
    assert!(service.get(removed).unwrap_err().is_not_found());
    assert!(service.get(kept).is_ok());
}

#[test]
fn operations_on_missing_parcel_report_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = ParcelService::new(SqliteParcelStore::try_new(&conn).unwrap());

    assert!(service.next_status(404).unwrap_err().is_not_found());
    assert!(service.change_address(404, "x").unwrap_err().is_not_found());
    assert!(service.delete(404).unwrap_err().is_not_found());
}

#[test]
fn client_parcels_lists_registered_parcels_of_one_client() {
    let conn = open_db_in_memory().unwrap();
    let service = ParcelService::new(SqliteParcelStore::try_new(&conn).unwrap());
    let mut rng = StdRng::from_entropy();
    let client = rng.gen_range(0..10_000_000);

    let first = service.register(client, "a").unwrap();
    let second = service.register(client, "b").unwrap();
    service.register(client + 1, "other").unwrap();

    let parcels = service.client_parcels(client).unwrap();
    assert_eq!(parcels, vec![first, second]);
}

#[test]
fn exported_parcel_uses_snake_case_status() {
    let conn = open_db_in_memory().unwrap();
    let service = ParcelService::new(SqliteParcelStore::try_new(&conn).unwrap());
    let parcel = service.register(9, "json street").unwrap();

    let value = serde_json::to_value(&parcel).unwrap();
    assert_eq!(value["status"], "registered");
    assert_eq!(value["number"], parcel.number);
    assert_eq!(value["created_at"], parcel.created_at.as_str());
}

#[test]
fn register_rejects_blank_address_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let service = ParcelService::new(SqliteParcelStore::try_new(&conn).unwrap());

    assert!(matches!(
        service.register(1000, "").unwrap_err(),
        ServiceError::Validation(ParcelValidationError::EmptyAddress)
    ));
    assert!(service.client_parcels(1000).unwrap().is_empty());
}

#[test]
fn change_address_rejects_blank_address() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();
    let number = store.add(&Parcel::new(1000, "test")).unwrap();
    let service = ParcelService::new(store);

    assert!(matches!(
        service.change_address(number, "  ").unwrap_err(),
        ServiceError::Validation(ParcelValidationError::EmptyAddress)
    ));
    assert_eq!(service.get(number).unwrap().address, "test");
}
