use rosterdb_core::db::open_db_in_memory;
use rosterdb_core::{
    Address, CrudRepository, Person, PersonRepository, Region, RepoError,
};

// 1980-11-15T15:15:00 at UTC-6, i.e. 1980-11-15T21:15:00Z.
const DOB_JOHN_EPOCH_MS: i64 = 343_170_900_000;
// 1982-11-15T15:15:00 at UTC-6.
const DOB_BOBBY_EPOCH_MS: i64 = 406_242_900_000;

#[test]
fn save_assigns_a_positive_identity() {
    let conn = open_db_in_memory().unwrap();
    let repo = PersonRepository::try_new(&conn).unwrap();

    let mut john = Person::new("John", "Smith", DOB_JOHN_EPOCH_MS);
    let id = repo.save(&mut john).unwrap();

    assert!(id > 0);
    assert_eq!(john.id, Some(id));
}

#[test]
fn sequential_saves_assign_distinct_identities() {
    let conn = open_db_in_memory().unwrap();
    let repo = PersonRepository::try_new(&conn).unwrap();

    let mut john = Person::new("John", "Smith", DOB_JOHN_EPOCH_MS);
    let mut bobby = Person::new("Bobby", "Smith", DOB_BOBBY_EPOCH_MS);
    let first = repo.save(&mut john).unwrap();
    let second = repo.save(&mut bobby).unwrap();

    assert_ne!(first, second);
    assert!(second > first);
}

#[test]
fn find_by_id_unknown_id_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = PersonRepository::try_new(&conn).unwrap();

    assert!(repo.find_by_id(-1).unwrap().is_none());
    assert!(repo.find_by_id(9_999).unwrap().is_none());
}

#[test]
fn find_by_id_roundtrips_every_field() {
    let conn = open_db_in_memory().unwrap();
    let repo = PersonRepository::try_new(&conn).unwrap();

    let mut john = Person::new("John", "Smith", DOB_JOHN_EPOCH_MS);
    john.salary_cents = 5_512_550;
    john.email = Some("john.smith@example.com".to_string());
    repo.save(&mut john).unwrap();

    let found = repo.find_by_id(john.id.unwrap()).unwrap().unwrap();
    assert_eq!(found, john);
}

#[test]
fn saving_a_person_persists_the_home_address_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = PersonRepository::try_new(&conn).unwrap();

    let mut address = Address::new(
        "123 Beale St.",
        "Walla Walla",
        "WA",
        "90210",
        Region::West,
        "United States",
    );
    address.address2 = Some("Apt. 1A".to_string());

    let mut john = Person::new("John", "Smith", DOB_JOHN_EPOCH_MS);
    john.home_address = Some(address);
    repo.save(&mut john).unwrap();

    let saved_address_id = john.home_address.as_ref().unwrap().id;
    assert!(saved_address_id.unwrap() > 0);

    let found = repo.find_by_id(john.id.unwrap()).unwrap().unwrap();
    assert_eq!(found.home_address, john.home_address);
    assert_eq!(found, john);
}

#[test]
fn find_all_returns_every_saved_person() {
    let conn = open_db_in_memory().unwrap();
    let repo = PersonRepository::try_new(&conn).unwrap();

    let mut john = Person::new("John", "Smith", DOB_JOHN_EPOCH_MS);
    let mut bobby = Person::new("Bobby", "Smith", DOB_BOBBY_EPOCH_MS);
    repo.save(&mut john).unwrap();
    repo.save(&mut bobby).unwrap();

    let people = repo.find_all().unwrap();
    assert_eq!(people.len(), 2);
    assert!(people.contains(&john));
    assert!(people.contains(&bobby));
}

#[test]
fn count_rises_by_two_after_two_saves() {
    let conn = open_db_in_memory().unwrap();
    let repo = PersonRepository::try_new(&conn).unwrap();

    let start = repo.count().unwrap();
    repo.save(&mut Person::new("John1", "Smith", DOB_JOHN_EPOCH_MS))
        .unwrap();
    repo.save(&mut Person::new("John2", "Smith", DOB_JOHN_EPOCH_MS))
        .unwrap();

    assert_eq!(repo.count().unwrap(), start + 2);
}

#[test]
fn count_is_zero_on_an_empty_table() {
    let conn = open_db_in_memory().unwrap();
    let repo = PersonRepository::try_new(&conn).unwrap();

    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn update_changes_only_the_targeted_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = PersonRepository::try_new(&conn).unwrap();

    let mut john = Person::new("John1", "Smith", DOB_JOHN_EPOCH_MS);
    let mut bobby = Person::new("Bobby", "Smith", DOB_BOBBY_EPOCH_MS);
    repo.save(&mut john).unwrap();
    repo.save(&mut bobby).unwrap();

    let before = repo.find_by_id(john.id.unwrap()).unwrap().unwrap();

    john.salary_cents = 7_300_028;
    repo.update(&john).unwrap();

    let after = repo.find_by_id(john.id.unwrap()).unwrap().unwrap();
    assert_ne!(after.salary_cents, before.salary_cents);
    assert_eq!(after.salary_cents, 7_300_028);
    assert_eq!(after.id, before.id);

    let untouched = repo.find_by_id(bobby.id.unwrap()).unwrap().unwrap();
    assert_eq!(untouched, bobby);
}

#[test]
fn deleting_one_person_drops_count_by_one() {
    let conn = open_db_in_memory().unwrap();
    let repo = PersonRepository::try_new(&conn).unwrap();

    let mut john = Person::new("John1", "Smith", DOB_JOHN_EPOCH_MS);
    repo.save(&mut john).unwrap();
    let start = repo.count().unwrap();

    repo.delete(&john).unwrap();

    assert_eq!(repo.count().unwrap(), start - 1);
}

#[test]
fn deleting_two_people_drops_count_by_exactly_two() {
    let conn = open_db_in_memory().unwrap();
    let repo = PersonRepository::try_new(&conn).unwrap();

    let mut p1 = Person::new("John1", "Smith", DOB_JOHN_EPOCH_MS);
    let mut p2 = Person::new("John2", "Smith", DOB_JOHN_EPOCH_MS);
    let mut p3 = Person::new("John3", "Smith", DOB_JOHN_EPOCH_MS);
    repo.save(&mut p1).unwrap();
    repo.save(&mut p2).unwrap();
    repo.save(&mut p3).unwrap();
    let start = repo.count().unwrap();

    repo.delete_all(&[p1, p2]).unwrap();

    assert_eq!(repo.count().unwrap(), start - 2);
    assert!(repo.find_by_id(p3.id.unwrap()).unwrap().is_some());
}

#[test]
fn deleting_an_already_deleted_row_is_tolerated() {
    let conn = open_db_in_memory().unwrap();
    let repo = PersonRepository::try_new(&conn).unwrap();

    let mut john = Person::new("John1", "Smith", DOB_JOHN_EPOCH_MS);
    repo.save(&mut john).unwrap();

    repo.delete(&john).unwrap();
    repo.delete(&john).unwrap();

    assert!(repo.find_by_id(john.id.unwrap()).unwrap().is_none());
}

#[test]
fn deleting_a_transient_person_is_misconfiguration() {
    let conn = open_db_in_memory().unwrap();
    let repo = PersonRepository::try_new(&conn).unwrap();

    let transient = Person::new("Never", "Saved", DOB_JOHN_EPOCH_MS);
    let err = repo.delete(&transient).unwrap_err();

    assert!(matches!(err, RepoError::Misconfiguration(_)));
}

#[test]
fn delete_all_with_a_transient_person_is_misconfiguration() {
    let conn = open_db_in_memory().unwrap();
    let repo = PersonRepository::try_new(&conn).unwrap();

    let mut saved = Person::new("John1", "Smith", DOB_JOHN_EPOCH_MS);
    repo.save(&mut saved).unwrap();
    let transient = Person::new("Never", "Saved", DOB_JOHN_EPOCH_MS);

    let err = repo.delete_all(&[saved, transient]).unwrap_err();
    assert!(matches!(err, RepoError::Misconfiguration(_)));
    // The saved row survives: the statement never executed.
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn delete_all_of_no_entities_is_a_noop() {
    let conn = open_db_in_memory().unwrap();
    let repo = PersonRepository::try_new(&conn).unwrap();

    repo.save(&mut Person::new("John1", "Smith", DOB_JOHN_EPOCH_MS))
        .unwrap();
    repo.delete_all(&[]).unwrap();

    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn save_failure_carries_the_entity_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let repo = PersonRepository::try_new(&conn).unwrap();

    // Dropping the table makes the insert itself fail.
    conn.execute_batch("DROP TABLE people;").unwrap();

    let mut john = Person::new("John", "Smith", DOB_JOHN_EPOCH_MS);
    let err = repo.save(&mut john).unwrap_err();

    match err {
        RepoError::Save { snapshot, .. } => assert!(snapshot.contains("John")),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(john.id, None, "failed save must not assign an identity");
}
