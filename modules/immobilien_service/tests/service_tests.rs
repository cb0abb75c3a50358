//! Integration tests for the Immobilien service

use immobilien_service::config::{Config, ReconcileStrategy};
use immobilien_service::contract::*;
use immobilien_service::domain::NotificationLevel;
use immobilien_service::domain::service::{MSG_CREATED, MSG_DELETED, MSG_UPDATED};
use immobilien_service::domain::validation::MSG_MIETER_CONFLICT;
use std::sync::atomic::Ordering;
use uuid::Uuid;

mod common;
use common::{date, dienstleister, eigentuemer, mieter, Fixture};

fn print_test_header(test_name: &str, purpose: &str) {
    println!("\n🧪 TEST: {}", test_name);
    println!("📋 PURPOSE: {}", purpose);
}

/// Content of a relationship, ignoring ids and timestamps
fn content(b: &Beziehung) -> (Uuid, Uuid, Art, Option<chrono::NaiveDate>, Option<chrono::NaiveDate>) {
    (b.immobilien_id, b.kontakt_id, b.art, b.startdatum, b.enddatum)
}

// ===== Form-local validation =====

#[tokio::test]
async fn test_tenancy_conflict_scenario() {
    print_test_header(
        "test_tenancy_conflict_scenario",
        "A second tenant in an occupied period is rejected with a general error",
    );
    let fx = Fixture::new();
    let p1 = Uuid::new_v4();

    let candidate = BeziehungDraft {
        immobilien_id: Some(p1),
        ..mieter(Uuid::new_v4(), date(2024, 6, 1), date(2024, 6, 30))
    };
    let existing = vec![BeziehungDraft {
        immobilien_id: Some(p1),
        ..mieter(Uuid::new_v4(), date(2024, 6, 15), date(2024, 6, 20))
    }];

    let result = fx
        .service
        .validate_relationship(&candidate, &existing, EditSide::Immobilien);

    assert!(!result.is_valid);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].field, ErrorField::General);
    assert_eq!(result.errors[0].message, MSG_MIETER_CONFLICT);
}

// ===== Store-backed validation =====

#[tokio::test]
async fn test_validate_against_store_detects_overlap_and_accepts_adjacent() {
    print_test_header(
        "test_validate_against_store_detects_overlap_and_accepts_adjacent",
        "Persisted tenancies of the property are the existing set",
    );
    let fx = Fixture::new();
    let immobilie = fx.immobilie("Lindenstraße 4").await;
    let alt = fx.kontakt("Alt").await;
    let neu = fx.kontakt("Neu").await;

    fx.service
        .reconcile_relationships(
            immobilie.id,
            EditSide::Immobilien,
            vec![mieter(alt.id, date(2024, 1, 1), date(2024, 3, 31))],
        )
        .await
        .unwrap();

    let overlapping = [mieter(neu.id, date(2024, 3, 15), date(2024, 4, 30))];
    let result = fx
        .service
        .validate_against_store(immobilie.id, EditSide::Immobilien, &overlapping)
        .await
        .unwrap();
    assert!(!result.is_valid);
    assert!(result.has_error(ErrorField::General));

    let adjacent = [mieter(neu.id, date(2024, 4, 1), date(2024, 4, 30))];
    let result = fx
        .service
        .validate_against_store(immobilie.id, EditSide::Immobilien, &adjacent)
        .await
        .unwrap();
    assert!(result.is_valid, "adjacent tenancy must be accepted: {:?}", result);
}

#[tokio::test]
async fn test_validate_against_store_kontakte_side_scopes_by_contact() {
    print_test_header(
        "test_validate_against_store_kontakte_side_scopes_by_contact",
        "On the contact side the contact's own tenancies form the existing set",
    );
    let fx = Fixture::new();
    let kontakt = fx.kontakt("Erika").await;
    let erste = fx.immobilie("Erste").await;
    let zweite = fx.immobilie("Zweite").await;

    let stored = BeziehungDraft {
        immobilien_id: Some(erste.id),
        art: Some("Mieter".to_string()),
        startdatum: Some(date(2024, 1, 1)),
        enddatum: Some(date(2024, 12, 31)),
        ..Default::default()
    };
    fx.service
        .reconcile_relationships(kontakt.id, EditSide::Kontakte, vec![stored])
        .await
        .unwrap();

    let candidate = BeziehungDraft {
        immobilien_id: Some(zweite.id),
        art: Some("Mieter".to_string()),
        startdatum: Some(date(2024, 6, 1)),
        enddatum: Some(date(2024, 6, 30)),
        ..Default::default()
    };
    let result = fx
        .service
        .validate_against_store(kontakt.id, EditSide::Kontakte, &[candidate])
        .await
        .unwrap();
    assert!(!result.is_valid);
}

// ===== Reconciliation =====

#[tokio::test]
async fn test_reconcile_replaces_whole_set() {
    print_test_header(
        "test_reconcile_replaces_whole_set",
        "Persisted {A, B} with target {B, C} ends up as exactly {B', C}",
    );
    let fx = Fixture::new();
    let immobilie = fx.immobilie("Altbau").await;
    let k1 = fx.kontakt("Eigentümerin").await;
    let k2 = fx.kontakt("Mieter").await;
    let k3 = fx.kontakt("Hausmeisterei").await;

    fx.service
        .reconcile_relationships(
            immobilie.id,
            EditSide::Immobilien,
            vec![
                eigentuemer(k1.id),
                mieter(k2.id, date(2024, 1, 1), date(2024, 3, 31)),
            ],
        )
        .await
        .unwrap();
    let persisted = fx.store.beziehungen_of_immobilie(immobilie.id);
    assert_eq!(persisted.len(), 2);

    let b = persisted
        .iter()
        .find(|r| r.art == Art::Mieter)
        .map(BeziehungDraft::from)
        .unwrap();
    let outcome = fx
        .service
        .update_immobilie(
            immobilie.id,
            ImmobiliePatch::default(),
            Some(vec![b, dienstleister(k3.id, "Winterdienst")]),
        )
        .await
        .unwrap();
    assert!(!outcome.is_partial());

    let mut after: Vec<_> = fx
        .store
        .beziehungen_of_immobilie(immobilie.id)
        .iter()
        .map(content)
        .collect();
    after.sort_by_key(|c| c.2.as_str());
    assert_eq!(
        after,
        vec![
            (immobilie.id, k3.id, Art::Dienstleister, None, None),
            (
                immobilie.id,
                k2.id,
                Art::Mieter,
                Some(date(2024, 1, 1)),
                Some(date(2024, 3, 31))
            ),
        ]
    );
}

#[tokio::test]
async fn test_reconcile_empty_target_clears_set() {
    print_test_header(
        "test_reconcile_empty_target_clears_set",
        "An empty target list removes every relationship of the entity",
    );
    let fx = Fixture::new();
    let immobilie = fx.immobilie("Leer").await;
    let kontakt = fx.kontakt("Besitzer").await;

    fx.service
        .reconcile_relationships(immobilie.id, EditSide::Immobilien, vec![eigentuemer(kontakt.id)])
        .await
        .unwrap();
    assert_eq!(fx.store.count_beziehungen(), 1);

    let outcome = fx
        .service
        .reconcile_relationships(immobilie.id, EditSide::Immobilien, Vec::new())
        .await
        .unwrap();
    assert_eq!(outcome.entity.id(), immobilie.id);
    assert_eq!(fx.store.count_beziehungen(), 0);
}

#[tokio::test]
async fn test_reconcile_rejects_invalid_targets_before_writing() {
    print_test_header(
        "test_reconcile_rejects_invalid_targets_before_writing",
        "Overlapping tenancies inside the target set abort the save untouched",
    );
    let fx = Fixture::new();
    let immobilie = fx.immobilie("Vorher").await;
    let k1 = fx.kontakt("Eins").await;
    let k2 = fx.kontakt("Zwei").await;

    fx.service
        .reconcile_relationships(immobilie.id, EditSide::Immobilien, vec![eigentuemer(k1.id)])
        .await
        .unwrap();

    let patch = ImmobiliePatch {
        titel: Some("Nachher".to_string()),
        ..Default::default()
    };
    let targets = vec![
        mieter(k1.id, date(2024, 1, 1), date(2024, 6, 30)),
        mieter(k2.id, date(2024, 6, 1), date(2024, 12, 31)),
    ];
    let err = fx
        .service
        .update_immobilie(immobilie.id, patch, Some(targets))
        .await
        .unwrap_err();

    match err {
        ImmobilienError::Validation { errors } => {
            assert_eq!(errors.len(), 2, "both conflicting entries are reported");
            assert!(errors.iter().all(|e| e.message == MSG_MIETER_CONFLICT));
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    let stored = fx.store.immobilien.read().get(&immobilie.id).cloned().unwrap();
    assert_eq!(stored.titel, "Vorher");
    let rows = fx.store.beziehungen_of_immobilie(immobilie.id);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].art, Art::Eigentuemer);
    assert_eq!(fx.notifier.last().unwrap().level, NotificationLevel::Error);
}

#[tokio::test]
async fn test_insert_failure_leaves_entity_without_relationships() {
    print_test_header(
        "test_insert_failure_leaves_entity_without_relationships",
        "Delete-then-insert: a failed insert returns the saved entity and an empty set",
    );
    let fx = Fixture::with_strategy(ReconcileStrategy::DeleteThenInsert);
    let kontakt = fx.kontakt("Erika").await;
    let a = fx.immobilie("A").await;
    let b = fx.immobilie("B").await;

    let set = |id: Uuid| BeziehungDraft {
        immobilien_id: Some(id),
        art: Some("Eigentümer".to_string()),
        ..Default::default()
    };
    fx.service
        .reconcile_relationships(kontakt.id, EditSide::Kontakte, vec![set(a.id), set(b.id)])
        .await
        .unwrap();
    assert_eq!(fx.store.beziehungen_of_kontakt(kontakt.id).len(), 2);

    fx.store.fail_insert.store(true, Ordering::SeqCst);
    let patch = KontaktPatch {
        name: Some("Erika Muster".to_string()),
        ..Default::default()
    };
    let outcome = fx
        .service
        .update_kontakt(kontakt.id, patch, Some(vec![set(b.id)]))
        .await
        .unwrap();

    assert_eq!(outcome.entity.name, "Erika Muster");
    let failure = outcome.relationship_error.unwrap();
    assert!(failure.relationships_cleared);
    assert!(failure.detail.contains("simulated insert failure"));
    assert!(fx.store.beziehungen_of_kontakt(kontakt.id).is_empty());

    let last = fx.notifier.last().unwrap();
    assert_eq!(last.level, NotificationLevel::Warning);
    assert_eq!(last.message, failure.message);
}

#[tokio::test]
async fn test_delete_failure_keeps_previous_relationships() {
    print_test_header(
        "test_delete_failure_keeps_previous_relationships",
        "Delete-then-insert: a failed delete changes nothing",
    );
    let fx = Fixture::with_strategy(ReconcileStrategy::DeleteThenInsert);
    let immobilie = fx.immobilie("Haus").await;
    let kontakt = fx.kontakt("Eigner").await;

    fx.service
        .reconcile_relationships(immobilie.id, EditSide::Immobilien, vec![eigentuemer(kontakt.id)])
        .await
        .unwrap();

    fx.store.fail_delete.store(true, Ordering::SeqCst);
    let outcome = fx
        .service
        .reconcile_relationships(immobilie.id, EditSide::Immobilien, Vec::new())
        .await
        .unwrap();

    let failure = outcome.relationship_error.unwrap();
    assert!(!failure.relationships_cleared);
    assert_eq!(fx.store.beziehungen_of_immobilie(immobilie.id).len(), 1);
}

#[tokio::test]
async fn test_transactional_failure_rolls_back() {
    print_test_header(
        "test_transactional_failure_rolls_back",
        "A failed transactional save keeps both the old fields and the old set",
    );
    let fx = Fixture::new();
    let immobilie = fx.immobilie("Haus").await;
    let k1 = fx.kontakt("Eins").await;
    let k2 = fx.kontakt("Zwei").await;

    fx.service
        .reconcile_relationships(immobilie.id, EditSide::Immobilien, vec![eigentuemer(k1.id)])
        .await
        .unwrap();

    fx.store.fail_replace.store(true, Ordering::SeqCst);
    let err = fx
        .service
        .update_immobilie(
            immobilie.id,
            ImmobiliePatch {
                adresse: Some("Hauptstraße 1".to_string()),
                ..Default::default()
            },
            Some(vec![eigentuemer(k2.id)]),
        )
        .await
        .unwrap_err();

    match err {
        ImmobilienError::Store {
            table, operation, ..
        } => {
            assert_eq!(table, Table::Immobilien);
            assert_eq!(operation, StoreOperation::Update);
        }
        other => panic!("expected store error, got {other:?}"),
    }

    let stored = fx.store.immobilien.read().get(&immobilie.id).cloned().unwrap();
    assert_eq!(stored.adresse, None);
    let rows = fx.store.beziehungen_of_immobilie(immobilie.id);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kontakt_id, k1.id);
    assert_eq!(fx.notifier.last().unwrap().level, NotificationLevel::Error);
}

#[tokio::test]
async fn test_transactional_create_failure_creates_nothing() {
    print_test_header(
        "test_transactional_create_failure_creates_nothing",
        "A contact created with relationships is not kept when the relationships fail",
    );
    let fx = Fixture::new();
    let immobilie = fx.immobilie("Haus").await;

    fx.store.fail_replace.store(true, Ordering::SeqCst);
    let set = BeziehungDraft {
        immobilien_id: Some(immobilie.id),
        art: Some("Eigentümer".to_string()),
        ..Default::default()
    };
    let err = fx
        .service
        .create_kontakt(
            NewKontakt {
                name: "Neu".to_string(),
                ..Default::default()
            },
            Some(vec![set]),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ImmobilienError::Store { table: Table::Kontakte, .. }));
    assert!(fx.store.kontakte.read().is_empty());
    assert_eq!(fx.store.count_beziehungen(), 0);
}

#[tokio::test]
async fn test_transactional_reconcile_failure_is_partial() {
    print_test_header(
        "test_transactional_reconcile_failure_is_partial",
        "Replacing only the set reports the failure and keeps the old set",
    );
    let fx = Fixture::new();
    let immobilie = fx.immobilie("Haus").await;
    let k1 = fx.kontakt("Eins").await;
    let k2 = fx.kontakt("Zwei").await;

    fx.service
        .reconcile_relationships(immobilie.id, EditSide::Immobilien, vec![eigentuemer(k1.id)])
        .await
        .unwrap();

    fx.store.fail_replace.store(true, Ordering::SeqCst);
    let outcome = fx
        .service
        .reconcile_relationships(immobilie.id, EditSide::Immobilien, vec![eigentuemer(k2.id)])
        .await
        .unwrap();

    let failure = outcome.relationship_error.unwrap();
    assert!(!failure.relationships_cleared);
    assert!(failure.detail.contains("simulated replace failure"));
    let rows = fx.store.beziehungen_of_immobilie(immobilie.id);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kontakt_id, k1.id);
    assert_eq!(fx.notifier.last().unwrap().level, NotificationLevel::Warning);
}

// ===== Entity CRUD =====

#[tokio::test]
async fn test_create_with_relationships_stamps_new_id() {
    print_test_header(
        "test_create_with_relationships_stamps_new_id",
        "Relationships submitted with a new entity are attached to the created id",
    );
    let fx = Fixture::new();
    let kontakt = fx.kontakt("Mieterin").await;

    let outcome = fx
        .service
        .create_immobilie(
            NewImmobilie {
                titel: "Neubau".to_string(),
                ..Default::default()
            },
            Some(vec![mieter(kontakt.id, date(2025, 1, 1), date(2025, 12, 31))]),
        )
        .await
        .unwrap();

    let rows = fx.store.beziehungen_of_immobilie(outcome.entity.id);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kontakt_id, kontakt.id);

    let last = fx.notifier.last().unwrap();
    assert_eq!(last.level, NotificationLevel::Success);
    assert_eq!(last.message, MSG_CREATED);
    assert_eq!(last.entity_id, Some(outcome.entity.id));
}

#[tokio::test]
async fn test_create_requires_titel() {
    let fx = Fixture::new();
    let err = fx
        .service
        .create_immobilie(
            NewImmobilie {
                titel: "   ".to_string(),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ImmobilienError::Validation { ref errors } if errors[0].field == ErrorField::Titel
    ));
    assert!(fx.store.immobilien.read().is_empty());
}

#[tokio::test]
async fn test_unchanged_patch_returns_current_entity() {
    print_test_header(
        "test_unchanged_patch_returns_current_entity",
        "Submitting the stored values is a successful no-op",
    );
    let fx = Fixture::new();
    let kontakt = fx.kontakt("Gleich").await;

    let outcome = fx
        .service
        .update_kontakt(
            kontakt.id,
            KontaktPatch {
                name: Some("Gleich".to_string()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(outcome.entity, kontakt);
    assert_eq!(fx.notifier.last().unwrap().message, MSG_UPDATED);
}

#[tokio::test]
async fn test_update_unknown_entity_is_not_found() {
    let fx = Fixture::new();
    let id = Uuid::new_v4();

    let err = fx
        .service
        .update_immobilie(
            id,
            ImmobiliePatch {
                titel: Some("X".to_string()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ImmobilienError::NotFound { table: Table::Immobilien, .. }));

    let last = fx.notifier.last().unwrap();
    assert_eq!(last.level, NotificationLevel::Error);
    assert_eq!(last.entity_id, Some(id));
    assert_eq!(last.message, "Immobilie nicht gefunden");
}

#[tokio::test]
async fn test_reconcile_unknown_entity_is_not_found() {
    let fx = Fixture::new();
    let err = fx
        .service
        .reconcile_relationships(Uuid::new_v4(), EditSide::Kontakte, Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ImmobilienError::NotFound { table: Table::Kontakte, .. }));
}

#[tokio::test]
async fn test_delete_and_details() {
    let fx = Fixture::new();
    let immobilie = fx.immobilie("Weg").await;
    let kontakt = fx.kontakt("Eigner").await;
    fx.service
        .reconcile_relationships(immobilie.id, EditSide::Immobilien, vec![eigentuemer(kontakt.id)])
        .await
        .unwrap();

    let details = fx.service.get_kontakt(kontakt.id).await.unwrap();
    assert_eq!(details.beziehungen.len(), 1);
    assert_eq!(details.beziehungen[0].immobilien_titel.as_deref(), Some("Weg"));

    fx.service.delete_immobilie(immobilie.id).await.unwrap();
    assert_eq!(fx.notifier.last().unwrap().message, MSG_DELETED);
    assert!(fx.service.get_kontakt(kontakt.id).await.unwrap().beziehungen.is_empty());

    let err = fx.service.delete_immobilie(immobilie.id).await.unwrap_err();
    assert!(matches!(err, ImmobilienError::NotFound { .. }));
}

// ===== Standalone relationships =====

#[tokio::test]
async fn test_create_beziehung_checks_persisted_tenancies() {
    print_test_header(
        "test_create_beziehung_checks_persisted_tenancies",
        "A standalone tenancy is checked against the property's stored tenancies",
    );
    let fx = Fixture::new();
    let immobilie = fx.immobilie("Haus").await;
    let k1 = fx.kontakt("Eins").await;
    let k2 = fx.kontakt("Zwei").await;

    let first = BeziehungDraft {
        immobilien_id: Some(immobilie.id),
        ..mieter(k1.id, date(2024, 1, 1), date(2024, 3, 31))
    };
    let created = fx.service.create_beziehung(first).await.unwrap();
    assert_eq!(created.art, Art::Mieter);

    let clash = BeziehungDraft {
        immobilien_id: Some(immobilie.id),
        ..mieter(k2.id, date(2024, 3, 31), date(2024, 5, 31))
    };
    let err = fx.service.create_beziehung(clash).await.unwrap_err();
    assert!(matches!(err, ImmobilienError::Validation { .. }));

    let missing_kontakt = BeziehungDraft {
        immobilien_id: Some(immobilie.id),
        ..eigentuemer(Uuid::new_v4())
    };
    let err = fx.service.create_beziehung(missing_kontakt).await.unwrap_err();
    assert!(matches!(err, ImmobilienError::NotFound { table: Table::Kontakte, .. }));
    assert_eq!(fx.store.count_beziehungen(), 1);
}

#[tokio::test]
async fn test_update_beziehung_excludes_itself() {
    print_test_header(
        "test_update_beziehung_excludes_itself",
        "Re-saving a tenancy with unchanged dates does not conflict with itself",
    );
    let fx = Fixture::new();
    let immobilie = fx.immobilie("Haus").await;
    let kontakt = fx.kontakt("Mieter").await;

    let created = fx
        .service
        .create_beziehung(BeziehungDraft {
            immobilien_id: Some(immobilie.id),
            ..mieter(kontakt.id, date(2024, 1, 1), date(2024, 6, 30))
        })
        .await
        .unwrap();

    let edit = BeziehungDraft {
        dienstleistungen: Some("  ".to_string()),
        ..BeziehungDraft::from(&created)
    };
    let updated = fx.service.update_beziehung(created.id, edit).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.startdatum, created.startdatum);
    assert_eq!(updated.dienstleistungen, None);

    let view = fx.service.get_beziehung(created.id).await.unwrap();
    assert_eq!(view.immobilien_titel.as_deref(), Some("Haus"));
    assert_eq!(view.kontakt_name.as_deref(), Some("Mieter"));
}

#[tokio::test]
async fn test_open_ended_conflicts_when_enabled() {
    let fx = Fixture::with_config(Config {
        open_ended_conflicts: true,
        ..Config::default()
    });
    let immobilie = fx.immobilie("Haus").await;
    let k1 = fx.kontakt("Eins").await;
    let k2 = fx.kontakt("Zwei").await;

    let open = BeziehungDraft {
        kontakt_id: Some(k1.id),
        art: Some("Mieter".to_string()),
        startdatum: Some(date(2024, 1, 1)),
        ..Default::default()
    };
    let later = mieter(k2.id, date(2030, 1, 1), date(2030, 12, 31));

    let err = fx
        .service
        .reconcile_relationships(immobilie.id, EditSide::Immobilien, vec![open, later])
        .await
        .unwrap_err();
    assert!(matches!(err, ImmobilienError::Validation { .. }));
}
