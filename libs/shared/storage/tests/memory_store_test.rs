// libs/shared/storage/tests/memory_store_test.rs
// Claim bookkeeping and record behavior of the in-memory store.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime};
use futures::future::join_all;

use shared_models::domain::{
    AppointmentFilter, AppointmentStatus, NewAppointment, NewAvailabilityWindow, NewPatient,
    NewProfessional, NewSpecialty, WindowChanges,
};
use shared_storage::{ClinicStore, MemoryStore, StorageError};

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_appointment(patient_id: i64, professional_id: i64, slot: NaiveTime) -> NewAppointment {
    NewAppointment {
        patient_id,
        professional_id,
        date: date(2025, 6, 2),
        time_slot: slot,
    }
}

async fn seed_patient(store: &MemoryStore, name: &str, cpf: &str) -> i64 {
    store
        .insert_patient(NewPatient {
            name: name.to_string(),
            cpf: cpf.to_string(),
            biometric_opt_in: false,
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_insert_appointment_claims_slot() {
    let store = MemoryStore::new();

    let first = store
        .insert_appointment(new_appointment(1, 1, time(8, 0)))
        .await
        .unwrap();
    assert_eq!(first.status, AppointmentStatus::Scheduled);

    let second = store
        .insert_appointment(new_appointment(2, 1, time(8, 0)))
        .await;
    assert_matches!(second, Err(StorageError::SlotTaken));

    // A different slot on the same day is unaffected.
    let other_slot = store
        .insert_appointment(new_appointment(2, 1, time(8, 30)))
        .await;
    assert!(other_slot.is_ok());

    // Same slot for a different professional is unaffected.
    let other_professional = store
        .insert_appointment(new_appointment(2, 2, time(8, 0)))
        .await;
    assert!(other_professional.is_ok());
}

#[tokio::test]
async fn test_cancellation_releases_claim() {
    let store = MemoryStore::new();

    let appointment = store
        .insert_appointment(new_appointment(1, 1, time(9, 0)))
        .await
        .unwrap();

    let cancelled = store
        .update_appointment_status(appointment.id, AppointmentStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);

    let rebooked = store
        .insert_appointment(new_appointment(2, 1, time(9, 0)))
        .await;
    assert!(rebooked.is_ok());
}

#[tokio::test]
async fn test_reinstating_into_occupied_slot_fails() {
    let store = MemoryStore::new();

    let original = store
        .insert_appointment(new_appointment(1, 1, time(10, 0)))
        .await
        .unwrap();
    store
        .update_appointment_status(original.id, AppointmentStatus::Cancelled)
        .await
        .unwrap();

    // Someone else takes the freed slot.
    store
        .insert_appointment(new_appointment(2, 1, time(10, 0)))
        .await
        .unwrap();

    let reinstated = store
        .update_appointment_status(original.id, AppointmentStatus::Scheduled)
        .await;
    assert_matches!(reinstated, Err(StorageError::SlotTaken));
}

#[tokio::test]
async fn test_update_status_unknown_appointment() {
    let store = MemoryStore::new();
    let result = store
        .update_appointment_status(999, AppointmentStatus::Cancelled)
        .await;
    assert_matches!(result, Err(StorageError::NotFound));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_inserts_single_winner() {
    let store = Arc::new(MemoryStore::new());
    let barrier = Arc::new(tokio::sync::Barrier::new(16));

    let tasks: Vec<_> = (0..16)
        .map(|patient_id| {
            let store = store.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                barrier.wait().await;
                store
                    .insert_appointment(new_appointment(patient_id, 1, time(11, 0)))
                    .await
            })
        })
        .collect();

    let results: Vec<_> = join_all(tasks).await.into_iter().map(|r| r.unwrap()).collect();
    let successes = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(StorageError::SlotTaken)))
        .count();

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 15);
}

#[tokio::test]
async fn test_scheduled_for_day_excludes_cancelled() {
    let store = MemoryStore::new();

    let kept = store
        .insert_appointment(new_appointment(1, 1, time(8, 0)))
        .await
        .unwrap();
    let dropped = store
        .insert_appointment(new_appointment(2, 1, time(8, 30)))
        .await
        .unwrap();
    store
        .update_appointment_status(dropped.id, AppointmentStatus::Cancelled)
        .await
        .unwrap();

    let scheduled = store.scheduled_for_day(1, date(2025, 6, 2)).await.unwrap();
    assert_eq!(scheduled.len(), 1);
    assert_eq!(scheduled[0].id, kept.id);
}

#[tokio::test]
async fn test_list_appointments_filters_and_paginates() {
    let store = MemoryStore::new();

    for slot in [time(8, 0), time(8, 30), time(9, 0)] {
        store
            .insert_appointment(new_appointment(1, 1, slot))
            .await
            .unwrap();
    }
    store
        .insert_appointment(new_appointment(2, 2, time(8, 0)))
        .await
        .unwrap();

    let for_professional = store
        .list_appointments(AppointmentFilter {
            professional_id: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(for_professional.len(), 3);
    // Ordered by time slot within the day.
    assert_eq!(for_professional[0].time_slot, time(8, 0));
    assert_eq!(for_professional[2].time_slot, time(9, 0));

    let page = store
        .list_appointments(AppointmentFilter {
            professional_id: Some(1),
            offset: 1,
            limit: 1,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].time_slot, time(8, 30));

    let for_patient = store
        .list_appointments(AppointmentFilter {
            patient_id: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(for_patient.len(), 1);
}

#[tokio::test]
async fn test_duplicate_cpf_rejected() {
    let store = MemoryStore::new();
    seed_patient(&store, "Maria Oliveira Costa", "12345678901").await;

    let duplicate = store
        .insert_patient(NewPatient {
            name: "Outra Pessoa".to_string(),
            cpf: "12345678901".to_string(),
            biometric_opt_in: true,
        })
        .await;
    assert_matches!(duplicate, Err(StorageError::Duplicate(_)));
}

#[tokio::test]
async fn test_duplicate_specialty_and_license_rejected() {
    let store = MemoryStore::new();

    store
        .insert_specialty(NewSpecialty {
            name: "Cardiologia".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let duplicate_name = store
        .insert_specialty(NewSpecialty {
            name: "Cardiologia".to_string(),
            description: Some("duplicada".to_string()),
        })
        .await;
    assert_matches!(duplicate_name, Err(StorageError::Duplicate(_)));

    store
        .insert_professional(NewProfessional {
            name: "Dra. Ana Beatriz Rocha".to_string(),
            license_number: "CRM-12345".to_string(),
            specialty_id: 1,
        })
        .await
        .unwrap();
    let duplicate_license = store
        .insert_professional(NewProfessional {
            name: "Dr. Carlos Lima".to_string(),
            license_number: "CRM-12345".to_string(),
            specialty_id: 1,
        })
        .await;
    assert_matches!(duplicate_license, Err(StorageError::Duplicate(_)));
}

#[tokio::test]
async fn test_window_crud_and_ordering() {
    let store = MemoryStore::new();

    let afternoon = store
        .insert_window(NewAvailabilityWindow {
            professional_id: 1,
            day_of_week: 2,
            start_time: time(14, 0),
            end_time: time(17, 0),
            slot_duration_minutes: 30,
        })
        .await
        .unwrap();
    let morning = store
        .insert_window(NewAvailabilityWindow {
            professional_id: 1,
            day_of_week: 0,
            start_time: time(8, 0),
            end_time: time(12, 0),
            slot_duration_minutes: 15,
        })
        .await
        .unwrap();

    let all = store.windows_for_professional(1).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, morning.id);
    assert_eq!(all[1].id, afternoon.id);

    let updated = store
        .update_window(
            afternoon.id,
            WindowChanges {
                end_time: Some(time(18, 0)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.end_time, time(18, 0));
    assert_eq!(updated.start_time, time(14, 0));

    store.delete_window(morning.id).await.unwrap();
    assert_matches!(
        store.delete_window(morning.id).await,
        Err(StorageError::NotFound)
    );
    assert_eq!(store.windows_for_day(1, 0).await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_fingerprint_roundtrip() {
    let store = MemoryStore::new();
    let patient_id = seed_patient(&store, "Paulo Mendes", "98765432100").await;

    assert_eq!(store.load_fingerprint(patient_id).await.unwrap(), None);

    let template = vec![0x44, 0x41, 0x54, 0x01, 0x02];
    let updated = store
        .store_fingerprint(patient_id, template.clone())
        .await
        .unwrap();
    assert!(updated.fingerprint_enrolled);

    let loaded = store.load_fingerprint(patient_id).await.unwrap();
    assert_eq!(loaded, Some(template));

    assert_matches!(
        store.load_fingerprint(999).await,
        Err(StorageError::NotFound)
    );
}
