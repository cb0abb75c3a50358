//! Common test utilities: in-memory repositories and a recording notifier
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use immobilien_service::config::{Config, ReconcileStrategy};
use immobilien_service::contract::*;
use immobilien_service::domain::repository::{
    BeziehungFilter, BeziehungenRepository, ImmobilienRepository, KontakteRepository,
};
use immobilien_service::domain::{Notification, Notifier, Service};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Shared in-memory tables with switchable store failures
#[derive(Default)]
pub struct MockStore {
    pub immobilien: RwLock<HashMap<Uuid, Immobilie>>,
    pub kontakte: RwLock<HashMap<Uuid, Kontakt>>,
    pub beziehungen: RwLock<HashMap<Uuid, Beziehung>>,
    pub fail_delete: AtomicBool,
    pub fail_insert: AtomicBool,
    pub fail_replace: AtomicBool,
}

impl MockStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn beziehungen_of_immobilie(&self, id: Uuid) -> Vec<Beziehung> {
        let mut rows: Vec<Beziehung> = self
            .beziehungen
            .read()
            .values()
            .filter(|b| b.immobilien_id == id)
            .cloned()
            .collect();
        rows.sort_by_key(|b| b.created_at);
        rows
    }

    pub fn beziehungen_of_kontakt(&self, id: Uuid) -> Vec<Beziehung> {
        self.beziehungen
            .read()
            .values()
            .filter(|b| b.kontakt_id == id)
            .cloned()
            .collect()
    }

    pub fn count_beziehungen(&self) -> usize {
        self.beziehungen.read().len()
    }

    pub fn insert_beziehung(&self, row: NewBeziehung) -> Beziehung {
        let beziehung = to_beziehung(&row);
        self.beziehungen
            .write()
            .insert(beziehung.id, beziehung.clone());
        beziehung
    }

    /// Drop the entity's relationships and insert `rows`
    pub fn replace_beziehungen(
        &self,
        side: EditSide,
        entity_id: Uuid,
        rows: &[NewBeziehung],
    ) -> Vec<Beziehung> {
        let filter = BeziehungFilter::for_entity(side, entity_id);
        self.beziehungen.write().retain(|_, b| !filter.matches(b));
        rows.iter()
            .map(|row| self.insert_beziehung(row.clone()))
            .collect()
    }

    fn bail_if(&self, flag: &AtomicBool, what: &str) -> anyhow::Result<()> {
        if flag.load(Ordering::SeqCst) {
            anyhow::bail!("simulated {what} failure");
        }
        Ok(())
    }
}

fn to_beziehung(row: &NewBeziehung) -> Beziehung {
    Beziehung {
        id: Uuid::new_v4(),
        immobilien_id: row.immobilien_id,
        kontakt_id: row.kontakt_id,
        art: row.art,
        startdatum: row.startdatum,
        enddatum: row.enddatum,
        dienstleistungen: row.dienstleistungen.clone(),
        created_at: Utc::now(),
    }
}

pub struct MockImmobilienRepo(pub Arc<MockStore>);

#[async_trait]
impl ImmobilienRepository for MockImmobilienRepo {
    async fn create(&self, data: &NewImmobilie) -> anyhow::Result<Immobilie> {
        let immobilie = Immobilie {
            id: Uuid::new_v4(),
            titel: data.titel.clone(),
            beschreibung: data.beschreibung.clone(),
            adresse: data.adresse.clone(),
            created_at: Utc::now(),
        };
        self.0
            .immobilien
            .write()
            .insert(immobilie.id, immobilie.clone());
        Ok(immobilie)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Immobilie>> {
        Ok(self.0.immobilien.read().get(&id).cloned())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Immobilie>> {
        let mut all: Vec<Immobilie> = self.0.immobilien.read().values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn update(&self, id: Uuid, patch: &ImmobiliePatch) -> anyhow::Result<Option<Immobilie>> {
        let mut data = self.0.immobilien.write();
        Ok(data.get_mut(&id).map(|current| {
            if let Some(titel) = &patch.titel {
                current.titel = titel.clone();
            }
            if let Some(beschreibung) = &patch.beschreibung {
                current.beschreibung = Some(beschreibung.clone());
            }
            if let Some(adresse) = &patch.adresse {
                current.adresse = Some(adresse.clone());
            }
            current.clone()
        }))
    }

    async fn create_with_beziehungen(
        &self,
        data: &NewImmobilie,
        rows: &[NewBeziehung],
    ) -> anyhow::Result<(Immobilie, Vec<Beziehung>)> {
        self.0.bail_if(&self.0.fail_replace, "create")?;
        let immobilie = self.create(data).await?;
        let rows: Vec<NewBeziehung> = rows
            .iter()
            .map(|row| NewBeziehung {
                immobilien_id: immobilie.id,
                ..row.clone()
            })
            .collect();
        let inserted = self
            .0
            .replace_beziehungen(EditSide::Immobilien, immobilie.id, &rows);
        Ok((immobilie, inserted))
    }

    async fn update_with_beziehungen(
        &self,
        id: Uuid,
        patch: &ImmobiliePatch,
        rows: &[NewBeziehung],
    ) -> anyhow::Result<Option<(Immobilie, Vec<Beziehung>)>> {
        // Fails before touching anything, like a rolled back transaction
        self.0.bail_if(&self.0.fail_replace, "update")?;
        let Some(immobilie) = self.update(id, patch).await? else {
            return Ok(None);
        };
        let inserted = self.0.replace_beziehungen(EditSide::Immobilien, id, rows);
        Ok(Some((immobilie, inserted)))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<u64> {
        let removed = self.0.immobilien.write().remove(&id);
        if removed.is_none() {
            return Ok(0);
        }
        self.0
            .beziehungen
            .write()
            .retain(|_, b| b.immobilien_id != id);
        Ok(1)
    }
}

pub struct MockKontakteRepo(pub Arc<MockStore>);

#[async_trait]
impl KontakteRepository for MockKontakteRepo {
    async fn create(&self, data: &NewKontakt) -> anyhow::Result<Kontakt> {
        let kontakt = Kontakt {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            adresse: data.adresse.clone(),
            created_at: Utc::now(),
        };
        self.0.kontakte.write().insert(kontakt.id, kontakt.clone());
        Ok(kontakt)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Kontakt>> {
        Ok(self.0.kontakte.read().get(&id).cloned())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Kontakt>> {
        let mut all: Vec<Kontakt> = self.0.kontakte.read().values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn update(&self, id: Uuid, patch: &KontaktPatch) -> anyhow::Result<Option<Kontakt>> {
        let mut data = self.0.kontakte.write();
        Ok(data.get_mut(&id).map(|current| {
            if let Some(name) = &patch.name {
                current.name = name.clone();
            }
            if let Some(adresse) = &patch.adresse {
                current.adresse = Some(adresse.clone());
            }
            current.clone()
        }))
    }

    async fn create_with_beziehungen(
        &self,
        data: &NewKontakt,
        rows: &[NewBeziehung],
    ) -> anyhow::Result<(Kontakt, Vec<Beziehung>)> {
        self.0.bail_if(&self.0.fail_replace, "create")?;
        let kontakt = self.create(data).await?;
        let rows: Vec<NewBeziehung> = rows
            .iter()
            .map(|row| NewBeziehung {
                kontakt_id: kontakt.id,
                ..row.clone()
            })
            .collect();
        let inserted = self
            .0
            .replace_beziehungen(EditSide::Kontakte, kontakt.id, &rows);
        Ok((kontakt, inserted))
    }

    async fn update_with_beziehungen(
        &self,
        id: Uuid,
        patch: &KontaktPatch,
        rows: &[NewBeziehung],
    ) -> anyhow::Result<Option<(Kontakt, Vec<Beziehung>)>> {
        self.0.bail_if(&self.0.fail_replace, "update")?;
        let Some(kontakt) = self.update(id, patch).await? else {
            return Ok(None);
        };
        let inserted = self.0.replace_beziehungen(EditSide::Kontakte, id, rows);
        Ok(Some((kontakt, inserted)))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<u64> {
        let removed = self.0.kontakte.write().remove(&id);
        if removed.is_none() {
            return Ok(0);
        }
        self.0.beziehungen.write().retain(|_, b| b.kontakt_id != id);
        Ok(1)
    }
}

pub struct MockBeziehungenRepo(pub Arc<MockStore>);

impl MockBeziehungenRepo {
    fn view(&self, beziehung: Beziehung) -> BeziehungView {
        BeziehungView {
            immobilien_titel: self
                .0
                .immobilien
                .read()
                .get(&beziehung.immobilien_id)
                .map(|i| i.titel.clone()),
            kontakt_name: self
                .0
                .kontakte
                .read()
                .get(&beziehung.kontakt_id)
                .map(|k| k.name.clone()),
            beziehung,
        }
    }
}

#[async_trait]
impl BeziehungenRepository for MockBeziehungenRepo {
    async fn create(&self, data: &NewBeziehung) -> anyhow::Result<Beziehung> {
        self.0.bail_if(&self.0.fail_insert, "insert")?;
        Ok(self.0.insert_beziehung(data.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Beziehung>> {
        Ok(self.0.beziehungen.read().get(&id).cloned())
    }

    async fn find(&self, filter: &BeziehungFilter) -> anyhow::Result<Vec<Beziehung>> {
        let mut rows: Vec<Beziehung> = self
            .0
            .beziehungen
            .read()
            .values()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find_views(&self, filter: &BeziehungFilter) -> anyhow::Result<Vec<BeziehungView>> {
        let rows = self.find(filter).await?;
        Ok(rows.into_iter().map(|b| self.view(b)).collect())
    }

    async fn insert_many(&self, rows: &[NewBeziehung]) -> anyhow::Result<Vec<Beziehung>> {
        self.0.bail_if(&self.0.fail_insert, "insert")?;
        Ok(rows
            .iter()
            .map(|row| self.0.insert_beziehung(row.clone()))
            .collect())
    }

    async fn update(&self, id: Uuid, data: &NewBeziehung) -> anyhow::Result<Option<Beziehung>> {
        let mut table = self.0.beziehungen.write();
        Ok(table.get_mut(&id).map(|current| {
            current.immobilien_id = data.immobilien_id;
            current.kontakt_id = data.kontakt_id;
            current.art = data.art;
            current.startdatum = data.startdatum;
            current.enddatum = data.enddatum;
            current.dienstleistungen = data.dienstleistungen.clone();
            current.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<u64> {
        Ok(self.0.beziehungen.write().remove(&id).map_or(0, |_| 1))
    }

    async fn delete_where(&self, filter: &BeziehungFilter) -> anyhow::Result<u64> {
        self.0.bail_if(&self.0.fail_delete, "delete")?;
        let mut table = self.0.beziehungen.write();
        let before = table.len();
        table.retain(|_, b| !filter.matches(b));
        Ok((before - table.len()) as u64)
    }

    async fn replace_for_entity(
        &self,
        side: EditSide,
        entity_id: Uuid,
        rows: &[NewBeziehung],
    ) -> anyhow::Result<Vec<Beziehung>> {
        // Fails before touching anything, like a rolled back transaction
        self.0.bail_if(&self.0.fail_replace, "replace")?;
        Ok(self.0.replace_beziehungen(side, entity_id, rows))
    }
}

/// Notifier that keeps every notification for inspection
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: RwLock<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn last(&self) -> Option<Notification> {
        self.sent.read().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.sent.read().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: Notification) -> anyhow::Result<()> {
        self.sent.write().push(notification);
        Ok(())
    }
}

/// Service over fresh in-memory tables
pub struct Fixture {
    pub store: Arc<MockStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub service: Arc<Service>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_strategy(strategy: ReconcileStrategy) -> Self {
        Self::with_config(Config {
            reconcile_strategy: strategy,
            ..Config::default()
        })
    }

    pub fn with_config(config: Config) -> Self {
        let store = MockStore::new();
        let notifier = Arc::new(RecordingNotifier::default());
        let service = Arc::new(Service::new(
            Arc::new(MockImmobilienRepo(store.clone())),
            Arc::new(MockKontakteRepo(store.clone())),
            Arc::new(MockBeziehungenRepo(store.clone())),
            notifier.clone(),
            &config,
        ));
        Self {
            store,
            notifier,
            service,
        }
    }

    pub async fn immobilie(&self, titel: &str) -> Immobilie {
        let data = NewImmobilie {
            titel: titel.to_string(),
            ..Default::default()
        };
        self.service
            .create_immobilie(data, None)
            .await
            .unwrap()
            .entity
    }

    pub async fn kontakt(&self, name: &str) -> Kontakt {
        let data = NewKontakt {
            name: name.to_string(),
            ..Default::default()
        };
        self.service.create_kontakt(data, None).await.unwrap().entity
    }
}

/// Draft as a property form would submit it
pub fn mieter(kontakt_id: Uuid, start: NaiveDate, end: NaiveDate) -> BeziehungDraft {
    BeziehungDraft {
        kontakt_id: Some(kontakt_id),
        art: Some("Mieter".to_string()),
        startdatum: Some(start),
        enddatum: Some(end),
        ..Default::default()
    }
}

pub fn eigentuemer(kontakt_id: Uuid) -> BeziehungDraft {
    BeziehungDraft {
        kontakt_id: Some(kontakt_id),
        art: Some("Eigentümer".to_string()),
        ..Default::default()
    }
}

pub fn dienstleister(kontakt_id: Uuid, dienstleistungen: &str) -> BeziehungDraft {
    BeziehungDraft {
        kontakt_id: Some(kontakt_id),
        art: Some("Dienstleister".to_string()),
        dienstleistungen: Some(dienstleistungen.to_string()),
        ..Default::default()
    }
}
