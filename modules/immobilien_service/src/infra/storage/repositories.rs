//! SeaORM repository implementations

use crate::contract::{
    Beziehung, BeziehungView, EditSide, Immobilie, ImmobiliePatch, Kontakt, KontaktPatch,
    NewBeziehung, NewImmobilie, NewKontakt,
};
use crate::domain::repository::{
    BeziehungFilter, BeziehungenRepository, ImmobilienRepository, KontakteRepository,
};
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

use super::entity::{beziehung, immobilie, kontakt};
use super::mapper;

// ===== Immobilien Repository =====

pub struct SeaOrmImmobilienRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmImmobilienRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ImmobilienRepository for SeaOrmImmobilienRepository {
    async fn create(&self, data: &NewImmobilie) -> Result<Immobilie> {
        let active: immobilie::ActiveModel = data.into();
        let model = active.insert(&*self.db).await?;
        Ok(model.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Immobilie>> {
        let result = immobilie::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<Immobilie>> {
        let results = immobilie::Entity::find()
            .order_by_desc(immobilie::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: Uuid, patch: &ImmobiliePatch) -> Result<Option<Immobilie>> {
        match mapper::immobilie_patch(id, patch).update(&*self.db).await {
            Ok(model) => Ok(Some(model.into())),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_with_beziehungen(
        &self,
        data: &NewImmobilie,
        rows: &[NewBeziehung],
    ) -> Result<(Immobilie, Vec<Beziehung>)> {
        let txn = self.db.begin().await?;

        let active: immobilie::ActiveModel = data.into();
        let model = active.insert(&txn).await?;
        let rows: Vec<NewBeziehung> = rows
            .iter()
            .map(|row| NewBeziehung {
                immobilien_id: model.id,
                ..row.clone()
            })
            .collect();
        let inserted = insert_rows(&txn, &rows).await?;

        txn.commit().await?;
        Ok((model.into(), inserted))
    }

    async fn update_with_beziehungen(
        &self,
        id: Uuid,
        patch: &ImmobiliePatch,
        rows: &[NewBeziehung],
    ) -> Result<Option<(Immobilie, Vec<Beziehung>)>> {
        // Dropping the transaction on error rolls back the field update too
        let txn = self.db.begin().await?;

        let updated = if patch.is_empty() {
            immobilie::Entity::find_by_id(id).one(&txn).await?
        } else {
            match mapper::immobilie_patch(id, patch).update(&txn).await {
                Ok(model) => Some(model),
                Err(DbErr::RecordNotUpdated) => None,
                Err(e) => return Err(e.into()),
            }
        };
        let Some(model) = updated else {
            return Ok(None);
        };
        let inserted = replace_rows(&txn, EditSide::Immobilien, id, rows).await?;

        txn.commit().await?;
        Ok(Some((model.into(), inserted)))
    }

    async fn delete(&self, id: Uuid) -> Result<u64> {
        let result = immobilie::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(result.rows_affected)
    }
}

// ===== Kontakte Repository =====

pub struct SeaOrmKontakteRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmKontakteRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl KontakteRepository for SeaOrmKontakteRepository {
    async fn create(&self, data: &NewKontakt) -> Result<Kontakt> {
        let active: kontakt::ActiveModel = data.into();
        let model = active.insert(&*self.db).await?;
        Ok(model.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Kontakt>> {
        let result = kontakt::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<Kontakt>> {
        let results = kontakt::Entity::find()
            .order_by_desc(kontakt::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: Uuid, patch: &KontaktPatch) -> Result<Option<Kontakt>> {
        match mapper::kontakt_patch(id, patch).update(&*self.db).await {
            Ok(model) => Ok(Some(model.into())),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_with_beziehungen(
        &self,
        data: &NewKontakt,
        rows: &[NewBeziehung],
    ) -> Result<(Kontakt, Vec<Beziehung>)> {
        let txn = self.db.begin().await?;

        let active: kontakt::ActiveModel = data.into();
        let model = active.insert(&txn).await?;
        let rows: Vec<NewBeziehung> = rows
            .iter()
            .map(|row| NewBeziehung {
                kontakt_id: model.id,
                ..row.clone()
            })
            .collect();
        let inserted = insert_rows(&txn, &rows).await?;

        txn.commit().await?;
        Ok((model.into(), inserted))
    }

    async fn update_with_beziehungen(
        &self,
        id: Uuid,
        patch: &KontaktPatch,
        rows: &[NewBeziehung],
    ) -> Result<Option<(Kontakt, Vec<Beziehung>)>> {
        let txn = self.db.begin().await?;

        let updated = if patch.is_empty() {
            kontakt::Entity::find_by_id(id).one(&txn).await?
        } else {
            match mapper::kontakt_patch(id, patch).update(&txn).await {
                Ok(model) => Some(model),
                Err(DbErr::RecordNotUpdated) => None,
                Err(e) => return Err(e.into()),
            }
        };
        let Some(model) = updated else {
            return Ok(None);
        };
        let inserted = replace_rows(&txn, EditSide::Kontakte, id, rows).await?;

        txn.commit().await?;
        Ok(Some((model.into(), inserted)))
    }

    async fn delete(&self, id: Uuid) -> Result<u64> {
        let result = kontakt::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(result.rows_affected)
    }
}

// ===== Beziehungen Repository =====

pub struct SeaOrmBeziehungenRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmBeziehungenRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Titles of the given properties; a failed lookup yields no labels
    async fn immobilien_titles(&self, ids: Vec<Uuid>) -> HashMap<Uuid, String> {
        if ids.is_empty() {
            return HashMap::new();
        }
        match immobilie::Entity::find()
            .filter(immobilie::Column::Id.is_in(ids))
            .all(&*self.db)
            .await
        {
            Ok(rows) => rows.into_iter().map(|r| (r.id, r.titel)).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load property labels");
                HashMap::new()
            }
        }
    }

    /// Names of the given contacts; a failed lookup yields no labels
    async fn kontakt_names(&self, ids: Vec<Uuid>) -> HashMap<Uuid, String> {
        if ids.is_empty() {
            return HashMap::new();
        }
        match kontakt::Entity::find()
            .filter(kontakt::Column::Id.is_in(ids))
            .all(&*self.db)
            .await
        {
            Ok(rows) => rows.into_iter().map(|r| (r.id, r.name)).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load contact labels");
                HashMap::new()
            }
        }
    }
}

/// Apply the set fields of `filter` as equality conditions
fn filtered<Q: QueryFilter>(mut query: Q, filter: &BeziehungFilter) -> Q {
    if let Some(id) = filter.immobilien_id {
        query = query.filter(beziehung::Column::ImmobilienId.eq(id));
    }
    if let Some(id) = filter.kontakt_id {
        query = query.filter(beziehung::Column::KontaktId.eq(id));
    }
    if let Some(art) = filter.art {
        query = query.filter(beziehung::Column::Art.eq(art.as_str()));
    }
    query
}

async fn insert_rows<C: ConnectionTrait>(conn: &C, rows: &[NewBeziehung]) -> Result<Vec<Beziehung>> {
    let mut inserted = Vec::with_capacity(rows.len());
    for row in rows {
        let active: beziehung::ActiveModel = row.into();
        let model = active.insert(conn).await?;
        inserted.push(Beziehung::try_from(model)?);
    }
    Ok(inserted)
}

/// Delete the relationships of an entity and insert `rows` on `conn`
async fn replace_rows<C: ConnectionTrait>(
    conn: &C,
    side: EditSide,
    entity_id: Uuid,
    rows: &[NewBeziehung],
) -> Result<Vec<Beziehung>> {
    let removed = filtered(
        beziehung::Entity::delete_many(),
        &BeziehungFilter::for_entity(side, entity_id),
    )
    .exec(conn)
    .await?;
    let inserted = insert_rows(conn, rows).await?;

    tracing::debug!(
        entity_id = %entity_id,
        side = side.as_str(),
        removed = removed.rows_affected,
        inserted = inserted.len(),
        "Relationship set replaced"
    );
    Ok(inserted)
}

#[async_trait]
impl BeziehungenRepository for SeaOrmBeziehungenRepository {
    async fn create(&self, data: &NewBeziehung) -> Result<Beziehung> {
        let active: beziehung::ActiveModel = data.into();
        let model = active.insert(&*self.db).await?;
        Beziehung::try_from(model)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Beziehung>> {
        let result = beziehung::Entity::find_by_id(id).one(&*self.db).await?;
        result.map(Beziehung::try_from).transpose()
    }

    async fn find(&self, filter: &BeziehungFilter) -> Result<Vec<Beziehung>> {
        let results = filtered(beziehung::Entity::find(), filter)
            .order_by_desc(beziehung::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        mapper::beziehungen_from_models(results)
    }

    async fn find_views(&self, filter: &BeziehungFilter) -> Result<Vec<BeziehungView>> {
        let beziehungen = self.find(filter).await?;

        let immobilien_ids: HashSet<Uuid> = beziehungen.iter().map(|b| b.immobilien_id).collect();
        let kontakt_ids: HashSet<Uuid> = beziehungen.iter().map(|b| b.kontakt_id).collect();
        let (titles, names) = tokio::join!(
            self.immobilien_titles(immobilien_ids.into_iter().collect()),
            self.kontakt_names(kontakt_ids.into_iter().collect()),
        );

        Ok(beziehungen
            .into_iter()
            .map(|beziehung| BeziehungView {
                immobilien_titel: titles.get(&beziehung.immobilien_id).cloned(),
                kontakt_name: names.get(&beziehung.kontakt_id).cloned(),
                beziehung,
            })
            .collect())
    }

    async fn insert_many(&self, rows: &[NewBeziehung]) -> Result<Vec<Beziehung>> {
        let txn = self.db.begin().await?;
        let inserted = insert_rows(&txn, rows).await?;
        txn.commit().await?;
        Ok(inserted)
    }

    async fn update(&self, id: Uuid, data: &NewBeziehung) -> Result<Option<Beziehung>> {
        match mapper::beziehung_update(id, data).update(&*self.db).await {
            Ok(model) => Ok(Some(Beziehung::try_from(model)?)),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<u64> {
        let result = beziehung::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(result.rows_affected)
    }

    async fn delete_where(&self, filter: &BeziehungFilter) -> Result<u64> {
        let result = filtered(beziehung::Entity::delete_many(), filter)
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }

    async fn replace_for_entity(
        &self,
        side: EditSide,
        entity_id: Uuid,
        rows: &[NewBeziehung],
    ) -> Result<Vec<Beziehung>> {
        // Dropping the transaction on error rolls it back
        let txn = self.db.begin().await?;
        let inserted = replace_rows(&txn, side, entity_id, rows).await?;
        txn.commit().await?;
        Ok(inserted)
    }
}
