//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use crate::contract::{
    Art, Beziehung, Immobilie, ImmobiliePatch, Kontakt, KontaktPatch, NewBeziehung,
    NewImmobilie, NewKontakt,
};
use anyhow::anyhow;
use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use uuid::Uuid;

use super::entity::{beziehung, immobilie, kontakt};

// ===== Immobilie Conversions =====

impl From<immobilie::Model> for Immobilie {
    fn from(entity: immobilie::Model) -> Self {
        Self {
            id: entity.id,
            titel: entity.titel,
            beschreibung: entity.beschreibung,
            adresse: entity.adresse,
            created_at: entity.created_at,
        }
    }
}

impl From<&NewImmobilie> for immobilie::ActiveModel {
    fn from(model: &NewImmobilie) -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            titel: Set(model.titel.clone()),
            beschreibung: Set(model.beschreibung.clone()),
            adresse: Set(model.adresse.clone()),
            created_at: Set(Utc::now()),
        }
    }
}

/// Active model that writes only the fields set in `patch`
pub fn immobilie_patch(id: Uuid, patch: &ImmobiliePatch) -> immobilie::ActiveModel {
    immobilie::ActiveModel {
        id: Unchanged(id),
        titel: patch.titel.clone().map_or(NotSet, Set),
        beschreibung: patch.beschreibung.clone().map_or(NotSet, |b| Set(Some(b))),
        adresse: patch.adresse.clone().map_or(NotSet, |a| Set(Some(a))),
        created_at: NotSet,
    }
}

// ===== Kontakt Conversions =====

impl From<kontakt::Model> for Kontakt {
    fn from(entity: kontakt::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            adresse: entity.adresse,
            created_at: entity.created_at,
        }
    }
}

impl From<&NewKontakt> for kontakt::ActiveModel {
    fn from(model: &NewKontakt) -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            name: Set(model.name.clone()),
            adresse: Set(model.adresse.clone()),
            created_at: Set(Utc::now()),
        }
    }
}

/// Active model that writes only the fields set in `patch`
pub fn kontakt_patch(id: Uuid, patch: &KontaktPatch) -> kontakt::ActiveModel {
    kontakt::ActiveModel {
        id: Unchanged(id),
        name: patch.name.clone().map_or(NotSet, Set),
        adresse: patch.adresse.clone().map_or(NotSet, |a| Set(Some(a))),
        created_at: NotSet,
    }
}

// ===== Beziehung Conversions =====

impl TryFrom<beziehung::Model> for Beziehung {
    type Error = anyhow::Error;

    fn try_from(entity: beziehung::Model) -> Result<Self, Self::Error> {
        let art = Art::parse(&entity.art)
            .ok_or_else(|| anyhow!("unknown relationship kind '{}' in row {}", entity.art, entity.id))?;

        Ok(Self {
            id: entity.id,
            immobilien_id: entity.immobilien_id,
            kontakt_id: entity.kontakt_id,
            art,
            startdatum: entity.startdatum,
            enddatum: entity.enddatum,
            dienstleistungen: entity.dienstleistungen,
            created_at: entity.created_at,
        })
    }
}

impl From<&NewBeziehung> for beziehung::ActiveModel {
    fn from(model: &NewBeziehung) -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            immobilien_id: Set(model.immobilien_id),
            kontakt_id: Set(model.kontakt_id),
            art: Set(model.art.as_str().to_string()),
            startdatum: Set(model.startdatum),
            enddatum: Set(model.enddatum),
            dienstleistungen: Set(model.dienstleistungen.clone()),
            created_at: Set(Utc::now()),
        }
    }
}

/// Active model overwriting every writable column of row `id`
pub fn beziehung_update(id: Uuid, model: &NewBeziehung) -> beziehung::ActiveModel {
    beziehung::ActiveModel {
        id: Unchanged(id),
        created_at: NotSet,
        ..beziehung::ActiveModel::from(model)
    }
}

/// Convert a batch of rows, failing on the first unreadable one
pub fn beziehungen_from_models(models: Vec<beziehung::Model>) -> anyhow::Result<Vec<Beziehung>> {
    models.into_iter().map(Beziehung::try_from).collect()
}
