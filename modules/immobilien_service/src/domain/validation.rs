//! Relationship and entity validation rules

use crate::contract::{
    Art, BeziehungDraft, EditSide, ErrorField, FieldError, ImmobilienError, NewImmobilie,
    NewKontakt, ValidationResult,
};
use uuid::Uuid;

use super::conflict::ConflictDetector;

pub const MSG_ART_REQUIRED: &str = "Beziehungstyp ist erforderlich.";
pub const MSG_ENTITY_REQUIRED: &str = "Kontakt/Immobilie ist erforderlich.";
pub const MSG_DIENSTLEISTUNGEN_REQUIRED: &str =
    "Dienstleistungen sind für Dienstleister-Beziehungen erforderlich.";
pub const MSG_MIETER_CONFLICT: &str = "Mieter ist in diesem Zeitraum schon zur Miete";
pub const MSG_DATE_ORDER: &str = "Enddatum muss nach dem Startdatum liegen.";
pub const MSG_TITEL_REQUIRED: &str = "Titel ist erforderlich.";
pub const MSG_NAME_REQUIRED: &str = "Name ist erforderlich.";

/// Stateless rule engine for relationship candidates.
///
/// Every rule runs, so one verdict can carry several field errors. The
/// validator never reads the store; callers supply the `existing` set.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationshipValidator {
    detector: ConflictDetector,
}

impl RelationshipValidator {
    pub fn new(detector: ConflictDetector) -> Self {
        Self { detector }
    }

    /// Validate `candidate` against `existing` for the given edit side
    pub fn validate(
        &self,
        candidate: &BeziehungDraft,
        existing: &[BeziehungDraft],
        side: EditSide,
    ) -> ValidationResult {
        let mut errors = Vec::new();

        match candidate.art.as_deref() {
            None => errors.push(FieldError::new(ErrorField::Art, MSG_ART_REQUIRED)),
            Some(raw) if raw.trim().is_empty() => {
                errors.push(FieldError::new(ErrorField::Art, MSG_ART_REQUIRED))
            }
            Some(raw) if Art::parse(raw).is_none() => errors.push(FieldError::new(
                ErrorField::Art,
                format!("Ungültiger Beziehungstyp: {raw}"),
            )),
            Some(_) => {}
        }

        if candidate.counterpart_id(side).is_none() {
            errors.push(FieldError::new(ErrorField::Entity, MSG_ENTITY_REQUIRED));
        }

        let art = candidate.parsed_art();

        if art == Some(Art::Dienstleister) && is_blank(candidate.dienstleistungen.as_deref()) {
            errors.push(FieldError::new(
                ErrorField::Dienstleistungen,
                MSG_DIENSTLEISTUNGEN_REQUIRED,
            ));
        }

        if art.is_some_and(|a| a.is_exclusive_interval())
            && self.conflicts_with(candidate, existing, side)
        {
            errors.push(FieldError::new(ErrorField::General, MSG_MIETER_CONFLICT));
        }

        if let (Some(start), Some(end)) = (candidate.startdatum, candidate.enddatum) {
            if start > end {
                errors.push(FieldError::new(ErrorField::Enddatum, MSG_DATE_ORDER));
            }
        }

        let result = ValidationResult::from_errors(errors);
        tracing::debug!(
            side = side.as_str(),
            is_valid = result.is_valid,
            errors = result.errors.len(),
            "Relationship validated"
        );
        result
    }

    /// Validate each entry of a target set against all the others
    pub fn validate_set(&self, targets: &[BeziehungDraft], side: EditSide) -> ValidationResult {
        let mut result = ValidationResult::valid();
        for (index, candidate) in targets.iter().enumerate() {
            let others: Vec<BeziehungDraft> = targets
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != index)
                .map(|(_, draft)| draft.clone())
                .collect();
            // One error per failing entry; a conflicting pair reports twice
            let verdict = self.validate(candidate, &others, side);
            result.errors.extend(verdict.errors);
        }
        result.is_valid = result.errors.is_empty();
        result
    }

    /// Whether an exclusive-kind entry of the same entity overlaps the candidate
    fn conflicts_with(
        &self,
        candidate: &BeziehungDraft,
        existing: &[BeziehungDraft],
        side: EditSide,
    ) -> bool {
        let Some(range) = self.detector.range(candidate.startdatum, candidate.enddatum) else {
            return false;
        };
        let art = candidate.parsed_art();

        let ranges = existing
            .iter()
            .filter(|rel| rel.parsed_art() == art)
            .filter(|rel| !is_same_relationship(rel, candidate))
            .filter(|rel| rel.implied_id(side) == candidate.implied_id(side))
            .filter_map(|rel| self.detector.range(rel.startdatum, rel.enddatum));

        self.detector.has_overlap(&range, ranges)
    }
}

/// Only a shared, present id marks an entry as the candidate itself.
/// Ids that parse as UUIDs compare by value, so casing does not matter.
fn is_same_relationship(a: &BeziehungDraft, b: &BeziehungDraft) -> bool {
    let (Some(x), Some(y)) = (a.id.as_deref(), b.id.as_deref()) else {
        return false;
    };
    match (Uuid::parse_str(x), Uuid::parse_str(y)) {
        (Ok(x), Ok(y)) => x == y,
        _ => x == y,
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Required fields of a property
pub fn validate_immobilie(data: &NewImmobilie) -> ValidationResult {
    let mut errors = Vec::new();
    if data.titel.trim().is_empty() {
        errors.push(FieldError::new(ErrorField::Titel, MSG_TITEL_REQUIRED));
    }
    ValidationResult::from_errors(errors)
}

/// Required fields of a contact
pub fn validate_kontakt(data: &NewKontakt) -> ValidationResult {
    let mut errors = Vec::new();
    if data.name.trim().is_empty() {
        errors.push(FieldError::new(ErrorField::Name, MSG_NAME_REQUIRED));
    }
    ValidationResult::from_errors(errors)
}

/// A patched `titel`/`name` may not be blanked
pub fn validate_required_patch(field: ErrorField, value: Option<&str>) -> ValidationResult {
    match value {
        Some(v) if v.trim().is_empty() => {
            let message = match field {
                ErrorField::Name => MSG_NAME_REQUIRED,
                _ => MSG_TITEL_REQUIRED,
            };
            ValidationResult::from_errors(vec![FieldError::new(field, message)])
        }
        _ => ValidationResult::valid(),
    }
}

/// Parse a hyphenated UUID (8-4-4-4-12 hex digits)
pub fn parse_uuid(value: &str) -> Result<Uuid, ImmobilienError> {
    let well_formed = value.len() == 36
        && value.char_indices().all(|(i, c)| match i {
            8 | 13 | 18 | 23 => c == '-',
            _ => c.is_ascii_hexdigit(),
        });
    if !well_formed {
        return Err(ImmobilienError::InvalidId {
            value: value.to_string(),
        });
    }
    Uuid::parse_str(value).map_err(|_| ImmobilienError::InvalidId {
        value: value.to_string(),
    })
}
