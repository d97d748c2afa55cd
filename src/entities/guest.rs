// Guest Entity - invitation party with RSVP state
//
// A guest row stands for a whole party: invited_count people share one RSVP.
// Import identity is (full_name case-insensitive, phone_number exact).

use serde::{Deserialize, Serialize};

use super::{require_text, Draft, Entity, EntityKind, Patch};
use crate::error::ValidationError;

// ============================================================================
// RELATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    #[serde(alias = "משפחה")]
    Family,

    #[default]
    #[serde(alias = "חברים")]
    Friends,

    #[serde(alias = "עבודה")]
    Work,
}

impl Relation {
    pub const ALL: [Relation; 3] = [Relation::Family, Relation::Friends, Relation::Work];

    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Family => "family",
            Relation::Friends => "friends",
            Relation::Work => "work",
        }
    }

    /// Parse spreadsheet text. Accepts the English names (any case) and the
    /// Hebrew labels older guest sheets were exported with.
    pub fn parse(text: &str) -> Option<Relation> {
        match text.trim().to_lowercase().as_str() {
            "family" | "משפחה" => Some(Relation::Family),
            "friends" | "friend" | "חברים" => Some(Relation::Friends),
            "work" | "עבודה" => Some(Relation::Work),
            _ => None,
        }
    }
}

// ============================================================================
// RSVP
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rsvp {
    #[serde(alias = "כן")]
    Yes,

    #[serde(alias = "לא")]
    No,

    #[default]
    #[serde(alias = "אולי")]
    Maybe,
}

impl Rsvp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rsvp::Yes => "yes",
            Rsvp::No => "no",
            Rsvp::Maybe => "maybe",
        }
    }

    pub fn parse(text: &str) -> Option<Rsvp> {
        match text.trim().to_lowercase().as_str() {
            "yes" | "y" | "כן" => Some(Rsvp::Yes),
            "no" | "n" | "לא" => Some(Rsvp::No),
            "maybe" | "אולי" => Some(Rsvp::Maybe),
            _ => None,
        }
    }
}

// ============================================================================
// GUEST ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: String,
    pub full_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub relation: Relation,
    /// Number of people covered by this invitation (>= 1)
    pub invited_count: u32,
    #[serde(default)]
    pub confirmed: Rsvp,
    #[serde(default)]
    pub special_notes: String,
}

impl Guest {
    /// Import identity: same name ignoring case, same phone exactly
    pub fn same_party(&self, full_name: &str, phone_number: &str) -> bool {
        self.full_name.to_lowercase() == full_name.to_lowercase()
            && self.phone_number == phone_number
    }
}

impl Entity for Guest {
    const KIND: EntityKind = EntityKind::Guest;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(Self::KIND, "full_name", &self.full_name)?;

        if self.invited_count < 1 {
            return Err(ValidationError::new(
                Self::KIND,
                "invited_count",
                "Must be at least 1",
            ));
        }

        Ok(())
    }
}

// ============================================================================
// DRAFT / PATCH
// ============================================================================

/// Add-guest form. Only the name is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewGuest {
    pub full_name: String,
    pub phone_number: Option<String>,
    pub relation: Option<Relation>,
    pub invited_count: Option<u32>,
    pub confirmed: Option<Rsvp>,
    pub special_notes: Option<String>,
}

impl NewGuest {
    pub fn named(full_name: impl Into<String>) -> Self {
        NewGuest {
            full_name: full_name.into(),
            ..Default::default()
        }
    }

    pub fn phone(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    pub fn relation(mut self, relation: Relation) -> Self {
        self.relation = Some(relation);
        self
    }

    pub fn invited(mut self, count: u32) -> Self {
        self.invited_count = Some(count);
        self
    }

    pub fn confirmed(mut self, rsvp: Rsvp) -> Self {
        self.confirmed = Some(rsvp);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.special_notes = Some(notes.into());
        self
    }
}

impl Draft for NewGuest {
    type Entity = Guest;

    fn into_entity(self, id: String) -> Guest {
        Guest {
            id,
            full_name: self.full_name.trim().to_string(),
            phone_number: self.phone_number.unwrap_or_default(),
            relation: self.relation.unwrap_or_default(),
            invited_count: self.invited_count.unwrap_or(1),
            confirmed: self.confirmed.unwrap_or_default(),
            special_notes: self.special_notes.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuestPatch {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub relation: Option<Relation>,
    pub invited_count: Option<u32>,
    pub confirmed: Option<Rsvp>,
    pub special_notes: Option<String>,
}

impl GuestPatch {
    pub fn rsvp(confirmed: Rsvp) -> Self {
        GuestPatch {
            confirmed: Some(confirmed),
            ..Default::default()
        }
    }
}

impl Patch for GuestPatch {
    type Entity = Guest;

    fn apply_to(self, guest: &mut Guest) {
        if let Some(full_name) = self.full_name {
            guest.full_name = full_name.trim().to_string();
        }
        if let Some(phone_number) = self.phone_number {
            guest.phone_number = phone_number;
        }
        if let Some(relation) = self.relation {
            guest.relation = relation;
        }
        if let Some(invited_count) = self.invited_count {
            guest.invited_count = invited_count;
        }
        if let Some(confirmed) = self.confirmed {
            guest.confirmed = confirmed;
        }
        if let Some(special_notes) = self.special_notes {
            guest.special_notes = special_notes;
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_fills_defaults() {
        let guest = NewGuest::named("  Dana Levi ").into_entity("g1".to_string());

        assert_eq!(guest.id, "g1");
        assert_eq!(guest.full_name, "Dana Levi");
        assert_eq!(guest.relation, Relation::Friends);
        assert_eq!(guest.invited_count, 1);
        assert_eq!(guest.confirmed, Rsvp::Maybe);
        assert!(guest.phone_number.is_empty());
        assert!(guest.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_name() {
        let guest = NewGuest::named("").into_entity("g1".to_string());
        let err = guest.validate().unwrap_err();
        assert_eq!(err.field, "full_name");
        assert_eq!(err.entity, "Guest");
    }

    #[test]
    fn test_validate_rejects_zero_invited() {
        let guest = NewGuest::named("Dana").invited(0).into_entity("g1".to_string());
        assert_eq!(guest.validate().unwrap_err().field, "invited_count");
    }

    #[test]
    fn test_patch_merges_only_set_fields() {
        let mut guest = NewGuest::named("Dana")
            .phone("050-1234567")
            .notes("vegetarian")
            .into_entity("g1".to_string());

        GuestPatch::rsvp(Rsvp::Yes).apply_to(&mut guest);

        assert_eq!(guest.confirmed, Rsvp::Yes);
        assert_eq!(guest.phone_number, "050-1234567");
        assert_eq!(guest.special_notes, "vegetarian");
    }

    #[test]
    fn test_same_party_is_case_insensitive_on_name_only() {
        let guest = NewGuest::named("David Cohen")
            .phone("050-1234567")
            .into_entity("g1".to_string());

        assert!(guest.same_party("DAVID COHEN", "050-1234567"));
        assert!(!guest.same_party("David Cohen", "0501234567"));
    }

    #[test]
    fn test_enum_parsing_accepts_hebrew_labels() {
        assert_eq!(Relation::parse("משפחה"), Some(Relation::Family));
        assert_eq!(Relation::parse("Work"), Some(Relation::Work));
        assert_eq!(Relation::parse("neighbours"), None);
        assert_eq!(Rsvp::parse("כן"), Some(Rsvp::Yes));
        assert_eq!(Rsvp::parse(" MAYBE "), Some(Rsvp::Maybe));
    }

    #[test]
    fn test_serde_aliases() {
        let rsvp: Rsvp = serde_json::from_str("\"אולי\"").unwrap();
        assert_eq!(rsvp, Rsvp::Maybe);
        assert_eq!(serde_json::to_string(&Relation::Family).unwrap(), "\"family\"");
    }
}
