use serde::{Deserialize, Serialize};

use crate::model::ids::ReferenceId;
use crate::wire;

/// One id/name pair from a master list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceItem {
    pub id: ReferenceId,
    #[serde(default, deserialize_with = "wire::text")]
    pub name: String,
}

impl ReferenceItem {
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: ReferenceId::new(id),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Country,
    State,
    Gender,
    Status,
    Institute,
    Degree,
    Company,
    Designation,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 8] = [
        ReferenceKind::Country,
        ReferenceKind::State,
        ReferenceKind::Gender,
        ReferenceKind::Status,
        ReferenceKind::Institute,
        ReferenceKind::Degree,
        ReferenceKind::Company,
        ReferenceKind::Designation,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ReferenceKind::Country => "country",
            ReferenceKind::State => "state",
            ReferenceKind::Gender => "gender",
            ReferenceKind::Status => "status",
            ReferenceKind::Institute => "institute",
            ReferenceKind::Degree => "degree",
            ReferenceKind::Company => "company",
            ReferenceKind::Designation => "designation",
        }
    }
}

/// Read-only lookup sets fetched once per session.
///
/// Only used to resolve ids to names and to offer options; never edited locally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceLists {
    countries: Vec<ReferenceItem>,
    states: Vec<ReferenceItem>,
    genders: Vec<ReferenceItem>,
    statuses: Vec<ReferenceItem>,
    institutes: Vec<ReferenceItem>,
    degrees: Vec<ReferenceItem>,
    companies: Vec<ReferenceItem>,
    designations: Vec<ReferenceItem>,
}

impl ReferenceLists {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, kind: ReferenceKind, items: Vec<ReferenceItem>) -> Self {
        *self.slot(kind) = items;
        self
    }

    #[must_use]
    pub fn list(&self, kind: ReferenceKind) -> &[ReferenceItem] {
        match kind {
            ReferenceKind::Country => &self.countries,
            ReferenceKind::State => &self.states,
            ReferenceKind::Gender => &self.genders,
            ReferenceKind::Status => &self.statuses,
            ReferenceKind::Institute => &self.institutes,
            ReferenceKind::Degree => &self.degrees,
            ReferenceKind::Company => &self.companies,
            ReferenceKind::Designation => &self.designations,
        }
    }

    #[must_use]
    pub fn name_of(&self, kind: ReferenceKind, id: ReferenceId) -> Option<&str> {
        self.list(kind)
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.name.as_str())
    }

    /// Case-insensitive match on the trimmed name.
    #[must_use]
    pub fn find_by_name(&self, kind: ReferenceKind, name: &str) -> Option<&ReferenceItem> {
        let wanted = name.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        self.list(kind)
            .iter()
            .find(|item| item.name.trim().to_lowercase() == wanted)
    }

    /// Normalize a choice: typed text that names a known entry becomes `Selected`.
    #[must_use]
    pub fn resolve(&self, kind: ReferenceKind, choice: ReferenceChoice) -> ReferenceChoice {
        match choice {
            ReferenceChoice::NewText(text) => match self.find_by_name(kind, &text) {
                Some(item) => ReferenceChoice::Selected(item.id),
                None => ReferenceChoice::NewText(text.trim().to_owned()),
            },
            selected @ ReferenceChoice::Selected(_) => selected,
        }
    }

    fn slot(&mut self, kind: ReferenceKind) -> &mut Vec<ReferenceItem> {
        match kind {
            ReferenceKind::Country => &mut self.countries,
            ReferenceKind::State => &mut self.states,
            ReferenceKind::Gender => &mut self.genders,
            ReferenceKind::Status => &mut self.statuses,
            ReferenceKind::Institute => &mut self.institutes,
            ReferenceKind::Degree => &mut self.degrees,
            ReferenceKind::Company => &mut self.companies,
            ReferenceKind::Designation => &mut self.designations,
        }
    }
}

/// A dropdown value that is either a known entry or text the list does not have yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum ReferenceChoice {
    Selected(ReferenceId),
    NewText(String),
}

impl Default for ReferenceChoice {
    fn default() -> Self {
        ReferenceChoice::NewText(String::new())
    }
}

impl ReferenceChoice {
    #[must_use]
    pub fn typed(text: impl Into<String>) -> Self {
        ReferenceChoice::NewText(text.into())
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, ReferenceChoice::NewText(text) if text.trim().is_empty())
    }

    /// Name to show for this choice; unknown ids render as an empty string.
    #[must_use]
    pub fn display(&self, lists: &ReferenceLists, kind: ReferenceKind) -> String {
        match self {
            ReferenceChoice::Selected(id) => {
                lists.name_of(kind, *id).unwrap_or_default().to_owned()
            }
            ReferenceChoice::NewText(text) => text.clone(),
        }
    }
}
