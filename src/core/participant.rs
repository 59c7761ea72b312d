use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a participant within a trip.
///
/// Identifiers are opaque to the engine — they may be database UUIDs,
/// slugs, or plain names, as long as they are unique within one trip.
///
/// # Examples
///
/// ```
/// use tripsettle::core::participant::ParticipantId;
///
/// let alice = ParticipantId::new("alice");
/// let bob = ParticipantId::new("bob");
/// assert_ne!(alice, bob);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Create a new participant identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this participant ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A member of a trip: identity plus display name.
///
/// Participants are created by the surrounding application and referenced
/// by expenses; the engine never mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    id: ParticipantId,
    name: String,
}

impl Participant {
    pub fn new(id: impl Into<ParticipantId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn id(&self) -> &ParticipantId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The participant roster of a trip, in insertion order.
///
/// Insertion order matters: it is the tie-break order used by the debt
/// simplifier when two participants carry equal balances.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a participant. A duplicate id is ignored.
    pub fn add(&mut self, participant: Participant) {
        if !self.contains(participant.id()) {
            self.participants.push(participant);
        }
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.participants.iter().any(|p| p.id() == id)
    }

    pub fn get(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id() == id)
    }

    /// Display name for an id, falling back to the id itself.
    pub fn display_name<'a>(&'a self, id: &'a ParticipantId) -> &'a str {
        self.get(id).map(|p| p.name()).unwrap_or_else(|| id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ParticipantId> {
        self.participants.iter().map(|p| p.id())
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

impl FromIterator<Participant> for Roster {
    fn from_iter<T: IntoIterator<Item = Participant>>(iter: T) -> Self {
        let mut roster = Roster::new();
        for p in iter {
            roster.add(p);
        }
        roster
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_id_equality() {
        let a = ParticipantId::new("alice");
        let b = ParticipantId::new("alice");
        let c = ParticipantId::new("bob");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_participant_id_display() {
        let p = ParticipantId::new("carol");
        assert_eq!(format!("{}", p), "carol");
    }

    #[test]
    fn test_roster_insertion_order() {
        let roster: Roster = [
            Participant::new("bob", "Bob"),
            Participant::new("alice", "Alice"),
        ]
        .into_iter()
        .collect();

        let ids: Vec<&str> = roster.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["bob", "alice"]);
    }

    #[test]
    fn test_roster_duplicate_ignored() {
        let mut roster = Roster::new();
        roster.add(Participant::new("alice", "Alice"));
        roster.add(Participant::new("alice", "Alice 2"));
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.display_name(&ParticipantId::new("alice")), "Alice");
    }

    #[test]
    fn test_roster_display_name_fallback() {
        let roster = Roster::new();
        let ghost = ParticipantId::new("ghost");
        assert_eq!(roster.display_name(&ghost), "ghost");
    }
}
