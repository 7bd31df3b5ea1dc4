//! Keyed table with monotonic identifier allocation

use std::collections::BTreeMap;

use crate::error::{Result, SkillboardError};
use crate::models::{Achievement, Endorsement, EntityId, Skill, User};

/// A record that lives in a [`Table`]
pub trait Entity: Clone {
    /// Human-readable entity name used in errors
    const KIND: &'static str;

    fn id(&self) -> EntityId;
}

impl Entity for User {
    const KIND: &'static str = "User";

    fn id(&self) -> EntityId {
        self.id
    }
}

impl Entity for Skill {
    const KIND: &'static str = "Skill";

    fn id(&self) -> EntityId {
        self.id
    }
}

impl Entity for Endorsement {
    const KIND: &'static str = "Endorsement";

    fn id(&self) -> EntityId {
        self.id
    }
}

impl Entity for Achievement {
    const KIND: &'static str = "Achievement";

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Rows of one entity type, ordered by identifier
///
/// Identifiers start at 1 and are never reused, even after a delete.
#[derive(Debug, Clone)]
pub struct Table<E> {
    rows: BTreeMap<EntityId, E>,
    next_id: EntityId,
}

impl<E: Entity> Table<E> {
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&E> {
        self.rows.get(&id)
    }

    /// Like `get`, but absence is a `NotFound` error
    pub fn require(&self, id: EntityId) -> Result<&E> {
        self.rows
            .get(&id)
            .ok_or_else(|| SkillboardError::not_found(E::KIND, id))
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut E> {
        self.rows.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.rows.contains_key(&id)
    }

    /// All rows in ascending identifier order
    pub fn list(&self) -> impl Iterator<Item = &E> + '_ {
        self.rows.values()
    }

    /// Rows whose foreign key (as extracted by `key`) equals `value`
    pub fn list_by<'a, K, F>(&'a self, key: F, value: K) -> impl Iterator<Item = &'a E> + 'a
    where
        K: PartialEq + 'a,
        F: Fn(&E) -> K + 'a,
    {
        self.rows.values().filter(move |row| key(row) == value)
    }

    /// Allocate an identifier and insert the row built for it
    pub fn create<F>(&mut self, build: F) -> E
    where
        F: FnOnce(EntityId) -> E,
    {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        debug_assert_eq!(row.id(), id, "row built with a foreign identifier");
        self.rows.insert(id, row.clone());
        row
    }

    /// Shallow-merge via `apply` and return the updated row
    pub fn update<F>(&mut self, id: EntityId, apply: F) -> Option<E>
    where
        F: FnOnce(&mut E),
    {
        let row = self.rows.get_mut(&id)?;
        apply(row);
        Some(row.clone())
    }

    /// Remove and return the row
    pub fn take(&mut self, id: EntityId) -> Option<E> {
        self.rows.remove(&id)
    }

    pub fn delete(&mut self, id: EntityId) -> bool {
        self.take(id).is_some()
    }

    /// Remove every row matching `predicate`, returning how many went
    pub fn delete_where<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&E) -> bool,
    {
        let before = self.rows.len();
        self.rows.retain(|_, row| !predicate(row));
        before - self.rows.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<E: Entity> Default for Table<E> {
    fn default() -> Self {
        Self::new()
    }
}
