//! Ordered in-memory collection shared by every dashboard entity type.
//!
//! Ids are handed out by a counter owned by the store. The counter starts
//! one past the largest id present at construction and only moves forward,
//! so an id freed by `delete` is never reissued.

use crate::models::issue::Issue;
use crate::models::project::Project;
use crate::models::qa_check::QaCheck;
use crate::models::user::User;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Wildcard accepted by every field predicate.
pub const FILTER_ALL: &str = "all";

pub trait Entity: Clone {
    fn id(&self) -> u32;
    fn assign_id(&mut self, id: u32);
    /// Fields covered by the free-text search.
    fn search_text(&self) -> Vec<&str>;
    /// Value of an exact-match field (enum labels, project name), if the entity has it.
    fn field(&self, name: &str) -> Option<&str>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl FilterCriteria {
    pub fn search(mut self, term: &str) -> Self {
        self.search = Some(term.to_string());
        self
    }

    pub fn field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    pub fn matches<T: Entity>(&self, entity: &T) -> bool {
        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let needle = term.to_lowercase();
            let hit = entity
                .search_text()
                .iter()
                .any(|text| text.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        self.fields.iter().all(|(name, wanted)| {
            let wanted = wanted.trim();
            if wanted.is_empty() || wanted.eq_ignore_ascii_case(FILTER_ALL) {
                return true;
            }
            entity
                .field(name)
                .map(|actual| actual.trim().eq_ignore_ascii_case(wanted))
                .unwrap_or(false)
        })
    }
}

#[derive(Debug, Clone)]
pub struct EntityStore<T: Entity> {
    items: Vec<T>,
    next_id: u32,
}

impl<T: Entity> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> EntityStore<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }

    /// Takes items as-is, keeping their ids.
    pub fn from_items(items: Vec<T>) -> Self {
        let next_id = items.iter().map(Entity::id).max().unwrap_or(0) + 1;
        Self { items, next_id }
    }

    pub fn all(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends `entity` under a freshly assigned id. Any id it carried is ignored.
    pub fn add(&mut self, mut entity: T) -> T {
        entity.assign_id(self.next_id);
        self.next_id += 1;
        self.items.push(entity.clone());
        entity
    }

    /// Replaces the element with the same id. Returns false when there is none.
    pub fn update(&mut self, entity: T) -> bool {
        match self.items.iter_mut().find(|item| item.id() == entity.id()) {
            Some(slot) => {
                *slot = entity;
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, id: u32) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        self.items.len() != before
    }

    pub fn get(&self, id: u32) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<T> {
        self.items
            .iter()
            .filter(|item| criteria.matches(*item))
            .cloned()
            .collect()
    }
}

impl Entity for Project {
    fn id(&self) -> u32 {
        self.id
    }

    fn assign_id(&mut self, id: u32) {
        self.id = id;
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "status" => Some(self.status.label()),
            "name" => Some(self.name.as_str()),
            _ => None,
        }
    }
}

impl Entity for Issue {
    fn id(&self) -> u32 {
        self.id
    }

    fn assign_id(&mut self, id: u32) {
        self.id = id;
    }

    fn search_text(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.description.as_str(),
            self.project.as_str(),
            self.assignee.name.as_str(),
        ]
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "status" => Some(self.status.label()),
            "priority" => Some(self.priority.label()),
            "project" => Some(self.project.as_str()),
            "assignee" => Some(self.assignee.name.as_str()),
            "release" => self.release.as_deref(),
            _ => None,
        }
    }
}

impl Entity for QaCheck {
    fn id(&self) -> u32 {
        self.id
    }

    fn assign_id(&mut self, id: u32) {
        self.id = id;
    }

    fn search_text(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.description.as_str(),
            self.project.as_str(),
            self.assignee.as_str(),
        ]
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "status" => Some(self.status.label()),
            "type" => Some(self.check_type.label()),
            "project" => Some(self.project.as_str()),
            "assignee" => Some(self.assignee.as_str()),
            _ => None,
        }
    }
}

impl Entity for User {
    fn id(&self) -> u32 {
        self.id
    }

    fn assign_id(&mut self, id: u32) {
        self.id = id;
    }

    fn search_text(&self) -> Vec<&str> {
        let mut text = vec![self.name.as_str(), self.email.as_str()];
        text.extend(self.department.as_deref());
        text.extend(self.location.as_deref());
        text
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "role" => Some(self.role.label()),
            "status" => Some(self.status.label()),
            "department" => self.department.as_deref(),
            _ => None,
        }
    }
}
