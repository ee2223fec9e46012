//! List store contract and implementation.
//!
//! # Invariants
//! - `add("")` is ignored; any other text, whitespace included, is appended.
//! - `edit` accepts empty text.
//! - The mutation hook sees the list after the change has been applied.

use super::id::IdGenerator;
use crate::model::item::{Item, ItemId};
use log::debug;

/// Observer invoked after every applied mutation with the resulting list.
pub type MutationHook = Box<dyn FnMut(&Change, &[Item]) + Send>;

/// Why a mutator call left the list untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// `add` was called with an empty string.
    EmptyText,
    /// `edit`/`delete` named an id that is not in the list.
    UnknownId(ItemId),
}

/// Result of one mutator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Added(ItemId),
    Edited(ItemId),
    Deleted(ItemId),
    Replaced { count: usize },
    Ignored(IgnoreReason),
}

impl Change {
    /// Returns `true` when the list was mutated.
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Ignored(_))
    }

    /// Id of the item the change applied to, if any.
    pub fn item_id(&self) -> Option<ItemId> {
        match self {
            Self::Added(id) | Self::Edited(id) | Self::Deleted(id) => Some(*id),
            Self::Replaced { .. } | Self::Ignored(_) => None,
        }
    }

    /// Stable short label used in log events.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Added(_) => "add",
            Self::Edited(_) => "edit",
            Self::Deleted(_) => "delete",
            Self::Replaced { .. } => "replace_all",
            Self::Ignored(IgnoreReason::EmptyText) => "ignored_empty_text",
            Self::Ignored(IgnoreReason::UnknownId(_)) => "ignored_unknown_id",
        }
    }
}

/// Authoritative ordered list of items.
#[derive(Default)]
pub struct ListStore {
    items: Vec<Item>,
    ids: IdGenerator,
    on_mutate: Option<MutationHook>,
}

impl ListStore {
    /// Creates an empty store using the system clock for ids.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store drawing id timestamps from `clock`.
    pub fn with_clock(clock: fn() -> ItemId) -> Self {
        Self {
            items: Vec::new(),
            ids: IdGenerator::new(clock),
            on_mutate: None,
        }
    }

    /// Installs the observer fired after each applied mutation.
    ///
    /// Replaces any previously installed hook.
    pub fn set_on_mutate(&mut self, hook: impl FnMut(&Change, &[Item]) + Send + 'static) {
        self.on_mutate = Some(Box::new(hook));
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Appends a new item unless `text` is exactly empty.
    pub fn add(&mut self, text: impl Into<String>) -> Change {
        let text = text.into();
        if text.is_empty() {
            return self.ignore(IgnoreReason::EmptyText);
        }

        let id = match self.ids.next_id() {
            Some(id) => id,
            None => self.unused_id(),
        };
        self.items.push(Item::new(id, text));
        self.commit(Change::Added(id))
    }

    /// Replaces the text of the item with `id`, keeping its position.
    pub fn edit(&mut self, id: ItemId, text: impl Into<String>) -> Change {
        let Some(index) = self.position(id) else {
            return self.ignore(IgnoreReason::UnknownId(id));
        };

        self.items[index] = self.items[index].with_text(text);
        self.commit(Change::Edited(id))
    }

    /// Removes the first item with `id`.
    pub fn delete(&mut self, id: ItemId) -> Change {
        let Some(index) = self.position(id) else {
            return self.ignore(IgnoreReason::UnknownId(id));
        };

        self.items.remove(index);
        self.commit(Change::Deleted(id))
    }

    /// Replaces the whole list, typically with a hydrated snapshot.
    pub fn replace_all(&mut self, items: Vec<Item>) -> Change {
        for item in &items {
            self.ids.observe(item.id);
        }
        let count = items.len();
        self.items = items;
        self.commit(Change::Replaced { count })
    }

    /// Highest id at or below the clock that no item holds.
    fn unused_id(&self) -> ItemId {
        let mut candidate = self.ids.now();
        while self.position(candidate).is_some() {
            candidate = candidate.wrapping_sub(1);
        }
        candidate
    }

    fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    fn commit(&mut self, change: Change) -> Change {
        debug!(
            "event=list_mutate module=store status=ok op={} id={} len={}",
            change.label(),
            change
                .item_id()
                .map_or_else(|| "-".to_string(), |id| id.to_string()),
            self.items.len()
        );
        if let Some(hook) = self.on_mutate.as_mut() {
            hook(&change, &self.items);
        }
        change
    }

    fn ignore(&self, reason: IgnoreReason) -> Change {
        let change = Change::Ignored(reason);
        debug!(
            "event=list_mutate module=store status=ignored op={} len={}",
            change.label(),
            self.items.len()
        );
        change
    }
}
