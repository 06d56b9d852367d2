pub mod library;
pub mod normalize;
pub mod watcher;

pub use library::{LibraryError, load};
pub use normalize::normalize;

/// A named unit of displayable text. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub id: String,
    pub name: String,
    pub text: String,
}

impl Script {
    pub fn new(id: impl Into<String>, name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn paragraph_count(&self) -> usize {
        self.text
            .split("\n\n")
            .filter(|p| !p.trim().is_empty())
            .count()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// The current script snapshot plus the selected id.
///
/// The selection always resolves to a member of `scripts`, or is unset when
/// the collection is empty.
#[derive(Debug, Clone, Default)]
pub struct ScriptCollection {
    scripts: Vec<Script>,
    selected: Option<String>,
}

impl ScriptCollection {
    /// Scripts are expected sorted by name; the first one is selected.
    pub fn new(scripts: Vec<Script>) -> Self {
        let selected = scripts.first().map(|s| s.id.clone());
        Self { scripts, selected }
    }

    pub fn scripts(&self) -> &[Script] {
        &self.scripts
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected(&self) -> Option<&Script> {
        let id = self.selected.as_deref()?;
        self.scripts.iter().find(|s| s.id == id)
    }

    fn selected_index(&self) -> Option<usize> {
        let id = self.selected.as_deref()?;
        self.scripts.iter().position(|s| s.id == id)
    }

    /// Select by id. Returns whether the selection changed; unknown ids are
    /// ignored.
    pub fn select(&mut self, id: &str) -> bool {
        if self.selected.as_deref() == Some(id) || !self.scripts.iter().any(|s| s.id == id) {
            return false;
        }
        self.selected = Some(id.to_string());
        true
    }

    pub fn select_next(&mut self) -> bool {
        self.step(1)
    }

    pub fn select_previous(&mut self) -> bool {
        self.step(-1)
    }

    fn step(&mut self, delta: isize) -> bool {
        let Some(current) = self.selected_index() else {
            return false;
        };
        let next = current as isize + delta;
        if next < 0 || next as usize >= self.scripts.len() {
            return false;
        }
        let id = self.scripts[next as usize].id.clone();
        self.select(&id)
    }

    /// Swap in a reloaded snapshot. The selection keeps its id when that id
    /// still exists, otherwise falls back to the first entry. Returns whether
    /// the displayed script changed, either by id or by content.
    pub fn replace(&mut self, scripts: Vec<Script>) -> bool {
        let before = self.selected().cloned();
        self.scripts = scripts;

        let keep = self
            .selected
            .as_deref()
            .is_some_and(|id| self.scripts.iter().any(|s| s.id == id));
        if !keep {
            self.selected = self.scripts.first().map(|s| s.id.clone());
        }
        before.as_ref() != self.selected()
    }
}
