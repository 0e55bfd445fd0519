use std::ops::{Deref, DerefMut};

/// Label a control shows while its request is in flight.
pub const LOADING_LABEL: &str = "처리중...";

/// A clickable control: label, enabled state and an on/off style (bookmarked).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub disabled: bool,
    pub active: bool,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), disabled: false, active: false }
    }

    /// Disables the control and swaps in the loading label; returns the old label.
    pub fn begin_loading(&mut self) -> String {
        self.disabled = true;
        std::mem::replace(&mut self.label, LOADING_LABEL.to_string())
    }

    pub fn end_loading(&mut self, original: String) {
        self.disabled = false;
        self.label = original;
    }

    /// Loading state that ends when the guard is dropped, whatever the exit path.
    pub fn loading(&mut self) -> Loading<'_> {
        let original = self.begin_loading();
        Loading { button: self, original }
    }
}

pub struct Loading<'a> {
    button: &'a mut Button,
    original: String,
}

impl Deref for Loading<'_> {
    type Target = Button;

    fn deref(&self) -> &Button {
        self.button
    }
}

impl DerefMut for Loading<'_> {
    fn deref_mut(&mut self) -> &mut Button {
        self.button
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        let original = std::mem::take(&mut self.original);
        self.button.end_loading(original);
    }
}

/// The message compose box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBox {
    pub value: String,
}

impl InputBox {
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Trimmed content, `None` when there is nothing worth sending.
    pub fn trimmed(&self) -> Option<&str> {
        Some(self.value.trim()).filter(|v| !v.is_empty())
    }
}
