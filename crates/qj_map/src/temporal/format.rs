use alloc::borrow::ToOwned;
use alloc::string::{String, ToString};
use std::sync::{PoisonError, RwLock};

use time::format_description::{self, BorrowedFormatItem, OwnedFormatItem};

use crate::temporal::{TemporalError, TemporalKind};

// -----------------------------------------------------------------------------
// FormatState

struct ActiveFormat {
    description: String,
    items: OwnedFormatItem,
}

/// Checks that a compiled format can render and read back a sample value.
pub(super) type Probe = fn(&OwnedFormatItem) -> Result<(), String>;

/// Process-wide active format of one temporal kind.
///
/// `None` means the built-in format, compiled on first use.
pub(super) struct FormatState {
    kind: TemporalKind,
    builtin: &'static str,
    builtin_items: &'static [BorrowedFormatItem<'static>],
    probe: Probe,
    active: RwLock<Option<ActiveFormat>>,
}

/// A validated format, ready to be installed.
pub(super) struct CompiledFormat(ActiveFormat);

impl FormatState {
    pub(super) const fn new(
        kind: TemporalKind,
        builtin: &'static str,
        builtin_items: &'static [BorrowedFormatItem<'static>],
        probe: Probe,
    ) -> Self {
        Self {
            kind,
            builtin,
            builtin_items,
            probe,
            active: RwLock::new(None),
        }
    }

    #[inline]
    pub(super) const fn builtin(&self) -> &'static str {
        self.builtin
    }

    /// Runs `f` with the active format items.
    pub(super) fn with<R>(&self, f: impl FnOnce(&OwnedFormatItem) -> R) -> R {
        if let Some(active) = self.active.read().unwrap_or_else(PoisonError::into_inner).as_ref() {
            return f(&active.items);
        }
        let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
        let active = active.get_or_insert_with(|| ActiveFormat {
            description: self.builtin.to_owned(),
            items: OwnedFormatItem::from(self.builtin_items),
        });
        f(&active.items)
    }

    /// Returns the active format description.
    pub(super) fn description(&self) -> String {
        match self.active.read().unwrap_or_else(PoisonError::into_inner).as_ref() {
            Some(active) => active.description.clone(),
            None => self.builtin.to_owned(),
        }
    }

    /// Parses and probes `description` without installing it.
    pub(super) fn compile(&self, description: &str) -> Result<CompiledFormat, TemporalError> {
        let rejected = |reason: String| TemporalError::InvalidFormatDescription {
            kind: self.kind,
            format: description.to_owned(),
            reason,
        };
        let items = format_description::parse_owned::<1>(description)
            .map_err(|err| rejected(err.to_string()))?;
        (self.probe)(&items).map_err(rejected)?;

        Ok(CompiledFormat(ActiveFormat {
            description: description.to_owned(),
            items,
        }))
    }

    pub(super) fn install(&self, format: CompiledFormat) {
        log::debug!("{} format set to `{}`", self.kind, format.0.description);
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = Some(format.0);
    }

    pub(super) fn set(&self, description: &str) -> Result<(), TemporalError> {
        let compiled = self.compile(description)?;
        self.install(compiled);
        Ok(())
    }

    pub(super) fn reset(&self) {
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub(super) fn invalid_text(&self, text: &str) -> TemporalError {
        TemporalError::InvalidTemporalFormat {
            kind: self.kind,
            text: text.to_owned(),
        }
    }
}
