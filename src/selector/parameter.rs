//! Externally settable enumerated parameter
//!
//! Holds the current choice and queues one change event per accepted set
//! for a single subscriber. Registering a new subscriber replaces the
//! previous one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::{mpsc, watch};

use crate::plugins::{NONE_CHOICE, SelectionMap};
use crate::{Error, Result};

/// Name of the plugin choice parameter
pub const FREI0R_PARAMETER: &str = "frei0r";

/// Current choice of an enumerated parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    /// Display name
    pub name: String,
    /// Mapped value (plugin path, or the sentinel)
    pub value: String,
}

/// Parameter description for the control surface
#[derive(Debug, Clone, Serialize)]
pub struct ParameterDescription {
    pub name: String,
    pub description: String,
    pub default: String,
    pub current: Selection,
    pub choices: SelectionMap,
}

/// Enumerated parameter backed by a [`SelectionMap`]
#[derive(Debug)]
pub struct EnumParameter {
    name: String,
    description: String,
    choices: Arc<SelectionMap>,
    current: watch::Sender<Selection>,
    changes: Mutex<Option<mpsc::UnboundedSender<Selection>>>,
}

impl EnumParameter {
    /// Register `choices` under `name` with the `none` default
    #[must_use]
    pub fn new(name: impl Into<String>, choices: Arc<SelectionMap>) -> Self {
        let name = name.into();
        let (current, _) = watch::channel(Selection {
            name: NONE_CHOICE.to_string(),
            value: NONE_CHOICE.to_string(),
        });
        Self {
            description: name.clone(),
            name,
            choices,
            current,
            changes: Mutex::new(None),
        }
    }

    /// Override the description shown to operators
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn choices(&self) -> &SelectionMap {
        &self.choices
    }

    /// Set the parameter by display name or mapped value
    ///
    /// Every accepted set queues one change event, including re-setting the
    /// current value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChoice`] if `requested` is neither a name nor a
    /// value in the choice map; the current value is left unchanged.
    pub fn set(&self, requested: &str) -> Result<Selection> {
        let Some((name, value)) = self.choices.resolve(requested) else {
            return Err(Error::InvalidChoice {
                parameter: self.name.clone(),
                value: requested.to_string(),
            });
        };

        let selection = Selection {
            name: name.to_string(),
            value: value.to_string(),
        };
        tracing::info!(
            parameter = %self.name,
            choice = %selection.name,
            value = %selection.value,
            "parameter set"
        );
        let changes = self.lock_changes();
        self.current.send_replace(selection.clone());
        if let Some(tx) = changes.as_ref()
            && tx.send(selection.clone()).is_err()
        {
            tracing::debug!(parameter = %self.name, "change subscriber gone");
        }
        Ok(selection)
    }

    /// Current choice
    #[must_use]
    pub fn current(&self) -> Selection {
        self.current.borrow().clone()
    }

    /// Receive one event per set made after this call
    ///
    /// Replaces any earlier subscription, whose receiver then closes.
    #[must_use]
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<Selection> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.lock_changes() = Some(tx);
        rx
    }

    fn lock_changes(&self) -> MutexGuard<'_, Option<mpsc::UnboundedSender<Selection>>> {
        self.changes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot for the control surface
    #[must_use]
    pub fn describe(&self) -> ParameterDescription {
        ParameterDescription {
            name: self.name.clone(),
            description: self.description.clone(),
            default: NONE_CHOICE.to_string(),
            current: self.current(),
            choices: (*self.choices).clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parameter() -> EnumParameter {
        let mut map = SelectionMap::new();
        map.insert("Foo", "/p/a.so");
        EnumParameter::new(FREI0R_PARAMETER, Arc::new(map))
    }

    #[test]
    fn defaults_to_none() {
        let param = parameter();
        assert_eq!(param.current().name, NONE_CHOICE);
        assert_eq!(param.describe().default, NONE_CHOICE);
    }

    #[test]
    fn set_by_name_maps_to_path() {
        let param = parameter();
        let selection = param.set("Foo").unwrap();
        assert_eq!(selection.value, "/p/a.so");
        assert_eq!(param.current(), selection);
    }

    #[test]
    fn invalid_choice_leaves_value() {
        let param = parameter();
        param.set("Foo").unwrap();

        let err = param.set("Nope").unwrap_err();
        assert!(matches!(err, Error::InvalidChoice { .. }));
        assert_eq!(param.current().name, "Foo");
    }

    #[tokio::test]
    async fn subscriber_sees_every_set_in_order() {
        let param = parameter();
        let mut rx = param.subscribe();

        param.set("/p/a.so").unwrap();
        param.set("none").unwrap();
        // Re-setting the same value still queues an event
        param.set("none").unwrap();

        assert_eq!(rx.recv().await.unwrap().name, "Foo");
        assert_eq!(rx.recv().await.unwrap().name, NONE_CHOICE);
        assert_eq!(rx.recv().await.unwrap().name, NONE_CHOICE);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn rejected_set_queues_nothing() {
        let param = parameter();
        let mut rx = param.subscribe();

        let mut next = tokio_test::task::spawn(rx.recv());
        tokio_test::assert_pending!(next.poll());

        param.set("Nope").unwrap_err();
        assert!(!next.is_woken());
        tokio_test::assert_pending!(next.poll());

        param.set("Foo").unwrap();
        assert!(next.is_woken());
        let selection = tokio_test::assert_ready!(next.poll()).unwrap();
        assert_eq!(selection.value, "/p/a.so");
    }

    #[test]
    fn new_subscriber_replaces_old() {
        let param = parameter();
        let mut old = param.subscribe();
        let mut new = param.subscribe();

        param.set("Foo").unwrap();
        assert!(matches!(
            old.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));
        assert_eq!(new.try_recv().unwrap().name, "Foo");
    }

    #[test]
    fn sets_without_subscriber_still_update_value() {
        let param = parameter();
        param.set("Foo").unwrap();
        assert_eq!(param.current().name, "Foo");
    }
}
