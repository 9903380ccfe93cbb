use std::collections::HashMap;

use crate::{EventStoreError, Result};

/// Decoder function for one concrete event variant.
pub type DecodeFn<E> = fn(&[u8]) -> serde_json::Result<E>;

/// Registry mapping a stable event type tag to its decoder.
///
/// Replaces reflection-style type resolution: the concrete variant of a
/// persisted payload is selected strictly from the `event_type` tag stored
/// with the row, so the wire format stays stable across refactors.
pub struct EventRegistry<E> {
    decoders: HashMap<&'static str, DecodeFn<E>>,
}

impl<E> EventRegistry<E> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Registers a decoder for an event type tag.
    pub fn register(mut self, event_type: &'static str, decode: DecodeFn<E>) -> Self {
        self.decoders.insert(event_type, decode);
        self
    }

    /// Returns true if the tag has a registered decoder.
    pub fn contains(&self, event_type: &str) -> bool {
        self.decoders.contains_key(event_type)
    }

    /// Decodes a payload using the decoder registered for the tag.
    ///
    /// Fails with `UnknownEventType` for an unregistered tag and with
    /// `Serialization` when the payload does not match the variant shape.
    pub fn decode(&self, event_type: &str, data: &[u8]) -> Result<E> {
        let decode =
            self.decoders
                .get(event_type)
                .ok_or_else(|| EventStoreError::UnknownEventType {
                    event_type: event_type.to_string(),
                })?;

        decode(data).map_err(EventStoreError::Serialization)
    }
}

impl<E> Default for EventRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EventRegistry<E> {
    fn clone(&self) -> Self {
        Self {
            decoders: self.decoders.clone(),
        }
    }
}

impl<E> std::fmt::Debug for EventRegistry<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRegistry")
            .field("event_types", &self.decoders.keys().collect::<Vec<_>>())
            .finish()
    }
}
