use log::warn;

use crate::HostType;

use super::{PropertyError, SharedPropertyGroup};

#[derive(Clone)]
enum PropertySource {
    Owned(i32),
    Grouped {
        group: SharedPropertyGroup,
        index: usize,
    },
}

#[derive(Clone)]
struct TrackedProperty {
    source: PropertySource,
    last_sent: Option<i32>,
}

impl TrackedProperty {
    fn owned(value: i32) -> Self {
        Self {
            source: PropertySource::Owned(value),
            last_sent: None,
        }
    }

    fn read(&self, index: usize) -> Result<i32, PropertyError> {
        match &self.source {
            PropertySource::Owned(value) => Ok(*value),
            PropertySource::Grouped { group, index: inner } => {
                let group = group
                    .read()
                    .map_err(|_| PropertyError::GroupUnavailable { index })?;
                Ok(group.get(*inner))
            }
        }
    }

    fn write(&mut self, index: usize, value: i32) -> Result<(), PropertyError> {
        match &mut self.source {
            PropertySource::Owned(current) => {
                *current = value;
                Ok(())
            }
            PropertySource::Grouped { group, index: inner } => {
                let mut group = group
                    .write()
                    .map_err(|_| PropertyError::GroupUnavailable { index })?;
                group.set(*inner, value);
                Ok(())
            }
        }
    }
}

/// Handle to a registered property
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PropertyHandle(usize);

impl PropertyHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Tracks a session's integer properties and the value last sent for each.
///
/// On the host, `pending_changes` yields every property whose current value
/// differs from its last sent value, exactly once per change. On the client
/// the tracker is a read-only mirror fed by `apply_remote_change`.
#[derive(Clone)]
pub struct PropertyTracker {
    host_type: HostType,
    properties: Vec<TrackedProperty>,
}

impl PropertyTracker {
    pub fn new(host_type: HostType) -> Self {
        Self {
            host_type,
            properties: Vec::new(),
        }
    }

    pub fn host(count: usize) -> Self {
        let mut tracker = Self::new(HostType::Server);
        tracker.ensure_len(count);
        tracker
    }

    pub fn mirror(count: usize) -> Self {
        let mut tracker = Self::new(HostType::Client);
        tracker.ensure_len(count);
        tracker
    }

    fn ensure_len(&mut self, len: usize) {
        while self.properties.len() < len {
            self.properties.push(TrackedProperty::owned(0));
        }
    }

    pub fn host_type(&self) -> HostType {
        self.host_type
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Registers an independently stored property. Indices stay contiguous:
    /// registering index 5 on an empty tracker also creates 0..5 at zero.
    pub fn register_property(&mut self, index: usize) -> PropertyHandle {
        self.ensure_len(index + 1);
        PropertyHandle(index)
    }

    /// Routes indices `first_index..first_index + group.len()` through a group
    pub fn bind_group(
        &mut self,
        first_index: usize,
        group: SharedPropertyGroup,
    ) -> Result<Vec<PropertyHandle>, PropertyError> {
        let len = group
            .read()
            .map_err(|_| PropertyError::GroupUnavailable { index: first_index })?
            .len();
        self.ensure_len(first_index + len);

        for index in first_index..first_index + len {
            if matches!(self.properties[index].source, PropertySource::Grouped { .. }) {
                return Err(PropertyError::AlreadyBound { index });
            }
        }

        let mut handles = Vec::with_capacity(len);
        for inner in 0..len {
            let index = first_index + inner;
            self.properties[index].source = PropertySource::Grouped {
                group: group.clone(),
                index: inner,
            };
            handles.push(PropertyHandle(index));
        }
        Ok(handles)
    }

    fn property(&self, index: usize) -> Result<&TrackedProperty, PropertyError> {
        self.properties
            .get(index)
            .ok_or(PropertyError::IndexOutOfRange {
                index,
                len: self.properties.len(),
            })
    }

    fn property_mut(&mut self, index: usize) -> Result<&mut TrackedProperty, PropertyError> {
        let len = self.properties.len();
        self.properties
            .get_mut(index)
            .ok_or(PropertyError::IndexOutOfRange { index, len })
    }

    pub fn current_value(&self, index: usize) -> Result<i32, PropertyError> {
        self.property(index)?.read(index)
    }

    pub fn get(&self, handle: PropertyHandle) -> Result<i32, PropertyError> {
        self.current_value(handle.index())
    }

    /// Host only. A mirror refuses, since the value would never reach the host.
    pub fn set_value(&mut self, index: usize, value: i32) -> Result<(), PropertyError> {
        if self.host_type == HostType::Client {
            warn!("Refusing local write to mirrored property {}", index);
            return Err(PropertyError::MirrorWrite { index });
        }
        self.property_mut(index)?.write(index, value)
    }

    pub fn set(&mut self, handle: PropertyHandle, value: i32) -> Result<(), PropertyError> {
        self.set_value(handle.index(), value)
    }

    /// Client only. Overwrites unconditionally.
    pub fn apply_remote_change(&mut self, index: usize, value: i32) -> Result<(), PropertyError> {
        if self.host_type == HostType::Server {
            return Err(PropertyError::HostRemoteWrite { index });
        }
        self.property_mut(index)?.write(index, value)
    }

    /// Returns, and clears, every property whose value differs from the last
    /// value sent. Mirrors never have pending changes.
    pub fn pending_changes(&mut self) -> Vec<(usize, i32)> {
        if self.host_type == HostType::Client {
            return Vec::new();
        }
        let mut output = Vec::new();
        for (index, property) in self.properties.iter_mut().enumerate() {
            let value = match property.read(index) {
                Ok(value) => value,
                Err(error) => {
                    warn!("Skipping property diff: {}", error);
                    continue;
                }
            };
            if property.last_sent != Some(value) {
                property.last_sent = Some(value);
                output.push((index, value));
            }
        }
        output
    }

    /// Every current value in index order. On the host this also counts as
    /// sending them, so the next `pending_changes` starts from here.
    pub fn snapshot_values(&mut self) -> Vec<i32> {
        let track = self.host_type == HostType::Server;
        let mut output = Vec::with_capacity(self.properties.len());
        for (index, property) in self.properties.iter_mut().enumerate() {
            let value = property.read(index).unwrap_or_else(|error| {
                warn!("Property snapshot fell back to zero: {}", error);
                0
            });
            if track {
                property.last_sent = Some(value);
            }
            output.push(value);
        }
        output
    }

    /// Client only. Overwrites every mirrored value, growing if the host sent
    /// more values than the layout expected.
    pub fn apply_remote_values(&mut self, values: &[i32]) -> Result<(), PropertyError> {
        if self.host_type == HostType::Server {
            return Err(PropertyError::HostRemoteWrite { index: 0 });
        }
        self.ensure_len(values.len());
        for (index, value) in values.iter().enumerate() {
            self.properties[index].write(index, *value)?;
        }
        Ok(())
    }
}
