//! Camera registry
//!
//! Maps camera names to the index they occupy in every frame batch the
//! producer delivers. Built once at load; never mutated afterwards.

use crate::utils::error::{MonitorError, MonitorResult};
use std::collections::HashMap;

/// Immutable mapping from camera name to batch index
#[derive(Debug, Clone)]
pub struct CameraRegistry {
    names: Vec<String>,
    indices: HashMap<String, usize>,
}

impl CameraRegistry {
    /// Build a registry from the sensor's camera names, in enumeration order
    pub fn build<S: AsRef<str>>(names: &[S]) -> MonitorResult<Self> {
        if names.is_empty() {
            return Err(MonitorError::NoCameras);
        }

        let mut indices = HashMap::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            let name = name.as_ref();
            if indices.insert(name.to_string(), index).is_some() {
                return Err(MonitorError::DuplicateCamera(name.to_string()));
            }
        }

        Ok(Self {
            names: names.iter().map(|n| n.as_ref().to_string()).collect(),
            indices,
        })
    }

    /// Build a registry that must match `required` exactly, in order
    pub fn build_exact<S: AsRef<str>>(names: &[S], required: &[&str]) -> MonitorResult<Self> {
        let matches = names.len() == required.len()
            && names.iter().zip(required).all(|(n, r)| n.as_ref() == *r);
        if !matches {
            return Err(MonitorError::CameraMismatch {
                expected: required.iter().map(|r| r.to_string()).collect(),
                found: names.iter().map(|n| n.as_ref().to_string()).collect(),
            });
        }
        Self::build(names)
    }

    /// Batch index of a camera, if it exists
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    /// Camera name at a batch index
    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Camera names in enumeration order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
