// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::StageBuildError;
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::HashMap;

/// Opaque build options handed to a single stage.
///
/// Values are kept as loosely typed YAML values so each stage can interpret
/// its own keys. Typed getters turn a present-but-wrong value into a
/// [`StageBuildError`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct StageOptions(HashMap<String, serde_yaml::Value>);

impl StageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_yaml::Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&serde_yaml::Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numeric option, `None` when absent.
    pub fn get_f64(&self, key: &str) -> Result<Option<f64>, StageBuildError> {
        match self.0.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_f64()
                .map(Some)
                .ok_or_else(|| StageBuildError::InvalidOption {
                    option: key.to_string(),
                    reason: format!("expected a number, found {:?}", value),
                }),
        }
    }

    pub fn f64_or(&self, key: &str, default: f64) -> Result<f64, StageBuildError> {
        Ok(self.get_f64(key)?.unwrap_or(default))
    }

    pub fn require_f64(&self, key: &str) -> Result<f64, StageBuildError> {
        self.get_f64(key)?.ok_or_else(|| StageBuildError::MissingOption {
            option: key.to_string(),
        })
    }

    /// Numeric option that must be strictly positive.
    pub fn positive_f64_or(&self, key: &str, default: f64) -> Result<f64, StageBuildError> {
        let value = self.f64_or(key, default)?;
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(StageBuildError::InvalidOption {
                option: key.to_string(),
                reason: format!("must be a positive number, got {}", value),
            })
        }
    }

    pub fn get_str(&self, key: &str) -> Result<Option<&str>, StageBuildError> {
        match self.0.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(Some)
                .ok_or_else(|| StageBuildError::InvalidOption {
                    option: key.to_string(),
                    reason: format!("expected a string, found {:?}", value),
                }),
        }
    }
}

/// Stage options keyed by stage ID.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct StageOptionsMap(HashMap<String, StageOptions>);

impl StageOptionsMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, stage_id: impl Into<String>, options: StageOptions) -> Self {
        self.0.insert(stage_id.into(), options);
        self
    }

    pub fn insert(&mut self, stage_id: impl Into<String>, options: StageOptions) {
        self.0.insert(stage_id.into(), options);
    }

    /// Options for `stage_id`; an empty set when none were supplied.
    pub fn for_stage(&self, stage_id: &str) -> Cow<'_, StageOptions> {
        match self.0.get(stage_id) {
            Some(options) => Cow::Borrowed(options),
            None => Cow::Owned(StageOptions::default()),
        }
    }

    pub fn stage_ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
