//! Shared ASR types: model tiers, devices, and performance telemetry.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ModelTier {
    Tiny,
    Base,
    Small,
    Medium,
    Large,
}

impl From<crate::config::WhisperModelSize> for ModelTier {
    fn from(size: crate::config::WhisperModelSize) -> Self {
        use crate::config::WhisperModelSize::*;
        match size {
            Tiny => ModelTier::Tiny,
            Base => ModelTier::Base,
            Small => ModelTier::Small,
            Medium => ModelTier::Medium,
            Large => ModelTier::Large,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Device {
    Cpu,
    Cuda,
    Metal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub real_time_factor: f32,
    pub processing_time_ms: u64,
}
