//! Pipeline configuration: tunables, thresholds, and environment overrides.
//!
//! Mirrors the options enumerated for the external programmatic surface.
//! Defaults are filled in by [`PipelineConfig::default`]; any field left
//! at its default may be overridden by the matching environment variable
//! via [`PipelineConfig::from_env`], which layers env vars over whatever
//! base config it is given (explicit struct fields always win over env).

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WhisperModelSize {
    Tiny,
    Base,
    Small,
    Medium,
    Large,
}

impl FromStr for WhisperModelSize {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tiny" => Ok(Self::Tiny),
            "base" => Ok(Self::Base),
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            other => Err(ConfigError::Invalid {
                field: "whisper_model_size".into(),
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainMode {
    Sggs,
    Dasam,
    Generic,
}

impl FromStr for DomainMode {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sggs" => Ok(Self::Sggs),
            "dasam" => Ok(Self::Dasam),
            "generic" => Ok(Self::Generic),
            other => Err(ConfigError::Invalid {
                field: "domain_mode".into(),
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RomanizationScheme {
    Iso15919,
    Iast,
    Practical,
}

impl FromStr for RomanizationScheme {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "iso15919" => Ok(Self::Iso15919),
            "iast" => Ok(Self::Iast),
            "practical" => Ok(Self::Practical),
            other => Err(ConfigError::Invalid {
                field: "romanization_scheme".into(),
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DenoiseBackend {
    Spectral,
    Learned1,
    Learned2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DenoiseStrength {
    Light,
    Medium,
    Aggressive,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DenoiseConfig {
    pub enabled: bool,
    pub backend: DenoiseBackend,
    pub strength: DenoiseStrength,
}

impl Default for DenoiseConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            backend: DenoiseBackend::Spectral,
            strength: DenoiseStrength::Medium,
        }
    }
}

/// Thresholds shared by fusion, script conversion, router, and the quote
/// engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Thresholds {
    pub redecode_floor: f32,
    pub review_floor: f32,
    pub agreement_floor: f32,
    pub auto_replace_floor: f32,
    pub verifier_floor: f32,
    pub script_review_floor: f32,
    pub script_purity_floor: f32,
    pub langid_floor: f32,
    pub langid_tie_delta: f32,
    pub vocab_ratio_floor: f32,
    pub len_ratio_lo: f32,
    pub len_ratio_hi: f32,
    pub scripture_short_sec: f64,
    pub script_mix_delta: f32,
    /// Weight on the lexical/fuzzy score in quote-match combination.
    pub w_fuzzy: f32,
    /// Weight on the semantic score in quote-match combination.
    pub w_semantic: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            redecode_floor: 0.60,
            review_floor: 0.50,
            agreement_floor: 0.60,
            auto_replace_floor: 0.90,
            verifier_floor: 0.65,
            script_review_floor: 0.70,
            script_purity_floor: 0.80,
            langid_floor: 0.65,
            langid_tie_delta: 0.10,
            vocab_ratio_floor: 0.30,
            len_ratio_lo: 0.5,
            len_ratio_hi: 1.8,
            scripture_short_sec: 8.0,
            script_mix_delta: 0.15,
            w_fuzzy: 0.6,
            w_semantic: 0.4,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChunkerConfig {
    pub sample_rate: u32,
    pub min_chunk_sec: f64,
    pub max_chunk_sec: f64,
    pub target_chunk_sec: f64,
    pub overlap_sec: f64,
    pub vad_aggressiveness: u8,
    pub gap_close_ms: u64,
    pub live_flush_ms: u64,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            min_chunk_sec: 3.0,
            max_chunk_sec: 20.0,
            target_chunk_sec: 10.0,
            overlap_sec: 0.5,
            vad_aggressiveness: 2,
            gap_close_ms: 300,
            live_flush_ms: 800,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConcurrencyConfig {
    pub asr_parallel_workers: usize,
    pub chunk_parallel_workers: usize,
    pub live_queue_depth: usize,
    pub per_chunk_timeout_realtime_multiple: f64,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            asr_parallel_workers: 2,
            chunk_parallel_workers: 2,
            live_queue_depth: 8,
            per_chunk_timeout_realtime_multiple: 4.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub whisper_model_size: WhisperModelSize,
    pub domain_mode: DomainMode,
    pub strict_gurmukhi: bool,
    pub romanization_scheme: RomanizationScheme,
    pub denoise: DenoiseConfig,
    pub thresholds: Thresholds,
    pub chunker: ChunkerConfig,
    pub concurrency: ConcurrencyConfig,
    pub scripture_db_path: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            whisper_model_size: WhisperModelSize::Small,
            domain_mode: DomainMode::Generic,
            strict_gurmukhi: false,
            romanization_scheme: RomanizationScheme::Practical,
            denoise: DenoiseConfig::default(),
            thresholds: Thresholds::default(),
            chunker: ChunkerConfig::default(),
            concurrency: ConcurrencyConfig::default(),
            scripture_db_path: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {field}: {value}")]
    Invalid { field: String, value: String },

    #[error("contradictory configuration: {message}")]
    Contradictory { message: String },
}

impl PipelineConfig {
    /// Layers recognized environment variables over `self`, returning a new
    /// config. Only fields whose env var is present and parseable are
    /// changed; unset or malformed vars are left at the prior value
    /// (malformed values are logged, not fatal, since `validate` is the
    /// single fatal-at-startup checkpoint).
    pub fn from_env(mut self) -> Self {
        if let Ok(v) = env::var("WHISPER_MODEL_SIZE") {
            if let Ok(parsed) = v.parse() {
                self.whisper_model_size = parsed;
            } else {
                tracing::warn!(value = %v, "ignoring unparseable WHISPER_MODEL_SIZE");
            }
        }
        if let Ok(v) = env::var("DOMAIN_MODE") {
            if let Ok(parsed) = v.parse() {
                self.domain_mode = parsed;
            } else {
                tracing::warn!(value = %v, "ignoring unparseable DOMAIN_MODE");
            }
        }
        if let Ok(v) = env::var("STRICT_GURMUKHI") {
            self.strict_gurmukhi = matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Ok(v) = env::var("QUOTE_MATCH_CONFIDENCE_THRESHOLD") {
            if let Ok(parsed) = v.parse::<f32>() {
                self.thresholds.auto_replace_floor = parsed;
            } else {
                tracing::warn!(value = %v, "ignoring unparseable QUOTE_MATCH_CONFIDENCE_THRESHOLD");
            }
        }
        if let Ok(v) = env::var("ENABLE_DENOISING") {
            self.denoise.enabled = matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Ok(v) = env::var("DENOISE_STRENGTH") {
            self.denoise.strength = match v.to_ascii_lowercase().as_str() {
                "light" => DenoiseStrength::Light,
                "medium" => DenoiseStrength::Medium,
                "aggressive" => DenoiseStrength::Aggressive,
                other => {
                    tracing::warn!(value = %other, "ignoring unparseable DENOISE_STRENGTH");
                    self.denoise.strength
                }
            };
        }
        self
    }

    /// Fatal-at-startup validation, returning a `ConfigError` describing
    /// the first contradictory or out-of-range setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        if t.redecode_floor > t.review_floor {
            return Err(ConfigError::Contradictory {
                message: "redecode_floor must not exceed review_floor".into(),
            });
        }
        if t.review_floor > t.auto_replace_floor {
            return Err(ConfigError::Contradictory {
                message: "review_floor must not exceed auto_replace_floor".into(),
            });
        }
        if t.len_ratio_lo > t.len_ratio_hi {
            return Err(ConfigError::Contradictory {
                message: "len_ratio_lo must not exceed len_ratio_hi".into(),
            });
        }
        if (t.w_fuzzy + t.w_semantic - 1.0).abs() > 1e-3 {
            return Err(ConfigError::Contradictory {
                message: format!(
                    "w_fuzzy + w_semantic must equal 1.0, got {}",
                    t.w_fuzzy + t.w_semantic
                ),
            });
        }
        if self.chunker.min_chunk_sec > self.chunker.max_chunk_sec {
            return Err(ConfigError::Contradictory {
                message: "min_chunk_sec must not exceed max_chunk_sec".into(),
            });
        }
        if self.chunker.vad_aggressiveness > 3 {
            return Err(ConfigError::Invalid {
                field: "vad_aggressiveness".into(),
                value: self.chunker.vad_aggressiveness.to_string(),
            });
        }
        if self.concurrency.asr_parallel_workers == 0 {
            return Err(ConfigError::Invalid {
                field: "asr_parallel_workers".into(),
                value: "0".into(),
            });
        }
        if self.concurrency.chunk_parallel_workers == 0 {
            return Err(ConfigError::Invalid {
                field: "chunk_parallel_workers".into(),
                value: "0".into(),
            });
        }
        Ok(())
    }
}
