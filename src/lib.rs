//! Nephra Core - scoring engine for kidney-health wellness signals
//!
//! Nephra Core turns a user's daily health observations and journal text into
//! a normalized Kidney Stress Load Score (KSLS) through a deterministic
//! pipeline: metric normalization → composite scoring → interpretation →
//! trend classification, with a free-text symptom estimator feeding the
//! scorer when structured data is absent.
//!
//! All analysis functions are pure and total: given any well-formed input
//! they return a defined result (including explicit "insufficient data"
//! markers) without blocking, panicking, or touching shared state. Storage,
//! transport, and authentication belong to the surrounding application.
//!
//! The outputs are a wellness index, not a clinical diagnosis.

pub mod egfr;
pub mod error;
pub mod interpreter;
pub mod normalizer;
pub mod pipeline;
pub mod report;
pub mod scorer;
pub mod sources;
pub mod symptoms;
pub mod trend;
pub mod types;

pub use error::CoreError;
pub use interpreter::Interpreter;
pub use normalizer::MetricNormalizer;
pub use pipeline::{assess, Assessment};
pub use report::{AssessmentReport, ReportEncoder};
pub use scorer::CompositeScorer;
pub use sources::{ObservationSource, SourceChain};
pub use symptoms::{should_suggest_ksls, SymptomTextExtractor};
pub use trend::{MetricDirection, ScorePoint, TrendAnalyzer};

/// Engine version embedded in all assessment reports
pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for assessment reports
pub const PRODUCER_NAME: &str = "nephra-core";
