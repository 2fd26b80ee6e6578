//! Scan Engine
//!
//! The feature-extraction and risk-decision core. Everything here is
//! deterministic and I/O-free apart from the one-time model artifact load.
//!
//! ## Structure
//! - `layout`: versioned feature schema (the training/inference contract)
//! - `urlparts`: structural URL decomposition
//! - `features`: URL string -> feature vector
//! - `model`: ONNX model gateway (Absent | Loaded lifecycle)
//! - `rules`: thresholds, signal lists, advisory messages
//! - `decision`: verdict policies (model path, heuristic, pattern scan)
//! - `types`: verdict data structures
//!
//! ## Usage
//! ```ignore
//! let features = engine::extract(url);
//! let verdict = engine::decide(&features, &gateway);
//! match verdict.label {
//!     Label::Benign => println!("ok"),
//!     Label::Phishing => println!("{}", verdict.message),
//! }
//! ```

pub mod decision;
pub mod features;
pub mod layout;
pub mod model;
pub mod rules;
pub mod types;
pub mod urlparts;

// Re-export the engine surface the handlers work against.
pub use decision::{decide, quick_decide};
pub use features::{extract, UrlFeatures};
pub use layout::{LayoutInfo, FEATURE_COUNT, FEATURE_VERSION};
pub use model::{ModelError, ModelGateway};
pub use types::{Label, PatternVerdict, Verdict};
