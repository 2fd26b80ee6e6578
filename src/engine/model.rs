//! Model Gateway - Native ONNX Runtime Integration
//!
//! Owns the lifecycle of the optional classifier artifact. Loaded at most
//! once per process; the gateway stays `Absent` for the whole process
//! lifetime when no artifact exists, and callers branch on that state rather
//! than on a null check.
//!
//! Artifact contract: a binary classifier exported to ONNX with two outputs,
//! a label tensor (i64, one class code per row) and a probability tensor
//! (f32, one distribution per row).

use std::path::{Path, PathBuf};

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::RwLock;
use serde::Serialize;

use super::layout::FEATURE_COUNT;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Expected, recoverable: the storage location has no artifact. Callers
    /// branch into heuristic mode on this condition specifically.
    #[error("model artifact not found at {0}")]
    ArtifactMissing(PathBuf),

    /// Hard load failure: the artifact exists but cannot be turned into a
    /// session.
    #[error("model artifact unreadable: {0}")]
    ArtifactCorrupt(String),

    /// Predict was called before any successful load.
    #[error("model not loaded")]
    NotLoaded,

    /// Prediction-time failure (shape mismatch, runtime error). Unexpected;
    /// callers log and fall back.
    #[error("inference failed: {0}")]
    Inference(String),
}

// ============================================================================
// STATE
// ============================================================================

/// Loaded / not-loaded duality as a tagged variant so every caller handles
/// both states.
enum ModelState {
    Absent,
    Loaded(Artifact),
}

struct Artifact {
    session: Session,
    /// Output tensor names, captured at load time. Index 0 = labels,
    /// index 1 = probabilities.
    output_names: Vec<String>,
    metadata: ModelMetadata,
}

/// Artifact metadata for status endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub feature_count: usize,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

// ============================================================================
// GATEWAY
// ============================================================================

pub struct ModelGateway {
    state: RwLock<ModelState>,
}

impl Default for ModelGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelGateway {
    /// A gateway with no artifact. Constructed once at the composition point
    /// and injected into the request state.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(ModelState::Absent),
        }
    }

    /// Load the artifact from disk. Idempotent: a second call while an
    /// artifact is held keeps the cached artifact and does not touch storage.
    pub fn load(&self, path: &Path) -> Result<(), ModelError> {
        let mut state = self.state.write();
        if matches!(*state, ModelState::Loaded(_)) {
            tracing::debug!("model already loaded, keeping cached artifact");
            return Ok(());
        }

        if !path.exists() {
            return Err(ModelError::ArtifactMissing(path.to_path_buf()));
        }

        tracing::info!("loading model artifact from {}", path.display());

        let session = Session::builder()
            .map_err(|e| ModelError::ArtifactCorrupt(format!("session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ModelError::ArtifactCorrupt(format!("optimization level: {e}")))?
            .commit_from_file(path)
            .map_err(|e| ModelError::ArtifactCorrupt(e.to_string()))?;

        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        if output_names.is_empty() {
            return Err(ModelError::ArtifactCorrupt(
                "artifact defines no outputs".to_string(),
            ));
        }

        *state = ModelState::Loaded(Artifact {
            session,
            output_names,
            metadata: ModelMetadata {
                model_path: path.display().to_string(),
                feature_count: FEATURE_COUNT,
                loaded_at: chrono::Utc::now(),
            },
        });

        tracing::info!("model artifact loaded");
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        matches!(*self.state.read(), ModelState::Loaded(_))
    }

    pub fn metadata(&self) -> Option<ModelMetadata> {
        match &*self.state.read() {
            ModelState::Loaded(artifact) => Some(artifact.metadata.clone()),
            ModelState::Absent => None,
        }
    }

    /// Class code per input row.
    pub fn predict(&self, rows: &[[f32; FEATURE_COUNT]]) -> Result<Vec<i64>, ModelError> {
        self.run(rows, 0, |output| {
            let (_, labels) = output
                .try_extract_tensor::<i64>()
                .map_err(|e| ModelError::Inference(format!("label output: {e}")))?;
            Ok(labels.to_vec())
        })
    }

    /// Probability distribution per input row.
    pub fn predict_probability(
        &self,
        rows: &[[f32; FEATURE_COUNT]],
    ) -> Result<Vec<Vec<f32>>, ModelError> {
        let row_count = rows.len();
        self.run(rows, 1, move |output| {
            let (_, probabilities) = output
                .try_extract_tensor::<f32>()
                .map_err(|e| ModelError::Inference(format!("probability output: {e}")))?;
            if row_count == 0 || probabilities.len() % row_count != 0 {
                return Err(ModelError::Inference(format!(
                    "probability tensor of {} values does not divide into {} rows",
                    probabilities.len(),
                    row_count
                )));
            }
            let classes = probabilities.len() / row_count;
            Ok(probabilities
                .chunks(classes)
                .map(|chunk| chunk.to_vec())
                .collect())
        })
    }

    /// Run one inference pass and extract a single named output.
    fn run<T>(
        &self,
        rows: &[[f32; FEATURE_COUNT]],
        output_index: usize,
        extract: impl FnOnce(&Value) -> Result<T, ModelError>,
    ) -> Result<T, ModelError> {
        // The session requires mutable access to run, so prediction calls
        // serialize on the write lock. State is never replaced after load.
        let mut state = self.state.write();
        let artifact = match &mut *state {
            ModelState::Loaded(artifact) => artifact,
            ModelState::Absent => return Err(ModelError::NotLoaded),
        };

        let output_name = artifact
            .output_names
            .get(output_index)
            .cloned()
            .ok_or_else(|| {
                ModelError::Inference(format!("artifact has no output #{output_index}"))
            })?;

        let mut flat = Vec::with_capacity(rows.len() * FEATURE_COUNT);
        for row in rows {
            flat.extend_from_slice(row);
        }
        let input_array = Array2::<f32>::from_shape_vec((rows.len(), FEATURE_COUNT), flat)
            .map_err(|e| ModelError::Inference(format!("input matrix: {e}")))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| ModelError::Inference(format!("input tensor: {e}")))?;

        let outputs = artifact
            .session
            .run(ort::inputs![input_tensor])
            .map_err(|e| ModelError::Inference(e.to_string()))?;

        let output = outputs
            .get(&output_name)
            .ok_or_else(|| ModelError::Inference(format!("missing output {output_name}")))?;

        extract(output)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn new_gateway_is_absent() {
        let gateway = ModelGateway::new();
        assert!(!gateway.is_loaded());
        assert!(gateway.metadata().is_none());
    }

    #[test]
    fn predict_before_load_signals_not_loaded() {
        let gateway = ModelGateway::new();
        let rows = [[0.0; FEATURE_COUNT]];
        assert!(matches!(gateway.predict(&rows), Err(ModelError::NotLoaded)));
        assert!(matches!(
            gateway.predict_probability(&rows),
            Err(ModelError::NotLoaded)
        ));
    }

    #[test]
    fn missing_artifact_is_a_distinct_condition() {
        let gateway = ModelGateway::new();
        let result = gateway.load(Path::new("/nonexistent/phishing_model.onnx"));
        assert!(matches!(result, Err(ModelError::ArtifactMissing(_))));
        // The gateway stays absent; requests keep taking the heuristic path.
        assert!(!gateway.is_loaded());
    }

    #[test]
    fn garbage_artifact_is_corrupt_not_missing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not an onnx graph").unwrap();

        let gateway = ModelGateway::new();
        let result = gateway.load(file.path());
        assert!(matches!(result, Err(ModelError::ArtifactCorrupt(_))));
        assert!(!gateway.is_loaded());
    }
}
