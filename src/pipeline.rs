//! Output registration and materialization.
//!
//! A thin host-pipeline surface: stages register (path, render-callback)
//! pairs against a document collection, and a single materialization walk
//! renders and writes every output. Each output is fully rendered in memory
//! before its file is created, so a failing render writes nothing.

use std::{fmt, fs, path::Path, time::Instant};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    document::DocumentCollection,
    error::{BoxError, ConfigError, PipelineError},
};

/// Render callback producing one output's bytes from the live collection.
pub type RenderFn = Box<dyn Fn(&DocumentCollection) -> Result<Vec<u8>, BoxError> + Send + Sync>;

struct Output {
    path: String,
    render: RenderFn,
}

/// Materialization statistics.
#[derive(Debug, Clone, Default)]
pub struct MaterializeStats {
    /// Number of outputs written.
    pub outputs: usize,

    /// Total bytes written.
    pub bytes: usize,

    /// Walk duration in milliseconds.
    pub duration_ms: u64,
}

/// Host-side output pipeline over a document collection.
pub struct Pipeline {
    collection: DocumentCollection,
    outputs: Vec<Output>,
}

impl Pipeline {
    /// Create a pipeline over a collection.
    #[must_use]
    pub fn new(collection: DocumentCollection) -> Self {
        Self {
            collection,
            outputs: Vec::new(),
        }
    }

    /// The document collection.
    pub fn collection(&self) -> &DocumentCollection {
        &self.collection
    }

    /// Mutable access to the collection, for registration-time changes.
    pub fn collection_mut(&mut self) -> &mut DocumentCollection {
        &mut self.collection
    }

    /// Whether an output is registered under the given path.
    pub fn contains_output(&self, path: &str) -> bool {
        self.outputs.iter().any(|o| o.path == path)
    }

    /// Register an output by path and render callback.
    pub fn register_output<F>(&mut self, path: impl Into<String>, render: F) -> Result<(), ConfigError>
    where
        F: Fn(&DocumentCollection) -> Result<Vec<u8>, BoxError> + Send + Sync + 'static,
    {
        let path = path.into();
        if self.contains_output(&path) {
            return Err(ConfigError::DuplicateOutputPath(path));
        }
        self.outputs.push(Output {
            path,
            render: Box::new(render),
        });
        Ok(())
    }

    /// Render and write every registered output under `out_dir`.
    ///
    /// Outputs render in parallel; render callbacks only read the collection.
    pub fn materialize(&self, out_dir: &Path) -> Result<MaterializeStats, PipelineError> {
        let start = Instant::now();
        fs::create_dir_all(out_dir)?;

        let results: Vec<Result<usize, PipelineError>> = self
            .outputs
            .par_iter()
            .map(|output| {
                let bytes =
                    (output.render)(&self.collection).map_err(|e| PipelineError::Render {
                        path: output.path.clone(),
                        message: e.to_string(),
                    })?;

                let target = out_dir.join(output.path.trim_start_matches('/'));
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&target, &bytes)?;

                debug!(path = %target.display(), bytes = bytes.len(), "wrote output");
                Ok(bytes.len())
            })
            .collect();

        let mut stats = MaterializeStats::default();
        for result in results {
            stats.bytes += result?;
            stats.outputs += 1;
        }
        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            outputs = stats.outputs,
            bytes = stats.bytes,
            duration_ms = stats.duration_ms,
            "materialized outputs"
        );
        Ok(stats)
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let paths: Vec<_> = self.outputs.iter().map(|o| o.path.as_str()).collect();
        f.debug_struct("Pipeline")
            .field("documents", &self.collection.len())
            .field("outputs", &paths)
            .finish()
    }
}
