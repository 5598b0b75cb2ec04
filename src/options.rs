//! Options shared by the volume constructors.
use crate::engine::{Engine, FileEngine};
use crate::typedef::NumericKind;
use std::env;
use std::sync::Arc;

/// Name of the environment variable which turns on debug events.
pub const DEBUG_ENV_VAR: &str = "MINC_DEBUG";

/// Options for opening and creating volumes.
///
/// ```
/// use minc::{NumericKind, VolumeOptions};
///
/// let options = VolumeOptions::new()
///     .dtype(NumericKind::Float)
///     .labels(false);
/// assert_eq!(options.get_dtype(), Some(NumericKind::Float));
/// ```
#[derive(Debug, Clone)]
pub struct VolumeOptions {
    engine: Arc<dyn Engine>,
    dtype: Option<NumericKind>,
    labels: bool,
    debug: bool,
}

impl Default for VolumeOptions {
    fn default() -> Self {
        VolumeOptions::new()
    }
}

impl VolumeOptions {
    /// Create options with the file engine and no working type override.
    /// Debug events are enabled if `MINC_DEBUG` is set.
    pub fn new() -> Self {
        VolumeOptions {
            engine: Arc::new(FileEngine::new()),
            dtype: None,
            labels: false,
            debug: env::var_os(DEBUG_ENV_VAR).is_some(),
        }
    }

    /// Use the given storage engine.
    pub fn engine(mut self, engine: Arc<dyn Engine>) -> Self {
        self.engine = engine;
        self
    }

    /// Override the working type of the in-memory voxel array.
    pub fn dtype(mut self, dtype: NumericKind) -> Self {
        self.dtype = Some(dtype);
        self
    }

    /// Whether the volumes hold label values.
    pub fn labels(mut self, labels: bool) -> Self {
        self.labels = labels;
        self
    }

    /// Turn debug events on or off, whatever the environment says.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// The storage engine.
    pub fn get_engine(&self) -> &Arc<dyn Engine> {
        &self.engine
    }

    /// The working type override, if any.
    pub fn get_dtype(&self) -> Option<NumericKind> {
        self.dtype
    }

    /// Whether the volumes hold label values.
    pub fn is_labels(&self) -> bool {
        self.labels
    }

    /// Whether debug events are emitted.
    pub fn is_debug(&self) -> bool {
        self.debug
    }
}

#[cfg(test)]
mod tests {
    use super::VolumeOptions;
    use crate::typedef::NumericKind;

    #[test]
    fn builder() {
        let o = VolumeOptions::new()
            .dtype(NumericKind::UShort)
            .labels(true)
            .debug(true);
        assert_eq!(o.get_dtype(), Some(NumericKind::UShort));
        assert!(o.is_labels());
        assert!(o.is_debug());
        assert_eq!(o.get_engine().version(), env!("CARGO_PKG_VERSION"));
        assert!(!o.debug(false).is_debug());
    }
}
