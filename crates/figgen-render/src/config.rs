//! Render executor configuration

use std::path::PathBuf;
use std::time::Duration;

/// Hard wall-clock deadline for generated scripts
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Raster DPI for the preview (2x the 72 dpi PDF baseline)
pub const DEFAULT_RASTER_DPI: u32 = 144;

/// Configuration for the render pipeline
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Interpreter that runs generated scripts
    pub interpreter: String,
    /// Document-to-PDF converter executable (LibreOffice / AppRun)
    pub converter: String,
    /// Converter user-profile URL, keeps headless runs isolated
    pub converter_profile: String,
    /// Directory the converter writes into before the PDF is moved
    /// into the run directory
    pub staging_dir: PathBuf,
    /// PDF-to-PNG rasteriser executable
    pub rasterizer: String,
    /// Wall-clock deadline for script execution
    pub timeout: Duration,
    /// Raster resolution in DPI
    pub raster_dpi: u32,
}

impl RenderConfig {
    /// Build from environment variables with sensible fallbacks
    ///
    /// Reads `LIBREOFFICE_APP_PATH` and `PDFTOPPM_PATH`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            converter: std::env::var("LIBREOFFICE_APP_PATH")
                .unwrap_or_else(|_| "soffice".to_string()),
            rasterizer: std::env::var("PDFTOPPM_PATH").unwrap_or_else(|_| "pdftoppm".to_string()),
            ..Self::default()
        }
    }

    /// With a different script interpreter
    #[inline]
    #[must_use]
    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    /// With a different execution deadline
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            interpreter: "python".to_string(),
            converter: "soffice".to_string(),
            converter_profile: "file:///tmp/figgen_lo_profile".to_string(),
            staging_dir: std::env::temp_dir(),
            rasterizer: "pdftoppm".to_string(),
            timeout: DEFAULT_TIMEOUT,
            raster_dpi: DEFAULT_RASTER_DPI,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.raster_dpi, 144);
        assert_eq!(config.interpreter, "python");
    }

    #[test]
    fn builder_overrides() {
        let config = RenderConfig::default()
            .with_interpreter("python3")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.interpreter, "python3");
        assert_eq!(config.timeout.as_secs(), 5);
    }
}
