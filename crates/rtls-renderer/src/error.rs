use thiserror::Error;

/// Anomalies detected while rendering or handling input. None of them are fatal:
/// callers log them and carry on with the next event or frame.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Degenerate zoom input: delta {delta} cancels zoom {zoom}")]
    DegenerateInput { delta: f64, zoom: f64 },

    #[error("Icon registry must contain at least one icon")]
    EmptyIconRegistry,

    #[error("Invalid surface size {width}x{height}")]
    InvalidSurface { width: f64, height: f64 },

    #[error("Invalid grid target spacing {spacing}: expected a value in (0, {max}]")]
    InvalidGridSpacing { spacing: f64, max: f64 },

    #[error("Invalid marker icon size {size}")]
    InvalidIconSize { size: f64 },
}
