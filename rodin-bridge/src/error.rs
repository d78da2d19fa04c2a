/// Errors produced while rendering bridge scripts.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BridgeError {
    /// Import scale outside the range Blender's operator accepts.
    #[error("invalid import scale {value}: must be in [{min}, {max}]")]
    InvalidScale { value: f64, min: f64, max: f64 },
}
