//! Default configuration constants for callscribe.
//!
//! Shared constants used across configuration, CLI, and the pipeline so the
//! defaults live in exactly one place.

/// Default language code for transcription.
///
/// The service was built for Russian-language sales calls; pass a different
/// code (e.g., "en", "de") to override.
pub const DEFAULT_LANGUAGE: &str = "ru";

/// Default inference device hint.
pub const DEFAULT_DEVICE: &str = "cpu";

/// Default compute precision hint.
///
/// int8 quantization keeps memory low on CPU. GPU deployments typically
/// switch this to "float16" via config.
pub const DEFAULT_COMPUTE_TYPE: &str = "int8";

/// Audio sample rate expected by the speech model, in Hz.
pub const SAMPLE_RATE: u32 = 16000;

/// Display label for the first speaker role (the seller on a sales call).
pub const SELLER_LABEL: &str = "Продавец";

/// Display label for the second speaker role.
pub const CLIENT_LABEL: &str = "Клиент";

/// Display prefix for speakers beyond the first two, followed by the raw id.
pub const SPEAKER_LABEL_PREFIX: &str = "Спикер";

/// Display label for segments with no assigned speaker.
pub const UNKNOWN_LABEL: &str = "Неизвестный";

/// Report the GPU backend compiled into this build.
///
/// Returns a human-readable name based on the compile-time feature flags.
/// Only one GPU backend can be active at a time; if none is enabled, returns "CPU".
pub fn gpu_backend() -> &'static str {
    if cfg!(feature = "cuda") {
        "CUDA"
    } else if cfg!(feature = "vulkan") {
        "Vulkan"
    } else if cfg!(feature = "hipblas") {
        "HipBLAS (AMD)"
    } else if cfg!(feature = "openblas") {
        "OpenBLAS"
    } else {
        "CPU"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpu_backend_matches_compiled_feature() {
        let expected = if cfg!(feature = "cuda") {
            "CUDA"
        } else if cfg!(feature = "vulkan") {
            "Vulkan"
        } else if cfg!(feature = "hipblas") {
            "HipBLAS (AMD)"
        } else if cfg!(feature = "openblas") {
            "OpenBLAS"
        } else {
            "CPU"
        };
        assert_eq!(gpu_backend(), expected);
    }
}
