//! # Analysis Module
//!
//! Pure per-contribution analyzers. Nothing here touches player or match state.
//!
//! ## Submodules
//!
//! - `trace` - Pointer kinematics, fluidity, variability
//! - `visual` - Before/after differencing, density, destruction, coherence
//! - `theme` - Keyword and dominant-color heuristics for theme fidelity
//! - `creativity` - Creativity score, twist detection, chaos classification

pub mod creativity;
pub mod theme;
pub mod trace;
pub mod visual;

pub use creativity::{classify_chaos, creativity_score, detect_twist};
pub use theme::{dominant_colors, extract_features, theme_fidelity, DominantColor, ImageFeatures};
pub use trace::{capture_trace, composite_fluidity, fluidity_score, measure, variability_score};
pub use visual::{
    analyze as analyze_visual, compare_images, detect_destruction, ImageComparison, VisualAnalysis,
};
