//! Controller input decoding
//!
//! - `encoder`: quadrature line states → detent deltas
//! - `button`: button level → debounced presses

pub mod button;
pub mod encoder;

pub use button::PressDetector;
pub use encoder::{LineState, QuadratureDecoder, TRANSITION_TABLE, movement};
