pub mod scale;
pub mod wrap;

pub use scale::{sqrt_scale, ScaleRange};
pub use wrap::{wrap, wrap_label};
