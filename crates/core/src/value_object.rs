/// Compared by attributes only; replaced rather than edited.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
