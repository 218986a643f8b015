/// Prevents downstream crates from implementing crate-local
/// marker traits such as [`Marker`](crate::types::id::marker::Marker).
pub trait Sealed {}
