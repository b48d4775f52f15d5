#[cfg(test)]
pub mod impl_fake;
#[cfg(feature = "webcam")]
pub mod impl_gstreamer;
#[cfg(any(test, not(feature = "webcam")))]
pub mod impl_unavailable;
pub mod interface;
