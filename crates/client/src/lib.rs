//! Calling-side library for the gateway: a typed HTTP client plus the
//! response decoding the studio UI relies on (image URL extraction, podcast
//! audio lookup, PIN format check).

pub mod client;
pub mod error;
pub mod normalize;

pub use {
    client::{DEFAULT_GATEWAY_URL, GatewayClient, check_pin_format},
    error::{ClientError, Result},
    normalize::{IMAGE_SHAPE_PRIORITY, ImageShape, extract_audio_file, extract_image_url},
};
