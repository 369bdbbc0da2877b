//! Decoding of upstream result shapes.
//!
//! The thumbnail upstream answers in one of several shapes depending on how
//! its workflow is wired. Each shape is a variant of [`ImageShape`] and
//! [`IMAGE_SHAPE_PRIORITY`] fixes the order they are tried in.

use serde_json::Value;

use crate::error::{ClientError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageShape {
    /// `[{ "body": { "result": { "urls": [url] } } }]`, first element only.
    WrappedArray,
    /// `{ "body": { "result": { "urls": [url] } } }`
    NestedBody,
    /// `{ "result": { "urls": [url] } }`
    ResultUrls,
    /// `{ "urls": [url] }`
    Urls,
    /// `{ "imageUrl": url }`
    ImageUrl,
    /// `{ "image": url }`
    Image,
    /// `{ "url": url }`
    Url,
}

/// First match wins.
pub const IMAGE_SHAPE_PRIORITY: [ImageShape; 7] = [
    ImageShape::WrappedArray,
    ImageShape::NestedBody,
    ImageShape::ResultUrls,
    ImageShape::Urls,
    ImageShape::ImageUrl,
    ImageShape::Image,
    ImageShape::Url,
];

impl ImageShape {
    /// Pull the image URL out of `body` if it has this shape.
    #[must_use]
    pub fn decode(self, body: &Value) -> Option<&str> {
        let found = match self {
            Self::WrappedArray => body.as_array()?.first()?.pointer("/body/result/urls/0"),
            Self::NestedBody => body.pointer("/body/result/urls/0"),
            Self::ResultUrls => body.pointer("/result/urls/0"),
            Self::Urls => body.pointer("/urls/0"),
            Self::ImageUrl => body.get("imageUrl"),
            Self::Image => body.get("image"),
            Self::Url => body.get("url"),
        };
        found.and_then(Value::as_str).filter(|s| !s.is_empty())
    }
}

/// Extract the generated image URL from a thumbnail response.
pub fn extract_image_url(body: &Value) -> Result<String> {
    IMAGE_SHAPE_PRIORITY
        .iter()
        .find_map(|shape| shape.decode(body))
        .map(str::to_string)
        .ok_or(ClientError::NoImageFound)
}

/// Extract `audioFile` from a podcast response.
pub fn extract_audio_file(body: &Value) -> Result<String> {
    body.get("audioFile")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or(ClientError::NoAudioFile)
}
