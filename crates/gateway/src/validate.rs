//! Inbound request validation.

use {
    axum::http::{HeaderMap, header::CONTENT_TYPE},
    secrecy::{ExposeSecret, Secret},
    serde_json::{Map, Value},
};

use crate::{error::GatewayError, registry::Channel};

/// A validated request, ready for authentication and dispatch.
pub struct ProxyRequest {
    pub channel: String,
    pub text: String,
    pin: Option<Secret<String>>,
}

impl ProxyRequest {
    /// PIN as supplied by the caller (un-trimmed). Only populated for
    /// PIN-protected channels.
    #[must_use]
    pub fn pin(&self) -> Option<&str> {
        self.pin.as_ref().map(|p| p.expose_secret().as_str())
    }

    /// Body forwarded upstream. Only carries the fields upstreams expect,
    /// the PIN never leaves the gateway.
    #[must_use]
    pub fn upstream_payload(&self) -> Value {
        serde_json::json!({ "text": self.text })
    }
}

impl std::fmt::Debug for ProxyRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyRequest")
            .field("channel", &self.channel)
            .field("text", &self.text)
            .field("pin", &self.pin.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Encoding of an inbound request body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyFormat {
    #[default]
    Json,
    /// `application/x-www-form-urlencoded`
    Form,
}

impl BodyFormat {
    /// Pick the decoder from the `Content-Type` header. Anything that is not
    /// a form is decoded as JSON.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let is_form = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .is_some_and(|mime| {
                mime.trim()
                    .eq_ignore_ascii_case("application/x-www-form-urlencoded")
            });
        if is_form {
            Self::Form
        } else {
            Self::Json
        }
    }
}

/// Decode a raw request body. An empty body is treated as `{}` so that it
/// reports the missing text rather than a parse failure.
pub fn parse_body(raw: &[u8], format: BodyFormat) -> Result<Value, GatewayError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    match format {
        BodyFormat::Json => serde_json::from_slice(raw)
            .map_err(|_| GatewayError::MalformedBody("request body is not valid JSON".into())),
        // Repeated keys keep the last value.
        BodyFormat::Form => Ok(Value::Object(
            url::form_urlencoded::parse(raw)
                .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
                .collect(),
        )),
    }
}

/// Extract and check the payload fields for `channel`.
pub fn validate(channel: &Channel, body: &Value) -> Result<ProxyRequest, GatewayError> {
    let text = body
        .get("text")
        .and_then(Value::as_str)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| GatewayError::MissingText {
            hint: channel.hint.clone(),
        })?;

    let pin = if channel.requires_pin {
        body.get("pin")
            .and_then(Value::as_str)
            .map(|p| Secret::new(p.to_string()))
    } else {
        None
    };

    Ok(ProxyRequest {
        channel: channel.name.clone(),
        text: text.to_string(),
        pin,
    })
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest, serde_json::json};

    fn channel(requires_pin: bool) -> Channel {
        Channel {
            name: "social-media".into(),
            url: "http://127.0.0.1:1/hook".into(),
            description: "Social".into(),
            requires_pin,
            hint: "Please provide a URL or content text".into(),
        }
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!({ "text": "" }))]
    #[case(json!({ "text": "   \n\t" }))]
    #[case(json!({ "text": 42 }))]
    #[case(json!({ "text": null }))]
    #[case(json!({ "text": ["a"] }))]
    #[case(json!("text"))]
    #[case(json!([{ "text": "a" }]))]
    fn rejects_missing_or_blank_text(#[case] body: Value) {
        let err = validate(&channel(false), &body).unwrap_err();
        match err {
            GatewayError::MissingText { hint } => {
                assert_eq!(hint, "Please provide a URL or content text");
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn keeps_text_untrimmed() {
        let req = validate(&channel(false), &json!({ "text": "  space exploration " })).unwrap();
        assert_eq!(req.text, "  space exploration ");
        assert_eq!(req.channel, "social-media");
    }

    #[test]
    fn pin_only_extracted_for_protected_channels() {
        let body = json!({ "text": "http://a.com", "pin": " 123456" });
        assert_eq!(validate(&channel(true), &body).unwrap().pin(), Some(" 123456"));
        assert_eq!(validate(&channel(false), &body).unwrap().pin(), None);
    }

    #[test]
    fn non_string_pin_is_ignored() {
        let body = json!({ "text": "http://a.com", "pin": 123456 });
        assert_eq!(validate(&channel(true), &body).unwrap().pin(), None);
    }

    #[test]
    fn upstream_payload_excludes_pin() {
        let body = json!({ "text": "http://a.com", "pin": "123456", "extra": true });
        let payload = validate(&channel(true), &body).unwrap().upstream_payload();
        assert_eq!(payload, json!({ "text": "http://a.com" }));
    }

    #[test]
    fn debug_redacts_pin() {
        let body = json!({ "text": "x", "pin": "123456" });
        let rendered = format!("{:?}", validate(&channel(true), &body).unwrap());
        assert!(!rendered.contains("123456"));
    }

    #[test]
    fn parse_body_handles_empty_and_malformed() {
        assert_eq!(parse_body(b"", BodyFormat::Json).unwrap(), json!({}));
        assert_eq!(parse_body(b"  \n", BodyFormat::Json).unwrap(), json!({}));
        assert_eq!(
            parse_body(br#"{"text":"a"}"#, BodyFormat::Json).unwrap(),
            json!({ "text": "a" })
        );
        assert!(matches!(
            parse_body(b"{text:", BodyFormat::Json),
            Err(GatewayError::MalformedBody(_))
        ));
    }

    #[test]
    fn parse_form_body() {
        let body = parse_body(b"text=space+exploration&pin=123456", BodyFormat::Form).unwrap();
        assert_eq!(body, json!({ "text": "space exploration", "pin": "123456" }));
        assert_eq!(
            parse_body(b"text=a&text=b", BodyFormat::Form).unwrap(),
            json!({ "text": "b" })
        );
        assert_eq!(parse_body(b"", BodyFormat::Form).unwrap(), json!({}));
    }

    #[rstest]
    #[case(None, BodyFormat::Json)]
    #[case(Some("application/json"), BodyFormat::Json)]
    #[case(Some("text/plain"), BodyFormat::Json)]
    #[case(Some("application/x-www-form-urlencoded"), BodyFormat::Form)]
    #[case(Some("Application/X-WWW-Form-Urlencoded; charset=UTF-8"), BodyFormat::Form)]
    fn body_format_from_content_type(
        #[case] content_type: Option<&str>,
        #[case] expected: BodyFormat,
    ) {
        let mut headers = HeaderMap::new();
        if let Some(ct) = content_type {
            headers.insert(CONTENT_TYPE, ct.parse().unwrap());
        }
        assert_eq!(BodyFormat::from_headers(&headers), expected);
    }
}
