//! Character encodings for parameters and bodies.
//!
//! Query strings and form bodies follow `application/x-www-form-urlencoded`
//! rules: the text is first encoded into the configured charset, then every
//! byte outside `[A-Za-z0-9*-._]` is percent-escaped and space becomes `+`.
//! Characters the charset cannot represent make the whole value unencodable;
//! callers decide how to degrade.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Charset used for query parameters, form bodies and JSON bodies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamsEncoding {
    #[default]
    #[serde(rename = "utf-8", alias = "UTF-8")]
    Utf8,
    #[serde(rename = "iso-8859-1", alias = "ISO-8859-1", alias = "latin1")]
    Latin1,
    #[serde(rename = "us-ascii", alias = "US-ASCII", alias = "ascii")]
    Ascii,
}

impl ParamsEncoding {
    /// Charset label as it appears in a `Content-Type` header.
    pub fn charset(&self) -> &'static str {
        match self {
            ParamsEncoding::Utf8 => "UTF-8",
            ParamsEncoding::Latin1 => "ISO-8859-1",
            ParamsEncoding::Ascii => "US-ASCII",
        }
    }

    /// Encode `text` into this charset, `None` if any character is unmappable.
    pub fn encode(&self, text: &str) -> Option<Vec<u8>> {
        match self {
            ParamsEncoding::Utf8 => Some(text.as_bytes().to_vec()),
            ParamsEncoding::Latin1 => text.chars().map(|c| u8::try_from(u32::from(c)).ok()).collect(),
            ParamsEncoding::Ascii => text.is_ascii().then(|| text.as_bytes().to_vec()),
        }
    }

    /// Form-percent-encode `text`, `None` if it is not representable.
    pub fn form_encode(&self, text: &str) -> Option<String> {
        let bytes = self.encode(text)?;
        Some(form_urlencoded::byte_serialize(&bytes).collect())
    }
}

/// Encode every pair as `key=value`, joined by `&`.
///
/// A pair whose key or value cannot be encoded is skipped; the remaining
/// pairs keep their order.
pub fn encode_pairs(params: &BTreeMap<String, String>, encoding: ParamsEncoding) -> String {
    let mut out = String::new();
    for (key, value) in params {
        let (Some(key), Some(value)) = (encoding.form_encode(key), encoding.form_encode(value)) else {
            tracing::warn!(
                parameter = %key,
                charset = encoding.charset(),
                "dropping parameter that cannot be encoded"
            );
            continue;
        };
        if !out.is_empty() {
            out.push('&');
        }
        out.push_str(&key);
        out.push('=');
        out.push_str(&value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn form_encoding_matches_url_encoder_rules() {
        let enc = ParamsEncoding::Utf8;
        assert_eq!(enc.form_encode("a b").as_deref(), Some("a+b"));
        assert_eq!(enc.form_encode("x*-._y").as_deref(), Some("x*-._y"));
        assert_eq!(enc.form_encode("a&b=c").as_deref(), Some("a%26b%3Dc"));
        assert_eq!(enc.form_encode("é").as_deref(), Some("%C3%A9"));
    }

    #[test]
    fn latin1_uses_single_bytes() {
        let enc = ParamsEncoding::Latin1;
        assert_eq!(enc.form_encode("é").as_deref(), Some("%E9"));
        assert_eq!(enc.form_encode("€"), None);
    }

    #[test]
    fn ascii_rejects_non_ascii() {
        assert_eq!(ParamsEncoding::Ascii.encode("plain"), Some(b"plain".to_vec()));
        assert_eq!(ParamsEncoding::Ascii.encode("café"), None);
    }

    #[test]
    fn pairs_join_in_key_order() {
        let encoded = encode_pairs(&params(&[("q", "rust lang"), ("page", "2")]), ParamsEncoding::Utf8);
        assert_eq!(encoded, "page=2&q=rust+lang");
    }

    #[test]
    fn unencodable_pair_is_skipped() {
        let encoded = encode_pairs(
            &params(&[("a", "1"), ("b", "€"), ("c", "3")]),
            ParamsEncoding::Latin1,
        );
        assert_eq!(encoded, "a=1&c=3");
    }

    #[test]
    fn charset_deserializes_from_label() {
        let enc: ParamsEncoding = serde_json::from_str(r#""iso-8859-1""#).unwrap();
        assert_eq!(enc, ParamsEncoding::Latin1);
        let enc: ParamsEncoding = serde_json::from_str(r#""UTF-8""#).unwrap();
        assert_eq!(enc, ParamsEncoding::Utf8);
    }
}
