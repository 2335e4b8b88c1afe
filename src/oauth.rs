use base64::{engine::general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use std::time::{SystemTime, UNIX_EPOCH};
use url::{form_urlencoded, Url};
use uuid::Uuid;

use crate::error::{BrightkiteError, Result};

type HmacSha1 = Hmac<Sha1>;

/// Only RFC 3986 unreserved characters are left unescaped
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// OAuth consumer credentials issued by the service
#[derive(Clone)]
pub struct Consumer {
    /// Consumer key identifier
    pub key: String,
    /// Consumer secret used for signing
    secret: String,
}

impl Consumer {
    /// Create a new Consumer from a key and secret
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Consumer {
            key: key.into(),
            secret: secret.into(),
        }
    }
}

// Implement Debug manually to avoid exposing the secret
impl std::fmt::Debug for Consumer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Consumer")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Token represents an OAuth token/secret pair.
/// It is used both for temporary request tokens and for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    /// Token identifier (`oauth_token`)
    pub key: String,
    /// Token secret (`oauth_token_secret`)
    pub secret: String,
}

impl Token {
    /// Create a new Token
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Token {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// Parse a Token from a form-encoded token endpoint response,
    /// e.g. `oauth_token=abc&oauth_token_secret=def`
    pub fn from_encoded(data: &str) -> Result<Self> {
        let mut key = None;
        let mut secret = None;

        for (k, v) in form_urlencoded::parse(data.as_bytes()) {
            match k.as_ref() {
                "oauth_token" => key = Some(v.into_owned()),
                "oauth_token_secret" => secret = Some(v.into_owned()),
                _ => {}
            }
        }

        match (key, secret) {
            (Some(key), Some(secret)) => Ok(Token { key, secret }),
            _ => Err(BrightkiteError::Other(format!(
                "malformed token response: {}",
                data
            ))),
        }
    }
}

/// Percent-encode a string per RFC 3986 as required by OAuth signing
pub(crate) fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, UNRESERVED).to_string()
}

/// Build the OAuth signature base string for a request
///
/// The URL is normalized to scheme://host[:port]/path (query stripped,
/// default ports dropped) and the parameters are encoded, sorted, and
/// joined per RFC 5849.
pub(crate) fn signature_base_string(
    method: &str,
    url: &str,
    params: &[(String, String)],
) -> Result<String> {
    let parsed = Url::parse(url)?;

    let mut base_url = format!(
        "{}://{}",
        parsed.scheme(),
        parsed.host_str().unwrap_or_default()
    );
    if let Some(port) = parsed.port() {
        base_url.push(':');
        base_url.push_str(&port.to_string());
    }
    base_url.push_str(parsed.path());

    // Sort parameters after encoding for consistent ordering
    let mut pairs: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    pairs.sort();

    let normalized = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    Ok(format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(&base_url),
        percent_encode(&normalized)
    ))
}

/// Compute the HMAC-SHA1 signature over a base string, base64-encoded
pub(crate) fn hmac_sha1_signature(base: &str, consumer_secret: &str, token_secret: &str) -> String {
    let key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );

    let mut mac = HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC accepts any key length");
    mac.update(base.as_bytes());

    STANDARD.encode(mac.finalize().into_bytes())
}

/// Sign a request in place.
///
/// Appends the `oauth_*` protocol parameters (consumer key, nonce,
/// timestamp, signature method, version, and token when present) to
/// `params`, then computes and appends `oauth_signature`.
pub(crate) fn sign(
    consumer: &Consumer,
    token: Option<&Token>,
    method: &str,
    url: &str,
    params: &mut Vec<(String, String)>,
) -> Result<()> {
    params.push(("oauth_consumer_key".to_string(), consumer.key.clone()));
    params.push(("oauth_nonce".to_string(), Uuid::new_v4().to_string()));
    params.push((
        "oauth_signature_method".to_string(),
        "HMAC-SHA1".to_string(),
    ));
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();
    params.push(("oauth_timestamp".to_string(), timestamp.to_string()));
    params.push(("oauth_version".to_string(), "1.0".to_string()));
    if let Some(token) = token {
        params.push(("oauth_token".to_string(), token.key.clone()));
    }

    let base = signature_base_string(method, url, params)?;
    let token_secret = token.map(|t| t.secret.as_str()).unwrap_or("");
    let signature = hmac_sha1_signature(&base, &consumer.secret, token_secret);
    params.push(("oauth_signature".to_string(), signature));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Parameters from the published HMAC-SHA1 example request
    // (GET http://photos.example.net/photos, RFC 5849 / OAuth Core 1.0)
    fn example_params() -> Vec<(String, String)> {
        [
            ("oauth_consumer_key", "dpf43f3p2l4k3l03"),
            ("oauth_token", "nnch734d00sl2jdk"),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", "1191242096"),
            ("oauth_nonce", "kllo9940pd9333jh"),
            ("oauth_version", "1.0"),
            ("file", "vacation.jpg"),
            ("size", "original"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_percent_encode() {
        assert_eq!(percent_encode("abcXYZ019"), "abcXYZ019");
        assert_eq!(percent_encode("-._~"), "-._~");
        assert_eq!(percent_encode("a b"), "a%20b");
        assert_eq!(percent_encode("a+b&c=d"), "a%2Bb%26c%3Dd");
        assert_eq!(percent_encode("vacation.jpg"), "vacation.jpg");
    }

    #[test]
    fn test_signature_base_string() {
        let base = signature_base_string(
            "GET",
            "http://photos.example.net/photos",
            &example_params(),
        )
        .unwrap();

        assert_eq!(
            base,
            "GET&http%3A%2F%2Fphotos.example.net%2Fphotos&file%3Dvacation.jpg%26\
             oauth_consumer_key%3Ddpf43f3p2l4k3l03%26oauth_nonce%3Dkllo9940pd9333jh%26\
             oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1191242096%26\
             oauth_token%3Dnnch734d00sl2jdk%26oauth_version%3D1.0%26size%3Doriginal"
        );
    }

    #[test]
    fn test_base_string_strips_query_and_default_port() {
        let base =
            signature_base_string("get", "https://apps.brightkite.com:443/me.json?x=1", &[])
                .unwrap();
        assert!(base.starts_with("GET&https%3A%2F%2Fapps.brightkite.com%2Fme.json&"));
    }

    #[test]
    fn test_hmac_sha1_signature_vector() {
        let base = signature_base_string(
            "GET",
            "http://photos.example.net/photos",
            &example_params(),
        )
        .unwrap();

        let signature = hmac_sha1_signature(&base, "kd94hf93k423kf44", "pfkkdhi9sl3r4s00");
        assert_eq!(signature, "tR3+Ty81lMeYAr/Fid0kMTYa/WM=");
    }

    #[test]
    fn test_sign_appends_protocol_params() {
        let consumer = Consumer::new("key", "secret");
        let token = Token::new("tok", "toksec");
        let mut params = vec![("query".to_string(), "pizza".to_string())];

        sign(
            &consumer,
            Some(&token),
            "GET",
            "https://apps.brightkite.com/people/search.json",
            &mut params,
        )
        .unwrap();

        let names: Vec<&str> = params.iter().map(|(k, _)| k.as_str()).collect();
        for expected in [
            "query",
            "oauth_consumer_key",
            "oauth_nonce",
            "oauth_signature_method",
            "oauth_timestamp",
            "oauth_version",
            "oauth_token",
            "oauth_signature",
        ] {
            assert!(names.contains(&expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_token_from_encoded() {
        let token = Token::from_encoded("oauth_token=abc&oauth_token_secret=def").unwrap();
        assert_eq!(token.key, "abc");
        assert_eq!(token.secret, "def");
    }

    #[test]
    fn test_token_from_encoded_malformed() {
        assert!(Token::from_encoded("oauth_token=abc").is_err());
        assert!(Token::from_encoded("").is_err());
    }

    #[test]
    fn test_consumer_debug_redacts_secret() {
        let consumer = Consumer::new("key-id", "hunter2");
        let debug = format!("{:?}", consumer);
        assert!(debug.contains("key-id"));
        assert!(!debug.contains("hunter2"));
    }
}
