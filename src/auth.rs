use base64::{engine::general_purpose::STANDARD, Engine};
use url::form_urlencoded;

use crate::error::Result;
use crate::oauth::{self, Consumer, Token};

/// Query/body parameters for a single request
pub type Params = Vec<(String, String)>;

/// A request prepared by an authentication strategy: the final URL,
/// the form body (if any), and extra headers to send.
#[derive(Debug, Clone)]
pub(crate) struct Prepared {
    pub url: String,
    pub body: Option<String>,
    pub headers: Vec<(&'static str, String)>,
}

/// Authentication strategy applied to every outgoing request.
///
/// Selected once at client construction time.
#[derive(Clone)]
pub enum Auth {
    /// No authentication
    None,
    /// HTTP Basic authentication
    Basic { username: String, password: String },
    /// OAuth 1.0a request signing
    OAuth {
        consumer: Consumer,
        access_token: Option<Token>,
    },
}

impl Auth {
    /// HTTP Basic authentication with the given credentials
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Auth::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// OAuth authentication with consumer credentials and an optional
    /// previously obtained access token
    pub fn oauth(consumer: Consumer, access_token: Option<Token>) -> Self {
        Auth::OAuth {
            consumer,
            access_token,
        }
    }

    pub(crate) fn is_oauth(&self) -> bool {
        matches!(self, Auth::OAuth { .. })
    }

    /// Prepare an outgoing request.
    ///
    /// An explicit `token` (used during the OAuth token exchange) takes
    /// precedence over the configured access token.
    pub(crate) fn prepare(
        &self,
        method: &str,
        url: &str,
        params: &Params,
        token: Option<&Token>,
    ) -> Result<Prepared> {
        match self {
            Auth::None => Ok(place_params(method, url, params, Vec::new())),
            Auth::Basic { username, password } => {
                let credentials = STANDARD.encode(format!("{}:{}", username, password));
                let headers = vec![("Authorization", format!("Basic {}", credentials))];
                Ok(place_params(method, url, params, headers))
            }
            Auth::OAuth {
                consumer,
                access_token,
            } => {
                let token = token.or(access_token.as_ref());
                let mut signed = params.clone();
                oauth::sign(consumer, token, method, url, &mut signed)?;
                Ok(place_params(method, url, &signed, Vec::new()))
            }
        }
    }
}

// Implement Debug manually to avoid exposing credentials
impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Auth::None => f.write_str("None"),
            Auth::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Auth::OAuth { consumer, .. } => {
                f.debug_struct("OAuth").field("consumer", consumer).finish()
            }
        }
    }
}

fn encode_params(params: &Params) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish()
}

/// GET requests carry parameters in the query string; POST and PUT
/// requests carry them in the form body.
fn place_params(
    method: &str,
    url: &str,
    params: &Params,
    headers: Vec<(&'static str, String)>,
) -> Prepared {
    if params.is_empty() {
        return Prepared {
            url: url.to_string(),
            body: None,
            headers,
        };
    }

    let query = encode_params(params);
    match method {
        "POST" | "PUT" => Prepared {
            url: url.to_string(),
            body: Some(query),
            headers,
        },
        _ => Prepared {
            url: format!("{}?{}", url, query),
            body: None,
            headers,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_none_get() {
        let prepared = Auth::None
            .prepare(
                "GET",
                "https://apps.brightkite.com/me.json",
                &params(&[("q", "a b")]),
                None,
            )
            .unwrap();

        assert_eq!(prepared.url, "https://apps.brightkite.com/me.json?q=a+b");
        assert!(prepared.body.is_none());
        assert!(prepared.headers.is_empty());
    }

    #[test]
    fn test_basic_get() {
        let auth = Auth::basic("user", "pass");
        let prepared = auth
            .prepare(
                "GET",
                "https://apps.brightkite.com/people/search.json",
                &params(&[("query", "pizza")]),
                None,
            )
            .unwrap();

        assert_eq!(
            prepared.url,
            "https://apps.brightkite.com/people/search.json?query=pizza"
        );
        assert!(prepared.body.is_none());
        assert_eq!(
            prepared.headers,
            vec![("Authorization", "Basic dXNlcjpwYXNz".to_string())]
        );
    }

    #[test]
    fn test_basic_put_params_in_body() {
        let auth = Auth::basic("user", "pass");
        let prepared = auth
            .prepare(
                "PUT",
                "https://apps.brightkite.com/me/config.json",
                &params(&[("person[global_privacy_mode]", "true")]),
                None,
            )
            .unwrap();

        assert_eq!(prepared.url, "https://apps.brightkite.com/me/config.json");
        assert_eq!(
            prepared.body.as_deref(),
            Some("person%5Bglobal_privacy_mode%5D=true")
        );
    }

    #[test]
    fn test_basic_no_params() {
        let auth = Auth::basic("user", "pass");
        let prepared = auth
            .prepare("GET", "https://apps.brightkite.com/me.json", &Vec::new(), None)
            .unwrap();

        assert_eq!(prepared.url, "https://apps.brightkite.com/me.json");
        assert!(prepared.body.is_none());
    }

    #[test]
    fn test_oauth_get_folds_params_into_url() {
        let auth = Auth::oauth(Consumer::new("key", "secret"), Some(Token::new("tok", "sec")));
        let prepared = auth
            .prepare(
                "GET",
                "https://apps.brightkite.com/me.json",
                &Vec::new(),
                None,
            )
            .unwrap();

        assert!(prepared.url.contains("oauth_consumer_key=key"));
        assert!(prepared.url.contains("oauth_token=tok"));
        assert!(prepared.url.contains("oauth_signature="));
        assert!(prepared.body.is_none());
        assert!(prepared.headers.is_empty());
    }

    #[test]
    fn test_oauth_post_params_in_body() {
        let auth = Auth::oauth(Consumer::new("key", "secret"), Some(Token::new("tok", "sec")));
        let prepared = auth
            .prepare(
                "POST",
                "https://apps.brightkite.com/objects.json",
                &params(&[("note[body]", "hello")]),
                None,
            )
            .unwrap();

        assert_eq!(prepared.url, "https://apps.brightkite.com/objects.json");
        let body = prepared.body.expect("expected form body");
        assert!(body.contains("oauth_signature="));
        assert!(body.contains("note%5Bbody%5D=hello"));
    }

    #[test]
    fn test_oauth_explicit_token_wins() {
        let auth = Auth::oauth(
            Consumer::new("key", "secret"),
            Some(Token::new("access", "sec")),
        );
        let request_token = Token::new("request", "reqsec");
        let prepared = auth
            .prepare(
                "GET",
                "https://apps.brightkite.com/oauth/access_token",
                &Vec::new(),
                Some(&request_token),
            )
            .unwrap();

        assert!(prepared.url.contains("oauth_token=request"));
        assert!(!prepared.url.contains("oauth_token=access"));
    }
}
