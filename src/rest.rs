use reqwest::blocking::Client;
use reqwest::Method;
use serde_json::Value;
use std::time::Instant;

use crate::auth::{Auth, Params};
use crate::client::{create_rest_client, ClientConfig};
use crate::entity::{object_list, person_list, place_list, Config, Fields, Object, Person, Place};
use crate::error::{BrightkiteError, Result};
use crate::oauth::{percent_encode, Token};

/// Brightkite API client.
///
/// Composes the HTTP transport with an authentication strategy and
/// exposes one method per REST resource. Each resource method has a
/// `_raw` sibling returning the decoded JSON exactly as received.
#[derive(Debug)]
pub struct Brightkite {
    /// HTTP client
    client: Client,
    /// Connection configuration
    config: ClientConfig,
    /// Authentication strategy
    auth: Auth,
}

impl Brightkite {
    /// Create a new client for the default server
    pub fn new(auth: Auth) -> Self {
        Brightkite {
            client: create_rest_client(),
            config: ClientConfig::default(),
            auth,
        }
    }

    /// Create a new client with custom connection configuration
    pub fn with_config(auth: Auth, config: ClientConfig) -> Self {
        Brightkite {
            client: create_rest_client(),
            config,
            auth,
        }
    }

    /// Enable debug logging of requests
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    pub fn client_config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, uri: &str) -> String {
        format!("{}/{}", self.config.base_url(), uri)
    }

    /// Send a request and read the complete response body.
    ///
    /// The authentication strategy prepares the final URL, body, and
    /// headers. Any status other than 200 is an error carrying the
    /// request URL and the server's response.
    pub(crate) fn request(
        &self,
        method: Method,
        url: &str,
        params: Params,
        token: Option<&Token>,
    ) -> Result<Vec<u8>> {
        let prepared = self.auth.prepare(method.as_str(), url, &params, token)?;

        let mut request = self.client.request(method.clone(), prepared.url.as_str());
        for (name, value) in &prepared.headers {
            request = request.header(*name, value.as_str());
        }

        // A form body needs these headers for the request to be
        // processed correctly.
        if let Some(body) = prepared.body {
            request = request
                .header("Content-Type", "application/x-www-form-urlencoded")
                .header("Accept", "text/plain")
                .body(body);
        }

        let start = Instant::now();
        let response = request.send()?;
        let status = response.status();
        let body = response.bytes()?;

        if self.config.debug {
            eprintln!(
                "[brightkite] {} {} => {:?} (status: {})",
                method,
                prepared.url,
                start.elapsed(),
                status
            );
        }

        if status != reqwest::StatusCode::OK {
            return Err(BrightkiteError::http(
                prepared.url,
                status.as_u16(),
                String::from_utf8_lossy(&body).to_string(),
            ));
        }

        Ok(body.to_vec())
    }

    /// GET a resource and decode its JSON body
    pub(crate) fn get(&self, uri: &str, params: Params) -> Result<Value> {
        let data = self.request(Method::GET, &self.url(uri), params, None)?;
        Ok(serde_json::from_slice(&data)?)
    }

    /// PUT a resource update; the response body is discarded
    pub(crate) fn put(&self, uri: &str, params: Params) -> Result<()> {
        self.request(Method::PUT, &self.url(uri), params, None)?;
        Ok(())
    }

    fn require_oauth(&self, operation: &str) -> Result<()> {
        if self.auth.is_oauth() {
            Ok(())
        } else {
            Err(BrightkiteError::Configuration(format!(
                "{} requires OAuth authentication",
                operation
            )))
        }
    }

    /// Obtain an unauthorized request token (`GET oauth/request_token`)
    pub fn oauth_request_token(&self) -> Result<Token> {
        self.require_oauth("oauth_request_token")?;
        let data = self.request(
            Method::GET,
            &self.url("oauth/request_token"),
            Params::new(),
            None,
        )?;
        Token::from_encoded(&String::from_utf8_lossy(&data))
    }

    /// Build the signed user-authorization URL for a request token.
    ///
    /// No request is issued; the caller directs the user to this URL.
    pub fn oauth_authorize_url(&self, token: &Token) -> Result<String> {
        self.require_oauth("oauth_authorize_url")?;
        let prepared =
            self.auth
                .prepare("GET", &self.url("oauth/authorize"), &Params::new(), Some(token))?;
        Ok(prepared.url)
    }

    /// Exchange an authorized request token for an access token
    /// (`GET oauth/access_token`)
    pub fn oauth_access_token(&self, token: &Token) -> Result<Token> {
        self.require_oauth("oauth_access_token")?;
        let data = self.request(
            Method::GET,
            &self.url("oauth/access_token"),
            Params::new(),
            Some(token),
        )?;
        Token::from_encoded(&String::from_utf8_lossy(&data))
    }

    /// The currently authenticated user
    pub fn me(&self) -> Result<Person> {
        Person::from_value(self.clone(), self.me_raw()?)
    }

    pub fn me_raw(&self) -> Result<Value> {
        self.get("me.json", Params::new())
    }

    /// Look up a person by login
    pub fn person(&self, login: &str) -> Result<Person> {
        Person::from_value(self.clone(), self.person_raw(login)?)
    }

    pub fn person_raw(&self, login: &str) -> Result<Value> {
        let uri = format!("people/{}.json", percent_encode(login));
        self.get(&uri, Params::new())
    }

    /// Search for people matching a query
    pub fn people(&self, query: &str) -> Result<Vec<Person>> {
        person_list(self, self.people_raw(query)?)
    }

    pub fn people_raw(&self, query: &str) -> Result<Value> {
        let params = vec![("query".to_string(), query.to_string())];
        self.get("people/search.json", params)
    }

    /// A person's friends, or their pending friend requests
    pub fn friends(&self, login: &str, pending: bool) -> Result<Vec<Person>> {
        person_list(self, self.friends_raw(login, pending)?)
    }

    pub fn friends_raw(&self, login: &str, pending: bool) -> Result<Value> {
        let login = percent_encode(login);
        let uri = if pending {
            format!("people/{}/pending_friends.json", login)
        } else {
            format!("people/{}/friends.json", login)
        };
        self.get(&uri, Params::new())
    }

    /// Look up an object (checkin, note, or photo) by uuid
    pub fn object(&self, uuid: &str) -> Result<Object> {
        let fields = Fields::from_value(self.object_raw(uuid)?)?;
        Ok(Object::new(uuid, fields))
    }

    pub fn object_raw(&self, uuid: &str) -> Result<Value> {
        let uri = format!("objects/{}.json", percent_encode(uuid));
        self.get(&uri, Params::new())
    }

    /// Search for objects matching a query
    pub fn objects(&self, query: &str) -> Result<Vec<Object>> {
        object_list(self.objects_raw(query)?)
    }

    pub fn objects_raw(&self, query: &str) -> Result<Value> {
        let params = vec![("oquery".to_string(), query.to_string())];
        self.get("objects/search.json", params)
    }

    /// Look up a place by uuid
    pub fn place(&self, uuid: &str) -> Result<Place> {
        let fields = Fields::from_value(self.place_raw(uuid)?)?;
        Ok(Place::new(self.clone(), uuid, fields))
    }

    pub fn place_raw(&self, uuid: &str) -> Result<Value> {
        let uri = format!("places/{}.json", percent_encode(uuid));
        self.get(&uri, Params::new())
    }

    /// Search for places matching a query
    pub fn places(&self, query: &str) -> Result<Vec<Place>> {
        place_list(self, self.places_raw(query)?)
    }

    pub fn places_raw(&self, query: &str) -> Result<Value> {
        let params = vec![("q".to_string(), query.to_string())];
        self.get("places/search.json", params)
    }

    /// The current user's placemarks
    pub fn placemarks(&self) -> Result<Vec<Place>> {
        place_list(self, self.placemarks_raw()?)
    }

    pub fn placemarks_raw(&self) -> Result<Value> {
        self.get("me/placemarks.json", Params::new())
    }

    /// Messages sent by the current user
    pub fn sent_messages(&self) -> Result<Value> {
        self.get("me/sent_messages.json", Params::new())
    }

    /// Messages received by the current user
    pub fn received_messages(&self) -> Result<Value> {
        self.get("me/received_messages.json", Params::new())
    }

    /// The current user's account settings
    pub fn config(&self) -> Result<Config> {
        Config::from_value(self.clone(), self.config_raw()?)
    }

    pub fn config_raw(&self) -> Result<Value> {
        self.get("me/config.json", Params::new())
    }
}

impl Clone for Brightkite {
    fn clone(&self) -> Self {
        Brightkite {
            client: self.client.clone(),
            config: self.config.clone(),
            auth: self.auth.clone(),
        }
    }
}
