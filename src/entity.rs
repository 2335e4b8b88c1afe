use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};
use std::fmt;

use crate::auth::Params;
use crate::error::{BrightkiteError, Result};
use crate::oauth::percent_encode;
use crate::rest::Brightkite;

/// Decoded JSON fields backing an entity.
///
/// Lookup is explicit: [`Fields::get`] returns an error for names absent
/// from the snapshot instead of panicking at the call site.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    map: Map<String, Value>,
}

impl Fields {
    /// Create a Fields container from a decoded JSON object
    pub fn new(map: Map<String, Value>) -> Self {
        Fields { map }
    }

    /// Convert a decoded JSON value into Fields, failing when the value
    /// is not an object
    pub fn from_value(value: Value) -> Result<Self> {
        let map = serde_json::from_value(value)?;
        Ok(Fields { map })
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Result<&Value> {
        self.map
            .get(name)
            .ok_or_else(|| BrightkiteError::UnknownField(name.to_string()))
    }

    /// Look up a string field by name
    pub fn get_str(&self, name: &str) -> Result<&str> {
        self.get(name)?
            .as_str()
            .ok_or_else(|| BrightkiteError::Other(format!("field '{}' is not a string", name)))
    }

    /// Check whether a field is present
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Enumerate the field names of the snapshot
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Extract an identifying key field as a string
    pub(crate) fn key(&self, name: &str) -> Result<String> {
        match self.get(name)? {
            Value::String(s) => Ok(s.clone()),
            other => Ok(other.to_string()),
        }
    }

    fn insert(&mut self, name: String, value: Value) {
        self.map.insert(name, value);
    }
}

/// Object kind selector narrowing an objects query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectFilter {
    Checkins,
    Notes,
    Photos,
}

impl ObjectFilter {
    fn as_str(self) -> &'static str {
        match self {
            ObjectFilter::Checkins => "checkins",
            ObjectFilter::Notes => "notes",
            ObjectFilter::Photos => "photos",
        }
    }
}

/// Serialize filters as a comma-joined `filters` query parameter.
/// No filters selected means all object kinds are returned.
fn filter_params(filters: &[ObjectFilter]) -> Params {
    let mut params = Params::new();
    if !filters.is_empty() {
        let joined = filters
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(",");
        params.push(("filters".to_string(), joined));
    }
    params
}

/// The search API sometimes returns a lone object instead of a list;
/// normalize to a one-element list.
fn as_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        other => vec![other],
    }
}

pub(crate) fn person_list(api: &Brightkite, value: Value) -> Result<Vec<Person>> {
    as_list(value)
        .into_iter()
        .map(|item| Person::from_value(api.clone(), item))
        .collect()
}

pub(crate) fn place_list(api: &Brightkite, value: Value) -> Result<Vec<Place>> {
    as_list(value)
        .into_iter()
        .map(|item| Place::from_value(api.clone(), item))
        .collect()
}

pub(crate) fn object_list(value: Value) -> Result<Vec<Object>> {
    as_list(value)
        .into_iter()
        .map(|item| {
            let fields = Fields::from_value(item)?;
            let uuid = fields.key("id")?;
            Ok(Object::new(uuid, fields))
        })
        .collect()
}

/// A checkin, note, or photo
#[derive(Debug, Clone)]
pub struct Object {
    /// Identifying uuid
    pub uuid: String,
    fields: Fields,
}

impl Object {
    pub fn new(uuid: impl Into<String>, fields: Fields) -> Self {
        Object {
            uuid: uuid.into(),
            fields,
        }
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Result<&Value> {
        self.fields.get(name)
    }

    /// Enumerate the field names of the snapshot
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys()
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// The place this object was created at, when present
    pub fn place(&self) -> Option<&Map<String, Value>> {
        self.fields.get("place").ok()?.as_object()
    }

    /// Creation timestamp, when present and well-formed
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.fields.get("created_at").ok()?.as_str()?;
        DateTime::parse_from_rfc3339(raw).ok()
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Object uuid={}>", self.uuid)
    }
}

/// A Brightkite user
#[derive(Debug, Clone)]
pub struct Person {
    api: Brightkite,
    /// Identifying key from the `id` field of the snapshot
    pub id: String,
    fields: Fields,
}

impl Person {
    pub fn new(api: Brightkite, id: impl Into<String>, fields: Fields) -> Self {
        Person {
            api,
            id: id.into(),
            fields,
        }
    }

    pub(crate) fn from_value(api: Brightkite, value: Value) -> Result<Self> {
        let fields = Fields::from_value(value)?;
        let id = fields.key("id")?;
        Ok(Person { api, id, fields })
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Result<&Value> {
        self.fields.get(name)
    }

    /// Enumerate the field names of the snapshot
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys()
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// The person's login name, used to address follow-on queries
    pub fn login(&self) -> Result<&str> {
        self.fields.get_str("login")
    }

    /// This person's objects, narrowed by zero or more filters
    pub fn objects(&self, filters: &[ObjectFilter]) -> Result<Vec<Object>> {
        object_list(self.objects_raw(filters)?)
    }

    /// Raw JSON variant of [`Person::objects`]
    pub fn objects_raw(&self, filters: &[ObjectFilter]) -> Result<Value> {
        let uri = format!("people/{}/objects.json", percent_encode(self.login()?));
        self.api.get(&uri, filter_params(filters))
    }

    pub fn checkins(&self) -> Result<Vec<Object>> {
        self.objects(&[ObjectFilter::Checkins])
    }

    pub fn notes(&self) -> Result<Vec<Object>> {
        self.objects(&[ObjectFilter::Notes])
    }

    pub fn photos(&self) -> Result<Vec<Object>> {
        self.objects(&[ObjectFilter::Photos])
    }

    /// Friendship status between the current user and this person
    pub fn friendship(&self) -> Result<Value> {
        let uri = format!("people/{}/friendship.json", percent_encode(self.login()?));
        self.api.get(&uri, Params::new())
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let login = self.login().unwrap_or(self.id.as_str());
        write!(f, "<Person login={}>", login)
    }
}

/// A Brightkite place
#[derive(Debug, Clone)]
pub struct Place {
    api: Brightkite,
    /// Identifying uuid
    pub uuid: String,
    fields: Fields,
}

impl Place {
    pub fn new(api: Brightkite, uuid: impl Into<String>, fields: Fields) -> Self {
        Place {
            api,
            uuid: uuid.into(),
            fields,
        }
    }

    pub(crate) fn from_value(api: Brightkite, value: Value) -> Result<Self> {
        let fields = Fields::from_value(value)?;
        let uuid = fields.key("id")?;
        Ok(Place { api, uuid, fields })
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Result<&Value> {
        self.fields.get(name)
    }

    /// Enumerate the field names of the snapshot
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys()
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// The place's display name, when present
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").ok()?.as_str()
    }

    /// Objects created at this place, narrowed by zero or more filters
    pub fn objects(&self, filters: &[ObjectFilter]) -> Result<Vec<Object>> {
        object_list(self.objects_raw(filters)?)
    }

    /// Raw JSON variant of [`Place::objects`]
    pub fn objects_raw(&self, filters: &[ObjectFilter]) -> Result<Value> {
        let uri = format!("places/{}/objects.json", percent_encode(&self.uuid));
        self.api.get(&uri, filter_params(filters))
    }

    pub fn checkins(&self) -> Result<Vec<Object>> {
        self.objects(&[ObjectFilter::Checkins])
    }

    pub fn notes(&self) -> Result<Vec<Object>> {
        self.objects(&[ObjectFilter::Notes])
    }

    pub fn photos(&self) -> Result<Vec<Object>> {
        self.objects(&[ObjectFilter::Photos])
    }

    /// People recently at this place, optionally narrowed by a radius in
    /// meters and a recency window in hours
    pub fn people(&self, radius: Option<u32>, hours_ago: Option<u32>) -> Result<Vec<Person>> {
        person_list(&self.api, self.people_raw(radius, hours_ago)?)
    }

    /// Raw JSON variant of [`Place::people`]
    pub fn people_raw(&self, radius: Option<u32>, hours_ago: Option<u32>) -> Result<Value> {
        let mut params = Params::new();
        if let Some(radius) = radius {
            params.push(("radius".to_string(), radius.to_string()));
        }
        if let Some(hours_ago) = hours_ago {
            params.push(("hours_ago".to_string(), hours_ago.to_string()));
        }
        let uri = format!("places/{}/people.json", percent_encode(&self.uuid));
        self.api.get(&uri, params)
    }

    /// Placemarks nested under this place
    pub fn placemarks(&self) -> Result<Vec<Place>> {
        place_list(&self.api, self.placemarks_raw()?)
    }

    /// Raw JSON variant of [`Place::placemarks`]
    pub fn placemarks_raw(&self) -> Result<Value> {
        let uri = format!("places/{}/placemarks.json", percent_encode(&self.uuid));
        self.api.get(&uri, Params::new())
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Place uuid={}>", self.uuid)
    }
}

/// Account settings for the current user.
///
/// The one entity with a write path: [`Config::set`] issues a remote
/// update and commits the local change only after the update succeeded.
#[derive(Debug, Clone)]
pub struct Config {
    api: Brightkite,
    fields: Fields,
}

impl Config {
    pub fn new(api: Brightkite, fields: Fields) -> Self {
        Config { api, fields }
    }

    pub(crate) fn from_value(api: Brightkite, value: Value) -> Result<Self> {
        let fields = Fields::from_value(value)?;
        Ok(Config { api, fields })
    }

    /// Look up a setting by name
    pub fn get(&self, name: &str) -> Result<&Value> {
        self.fields.get(name)
    }

    /// Enumerate the setting names of the snapshot
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys()
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// The owning person's login
    pub fn login(&self) -> Result<&str> {
        self.fields.get_str("login")
    }

    /// Update a setting remotely, then reflect it locally.
    ///
    /// Only settings already present in the snapshot may be assigned;
    /// unknown names fail without issuing a request.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        if !self.fields.contains(name) {
            return Err(BrightkiteError::UnknownField(name.to_string()));
        }

        let value = value.into();
        let params = vec![(format!("person[{}]", name), form_value(&value))];
        self.api.put("me/config.json", params)?;

        self.fields.insert(name.to_string(), value);
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Config login={}>", self.login().unwrap_or("?"))
    }
}

/// Render a JSON value as a form parameter value
fn form_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
