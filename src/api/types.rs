//! Wire and domain types shared by the remote client, the mock API and the
//! cache. Field names follow the reqres JSON payloads.

use serde::{Deserialize, Deserializer, Serialize};

const AVATAR_BASE_URL: &str = "https://reqres.in/img/faces";
const EMAIL_DOMAIN: &str = "reqres.in";
const SUPPORT_URL: &str = "https://reqres.in/#support-heading";
const SUPPORT_TEXT: &str =
    "To keep ReqRes free, contributions towards server costs are appreciated!";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: String,
}

impl User {
    /// Derives a user record from a free-form display name, the way the demo
    /// API fills in records created from a `{name, job}` payload.
    #[must_use]
    pub fn from_name(id: u64, name: &str) -> Self {
        let (first_name, last_name) = split_name(name);
        Self {
            id,
            email: email_from_name(name),
            first_name: first_name.unwrap_or_else(|| "User".to_string()),
            last_name: last_name.unwrap_or_else(|| "Name".to_string()),
            avatar: avatar_url(id),
        }
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Applies a rename, keeping the current parts the new name does not carry.
    pub fn rename(&mut self, name: &str) {
        let (first_name, last_name) = split_name(name);
        if let Some(first_name) = first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = last_name {
            self.last_name = last_name;
        }
    }
}

/// Splits a display name into the first word and the remaining words.
fn split_name(name: &str) -> (Option<String>, Option<String>) {
    let mut words = name.split_whitespace();
    let first = words.next().map(str::to_string);
    let rest = words.collect::<Vec<_>>().join(" ");
    (first, (!rest.is_empty()).then_some(rest))
}

#[must_use]
pub fn email_from_name(name: &str) -> String {
    let local = name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(".");
    format!("{local}@{EMAIL_DOMAIN}")
}

#[must_use]
pub fn avatar_url(id: u64) -> String {
    format!("{AVATAR_BASE_URL}/{id}-image.jpg")
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Support {
    pub url: String,
    pub text: String,
}

impl Default for Support {
    fn default() -> Self {
        Self {
            url: SUPPORT_URL.to_string(),
            text: SUPPORT_TEXT.to_string(),
        }
    }
}

/// One page of users as returned by `GET /users`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsersPage {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u32,
    pub data: Vec<User>,
    #[serde(default)]
    pub support: Support,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub data: User,
    #[serde(default)]
    pub support: Support,
}

/// Resource records served by the public reqres `/users` endpoint in some
/// deployments instead of people.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorData {
    pub id: u64,
    pub name: String,
    pub year: u32,
    pub color: String,
    pub pantone_value: String,
}

impl From<ColorData> for User {
    fn from(item: ColorData) -> Self {
        Self::from_name(item.id, &item.name)
    }
}

/// A list item that is either a user or a colour record.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum ListItem {
    User(User),
    Color(ColorData),
}

impl From<ListItem> for User {
    fn from(item: ListItem) -> Self {
        match item {
            ListItem::User(user) => user,
            ListItem::Color(color) => color.into(),
        }
    }
}

/// `GET /users` payload before colour records are normalized into users.
#[derive(Clone, Debug, Deserialize)]
pub struct RawUsersPage {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u32,
    pub data: Vec<ListItem>,
    #[serde(default)]
    pub support: Support,
}

impl From<RawUsersPage> for UsersPage {
    fn from(raw: RawUsersPage) -> Self {
        Self {
            page: raw.page,
            per_page: raw.per_page,
            total: raw.total,
            total_pages: raw.total_pages,
            data: raw.data.into_iter().map(User::from).collect(),
            support: raw.support,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawUserEnvelope {
    pub data: ListItem,
    #[serde(default)]
    pub support: Support,
}

impl From<RawUserEnvelope> for UserEnvelope {
    fn from(raw: RawUserEnvelope) -> Self {
        Self {
            data: raw.data.into(),
            support: raw.support,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub job: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedUser {
    #[serde(flatten)]
    pub user: User,
    pub job: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedUser {
    #[serde(flatten)]
    pub user: User,
    pub job: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

/// Echo returned by `POST /users` and `PUT /users/{id}`.
///
/// reqres answers with `{name, job, id, createdAt}` where `id` is a string,
/// while richer backends return full user records. Every field is optional so
/// both shapes decode.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MutationEcho {
    #[serde(default, deserialize_with = "de_optional_id")]
    pub id: Option<u64>,
    pub name: Option<String>,
    pub job: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
}

impl MutationEcho {
    /// Builds a user from the echo, filling gaps from `name` and `fallback_id`.
    #[must_use]
    pub fn into_user(self, fallback_id: u64, name: Option<&str>) -> User {
        let id = self.id.unwrap_or(fallback_id);
        let name = self.name.as_deref().or(name).unwrap_or_default();
        let derived = User::from_name(id, name);
        User {
            id,
            email: self.email.unwrap_or(derived.email),
            first_name: self.first_name.unwrap_or(derived.first_name),
            last_name: self.last_name.unwrap_or(derived.last_name),
            avatar: self.avatar.unwrap_or(derived.avatar),
        }
    }
}

fn de_optional_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(u64),
        Text(String),
    }

    Ok(match Option::<Id>::deserialize(deserializer)? {
        Some(Id::Number(id)) => Some(id),
        Some(Id::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Response wrapper carrying the decoded body and the HTTP status line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: u16,
    pub status_text: String,
}

impl<T> ApiResponse<T> {
    #[must_use]
    pub fn new(data: T, status: u16, status_text: impl Into<String>) -> Self {
        Self {
            data,
            status,
            status_text: status_text.into(),
        }
    }

    #[must_use]
    pub fn ok(data: T) -> Self {
        Self::new(data, 200, "OK")
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            data: f(self.data),
            status: self.status,
            status_text: self.status_text,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PaginationParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PaginationParams {
    #[must_use]
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: None,
        }
    }

    /// Query pairs for the request; zero values are treated as absent.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page.filter(|page| *page > 0) {
            pairs.push(("page", page.to_string()));
        }
        if let Some(per_page) = self.per_page.filter(|per_page| *per_page > 0) {
            pairs.push(("per_page", per_page.to_string()));
        }
        pairs
    }
}
