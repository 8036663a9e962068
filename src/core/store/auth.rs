use reqwest::RequestBuilder;
use std::fmt;

/// Credentials attached to every store request.
#[derive(Clone, PartialEq, Eq, Default)]
pub enum StoreAuth {
    #[default]
    None,
    ApiKey(String),
    Basic { username: String, password: String },
}

impl StoreAuth {
    /// An API key wins; basic auth needs both halves; otherwise anonymous.
    pub fn from_settings(
        api_key: Option<&str>,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Self {
        let non_empty = |value: Option<&str>| value.filter(|v| !v.is_empty()).map(str::to_string);
        if let Some(key) = non_empty(api_key) {
            return StoreAuth::ApiKey(key);
        }
        match (non_empty(username), non_empty(password)) {
            (Some(username), Some(password)) => StoreAuth::Basic { username, password },
            _ => StoreAuth::None,
        }
    }

    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            StoreAuth::None => request,
            StoreAuth::ApiKey(key) => {
                request.header(reqwest::header::AUTHORIZATION, format!("ApiKey {}", key))
            }
            StoreAuth::Basic { username, password } => request.basic_auth(username, Some(password)),
        }
    }

    pub fn scheme(&self) -> &'static str {
        match self {
            StoreAuth::None => "none",
            StoreAuth::ApiKey(_) => "api-key",
            StoreAuth::Basic { .. } => "basic",
        }
    }
}

// Secrets never reach logs.
impl fmt::Debug for StoreAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreAuth::None => f.write_str("StoreAuth::None"),
            StoreAuth::ApiKey(_) => f.write_str("StoreAuth::ApiKey(***)"),
            StoreAuth::Basic { username, .. } => f
                .debug_struct("StoreAuth::Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
        }
    }
}
