//! Request DTOs for the portfolio API
//!
//! Query strings and bodies accepted by the handlers, with their validation
//! and the cache keys they map to.

use serde::Deserialize;

const MAX_GITHUB_LOGIN: usize = 39;
const MAX_REPO_NAME: usize = 100;
const MAX_CITY_NAME: usize = 100;

/// Query for endpoints keyed by a GitHub login (`?username=`)
#[derive(Debug, Clone, Deserialize)]
pub struct UserQuery {
    pub username: String,
}

impl UserQuery {
    /// Returns an error message if validation fails, None if valid.
    ///
    /// GitHub logins are alphanumeric with single inner hyphens.
    pub fn validate(&self) -> Option<String> {
        let name = self.username.as_str();
        if name.is_empty() {
            return Some("username cannot be empty".to_string());
        }
        if name.len() > MAX_GITHUB_LOGIN {
            return Some(format!(
                "username exceeds maximum length of {} characters",
                MAX_GITHUB_LOGIN
            ));
        }
        if name.starts_with('-')
            || name.ends_with('-')
            || name.contains("--")
            || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Some(format!("'{}' is not a valid GitHub username", name));
        }
        None
    }

    /// Logins are case-insensitive, so keys are lowercased.
    pub fn cache_key(&self, prefix: &str) -> String {
        format!("{}:{}", prefix, self.username.to_ascii_lowercase())
    }
}

/// Query for the latest-commit endpoint (`?owner=&repo=`)
#[derive(Debug, Clone, Deserialize)]
pub struct CommitQuery {
    pub owner: String,
    pub repo: String,
}

impl CommitQuery {
    pub fn validate(&self) -> Option<String> {
        let owner = UserQuery {
            username: self.owner.clone(),
        };
        if let Some(msg) = owner.validate() {
            return Some(msg.replacen("username", "owner", 1));
        }
        if self.repo.is_empty() || self.repo.len() > MAX_REPO_NAME {
            return Some("repo must be between 1 and 100 characters".to_string());
        }
        if self.repo == "." || self.repo == ".."
            || !self
                .repo
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Some(format!("'{}' is not a valid repository name", self.repo));
        }
        None
    }

    pub fn cache_key(&self) -> String {
        format!(
            "commit:{}/{}",
            self.owner.to_ascii_lowercase(),
            self.repo.to_ascii_lowercase()
        )
    }
}

/// Raw weather query string: either `?city=` or `?lat=&lon=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherParams {
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Validated weather location.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

impl WeatherParams {
    /// Resolves the parameters into a single location. A city takes
    /// precedence over coordinates.
    pub fn into_query(self) -> Result<WeatherQuery, String> {
        if let Some(city) = self.city {
            let city = city.trim().to_string();
            if city.is_empty() || city.len() > MAX_CITY_NAME {
                return Err("city must be between 1 and 100 characters".to_string());
            }
            return Ok(WeatherQuery::City(city));
        }

        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                    return Err("coordinates out of range".to_string());
                }
                Ok(WeatherQuery::Coordinates { lat, lon })
            }
            _ => Err("either city or both lat and lon are required".to_string()),
        }
    }
}

impl WeatherQuery {
    /// Coordinates are rounded to two decimals (about 1 km) so nearby
    /// requests share an entry.
    pub fn cache_key(&self) -> String {
        match self {
            WeatherQuery::City(city) => format!("weather:city:{}", city.to_lowercase()),
            WeatherQuery::Coordinates { lat, lon } => {
                format!("weather:coords:{:.2},{:.2}", lat, lon)
            }
        }
    }
}

/// Request body for POST /api/contact
#[derive(Debug, Clone, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}
