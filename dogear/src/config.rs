//! Environment configuration, loaded from the process environment (and a
//! `.env` file when present, via `dotenvy` in `main`).

use parallax::Error;

#[derive(Clone, Debug)]
pub struct Config {
    /// Project base url, e.g. `https://abcdefgh.supabase.co`.
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub email: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Ok(Config {
            supabase_url: require("SUPABASE_URL")?,
            supabase_anon_key: require("SUPABASE_ANON_KEY")?,
            email: require("DOGEAR_EMAIL")?,
            password: require("DOGEAR_PASSWORD")?,
        })
    }
}

fn require(name: &str) -> Result<String, Error> {
    std::env::var(name).map_err(|_| Error::Validation(format!("{name} is not set")))
}
