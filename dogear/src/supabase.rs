//! Supabase backing store: auth sign-in plus PostgREST access to the
//! `bookmarks` table.

use parallax::{Error, RecordStore, Session};
use postgrest::Postgrest;
use serde::Deserialize;

use crate::config::Config;
use crate::model::{Bookmark, BookmarkId, NewBookmark, UserId};

#[derive(Deserialize)]
struct AuthUser {
    id: UserId,
}

#[derive(Deserialize)]
struct SignInResponse {
    access_token: String,
    user: AuthUser,
}

/// Exchange email/password credentials for a session.
pub async fn sign_in(config: &Config) -> Result<Session<UserId>, Error> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!(
            "{}/auth/v1/token?grant_type=password",
            config.supabase_url
        ))
        .header("apikey", &config.supabase_anon_key)
        .json(&serde_json::json!({
            "email": config.email,
            "password": config.password,
        }))
        .send()
        .await
        .map_err(|e| Error::Auth(format!("sign-in request failed: {e}")))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Auth(format!("sign-in rejected ({status}): {body}")));
    }

    let signed_in: SignInResponse = response
        .json()
        .await
        .map_err(|e| Error::Auth(format!("malformed sign-in response: {e}")))?;

    Session::new(signed_in.user.id, signed_in.access_token)
}

/// The `bookmarks` table, queried as the signed-in user so row-level
/// security scopes every request server-side.
pub struct SupabaseStore {
    client: Postgrest,
}

impl SupabaseStore {
    pub fn new(config: &Config, session: &Session<UserId>) -> Self {
        let client = Postgrest::new(format!("{}/rest/v1", config.supabase_url))
            .insert_header("apikey", config.supabase_anon_key.clone())
            .insert_header(
                "Authorization",
                format!("Bearer {}", session.access_token()),
            );
        SupabaseStore { client }
    }

    /// The owner's bookmarks, newest first - the initial batch a view is
    /// seeded with before going live.
    pub async fn list(&self, owner: &UserId) -> Result<Vec<Bookmark>, Error> {
        let response = self
            .client
            .from("bookmarks")
            .select("*")
            .eq("user_id", owner.to_string())
            .order("created_at.desc")
            .execute()
            .await
            .map_err(Error::store)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Store(format!("list failed ({status}): {body}")));
        }

        response.json().await.map_err(Error::store)
    }
}

impl RecordStore<Bookmark> for SupabaseStore {
    type Draft = NewBookmark;

    async fn create(&self, owner: &UserId, draft: NewBookmark) -> Result<Bookmark, Error> {
        let row = serde_json::json!({
            "title": draft.title,
            "url": draft.url,
            "user_id": owner,
        });
        let response = self
            .client
            .from("bookmarks")
            .insert(row.to_string())
            .single()
            .execute()
            .await
            .map_err(Error::store)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Store(format!("insert failed ({status}): {body}")));
        }

        response.json().await.map_err(Error::store)
    }

    async fn delete(&self, owner: &UserId, id: &BookmarkId) -> Result<(), Error> {
        // Scoped by both id and owner; row-level security enforces the same
        // bound even if a foreign id is passed here.
        let response = self
            .client
            .from("bookmarks")
            .delete()
            .eq("id", id.to_string())
            .eq("user_id", owner.to_string())
            .execute()
            .await
            .map_err(Error::store)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Store(format!("delete failed ({status}): {body}")));
        }

        Ok(())
    }
}
