//! Dogear: a terminal bookmark manager whose open sessions stay in sync.
//!
//! Bookmarks live in a Supabase table. Creates and deletes go straight to
//! PostgREST; inserts and deletes made by *other* sessions of the same user
//! arrive over a Supabase Realtime websocket. The [`parallax`] engine merges
//! both into one live view per session.

pub mod config;
pub mod model;
pub mod realtime;
pub mod submit;
pub mod supabase;
