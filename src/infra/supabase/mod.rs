//! Supabase REST (PostgREST) access to transport modes and Vélib' stations.

mod client;

pub use client::SupabaseClient;
