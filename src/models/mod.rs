// Data models for the registry and Spotify endpoints

pub mod spotify;
pub mod users;
