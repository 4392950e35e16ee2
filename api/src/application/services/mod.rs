pub mod app_tokens;
