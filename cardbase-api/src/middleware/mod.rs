/// HTTP middleware for the API server
///
/// - `security`: Adds security-related response headers to every response

pub mod security;
