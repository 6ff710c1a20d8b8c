/// HTTP middleware for the API server
///
/// # Modules
///
/// - `security`: Security headers applied to every response

pub mod security;
