/// API route handlers
///
/// - `health`: Health check endpoint
/// - `users`: Register, list, update and delete users

pub mod health;
pub mod users;
