pub mod application_handlers;
pub mod auth_handlers;
pub mod chats;
pub mod favorite_handlers;
pub mod handlers;
pub mod message_handlers;
pub mod middleware;
pub mod models;
pub mod pet_handlers;
pub mod supabase;
