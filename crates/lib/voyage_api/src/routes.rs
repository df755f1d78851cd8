//! Route paths.

pub const POST_API_CHAT: &str = "/api/chat";
pub const GET_API_HEALTH: &str = "/api/health";
