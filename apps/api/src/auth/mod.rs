// Accounts and login sessions: password hashing, the session extractor,
// and the register / login / logout handlers.

pub mod handlers;
pub mod password;
pub mod session;
