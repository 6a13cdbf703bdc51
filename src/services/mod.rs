//! Business operations, one module per area. Every operation takes the
//! database and, where it acts for someone, the principal or acting user
//! explicitly.

pub mod agencies;
pub mod invitations;
pub mod media;
pub mod notifications;
pub mod permissions;
pub mod sub_accounts;
pub mod users;
