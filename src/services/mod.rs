pub mod message_service;
pub mod roster_service;

pub use message_service::MessageService;
pub use roster_service::RosterService;
