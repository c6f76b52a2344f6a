pub mod account;
pub mod invite;
pub mod journal;
pub mod template;
pub mod workspace;
