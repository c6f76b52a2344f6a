pub mod bootstrap;
pub mod invites;
pub mod journals;
pub mod memberships;
pub mod templates;
pub mod vocabulary;
pub mod workspaces;
