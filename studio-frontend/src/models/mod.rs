pub mod chat;
pub mod scope;
