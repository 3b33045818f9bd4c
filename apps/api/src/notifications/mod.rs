pub mod fanout;
pub mod handlers;
pub mod mailbox;
