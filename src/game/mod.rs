pub mod message;
pub mod room_lock;
pub mod service;
pub mod session;
pub mod session_fsm;
pub mod session_store;
