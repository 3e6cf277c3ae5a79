pub mod attribution;
pub mod context;
pub mod window;
