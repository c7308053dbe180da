pub mod library_io;
pub mod lock;
pub mod recovery;
pub mod session;
