mod file_server;
mod file_watcher;

pub use self::file_server::{FileServer, FileServerConfig};
