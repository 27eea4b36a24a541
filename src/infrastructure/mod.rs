pub mod db;
pub mod limiter;
pub mod spam;
pub mod utils;
