pub mod home;
pub mod json_error;
pub mod submissions;
pub mod system;
