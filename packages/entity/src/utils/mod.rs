pub mod blank;
pub mod local_time;
