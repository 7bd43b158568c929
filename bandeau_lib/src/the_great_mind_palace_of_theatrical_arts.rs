pub mod basement;
pub mod play;
