pub mod cla;
pub mod logging;
