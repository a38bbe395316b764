pub mod setting;
pub mod util;

pub const CLI_NAME: &str = "onthisday";
pub const VERSION: &str = "0.1.0";
pub const CONTACT: &str = "codeberg.org/onthisday/server";

// logging constants
pub const ONTHISDAY_LOGLEVEL: &str = "ONTHISDAY_LOGLEVEL";
