pub mod errors;
pub mod escape;
pub mod logger;
pub mod obfuscator;
