pub mod channel;
pub mod input;
pub mod record;
pub mod request;
pub mod run;
