pub mod coverage;
pub mod init;
pub mod run;
