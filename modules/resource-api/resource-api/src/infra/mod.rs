pub mod lang;
pub mod policy;
pub mod storage;
