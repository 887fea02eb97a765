pub mod remover;
pub mod storage;
pub mod sweeper;
