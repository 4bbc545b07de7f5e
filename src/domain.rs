// ドメイン層

pub mod error;
pub mod model;
pub mod port;
