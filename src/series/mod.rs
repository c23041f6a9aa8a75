//! Application of decoded datasets to the registered locations, one module
//! per data kind. Both operate on borrowed locations; the client owns them.

pub mod forecast;
pub mod measurement;
