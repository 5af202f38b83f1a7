//! Types shared between the directory client crates: the doctor record, the
//! push protocol, and the error payload a directory backend answers with.

pub mod domain;
pub mod error;
pub mod protocol;
