use std::collections::HashMap;

pub mod cursor;
pub mod form;
pub mod headers;
pub mod message;
pub mod multipart;
pub mod request;
pub mod response;
pub mod sapi;
pub mod server_request;
pub mod status;
pub mod stream;
pub mod uploaded_file;
pub mod uri;
pub mod validator;

/// Decoded key/value table. Last write wins on duplicate keys.
pub type ParamTable = HashMap<String, String>;
