// doc constants
pub const DOC_ID: &str = "_id";

// separator for embedded document keys, and the default separator of populate paths
pub const FIELD_SEPARATOR: &str = ".";
