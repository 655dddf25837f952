pub mod preparer;

pub use preparer::{Prepared, PreparedQuery, QueryPreparer, PUNCTUATION};
