use surrealdb::RecordId;

use crate::errors::{Error, Result};

/// Path/claim ids travel as `table:key` strings. A malformed id reads as
/// NotFound so callers never learn whether anything exists behind it.
pub fn get_record_id_from_string(val: String) -> Result<RecordId> {
    let mut id_part = val.trim().splitn(2, ':');
    let table = id_part.next().ok_or(Error::NotFound)?;
    let key = id_part.next().ok_or(Error::NotFound)?;
    if table.is_empty() || key.is_empty() {
        return Err(Error::NotFound);
    }
    Ok(RecordId::from_table_key(table, key))
}
