//! Database model for key-value entries.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Database model for one key-value pair
#[derive(Queryable, Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::kv_entries)]
#[serde(rename_all = "camelCase")]
pub struct KvEntryDB {
    pub entry_key: String,
    pub entry_value: String,
}
