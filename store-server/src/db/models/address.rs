//! Address row model

use serde::{Deserialize, Serialize};
use shared::models::AddressView;

/// Saved delivery address (read-only here; managed by the account service)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Address {
    pub id: i64,
    pub user_id: i64,
    pub receiver: String,
    pub addr: String,
    pub zip_code: String,
    pub phone: String,
    pub is_default: i64,
}

impl From<Address> for AddressView {
    fn from(a: Address) -> Self {
        AddressView {
            id: a.id,
            receiver: a.receiver,
            addr: a.addr,
            zip_code: a.zip_code,
            phone: a.phone,
            is_default: a.is_default != 0,
        }
    }
}
