/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms, collision-free at storefront scale)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Derive an order id from the wall clock and the buyer's user id.
///
/// `YYYYmmddHHMMSS` + user id — unique per user per second, which is the
/// granularity the commit path enforces anyway (one in-flight commit per
/// user). Sortable by creation time as a plain string.
pub fn order_id(user_id: i64) -> String {
    let ts = chrono::Utc::now().format("%Y%m%d%H%M%S");
    format!("{}{}", ts, user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_embeds_user_suffix() {
        let id = order_id(42);
        assert!(id.ends_with("42"));
        assert_eq!(id.len(), 14 + 2);
    }

    #[test]
    fn snowflake_fits_in_53_bits() {
        for _ in 0..100 {
            let id = snowflake_id();
            assert!(id > 0);
            assert!(id < (1i64 << 53));
        }
    }
}
