// Backup schedule intervals and their picker encodings

/// Full backup interval choices, in days, indexed by picker position
pub const FULL_INTERVAL_DAYS: [u32; 5] = [1, 3, 7, 14, 30];

/// Incremental interval choices, in hours; 0 disables incrementals
pub const INCREMENTAL_INTERVAL_HOURS: [u32; 5] = [0, 12, 24, 36, 48];

const DEFAULT_FULL_INDEX: usize = 2;
const DEFAULT_INCREMENTAL_INDEX: usize = 2;

/// Map a picker index to a full backup interval, falling back to the
/// default (7 days) for out-of-range indexes
pub fn full_days_for_index(index: usize) -> u32 {
    FULL_INTERVAL_DAYS
        .get(index)
        .copied()
        .unwrap_or(FULL_INTERVAL_DAYS[DEFAULT_FULL_INDEX])
}

/// Map a full backup interval back to its picker index, falling back
/// to the default position for unknown values
pub fn index_for_full_days(days: u32) -> usize {
    FULL_INTERVAL_DAYS
        .iter()
        .position(|&d| d == days)
        .unwrap_or(DEFAULT_FULL_INDEX)
}

/// Map a picker index to an incremental interval, falling back to the
/// default (24 hours) for out-of-range indexes
pub fn incremental_hours_for_index(index: usize) -> u32 {
    INCREMENTAL_INTERVAL_HOURS
        .get(index)
        .copied()
        .unwrap_or(INCREMENTAL_INTERVAL_HOURS[DEFAULT_INCREMENTAL_INDEX])
}

/// Map an incremental interval back to its picker index, falling back
/// to the default position for unknown values
pub fn index_for_incremental_hours(hours: u32) -> usize {
    INCREMENTAL_INTERVAL_HOURS
        .iter()
        .position(|&h| h == hours)
        .unwrap_or(DEFAULT_INCREMENTAL_INDEX)
}

/// One-line schedule description for the confirmation step and the
/// dashboard
pub fn schedule_summary(full_days: u32, incremental_hours: u32) -> String {
    if incremental_hours == 0 {
        format!("Full every {full_days} days; Incremental: Off.")
    } else {
        format!("Full every {full_days} days; Incremental every {incremental_hours}h.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_interval_round_trip() {
        for (index, days) in FULL_INTERVAL_DAYS.iter().enumerate() {
            assert_eq!(full_days_for_index(index), *days);
            assert_eq!(index_for_full_days(*days), index);
        }
    }

    #[test]
    fn test_incremental_interval_round_trip() {
        for (index, hours) in INCREMENTAL_INTERVAL_HOURS.iter().enumerate() {
            assert_eq!(incremental_hours_for_index(index), *hours);
            assert_eq!(index_for_incremental_hours(*hours), index);
        }
    }

    #[test]
    fn test_out_of_range_index_falls_back() {
        assert_eq!(full_days_for_index(99), 7);
        assert_eq!(incremental_hours_for_index(99), 24);
    }

    #[test]
    fn test_unknown_value_falls_back_to_default_position() {
        assert_eq!(index_for_full_days(11), 2);
        assert_eq!(index_for_incremental_hours(13), 2);
    }

    #[test]
    fn test_schedule_summary() {
        assert_eq!(
            schedule_summary(7, 24),
            "Full every 7 days; Incremental every 24h."
        );
        assert_eq!(
            schedule_summary(14, 0),
            "Full every 14 days; Incremental: Off."
        );
    }
}
