/// Number of weekday columns in the day grid
pub const DAYS_PER_WEEK: usize = 7;

/// Number of week rows in the day grid
pub const GRID_WEEKS: usize = 5;

/// Total day cells in the grid (5 weeks x 7 days)
pub const GRID_CELLS: usize = GRID_WEEKS * DAYS_PER_WEEK;

/// Months per year; month indices run `0..MONTHS_PER_YEAR`
pub const MONTHS_PER_YEAR: u8 = 12;

/// Highest zero-based month index (December)
pub const MAX_MONTH_INDEX: u8 = MONTHS_PER_YEAR - 1;

/// Highest hour of day
pub const MAX_HOUR: u8 = 23;

/// Highest minute of hour
pub const MAX_MINUTE: u8 = 59;

/// Highest weekday index (0 = Sunday .. 6 = Saturday)
pub const MAX_WEEKDAY: u8 = 6;

/// First day of month, used for lower bounds
pub const MIN_DAY: u8 = 1;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month, indexed by zero-based month.
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 12] = [
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Zero-based index of February
pub(crate) const FEBRUARY_INDEX: u8 = 1;

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: i32 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: i32 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: i32 = 400;

/// Year of the fallback lower bound (1970-01-01)
pub const DEFAULT_MIN_YEAR: i32 = 1970;

/// Year of the fallback upper bound (2038-01-01)
pub const DEFAULT_MAX_YEAR: i32 = 2038;

/// Bound literal resolving to the reference instant
pub const NOW_TOKEN: &str = "now";

/// Prefix of a bound that refers to another selector's value
pub const PEER_PREFIX: &str = "peer-";

/// Maximum number of digits in a relative year spec
pub const MAX_RELATIVE_YEAR_DIGITS: usize = 3;

/// Relative year span of the birthday preset's lower bound
pub const BIRTHDAY_MAX_AGE: u16 = 100;

/// Date component separator (ISO 8601 format)
pub const DATE_SEPARATOR: char = '-';

/// Persisted pattern for date-only values
pub const PERSISTED_DATE_FORMAT: &str = "%Y-%m-%d";

/// Persisted pattern for date-time values (ISO 8601)
pub const PERSISTED_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
