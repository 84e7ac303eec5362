//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Authentication & Security
// =============================================================================

/// Default session (JWT) lifetime in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 1;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Argon2 hash verified against when the account does not exist,
/// so unknown and known user ids take the same time to reject.
pub const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$W2bGu3Dq8cU0uQ5ZbE0Xb6kS2jYQm3M1pS3b8R0fQ2E";

// =============================================================================
// User Roles
// =============================================================================

/// Role allowed to manage accounts and decide approval requests
pub const ROLE_SUPER_ADMIN: &str = "Super-Admin";

/// Operator role
pub const ROLE_ADMIN: &str = "Admin";

/// Default role assigned to new accounts
pub const ROLE_USER: &str = "User";

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 5000;

// =============================================================================
// Database
// =============================================================================

/// Default database connection URL (for development)
pub const DEFAULT_DATABASE_URL: &str = "mysql://root:@localhost:3306/dcim";

/// Default connection pool cap
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 30;

// =============================================================================
// Cache (Redis)
// =============================================================================

/// Default Redis URL (for development)
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Cache key prefix for rate limiting
pub const CACHE_PREFIX_RATE_LIMIT: &str = "rate_limit:";

/// Key checked by the health endpoint
pub const CACHE_HEALTH_KEY: &str = "health:ping";

// =============================================================================
// Rate Limiting
// =============================================================================

/// Default rate limit: requests per window
pub const RATE_LIMIT_REQUESTS: u64 = 100;

/// Default rate limit window in seconds (1 minute)
pub const RATE_LIMIT_WINDOW_SECONDS: u64 = 60;

/// Stricter rate limit for login: requests per window
pub const RATE_LIMIT_AUTH_REQUESTS: u64 = 10;

/// Login rate limit window in seconds (1 minute)
pub const RATE_LIMIT_AUTH_WINDOW_SECONDS: u64 = 60;

// =============================================================================
// Mail & Background Jobs
// =============================================================================

/// Worker name registered with the job monitor
pub const EMAIL_WORKER_NAME: &str = "email-worker";

/// Default SMTP submission port
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Sender used when SMTP_FROM is not set
pub const DEFAULT_SMTP_FROM: &str = "DCIM Team <noreply@localhost>";

/// Front-end base URL embedded in approval links
pub const DEFAULT_APPROVAL_BASE_URL: &str = "http://localhost:3000";

/// Connections reserved for the job queue pool
pub const JOB_POOL_MAX_CONNECTIONS: u32 = 5;

// =============================================================================
// Inventory defaults
// =============================================================================

/// Zone value meaning "not assigned to a zone"
pub const ZONE_UNASSIGNED: &str = "None";

/// Installation date used when a cabinet is created without one
pub const DEFAULT_INSTALLATION_DATE: (i32, u32, u32) = (1970, 1, 1);

/// Spreadsheet day zero (serial 0)
pub const SPREADSHEET_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// SNMP version used when a device has no template
pub const DEFAULT_SNMP_VERSION: &str = "noAuthNoPriv";

/// SNMPv3 security defaults written on every new device
pub const DEFAULT_V3_SECURITY_LEVEL: &str = "noAuthNoPriv";
pub const DEFAULT_V3_AUTH_PROTOCOL: &str = "MD5";
pub const DEFAULT_V3_PRIV_PROTOCOL: &str = "DES";

/// Hypervisor tag for bare-metal devices
pub const DEFAULT_HYPERVISOR: &str = "None";

/// Power-supply count assumed without a template
pub const DEFAULT_POWER_SUPPLY_COUNT: i32 = 1;

/// Status given to a device created without one
pub const DEFAULT_DEVICE_STATUS: &str = "Reserved";

/// Status values seeded into the device status table
pub const DEFAULT_DEVICE_STATUSES: &[&str] = &[
    "Reserved",
    "Test",
    "Development",
    "QA",
    "Production",
    "Spare",
    "Disposed",
];

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: u64 = 8;

/// Maximum number of rows accepted by one bulk import
pub const MAX_BULK_IMPORT_ROWS: u64 = 1000;
