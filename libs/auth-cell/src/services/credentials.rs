use tracing::debug;

use shared_config::AppConfig;

/// What a successful login resolves to: the claims that go into the token.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceIdentity {
    pub username: String,
    pub role: String,
    pub permissions: Vec<String>,
}

/// The scheduling bot reads the catalog and writes patients and bookings.
const BOT_PERMISSIONS: [&str; 7] = [
    "read:specialties",
    "read:professionals",
    "read:windows",
    "read:patients",
    "write:patients",
    "read:appointments",
    "write:appointments",
];

/// The check-in terminal looks up appointments and flips their status.
const DEVICE_PERMISSIONS: [&str; 2] = ["read:appointments", "update:appointment_status"];

fn owned(permissions: &[&str]) -> Vec<String> {
    permissions.iter().map(|p| p.to_string()).collect()
}

/// Matches the submitted credentials against the three identities defined in
/// the environment. There is no user database; the operator console, the
/// WhatsApp bot and the check-in terminal are the only callers. An identity
/// whose configured password is empty is disabled and can never log in.
pub fn authenticate(config: &AppConfig, username: &str, password: &str) -> Option<ServiceIdentity> {
    let identities = [
        (
            &config.admin_username,
            &config.admin_password,
            "admin",
            vec!["*".to_string()],
        ),
        (
            &config.bot_username,
            &config.bot_password,
            "bot",
            owned(&BOT_PERMISSIONS),
        ),
        (
            &config.device_username,
            &config.device_password,
            "device",
            owned(&DEVICE_PERMISSIONS),
        ),
    ];

    for (known_username, known_password, role, permissions) in identities {
        if username != known_username.as_str() {
            continue;
        }
        if known_password.is_empty() || password != known_password.as_str() {
            debug!("Password mismatch for known identity '{}'", username);
            return None;
        }
        return Some(ServiceIdentity {
            username: username.to_string(),
            role: role.to_string(),
            permissions,
        });
    }

    None
}
