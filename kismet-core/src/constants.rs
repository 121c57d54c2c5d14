//! Client-wide constants.

/// Application name.
pub const APP_NAME: &str = "kismet-rest";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default server URI (scheme, host and port).
pub const DEFAULT_HOST_URI: &str = "http://127.0.0.1:2501";

/// Name of the server-issued session cookie.
pub const SESSION_COOKIE_NAME: &str = "KISMET";

/// Default location of the session cookie cache.
pub const DEFAULT_SESSION_CACHE: &str = "~/.kismet_session";

/// Form field carrying base64-encoded msgpack commands.
pub const MSGPACK_FORM_FIELD: &str = "msgpack";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Server endpoint paths, relative to the host URI.
pub mod paths {
    pub const CHECK_SESSION: &str = "session/check_session";
    pub const SYSTEM_STATUS: &str = "system/status.msgpack";
    pub const ALL_DEVICES: &str = "devices/all_devices.msgpack";
    pub const ALL_SOURCES: &str = "datasource/all_sources.msgpack";
    pub const ADD_SOURCE: &str = "datasource/add_source.cmd";
    pub const GPS_UPDATE: &str = "gps/web/update.cmd";
    pub const DOT11_SSID_REGEX: &str = "phy/phy80211/ssid_regex.cmd";
    pub const DOT11_PROBE_REGEX: &str = "phy/phy80211/probe_regex.cmd";

    /// Devices added or changed since `ts`.
    pub fn devices_since(ts: i64) -> String {
        format!("devices/last-time/{ts}/devices.msgpack")
    }

    /// Full record of a single device.
    pub fn device_by_key(key: &str) -> String {
        format!("devices/by-key/{key}/device.msgpack")
    }

    /// A single field path inside a device record.
    pub fn device_field(key: &str, field: &str) -> String {
        format!("devices/by-key/{key}/device.msgpack/{field}")
    }

    /// All devices, across phy types, with the given MAC.
    pub fn devices_by_mac(mac: &str) -> String {
        format!("devices/by-mac/{mac}/devices.msgpack")
    }

    pub fn source_set_channel(uuid: &str) -> String {
        format!("datasource/by-uuid/{uuid}/set_channel.cmd")
    }

    pub fn source_set_hop(uuid: &str) -> String {
        format!("datasource/by-uuid/{uuid}/set_hop.cmd")
    }
}

/// Well-known tracked field names used by the client itself.
pub mod fields {
    pub const DOT11_DEVICE: &str = "dot11.device";
    pub const DOT11_ASSOCIATED_CLIENT_MAP: &str = "dot11.device.associated_client_map";
}
