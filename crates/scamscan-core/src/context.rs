//! Optional client metadata accompanying a scan.

use serde::{Deserialize, Serialize};

/// Caller-supplied context. Everything is optional; an anonymous scan
/// carries an empty context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientContext {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    /// Type hint from the scanning client (e.g. the QR decoder already
    /// knows it decoded a barcode). Advisory only; the engine classifies
    /// from payload shape.
    pub declared_type: Option<String>,
}

impl ClientContext {
    /// Actor string for audit events: the user if known, else the IP,
    /// else anonymous.
    pub fn actor(&self) -> String {
        self.ip.clone().unwrap_or_else(|| "ANONYMOUS".to_string())
    }
}
