//! Host identity for the manifest.

use imgprov_core::HostResolver;
use sysinfo::System;

/// Resolves the hostname of the machine we are running on.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHost;

impl HostResolver for SystemHost {
    fn hostname(&self) -> Option<String> {
        let hostname = System::host_name().filter(|h| !h.is_empty());
        if hostname.is_none() {
            tracing::warn!("Could not determine hostname, leaving it empty");
        }
        hostname
    }
}
