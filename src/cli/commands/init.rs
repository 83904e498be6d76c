//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "xmlsync.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing xmlsync configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        match fs::write(&self.output, Self::sample_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set sync.sync_path to the directory the extract files land in");
                println!("  2. Export XMLSYNC_PG_CONNECTION or edit postgresql.connection_string");
                println!("  3. Validate configuration: xmlsync validate-config");
                println!("  4. Preview an import: xmlsync import user --dry-run");
                println!("  5. Schedule: xmlsync import course|enrol|user");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    fn sample_config() -> &'static str {
        r#"# xmlsync Configuration File
# Loads course, enrolment and user XML extracts into blue/green replica tables

# Database target (postgresql or memory)
database_target = "postgresql"  # postgresql | memory

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Read and validate extracts without writing anything
dry_run = false

[sync]
# Directory holding moodle_crs.xml, moodle_enr.xml and moodle_per.xml
sync_path = "/data/sync"

# Alert when an extract's timestamp is older than this many seconds
stale_threshold_secs = 86400

# Reject enrolment/user imports whose row count moves by more than this
# much since the previous import (0 disables the check)
import_count_threshold = 0

[postgresql]
# postgresql://[user[:password]@][host][:port][/dbname]
connection_string = "${XMLSYNC_PG_CONNECTION}"
max_connections = 10
connection_timeout_seconds = 30
statement_timeout_seconds = 60
ssl_mode = "prefer"  # disable | prefer

[alert]
# POST stale-file alerts as JSON to a webhook; otherwise they are logged
webhook_enabled = false
# webhook_url = "${XMLSYNC_ALERT_WEBHOOK_URL}"
timeout_seconds = 30

[logging]
# JSON log files in addition to console output
local_enabled = false
local_path = "/var/log/xmlsync"
local_rotation = "daily"  # daily | hourly | never
"#
    }
}
