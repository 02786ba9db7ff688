// system-tests/tests/helpers/app.rs
// ============================================================================
// Module: Application Spawn Helpers
// Description: Shared spawn-and-fixture setup for system-test scenarios.
// Purpose: Boot one isolated stub instance and a ready fixture per test.
// Dependencies: flowprobe-harness, system-tests
// ============================================================================

//! ## Overview
//! Every system test boots its own stub instance through the application
//! factory, waits for readiness, and receives a fixture bound to that
//! instance. Timeout and email-domain overrides come from the environment
//! configuration.

use std::time::Duration;

use flowprobe_core::CredentialGenerator;
use flowprobe_harness::AppFactory;
use flowprobe_harness::AppHandle;
use flowprobe_harness::FlowFixture;
use flowprobe_harness::HarnessConfig;
use flowprobe_harness::wait_until_ready;
use system_tests::config::SystemTestConfig;

use super::identity_stub::boot_identity_app;

/// Default readiness and request deadline when no override is set.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Registration page path of the stub application.
pub const REGISTER_PATH: &str = "/Identity/Account/Register";

/// Spawns an isolated stub instance and returns its handle and fixture.
pub async fn spawn_identity_app() -> Result<(AppHandle, FlowFixture), String> {
    let settings = SystemTestConfig::load()?;
    let timeout = settings.timeout.unwrap_or(DEFAULT_TIMEOUT);
    let factory = AppFactory::new(boot_identity_app);
    let handle = factory.spawn().await.map_err(|err| format!("factory spawn failed: {err}"))?;
    let config = HarnessConfig::default();
    let client =
        handle.client(&config).map_err(|err| format!("client build failed: {err}"))?;
    wait_until_ready(&client, REGISTER_PATH, timeout).await.map_err(|err| err.to_string())?;
    let mut fixture = FlowFixture::new(client, &config);
    if let Some(domain) = settings.email_domain {
        fixture = fixture.with_generator(CredentialGenerator::default().with_domain(domain));
    }
    Ok((handle, fixture))
}
