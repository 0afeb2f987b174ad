/*! Integration tests for texdocs.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - database: Opening, resetting and closing database files
 * - account: Account creation, login, access policies, update and removal
 * - friend: Friend edges and the visibility they grant
 * - group: Group lifecycle under strict and legacy access checks
 * - document: Document lifecycle, projections and PDF options
 * - scenario: The alice/bob walkthrough across managers
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("texdocs=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod database;
mod friend;
mod group;
mod scenario;
