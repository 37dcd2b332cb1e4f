//! Common test utilities for workflow integration tests.

#![allow(dead_code)]

use workflow_tests::WorkflowTestContext;

/// Create a new workflow test context over empty directories.
///
/// This is the main entry point for workflow tests.
pub fn setup() -> WorkflowTestContext {
    WorkflowTestContext::new().expect("Failed to create workflow test context")
}

/// Set up a context holding one saved customer (id 1) and work location (id 1).
pub fn setup_with_contacts() -> WorkflowTestContext {
    let mut ctx = setup();
    ctx.run_ok(&[
        "customer",
        "add",
        "--name",
        "Jane Doe",
        "--phone",
        "(555) 010-2030",
        "--email",
        "jane@example.com",
        "--address",
        "42 Elm Street",
    ]);
    ctx.run_ok(&[
        "location",
        "add",
        "--name",
        "Riverside Warehouse",
        "--address",
        "9 Dock Road",
        "--city",
        "Springfield",
        "--state",
        "IL",
        "--zip",
        "62701",
    ]);
    ctx
}

/// Arguments for a standard invoice against the saved contacts.
pub const STANDARD_INVOICE: &[&str] = &[
    "invoice",
    "new",
    "--customer",
    "1",
    "--location",
    "1",
    "--item",
    "Filter|2|15.00",
    "--item",
    "Labor|1|80",
    "--tax-rate",
    "8",
    "--date",
    "2024-03-05",
];
