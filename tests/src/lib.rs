mod exec_log;
pub use exec_log::ExecLog;

mod scripted_driver;
pub use scripted_driver::ScriptedDriver;

use relmap::{Db, Flavor};

/// Mapping shared by the integration tests.
pub const MAPPING: &str = r#"{
    "entities": [
        {
            "name": "Customer",
            "table": "customer",
            "keys": [{ "name": "Id", "sequence": true }],
            "properties": ["Name", "Email"]
        },
        {
            "name": "Order",
            "table": "orders",
            "keys": [{ "name": "Id", "sequence": true }],
            "properties": [
                "CustomerId",
                { "name": "Number", "column": "order_no", "constructor": "number" },
                { "name": "Total", "column": "total_amount" },
                "Status"
            ],
            "navigations": [
                { "name": "Customer", "target": "Customer", "mode": "left",
                  "keys": [{ "from": "CustomerId", "to": "Id" }] }
            ]
        }
    ]
}"#;

/// A database over a fresh scripted driver, and the driver itself.
pub fn setup() -> (Db, ScriptedDriver) {
    let _ = env_logger::builder().is_test(true).try_init();

    let driver = ScriptedDriver::new();
    let db = Db::builder()
        .mapping(MAPPING)
        .flavor(Flavor::Mysql)
        .build(driver.clone());

    (db, driver)
}
